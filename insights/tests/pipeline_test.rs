use common::config::Settings;
use ingest::{CountryRow, MemorySource, RawRecord};
use insights::processor::bronze::DataQualityIssue;
use insights::processor::gold::success::SuccessProbability;
use insights::services::InsightsService;
use std::fs;
use std::sync::Arc;

struct Row {
    id: &'static str,
    code: &'static str,
    city: &'static str,
    rating: &'static str,
    votes: &'static str,
    delivery: &'static str,
    booking: &'static str,
}

impl Row {
    fn new(id: &'static str, code: &'static str, city: &'static str) -> Self {
        Self {
            id,
            code,
            city,
            rating: "3.8",
            votes: "150",
            delivery: "Yes",
            booking: "No",
        }
    }

    fn rated(mut self, rating: &'static str, votes: &'static str) -> Self {
        self.rating = rating;
        self.votes = votes;
        self
    }

    fn services(mut self, delivery: &'static str, booking: &'static str) -> Self {
        self.delivery = delivery;
        self.booking = booking;
        self
    }

    fn raw(self) -> RawRecord {
        RawRecord {
            id: Some(self.id.to_string()),
            name: Some(format!("Kitchen {}", self.id)),
            country_code: Some(self.code.to_string()),
            city: Some(self.city.to_string()),
            locality: Some(format!("{} Central", self.city)),
            cuisines: Some("North Indian, Chinese,".to_string()),
            average_cost_for_two: Some("800".to_string()),
            price_range: Some("2".to_string()),
            rating: Some(self.rating.to_string()),
            votes: Some(self.votes.to_string()),
            has_online_delivery: Some(self.delivery.to_string()),
            has_table_booking: Some(self.booking.to_string()),
        }
    }
}

fn countries() -> Vec<CountryRow> {
    vec![
        CountryRow::new("1", "India"),
        CountryRow::new("30", "Brazil"),
        CountryRow::new("214", "UAE"),
    ]
}

fn dataset() -> Vec<RawRecord> {
    vec![
        Row::new("1", "1", "Pune").rated("4.5", "1500").services("Yes", "Yes").raw(),
        Row::new("2", "1", "Pune").raw(),
        Row::new("3", "1", "Pune").services("No", "No").raw(),
        Row::new("4", "30", "Bras?lia").rated("4.2", "60").raw(),
        Row::new("5", "214", "Dubai").raw(),
        Row::new("6", "214", "Dubai").rated("2.9", "lots").raw(),
        Row::new("42", "1", "Ghost Town").rated("4.9", "9000").raw(),
        Row::new("7", "7", "Nowhere").raw(),
        Row::new("8", "999", "Denied").raw(),
    ]
}

fn settings() -> Settings {
    Settings::from_toml_str(
        r#"
        [source]
        restaurants_path = "unused.csv"
        countries_path = "unused.csv"

        [cleaning]
        country_code_denylist = ["999"]
        excluded_ids = ["42"]

        [analysis]
        locality_min_restaurants = 1
        cuisine_min_restaurants = 1
        "#,
    )
    .unwrap()
}

async fn run(rows: Vec<RawRecord>, countries: Vec<CountryRow>) -> insights::services::PipelineOutput {
    InsightsService::new(&settings(), Arc::new(MemorySource::new(rows, countries)))
        .unwrap()
        .run()
        .await
        .unwrap()
}

#[tokio::test]
async fn excluded_id_never_reaches_a_view() {
    let output = run(dataset(), countries()).await;

    assert_eq!(output.summary.cleaning.dropped_excluded, 1);
    let rendered = serde_json::to_string(&output.views).unwrap();
    assert!(!rendered.contains("Ghost Town"));
    assert!(!rendered.contains("\"id\":\"42\""));
}

#[tokio::test]
async fn summary_tallies_every_exclusion() {
    let output = run(dataset(), countries()).await;
    let summary = &output.summary;

    assert_eq!(summary.input_rows, 9);
    assert_eq!(summary.cleaning.dropped_denylisted, 1);
    assert_eq!(summary.cleaning.city_fixes, 1);
    assert_eq!(summary.enrichment.lookup_misses, 1);
    assert_eq!(summary.snapshot_rows, 6);
    assert_eq!(summary.excluded_rows(), 3);
    assert!(summary.cleaning.violations.iter().any(|issue| matches!(
        issue,
        DataQualityIssue::SchemaViolation { field: "votes", .. }
    )));

    // the row with unparsable votes cannot be scored
    assert_eq!(summary.view("success_scoring").map(|v| v.dropped), Some(1));
    assert!(output.views.success_scoring.rows.iter().any(|r| r.city == "Brasilia"));
}

#[tokio::test]
async fn market_shares_sum_to_one_hundred() {
    let output = run(dataset(), countries()).await;
    let rows = &output.views.market_penetration.rows;

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].country, "India");
    let total: f64 = rows.iter().map(|r| r.market_share_pct).sum();
    assert!((total - 100.0).abs() < 1e-6, "shares sum to {total}");
}

#[tokio::test]
async fn perfect_restaurant_scores_high_success() {
    let output = run(dataset(), countries()).await;
    let score = output
        .views
        .success_scoring
        .rows
        .iter()
        .find(|r| r.id == "1")
        .unwrap();

    assert_eq!(score.total_score, 100);
    assert_eq!(score.probability, SuccessProbability::HighSuccessProbability);
    assert_eq!(score.city_rank, 1);
}

#[tokio::test]
async fn cuisine_tokens_ignore_trailing_commas() {
    let output = run(dataset(), countries()).await;
    let names: Vec<&str> = output
        .views
        .cuisine_performance
        .rows
        .iter()
        .map(|r| r.cuisine.as_str())
        .collect();

    assert!(names.contains(&"North Indian"));
    assert!(names.contains(&"Chinese"));
    assert!(names.iter().all(|name| !name.trim().is_empty()));
}

#[tokio::test]
async fn empty_input_gives_empty_views() {
    let output = run(Vec::new(), countries()).await;

    assert_eq!(output.summary.input_rows, 0);
    assert_eq!(output.summary.snapshot_rows, 0);
    for count in &output.summary.views {
        assert_eq!(count.rows, 0, "{}", count.view);
    }
}

#[test]
fn invalid_cleaning_rules_are_rejected_before_reading() {
    let err = Settings::from_toml_str(
        r#"
        [source]
        restaurants_path = "r.csv"
        countries_path = "c.csv"

        [cleaning]
        excluded_ids = ["42", "42"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, common::Error::Configuration(_)));
}

#[tokio::test]
async fn csv_run_exports_every_view() {
    let dir = tempfile::tempdir().unwrap();
    let restaurants = dir.path().join("zomato.csv");
    let lookup = dir.path().join("countries.csv");
    let out = dir.path().join("out");

    fs::write(
        &restaurants,
        "restaurant_id,restaurant_name,country_code,city,locality,cuisines,average_cost_for_two,price_range,rating,votes,has_online_delivery,has_table_booking\n\
         1,Cafe Uno,1,Pune,Baner,\"Cafe, Italian\",800,2,4.5,1500,Yes,Yes\n\
         2,Dhaba,1,Pune,Baner,North Indian,300,1,3.9,80,No,No\n\
         3,Mezze,214,Dubai,Marina,Lebanese,120,3,4.1,210,Yes,No\n",
    )
    .unwrap();
    fs::write(&lookup, "country_code,country\n1,India\n214,UAE\n").unwrap();

    let settings = Settings::from_toml_str(&format!(
        "[source]\nrestaurants_path = {:?}\ncountries_path = {:?}\n\n[output]\ndir = {:?}\n",
        restaurants.to_str().unwrap(),
        lookup.to_str().unwrap(),
        out.to_str().unwrap()
    ))
    .unwrap();

    let summary = insights::run_insights_pipeline(&settings).await.unwrap();
    assert_eq!(summary.input_rows, 3);
    assert_eq!(summary.snapshot_rows, 3);

    for view in &summary.views {
        assert!(out.join(format!("{}.json", view.view)).exists(), "{}", view.view);
    }
    let raw = fs::read_to_string(out.join("run_summary.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["input_rows"], 3);
    assert_eq!(json["input_checksum"].as_str().map(str::len), Some(64));
}
