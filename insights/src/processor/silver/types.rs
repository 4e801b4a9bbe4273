use serde::Serialize;
use std::collections::BTreeMap;

use crate::processor::bronze::{DataQualityIssue, Rating};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateCategory {
    Excellent,
    Great,
    Good,
    Poor,
    Unrated,
}

impl RateCategory {
    pub fn from_rating(rating: Option<Rating>) -> Self {
        match rating.map(Rating::tenths) {
            Some(t) if t >= 45 => Self::Excellent,
            Some(t) if t >= 35 => Self::Great,
            Some(t) if t >= 25 => Self::Good,
            Some(t) if t >= 10 => Self::Poor,
            _ => Self::Unrated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT",
            Self::Great => "GREAT",
            Self::Good => "GOOD",
            Self::Poor => "POOR",
            Self::Unrated => "UNRATED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceCategory {
    Budget,
    Moderate,
    Expensive,
    Luxury,
    Unknown,
}

impl PriceCategory {
    pub fn from_price_range(price_range: Option<u8>) -> Self {
        match price_range {
            Some(1) => Self::Budget,
            Some(2) => Self::Moderate,
            Some(3) => Self::Expensive,
            Some(4) => Self::Luxury,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "BUDGET",
            Self::Moderate => "MODERATE",
            Self::Expensive => "EXPENSIVE",
            Self::Luxury => "LUXURY",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// An enriched restaurant. Built once by the silver layer, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub row: usize,
    pub id: String,
    pub name: String,
    pub country_code: String,
    pub country_name: String,
    pub city: Option<String>,
    pub locality: Option<String>,
    pub cuisines: Vec<String>,
    pub rating: Option<Rating>,
    pub votes: Option<u32>,
    /// Local currency; only comparable within one country.
    pub average_cost_for_two: Option<f64>,
    pub price_range: Option<u8>,
    pub has_online_delivery: Option<bool>,
    pub has_table_booking: Option<bool>,
    pub rate_category: RateCategory,
    pub price_category: PriceCategory,
}

impl Restaurant {
    pub fn offers_both_services(&self) -> Option<bool> {
        Some(self.has_online_delivery? && self.has_table_booking?)
    }
}

/// The immutable input to every gold view: an arena of restaurants plus
/// indices into it. Index lists keep input order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    restaurants: Vec<Restaurant>,
    by_country: BTreeMap<String, Vec<usize>>,
    by_city: BTreeMap<String, Vec<usize>>,
    by_cuisine: BTreeMap<String, Vec<usize>>,
}

impl Snapshot {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        let mut by_country: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_city: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_cuisine: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (idx, restaurant) in restaurants.iter().enumerate() {
            by_country
                .entry(restaurant.country_name.clone())
                .or_default()
                .push(idx);

            if let Some(city) = &restaurant.city {
                by_city.entry(city.clone()).or_default().push(idx);
            }

            for cuisine in &restaurant.cuisines {
                let members = by_cuisine.entry(cuisine.clone()).or_default();
                // tokens are deduplicated per record at split time
                members.push(idx);
            }
        }

        Self {
            restaurants,
            by_country,
            by_city,
            by_cuisine,
        }
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn get(&self, idx: usize) -> Option<&Restaurant> {
        self.restaurants.get(idx)
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    pub fn by_country(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.by_country
    }

    pub fn by_city(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.by_city
    }

    pub fn by_cuisine(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.by_cuisine
    }

    /// Resolves index lists back to records.
    pub fn members<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Restaurant> + 'a {
        indices.iter().filter_map(|&idx| self.restaurants.get(idx))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub lookup_misses: usize,
    pub misses_by_code: BTreeMap<String, usize>,
    pub issues: Vec<DataQualityIssue>,
}
