use serde::Serialize;

use super::ViewOutput;
use super::rank::{RankStyle, rank_by, sorted_positions};
use crate::processor::bronze::Rating;
use crate::processor::silver::{PriceCategory, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuccessProbability {
    HighSuccessProbability,
    ModerateSuccessProbability,
    AveragePerformance,
    ImprovementNeeded,
    HighRiskOperation,
}

impl SuccessProbability {
    pub fn classify(total: u32) -> Self {
        match total {
            85.. => Self::HighSuccessProbability,
            70..=84 => Self::ModerateSuccessProbability,
            55..=69 => Self::AveragePerformance,
            40..=54 => Self::ImprovementNeeded,
            _ => Self::HighRiskOperation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CityTier {
    TopTierInCity,
    StrongPerformer,
    AveragePerformer,
    BelowAverage,
}

impl CityTier {
    pub fn classify(city_rank: usize) -> Self {
        match city_rank {
            0..=5 => Self::TopTierInCity,
            6..=15 => Self::StrongPerformer,
            16..=30 => Self::AveragePerformer,
            _ => Self::BelowAverage,
        }
    }
}

/// The five weighted components of the 0-100 success score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub rating_score: u32,
    pub engagement_score: u32,
    pub digital_score: u32,
    pub service_score: u32,
    pub positioning_score: u32,
}

impl ScoreBreakdown {
    pub fn compute(
        rating: Rating,
        votes: u32,
        delivery: bool,
        booking: bool,
        price_category: PriceCategory,
    ) -> Self {
        Self {
            rating_score: rating_score(rating),
            engagement_score: engagement_score(votes),
            digital_score: if delivery { 15 } else { 0 },
            service_score: if booking { 10 } else { 0 },
            positioning_score: positioning_score(price_category),
        }
    }

    pub fn total(&self) -> u32 {
        self.rating_score
            + self.engagement_score
            + self.digital_score
            + self.service_score
            + self.positioning_score
    }
}

/// 25 at 4.0 and above, otherwise rating × 6.25 truncated.
pub fn rating_score(rating: Rating) -> u32 {
    if rating.tenths() >= 40 {
        25
    } else {
        u32::from(rating.tenths()) * 625 / 1000
    }
}

pub fn engagement_score(votes: u32) -> u32 {
    match votes {
        1000.. => 25,
        500..=999 => 20,
        100..=499 => 15,
        50..=99 => 10,
        _ => 5,
    }
}

pub fn positioning_score(price_category: PriceCategory) -> u32 {
    match price_category {
        PriceCategory::Moderate => 25,
        PriceCategory::Budget => 20,
        PriceCategory::Expensive => 15,
        PriceCategory::Luxury => 10,
        PriceCategory::Unknown => 5,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessScore {
    pub city: String,
    pub id: String,
    pub name: String,
    pub rating: Rating,
    pub votes: u32,
    pub price_category: PriceCategory,
    #[serde(flatten)]
    pub breakdown: ScoreBreakdown,
    pub total_score: u32,
    pub probability: SuccessProbability,
    pub city_rank: usize,
    pub city_tier: CityTier,
}

/// Composite success score per restaurant, ranked within its city.
pub fn success_scoring(snapshot: &Snapshot) -> ViewOutput<SuccessScore> {
    let mut dropped = snapshot.restaurants().iter().filter(|r| r.city.is_none()).count();
    let mut rows = Vec::new();

    for (city, indices) in snapshot.by_city() {
        let mut scored = Vec::new();
        for restaurant in snapshot.members(indices) {
            let (Some(rating), Some(votes), Some(delivery), Some(booking)) = (
                restaurant.rating,
                restaurant.votes,
                restaurant.has_online_delivery,
                restaurant.has_table_booking,
            ) else {
                dropped += 1;
                continue;
            };
            let breakdown =
                ScoreBreakdown::compute(rating, votes, delivery, booking, restaurant.price_category);
            scored.push((restaurant, rating, votes, breakdown));
        }

        let ranks = rank_by(&scored, RankStyle::Standard, |a, b| b.3.total().cmp(&a.3.total()));

        for idx in sorted_positions(&ranks, |a, b| a.cmp(b)) {
            let (restaurant, rating, votes, breakdown) = scored[idx];
            let total = breakdown.total();
            rows.push(SuccessScore {
                city: city.clone(),
                id: restaurant.id.clone(),
                name: restaurant.name.clone(),
                rating,
                votes,
                price_category: restaurant.price_category,
                breakdown,
                total_score: total,
                probability: SuccessProbability::classify(total),
                city_rank: ranks[idx],
                city_tier: CityTier::classify(ranks[idx]),
            });
        }
    }

    ViewOutput { rows, dropped }
}
