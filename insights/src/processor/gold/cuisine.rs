use serde::Serialize;

use super::ViewOutput;
use super::rank::{RankStyle, desc_nulls_last, mean, rank_by, sorted_positions};
use crate::processor::silver::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CuisineSegment {
    HighDemandHighQuality,
    HighDemandModerateQuality,
    NicheHighQuality,
    EmergingSegment,
}

impl CuisineSegment {
    pub fn classify(popularity_rank: usize, quality_rank: usize) -> Self {
        match (popularity_rank <= 10, quality_rank <= 10) {
            (true, true) => Self::HighDemandHighQuality,
            (true, false) => Self::HighDemandModerateQuality,
            (false, true) => Self::NicheHighQuality,
            (false, false) => Self::EmergingSegment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuisinePerformance {
    pub cuisine: String,
    pub restaurant_count: usize,
    pub avg_rating: Option<f64>,
    pub avg_votes: Option<f64>,
    pub popularity_rank: usize,
    pub quality_rank: usize,
    pub segment: CuisineSegment,
}

/// Cuisine popularity against quality, built from the cuisine index.
/// Restaurants listing no cuisine at all are counted as dropped.
pub fn cuisine_performance(
    snapshot: &Snapshot,
    min_restaurants: usize,
    min_token_len: usize,
) -> ViewOutput<CuisinePerformance> {
    let dropped = snapshot
        .restaurants()
        .iter()
        .filter(|r| r.cuisines.is_empty())
        .count();

    let candidates: Vec<(&str, usize, Option<f64>, Option<f64>)> = snapshot
        .by_cuisine()
        .iter()
        .filter(|(cuisine, members)| {
            cuisine.chars().count() >= min_token_len && members.len() >= min_restaurants
        })
        .map(|(cuisine, members)| {
            let avg_rating = mean(
                snapshot
                    .members(members)
                    .filter_map(|r| r.rating.map(|v| v.as_f64())),
            );
            let avg_votes = mean(snapshot.members(members).filter_map(|r| r.votes.map(f64::from)));
            (cuisine.as_str(), members.len(), avg_rating, avg_votes)
        })
        .collect();

    let popularity = rank_by(&candidates, RankStyle::Standard, |a, b| b.1.cmp(&a.1));
    let quality = rank_by(&candidates, RankStyle::Standard, |a, b| desc_nulls_last(a.2, b.2));

    let keyed: Vec<(usize, usize)> = popularity.iter().copied().zip(quality.iter().copied()).collect();
    let rows = sorted_positions(&keyed, |a, b| a.cmp(b))
        .into_iter()
        .map(|idx| {
            let (cuisine, count, avg_rating, avg_votes) = candidates[idx];
            CuisinePerformance {
                cuisine: cuisine.to_string(),
                restaurant_count: count,
                avg_rating,
                avg_votes,
                popularity_rank: popularity[idx],
                quality_rank: quality[idx],
                segment: CuisineSegment::classify(popularity[idx], quality[idx]),
            }
        })
        .collect();

    ViewOutput { rows, dropped }
}
