use serde::Serialize;

use super::ViewOutput;
use super::rank::{RankStyle, mean, percentile_cont, rank_by, sorted_positions};
use crate::processor::bronze::Rating;
use crate::processor::silver::{Restaurant, Snapshot};

const PERCENTILE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketPosition {
    MarketLeader,
    QualityChampion,
    CustomerFavorite,
    ValueLeader,
    StandardPerformer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitiveRanking {
    pub city: String,
    pub id: String,
    pub name: String,
    pub rating: Rating,
    pub votes: u32,
    pub average_cost_for_two: Option<f64>,
    pub quality_rank: usize,
    pub popularity_rank: usize,
    /// 90th percentile rating over the city's restaurants with at least
    /// `min_votes` votes.
    pub city_p90_rating: f64,
    /// Mean cost for two over the same restaurants as `city_p90_rating`;
    /// low-vote restaurants do not move it.
    pub city_avg_cost: Option<f64>,
    pub position: MarketPosition,
}

struct Contender<'a> {
    restaurant: &'a Restaurant,
    rating: Rating,
    votes: u32,
}

impl MarketPosition {
    fn classify(contender: &Contender<'_>, quality_rank: usize, popularity_rank: usize, p90: f64, avg_cost: Option<f64>) -> Self {
        let rating = contender.rating.as_f64();
        if quality_rank <= 5 && popularity_rank <= 10 {
            Self::MarketLeader
        } else if quality_rank <= 10 && rating + PERCENTILE_EPSILON >= p90 {
            Self::QualityChampion
        } else if popularity_rank <= 5 {
            Self::CustomerFavorite
        } else if contender.rating.tenths() >= 45
            && matches!(
                (contender.restaurant.average_cost_for_two, avg_cost),
                (Some(cost), Some(avg)) if cost <= avg
            )
        {
            Self::ValueLeader
        } else {
            Self::StandardPerformer
        }
    }
}

/// Standing of well-reviewed restaurants against the rest of their city.
///
/// Needs a city, a rating and a vote count; rows below `min_votes` are
/// filtered out rather than dropped, and the city benchmarks are taken over
/// the remaining restaurants only.
pub fn competitive_ranking(snapshot: &Snapshot, min_votes: u32) -> ViewOutput<CompetitiveRanking> {
    let mut dropped = snapshot.restaurants().iter().filter(|r| r.city.is_none()).count();
    let mut rows = Vec::new();

    for (city, indices) in snapshot.by_city() {
        let mut contenders = Vec::new();
        for restaurant in snapshot.members(indices) {
            let (Some(rating), Some(votes)) = (restaurant.rating, restaurant.votes) else {
                dropped += 1;
                continue;
            };
            if votes >= min_votes {
                contenders.push(Contender {
                    restaurant,
                    rating,
                    votes,
                });
            }
        }

        let ratings: Vec<f64> = contenders.iter().map(|c| c.rating.as_f64()).collect();
        let Some(p90) = percentile_cont(&ratings, 0.9) else {
            continue;
        };
        let avg_cost = mean(contenders.iter().filter_map(|c| c.restaurant.average_cost_for_two));

        let quality = rank_by(&contenders, RankStyle::Standard, |a, b| {
            b.rating.cmp(&a.rating).then_with(|| b.votes.cmp(&a.votes))
        });
        let popularity = rank_by(&contenders, RankStyle::Standard, |a, b| b.votes.cmp(&a.votes));

        for idx in sorted_positions(&quality, |a, b| a.cmp(b)) {
            let contender = &contenders[idx];
            rows.push(CompetitiveRanking {
                city: city.clone(),
                id: contender.restaurant.id.clone(),
                name: contender.restaurant.name.clone(),
                rating: contender.rating,
                votes: contender.votes,
                average_cost_for_two: contender.restaurant.average_cost_for_two,
                quality_rank: quality[idx],
                popularity_rank: popularity[idx],
                city_p90_rating: p90,
                city_avg_cost: avg_cost,
                position: MarketPosition::classify(contender, quality[idx], popularity[idx], p90, avg_cost),
            });
        }
    }

    ViewOutput { rows, dropped }
}
