use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::ViewOutput;
use super::rank::{RankStyle, desc_nulls_last, mean, ratio, rank_by, sorted_positions};
use crate::processor::silver::{Restaurant, Snapshot};

const QUALITY_RATING_TENTHS: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalityTier {
    PremiumDestination,
    QualityHub,
    MajorFoodZone,
    EmergingArea,
}

impl LocalityTier {
    pub fn classify(density_rank: usize, quality_rank: usize, quality_pct: f64, count: usize) -> Self {
        if density_rank <= 10 && quality_rank <= 10 {
            Self::PremiumDestination
        } else if density_rank <= 20 && quality_pct >= 60.0 {
            Self::QualityHub
        } else if count >= 50 {
            Self::MajorFoodZone
        } else {
            Self::EmergingArea
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalityPerformance {
    pub city: String,
    pub locality: String,
    pub restaurant_count: usize,
    pub avg_rating: Option<f64>,
    pub avg_votes: Option<f64>,
    pub avg_cost_for_two: Option<f64>,
    /// Share of the locality's restaurants rated 4.0 or better.
    pub quality_pct: f64,
    pub density_rank: usize,
    pub quality_rank: usize,
    pub tier: LocalityTier,
}

/// Restaurants of one (city, locality) pair, in input order.
pub(super) struct LocalityGroup<'a> {
    pub city: &'a str,
    pub locality: &'a str,
    pub members: Vec<&'a Restaurant>,
}

/// Groups by city (ascending) then locality (first appearance within the
/// city). Also returns how many rows lacked a city or locality.
pub(super) fn locality_groups(snapshot: &Snapshot) -> (BTreeMap<&str, Vec<LocalityGroup<'_>>>, usize) {
    let mut cities: BTreeMap<&str, Vec<LocalityGroup<'_>>> = BTreeMap::new();
    let mut positions: HashMap<(&str, &str), usize> = HashMap::new();
    let mut dropped = 0;

    for restaurant in snapshot.restaurants() {
        let (Some(city), Some(locality)) = (restaurant.city.as_deref(), restaurant.locality.as_deref())
        else {
            dropped += 1;
            continue;
        };

        let groups = cities.entry(city).or_default();
        let position = *positions.entry((city, locality)).or_insert_with(|| {
            groups.push(LocalityGroup {
                city,
                locality,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[position].members.push(restaurant);
    }

    (cities, dropped)
}

/// Locality density and quality, ranked within each city with dense ranks.
pub fn locality_performance(snapshot: &Snapshot, min_restaurants: usize) -> ViewOutput<LocalityPerformance> {
    let (cities, dropped) = locality_groups(snapshot);
    let mut rows = Vec::new();

    for groups in cities.values() {
        let qualifying: Vec<&LocalityGroup<'_>> = groups
            .iter()
            .filter(|group| group.members.len() >= min_restaurants)
            .collect();
        if qualifying.is_empty() {
            continue;
        }

        let stats: Vec<(usize, Option<f64>)> = qualifying
            .iter()
            .map(|group| {
                let avg = mean(group.members.iter().filter_map(|r| r.rating.map(|v| v.as_f64())));
                (group.members.len(), avg)
            })
            .collect();

        let density = rank_by(&stats, RankStyle::Dense, |a, b| b.0.cmp(&a.0));
        let quality = rank_by(&stats, RankStyle::Dense, |a, b| desc_nulls_last(a.1, b.1));
        let order = sorted_positions(&density, |a, b| a.cmp(b));

        for idx in order {
            let group = qualifying[idx];
            let (count, avg_rating) = stats[idx];
            let strong = group
                .members
                .iter()
                .filter(|r| r.rating.is_some_and(|v| v.tenths() >= QUALITY_RATING_TENTHS))
                .count();
            let Some(quality_share) = ratio(strong, count) else {
                continue;
            };
            let quality_pct = quality_share * 100.0;

            rows.push(LocalityPerformance {
                city: group.city.to_string(),
                locality: group.locality.to_string(),
                restaurant_count: count,
                avg_rating,
                avg_votes: mean(group.members.iter().filter_map(|r| r.votes.map(f64::from))),
                avg_cost_for_two: mean(group.members.iter().filter_map(|r| r.average_cost_for_two)),
                quality_pct,
                density_rank: density[idx],
                quality_rank: quality[idx],
                tier: LocalityTier::classify(density[idx], quality[idx], quality_pct, count),
            });
        }
    }

    ViewOutput { rows, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::gold::testing::{RestaurantBuilder, snapshot};

    fn locality(rows: &mut Vec<Restaurant>, city: &str, name: &str, count: usize, rating: f64) {
        for i in 0..count {
            rows.push(
                RestaurantBuilder::new(&format!("{city}-{name}-{i}"))
                    .city(city)
                    .locality(name)
                    .rating(rating)
                    .build(),
            );
        }
    }

    #[test]
    fn dense_ranks_within_city() {
        let mut rows = Vec::new();
        locality(&mut rows, "Pune", "Baner", 6, 3.0);
        locality(&mut rows, "Pune", "Aundh", 8, 4.2);
        locality(&mut rows, "Pune", "Wakad", 8, 3.6);
        locality(&mut rows, "Pune", "Tiny", 2, 4.9);
        locality(&mut rows, "Delhi", "CP", 5, 4.0);
        let view = locality_performance(&snapshot(rows), 5);

        let pune: Vec<(&str, usize, usize)> = view
            .rows
            .iter()
            .filter(|r| r.city == "Pune")
            .map(|r| (r.locality.as_str(), r.density_rank, r.quality_rank))
            .collect();
        // ties on count keep first appearance
        assert_eq!(pune, vec![("Aundh", 1, 1), ("Wakad", 1, 2), ("Baner", 2, 3)]);

        assert_eq!(view.rows[0].city, "Delhi");
        assert_eq!(view.rows[0].density_rank, 1);
        assert_eq!(view.rows.len(), 4);
    }

    #[test]
    fn classifies_tiers() {
        assert_eq!(LocalityTier::classify(3, 4, 10.0, 6), LocalityTier::PremiumDestination);
        assert_eq!(LocalityTier::classify(15, 11, 60.0, 6), LocalityTier::QualityHub);
        assert_eq!(LocalityTier::classify(25, 30, 90.0, 50), LocalityTier::MajorFoodZone);
        assert_eq!(LocalityTier::classify(25, 30, 90.0, 49), LocalityTier::EmergingArea);
    }

    #[test]
    fn quality_pct_counts_ratings_of_four_and_above() {
        let mut rows = Vec::new();
        locality(&mut rows, "Pune", "Baner", 3, 4.0);
        locality(&mut rows, "Pune", "Baner", 2, 3.9);
        let view = locality_performance(&snapshot(rows), 5);
        assert_eq!(view.rows.len(), 1);
        assert!((view.rows[0].quality_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn rows_without_location_are_dropped() {
        let rows = vec![
            RestaurantBuilder::new("a").no_city().build(),
            RestaurantBuilder::new("b").build(),
        ];
        let view = locality_performance(&snapshot(rows), 1);
        assert_eq!(view.dropped, 1);
        assert_eq!(view.rows.len(), 1);
    }
}
