use serde::Serialize;
use std::collections::HashSet;

use super::ViewOutput;
use super::rank::{mean, ratio};
use crate::processor::silver::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DigitalMaturity {
    DigitalLeader,
    DigitalAdopter,
    TraditionalMarket,
}

impl DigitalMaturity {
    pub fn classify(delivery_ratio: f64) -> Self {
        if delivery_ratio >= 0.5 {
            Self::DigitalLeader
        } else if delivery_ratio >= 0.25 {
            Self::DigitalAdopter
        } else {
            Self::TraditionalMarket
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPenetration {
    pub country: String,
    pub restaurant_count: usize,
    pub city_count: usize,
    pub market_share_pct: f64,
    pub delivery_count: usize,
    /// Over rows whose delivery flag is known.
    pub delivery_ratio: Option<f64>,
    /// Over rows whose booking flag is known.
    pub booking_ratio: Option<f64>,
    pub avg_rating: Option<f64>,
    pub avg_votes: Option<f64>,
    /// In the country's own currency: never compare this across rows.
    pub avg_cost_local_currency: Option<f64>,
    pub digital_maturity: Option<DigitalMaturity>,
}

/// Per-country share of the market and online-delivery maturity.
///
/// Counts and shares cover every restaurant, so shares sum to 100. A row
/// without a delivery flag is left out of the delivery figures and counted as
/// dropped; a missing booking flag only affects `booking_ratio`.
pub fn market_penetration(snapshot: &Snapshot) -> ViewOutput<MarketPenetration> {
    let global = snapshot.len();
    let mut dropped = 0;

    let mut rows: Vec<MarketPenetration> = Vec::new();
    for (country, indices) in snapshot.by_country() {
        let members: Vec<_> = snapshot.members(indices).collect();
        let count = members.len();
        let Some(share) = ratio(count, global) else {
            continue;
        };

        let delivery_known: Vec<bool> = members.iter().filter_map(|r| r.has_online_delivery).collect();
        let booking_known: Vec<bool> = members.iter().filter_map(|r| r.has_table_booking).collect();
        dropped += count - delivery_known.len();

        let delivery_count = delivery_known.iter().filter(|&&on| on).count();
        let delivery_ratio = ratio(delivery_count, delivery_known.len());
        let booking_count = booking_known.iter().filter(|&&on| on).count();
        let cities: HashSet<&str> = members.iter().filter_map(|r| r.city.as_deref()).collect();

        rows.push(MarketPenetration {
            country: country.clone(),
            restaurant_count: count,
            city_count: cities.len(),
            market_share_pct: share * 100.0,
            delivery_count,
            delivery_ratio,
            booking_ratio: ratio(booking_count, booking_known.len()),
            avg_rating: mean(members.iter().filter_map(|r| r.rating.map(|v| v.as_f64()))),
            avg_votes: mean(members.iter().filter_map(|r| r.votes.map(f64::from))),
            avg_cost_local_currency: mean(members.iter().filter_map(|r| r.average_cost_for_two)),
            digital_maturity: delivery_ratio.map(DigitalMaturity::classify),
        });
    }

    rows.sort_by(|a, b| {
        b.restaurant_count
            .cmp(&a.restaurant_count)
            .then_with(|| a.country.cmp(&b.country))
    });

    ViewOutput { rows, dropped }
}
