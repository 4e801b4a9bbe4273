use serde::Serialize;
use std::collections::BTreeMap;

use super::ViewOutput;
use super::rank::{mean, ratio};
use crate::processor::silver::{PriceCategory, RateCategory, Restaurant, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceModel {
    ServiceLeaders,
    ServiceAdopters,
    SelectiveAdopters,
    TraditionalModel,
}

impl ServiceModel {
    pub fn classify(adoption_ratio: f64) -> Self {
        if adoption_ratio >= 0.7 {
            Self::ServiceLeaders
        } else if adoption_ratio >= 0.4 {
            Self::ServiceAdopters
        } else if adoption_ratio >= 0.2 {
            Self::SelectiveAdopters
        } else {
            Self::TraditionalModel
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCorrelation {
    pub rate_category: RateCategory,
    pub price_category: PriceCategory,
    pub restaurant_count: usize,
    pub delivery_pct: f64,
    pub booking_pct: f64,
    pub both_services_count: usize,
    pub adoption_pct: f64,
    pub avg_votes: Option<f64>,
    pub service_model: ServiceModel,
}

/// Joint adoption of delivery and booking per (rating, price) segment.
pub fn service_correlation(snapshot: &Snapshot) -> ViewOutput<ServiceCorrelation> {
    let mut segments: BTreeMap<(RateCategory, PriceCategory), Vec<&Restaurant>> = BTreeMap::new();
    let mut dropped = 0;

    for restaurant in snapshot.restaurants() {
        if restaurant.offers_both_services().is_none() {
            dropped += 1;
            continue;
        }
        segments
            .entry((restaurant.rate_category, restaurant.price_category))
            .or_default()
            .push(restaurant);
    }

    let rows = segments
        .into_iter()
        .filter_map(|((rate_category, price_category), members)| {
            let count = members.len();
            let delivery = members.iter().filter(|r| r.has_online_delivery == Some(true)).count();
            let booking = members.iter().filter(|r| r.has_table_booking == Some(true)).count();
            let both = members
                .iter()
                .filter(|r| r.offers_both_services() == Some(true))
                .count();
            let adoption = ratio(both, count)?;

            Some(ServiceCorrelation {
                rate_category,
                price_category,
                restaurant_count: count,
                delivery_pct: ratio(delivery, count)? * 100.0,
                booking_pct: ratio(booking, count)? * 100.0,
                both_services_count: both,
                adoption_pct: adoption * 100.0,
                avg_votes: mean(members.iter().filter_map(|r| r.votes.map(f64::from))),
                service_model: ServiceModel::classify(adoption),
            })
        })
        .collect();

    ViewOutput { rows, dropped }
}
