use serde::Serialize;

use super::ViewOutput;
use super::rank::sorted_positions;
use crate::processor::bronze::Rating;
use crate::processor::silver::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityCategory {
    HighValueOpportunity,
    HiddenGem,
    ImprovementCandidate,
    PremiumSegment,
    StandardOperation,
}

/// The inputs every opportunity rule looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpportunitySignals {
    pub rating: Rating,
    pub votes: u32,
    pub cost: f64,
    pub both_services: bool,
}

impl OpportunitySignals {
    fn high_value(&self) -> bool {
        self.rating.tenths() >= 40 && self.votes >= 100 && self.cost < 1000.0 && self.both_services
    }

    fn hidden_gem(&self) -> bool {
        self.rating.tenths() >= 45 && self.votes < 50
    }

    pub fn priority(&self) -> u8 {
        if self.high_value() {
            1
        } else if self.hidden_gem() {
            2
        } else {
            3
        }
    }

    pub fn category(&self) -> OpportunityCategory {
        if self.high_value() {
            OpportunityCategory::HighValueOpportunity
        } else if self.hidden_gem() {
            OpportunityCategory::HiddenGem
        } else if self.rating.tenths() < 40 && self.votes >= 100 {
            OpportunityCategory::ImprovementCandidate
        } else if self.rating.tenths() >= 40 && self.cost >= 1000.0 {
            OpportunityCategory::PremiumSegment
        } else {
            OpportunityCategory::StandardOperation
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub city: String,
    pub id: String,
    pub name: String,
    pub rating: Rating,
    pub votes: u32,
    pub average_cost_for_two: f64,
    pub has_online_delivery: bool,
    pub has_table_booking: bool,
    pub priority: u8,
    pub city_position: usize,
    pub category: OpportunityCategory,
}

/// Investment shortlist per city: priority first, then rating and votes.
pub fn opportunity_scoring(snapshot: &Snapshot) -> ViewOutput<Opportunity> {
    let mut dropped = snapshot.restaurants().iter().filter(|r| r.city.is_none()).count();
    let mut rows = Vec::new();

    for (city, indices) in snapshot.by_city() {
        let mut scored = Vec::new();
        for restaurant in snapshot.members(indices) {
            let (Some(rating), Some(votes), Some(cost), Some(delivery), Some(booking)) = (
                restaurant.rating,
                restaurant.votes,
                restaurant.average_cost_for_two,
                restaurant.has_online_delivery,
                restaurant.has_table_booking,
            ) else {
                dropped += 1;
                continue;
            };
            let signals = OpportunitySignals {
                rating,
                votes,
                cost,
                both_services: delivery && booking,
            };
            scored.push((restaurant, signals, delivery, booking));
        }

        let order = sorted_positions(&scored, |a, b| {
            a.1.priority()
                .cmp(&b.1.priority())
                .then_with(|| b.1.rating.cmp(&a.1.rating))
                .then_with(|| b.1.votes.cmp(&a.1.votes))
        });

        for (position, idx) in order.into_iter().enumerate() {
            let (restaurant, signals, delivery, booking) = scored[idx];
            rows.push(Opportunity {
                city: city.clone(),
                id: restaurant.id.clone(),
                name: restaurant.name.clone(),
                rating: signals.rating,
                votes: signals.votes,
                average_cost_for_two: signals.cost,
                has_online_delivery: delivery,
                has_table_booking: booking,
                priority: signals.priority(),
                city_position: position + 1,
                category: signals.category(),
            });
        }
    }

    ViewOutput { rows, dropped }
}
