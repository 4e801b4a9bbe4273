use serde::Serialize;

use super::ViewOutput;
use super::locality::locality_groups;
use super::rank::{ratio, sorted_positions};
use crate::processor::silver::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalityContribution {
    pub city: String,
    pub locality: String,
    pub restaurant_count: usize,
    /// 1-based position in the city's descending-count order.
    pub rank: usize,
    pub cumulative_count: usize,
    pub contribution_pct: f64,
    pub cumulative_share_pct: f64,
}

/// Running restaurant totals over each city's localities, largest first.
///
/// The running total is row by row, so tied localities (ordered by name)
/// each get their own cumulative value.
pub fn rolling_contribution(snapshot: &Snapshot) -> ViewOutput<LocalityContribution> {
    let (cities, dropped) = locality_groups(snapshot);
    let mut rows = Vec::new();

    for (city, groups) in &cities {
        let city_total: usize = groups.iter().map(|group| group.members.len()).sum();
        let order = sorted_positions(groups, |a, b| {
            b.members
                .len()
                .cmp(&a.members.len())
                .then_with(|| a.locality.cmp(b.locality))
        });

        let mut cumulative = 0;
        for (position, idx) in order.into_iter().enumerate() {
            let group = &groups[idx];
            let count = group.members.len();
            cumulative += count;

            let (Some(contribution), Some(share)) = (ratio(count, cumulative), ratio(cumulative, city_total))
            else {
                continue;
            };

            rows.push(LocalityContribution {
                city: city.to_string(),
                locality: group.locality.to_string(),
                restaurant_count: count,
                rank: position + 1,
                cumulative_count: cumulative,
                contribution_pct: contribution * 100.0,
                cumulative_share_pct: share * 100.0,
            });
        }
    }

    ViewOutput { rows, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::gold::testing::{RestaurantBuilder, snapshot};
    use crate::processor::silver::Restaurant;

    fn add(rows: &mut Vec<Restaurant>, locality: &str, count: usize) {
        for i in 0..count {
            rows.push(
                RestaurantBuilder::new(&format!("{locality}{i}"))
                    .city("Pune")
                    .locality(locality)
                    .build(),
            );
        }
    }

    #[test]
    fn running_totals_per_city() {
        let mut rows = Vec::new();
        add(&mut rows, "Wakad", 5);
        add(&mut rows, "Baner", 10);
        add(&mut rows, "Aundh", 10);
        let view = rolling_contribution(&snapshot(rows));

        let summary: Vec<(&str, usize, usize)> = view
            .rows
            .iter()
            .map(|r| (r.locality.as_str(), r.rank, r.cumulative_count))
            .collect();
        assert_eq!(summary, vec![("Aundh", 1, 10), ("Baner", 2, 20), ("Wakad", 3, 25)]);

        assert!((view.rows[0].contribution_pct - 100.0).abs() < 1e-9);
        assert!((view.rows[1].contribution_pct - 50.0).abs() < 1e-9);
        assert!((view.rows[2].contribution_pct - 20.0).abs() < 1e-9);
        assert!((view.rows[2].cumulative_share_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_snapshot_has_no_rows() {
        let view = rolling_contribution(&snapshot(Vec::new()));
        assert!(view.rows.is_empty());
        assert_eq!(view.dropped, 0);
    }
}
