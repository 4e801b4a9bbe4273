use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankStyle {
    /// Ties share a rank, the next rank skips (1, 1, 3).
    Standard,
    /// Ties share a rank, the next rank follows on (1, 1, 2).
    Dense,
}

/// Ranks `items` under `cmp`, returning the rank of each item at its original
/// position. Items comparing `Equal` are tied.
pub fn rank_by<T>(items: &[T], style: RankStyle, cmp: impl Fn(&T, &T) -> Ordering) -> Vec<usize> {
    let order = sorted_positions(items, &cmp);
    let mut ranks = vec![0; items.len()];

    let mut current = 0;
    for (position, &idx) in order.iter().enumerate() {
        let tied = position > 0 && cmp(&items[order[position - 1]], &items[idx]) == Ordering::Equal;
        if !tied {
            current = match style {
                RankStyle::Standard => position + 1,
                RankStyle::Dense => current + 1,
            };
        }
        ranks[idx] = current;
    }
    ranks
}

/// Positions of `items` in `cmp` order; the sort is stable so ties keep
/// input order.
pub fn sorted_positions<T>(items: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| cmp(&items[a], &items[b]));
    order
}

/// Descending order for optional floats with missing values last.
pub fn desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Continuous percentile with linear interpolation between closest ranks.
pub fn percentile_cont(values: &[f64], fraction: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let position = fraction.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// `part / whole`, or `None` for an empty group.
pub fn ratio(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64)
}
