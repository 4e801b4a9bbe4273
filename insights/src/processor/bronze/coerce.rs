use super::types::Rating;

pub(crate) const UNPARSABLE: &str = "unparsable";
pub(crate) const OUT_OF_RANGE: &str = "out of range";
pub(crate) const MISSING: &str = "missing";

pub fn parse_rating(raw: &str) -> Result<Rating, &'static str> {
    let value: f64 = raw.trim().parse().map_err(|_| UNPARSABLE)?;
    if !value.is_finite() {
        return Err(UNPARSABLE);
    }
    let tenths = (value * 10.0).round();
    if !(0.0..=f64::from(Rating::MAX_TENTHS)).contains(&tenths) {
        return Err(OUT_OF_RANGE);
    }
    Rating::from_tenths(tenths as u8).ok_or(OUT_OF_RANGE)
}

pub fn parse_votes(raw: &str) -> Result<u32, &'static str> {
    let value: i64 = raw.trim().parse().map_err(|_| UNPARSABLE)?;
    u32::try_from(value).map_err(|_| OUT_OF_RANGE)
}

pub fn parse_cost(raw: &str) -> Result<f64, &'static str> {
    let value: f64 = raw.trim().parse().map_err(|_| UNPARSABLE)?;
    if !value.is_finite() {
        return Err(UNPARSABLE);
    }
    if value < 0.0 {
        return Err(OUT_OF_RANGE);
    }
    Ok(value)
}

/// Any integer ordinal is kept; values outside 1..=4 categorise as unknown.
pub fn parse_price_range(raw: &str) -> Result<u8, &'static str> {
    let value: i64 = raw.trim().parse().map_err(|_| UNPARSABLE)?;
    u8::try_from(value).map_err(|_| OUT_OF_RANGE)
}

pub fn parse_flag(raw: &str) -> Result<bool, &'static str> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(UNPARSABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_keeps_one_fractional_digit() {
        assert_eq!(parse_rating("4.5").unwrap().tenths(), 45);
        assert_eq!(parse_rating(" 3 ").unwrap().tenths(), 30);
        assert_eq!(parse_rating("4.26").unwrap().tenths(), 43);
        assert_eq!(parse_rating("0").unwrap().tenths(), 0);
        assert_eq!(parse_rating("5.0").unwrap().to_string(), "5.0");
    }

    #[test]
    fn rating_rejects_garbage_and_out_of_range() {
        assert_eq!(parse_rating("Not rated"), Err(UNPARSABLE));
        assert_eq!(parse_rating("NaN"), Err(UNPARSABLE));
        assert_eq!(parse_rating("5.1"), Err(OUT_OF_RANGE));
        assert_eq!(parse_rating("-0.5"), Err(OUT_OF_RANGE));
    }

    #[test]
    fn votes_must_be_non_negative_integers() {
        assert_eq!(parse_votes("1500"), Ok(1500));
        assert_eq!(parse_votes("-3"), Err(OUT_OF_RANGE));
        assert_eq!(parse_votes("12.5"), Err(UNPARSABLE));
    }

    #[test]
    fn cost_is_non_negative_float() {
        assert_eq!(parse_cost("800"), Ok(800.0));
        assert_eq!(parse_cost("249.5"), Ok(249.5));
        assert_eq!(parse_cost("-1"), Err(OUT_OF_RANGE));
        assert_eq!(parse_cost("n/a"), Err(UNPARSABLE));
    }

    #[test]
    fn flags_accept_yes_and_no_only() {
        assert_eq!(parse_flag("YES"), Ok(true));
        assert_eq!(parse_flag("No"), Ok(false));
        assert_eq!(parse_flag("maybe"), Err(UNPARSABLE));
    }

    #[test]
    fn price_range_keeps_unknown_ordinals() {
        assert_eq!(parse_price_range("2"), Ok(2));
        assert_eq!(parse_price_range("9"), Ok(9));
        assert_eq!(parse_price_range("300"), Err(OUT_OF_RANGE));
        assert_eq!(parse_price_range("cheap"), Err(UNPARSABLE));
    }
}
