use anyhow::{bail, Result};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage growth between two metric values.
pub fn growth_rate(old_value: f64, new_value: f64) -> Result<f64> {
    if old_value <= 0.0 {
        bail!("old_value must be positive for growth rate calculation");
    }
    Ok(round2((new_value - old_value) / old_value * 100.0))
}

/// Interactions per view, as a percentage.
pub fn engagement_rate(likes: i64, comments: i64, shares: i64, views: i64) -> Result<f64> {
    if views <= 0 {
        bail!("views must be positive for engagement rate calculation");
    }
    let total = (likes + comments + shares) as f64;
    Ok(round2(total / views as f64 * 100.0))
}

/// Click-through rate as a percentage. Unlike the variant-side estimate this
/// treats missing impressions as an error, not zero.
pub fn ctr(clicks: i64, impressions: i64) -> Result<f64> {
    if impressions <= 0 {
        bail!("impressions must be positive for CTR calculation");
    }
    Ok(round2(clicks as f64 / impressions as f64 * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_rate_requires_a_positive_baseline() {
        assert_eq!(growth_rate(100.0, 150.0).unwrap(), 50.0);
        assert_eq!(growth_rate(200.0, 150.0).unwrap(), -25.0);
        assert!(growth_rate(0.0, 150.0).is_err());
    }

    #[test]
    fn engagement_rate_sums_interactions() {
        assert_eq!(engagement_rate(10, 4, 2, 100).unwrap(), 16.0);
        assert!(engagement_rate(1, 1, 1, 0).is_err());
    }

    #[test]
    fn ctr_rejects_zero_impressions() {
        assert_eq!(ctr(33, 1000).unwrap(), 3.3);
        assert!(ctr(5, 0).is_err());
    }
}
