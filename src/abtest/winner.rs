use crate::domain::abtest::TestVariant;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct VariantStanding {
    pub variant_id: Uuid,
    pub variant_name: String,
    pub impressions: i64,
    pub clicks: i64,
    pub ctr: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WinnerCheck {
    Winner(Uuid),
    NotEnoughVariants,
    InsufficientData,
    BelowThreshold,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// CTR as a percentage, two decimal places. Zero impressions means zero CTR.
pub fn ctr_percent(clicks: i64, impressions: i64) -> f64 {
    if impressions <= 0 {
        return 0.0;
    }
    round2(clicks as f64 / impressions as f64 * 100.0)
}

pub fn standings(variants: &[TestVariant]) -> Vec<VariantStanding> {
    variants
        .iter()
        .map(|v| VariantStanding {
            variant_id: v.variant_id,
            variant_name: v.variant_name.clone(),
            impressions: v.impressions,
            clicks: v.clicks,
            ctr: v.ctr,
        })
        .collect()
}

pub fn best_by_ctr(standings: &[VariantStanding]) -> Option<&VariantStanding> {
    standings
        .iter()
        .max_by(|a, b| a.ctr.partial_cmp(&b.ctr).unwrap_or(std::cmp::Ordering::Equal))
}

/// Relative CTR improvement of `best` over `other`. An opponent with zero CTR
/// counts as fully beaten when the leader has any CTR at all.
fn improvement(best: f64, other: f64) -> f64 {
    if other > 0.0 {
        (best - other) / other
    } else if best > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Early-winner policy: the CTR leader must beat every other variant by the
/// flat `performance_threshold` fraction, with each variant carrying at least
/// `min_impressions`. A flat gap, not a significance test; low-traffic tests
/// can crown a premature winner, which is why `min_impressions` gates it.
pub fn evaluate(
    standings: &[VariantStanding],
    performance_threshold: f64,
    min_impressions: i64,
) -> WinnerCheck {
    if standings.len() < 2 {
        return WinnerCheck::NotEnoughVariants;
    }

    if standings.iter().any(|s| s.impressions < min_impressions) {
        return WinnerCheck::InsufficientData;
    }

    let Some(best) = best_by_ctr(standings) else {
        return WinnerCheck::NotEnoughVariants;
    };

    let beats_all = standings
        .iter()
        .filter(|s| s.variant_id != best.variant_id)
        .all(|other| improvement(best.ctr, other.ctr) >= performance_threshold);

    if beats_all {
        WinnerCheck::Winner(best.variant_id)
    } else {
        WinnerCheck::BelowThreshold
    }
}
