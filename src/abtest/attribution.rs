use chrono::NaiveDate;
use uuid::Uuid;

/// Date range (inclusive on both ends) during which one variant was live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPeriod {
    pub variant_id: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Reconstructs per-variant live periods from the ordered `variant_changed`
/// audit rows. The last change stays live until `until`. Attribution is at
/// day granularity, so the switchover day belongs to both the outgoing and
/// incoming variant.
pub fn active_periods(
    changes: &[(Uuid, chrono::DateTime<chrono::Utc>)],
    until: chrono::DateTime<chrono::Utc>,
) -> Vec<VariantPeriod> {
    let mut periods = Vec::new();

    for (idx, (variant_id, applied_at)) in changes.iter().enumerate() {
        let end = changes
            .get(idx + 1)
            .map(|(_, next_at)| next_at.date_naive())
            .unwrap_or_else(|| until.date_naive());

        periods.push(VariantPeriod {
            variant_id: *variant_id,
            start: applied_at.date_naive(),
            end,
        });
    }

    periods
}

/// Sums daily views over the days a given variant was live.
pub fn views_for_variant(
    periods: &[VariantPeriod],
    variant_id: Uuid,
    daily_views: &[(NaiveDate, i64)],
) -> i64 {
    let mut total = 0;
    for (day, views) in daily_views {
        let covered = periods
            .iter()
            .any(|p| p.variant_id == variant_id && p.start <= *day && *day <= p.end);
        if covered {
            total += views;
        }
    }
    total
}

#[derive(Debug, Clone, PartialEq)]
pub struct EstimatedMetrics {
    pub impressions: i64,
    pub clicks: i64,
    pub views: i64,
    pub ctr: f64,
}

/// The Analytics API reports views per video, not per thumbnail/title
/// variant, so impressions and clicks are estimated from attributed views:
/// ten impressions per view, one click per view.
pub fn estimate_metrics(views: i64) -> EstimatedMetrics {
    let impressions = views * 10;
    let clicks = views;
    EstimatedMetrics {
        impressions,
        clicks,
        views,
        ctr: super::winner::ctr_percent(clicks, impressions),
    }
}
