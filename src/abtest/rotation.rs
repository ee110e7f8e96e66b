use crate::domain::abtest::TestVariant;

/// Variants rotate in name order, wrapping around. All helpers expect the
/// slice sorted by `variant_name`, which is how the repo returns it.
pub fn current_variant(variants: &[TestVariant]) -> Option<&TestVariant> {
    variants
        .iter()
        .filter(|v| v.applied_at.is_some())
        .max_by_key(|v| v.applied_at)
        .or_else(|| variants.first())
}

pub fn next_variant(variants: &[TestVariant]) -> Option<&TestVariant> {
    if variants.is_empty() {
        return None;
    }

    let last_applied = variants
        .iter()
        .enumerate()
        .filter(|(_, v)| v.applied_at.is_some())
        .max_by_key(|(_, v)| v.applied_at)
        .map(|(idx, _)| idx);

    match last_applied {
        Some(idx) => variants.get((idx + 1) % variants.len()),
        None => variants.first(),
    }
}

/// A variant is due for rotation once its dwell time has elapsed. A test
/// whose variants were never applied is due immediately.
pub fn rotation_due(
    last_applied_at: Option<chrono::DateTime<chrono::Utc>>,
    rotation_frequency_hours: i32,
    now: chrono::DateTime<chrono::Utc>,
) -> bool {
    match last_applied_at {
        Some(applied_at) => {
            now >= applied_at + chrono::Duration::hours(rotation_frequency_hours as i64)
        }
        None => true,
    }
}
