use crate::domain::abtest::TestType;
use serde::Deserialize;

pub const MIN_VARIANTS: usize = 2;
pub const MAX_VARIANTS: usize = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct VariantInput {
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Checks variant count and the per-type required content fields.
pub fn validate_variants(test_type: TestType, variants: &[VariantInput]) -> Result<(), String> {
    if variants.len() < MIN_VARIANTS || variants.len() > MAX_VARIANTS {
        return Err(format!(
            "test must have between {MIN_VARIANTS} and {MAX_VARIANTS} variants"
        ));
    }

    let mut names: Vec<&str> = variants.iter().map(|v| v.name.trim()).collect();
    if names.iter().any(|n| n.is_empty()) {
        return Err("each variant must have a name".to_string());
    }
    names.sort_unstable();
    names.dedup();
    if names.len() != variants.len() {
        return Err("variant names must be unique".to_string());
    }

    for variant in variants {
        match test_type {
            TestType::Thumbnail if !present(&variant.thumbnail_url) => {
                return Err("thumbnail test requires a thumbnail_url for each variant".to_string());
            }
            TestType::Title if !present(&variant.title) => {
                return Err("title test requires a title for each variant".to_string());
            }
            TestType::Description if !present(&variant.description) => {
                return Err("description test requires a description for each variant".to_string());
            }
            TestType::Combined
                if !present(&variant.thumbnail_url) || !present(&variant.title) =>
            {
                return Err(
                    "combined test requires both thumbnail_url and title for each variant"
                        .to_string(),
                );
            }
            _ => {}
        }
    }

    Ok(())
}

pub fn validate_schedule(duration_hours: i32, rotation_frequency_hours: i32) -> Result<(), String> {
    if duration_hours <= 0 {
        return Err("duration_hours must be positive".to_string());
    }
    if rotation_frequency_hours <= 0 {
        return Err("rotation_frequency_hours must be positive".to_string());
    }
    if rotation_frequency_hours > duration_hours {
        return Err("rotation frequency cannot exceed the test duration".to_string());
    }
    Ok(())
}
