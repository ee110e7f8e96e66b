use crate::domain::abtest::{TestSnapshot, TestType};
use anyhow::Result;
use chrono::NaiveDate;

fn fmt_date(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Test-results export. Built entirely from stored state so identical
/// snapshots produce identical bytes.
pub fn test_results_csv(snapshot: &TestSnapshot) -> Result<Vec<u8>> {
    let test = &snapshot.test;
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());

    writer.write_record(["A/B Test Results"])?;
    writer.write_record(["Test ID", &test.test_id.to_string()])?;
    writer.write_record(["Video ID", &test.video_id])?;
    writer.write_record(["Video Title", &test.video_title])?;
    writer.write_record(["Test Type", test.test_type.as_str()])?;
    writer.write_record(["Status", test.status.as_str()])?;
    writer.write_record(["Start Date", &fmt_date(test.start_date)])?;
    writer.write_record(["End Date", &fmt_date(test.end_date)])?;
    writer.write_record(["Duration (hours)", &test.duration_hours.to_string()])?;
    writer.write_record([""])?;

    writer.write_record(["Variant Results"])?;
    writer.write_record(["Variant", "Impressions", "Clicks", "Views", "CTR (%)", "Is Winner"])?;
    for variant in &snapshot.variants {
        writer.write_record([
            variant.variant_name.as_str(),
            &variant.impressions.to_string(),
            &variant.clicks.to_string(),
            &variant.views.to_string(),
            &format!("{:.2}", variant.ctr),
            if variant.is_winner { "Yes" } else { "No" },
        ])?;
    }

    writer.write_record([""])?;
    writer.write_record(["Variant Content Details"])?;
    for variant in &snapshot.variants {
        writer.write_record([""])?;
        writer.write_record(["Variant", variant.variant_name.as_str()])?;
        if matches!(test.test_type, TestType::Thumbnail | TestType::Combined) {
            writer.write_record(["Thumbnail URL", variant.thumbnail_url.as_deref().unwrap_or("")])?;
        }
        if matches!(test.test_type, TestType::Title | TestType::Combined) {
            writer.write_record(["Title", variant.title.as_deref().unwrap_or("")])?;
        }
        if matches!(test.test_type, TestType::Description) {
            writer.write_record(["Description", variant.description.as_deref().unwrap_or("")])?;
        }
    }

    writer.write_record([""])?;
    writer.write_record(["Winner Information"])?;
    match snapshot.variants.iter().find(|v| v.is_winner) {
        Some(winner) => {
            writer.write_record(["Winning Variant", winner.variant_name.as_str()])?;
            writer.write_record(["Winning CTR", &format!("{:.2}", winner.ctr)])?;
        }
        None => {
            writer.write_record(["No winner selected yet"])?;
        }
    }

    Ok(writer.into_inner()?)
}

#[derive(Debug, Clone)]
pub struct MetricsExportRow {
    pub date: NaiveDate,
    pub views: i64,
    pub watch_minutes: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub ctr: f64,
    pub engagement_rate: f64,
}

pub fn video_metrics_csv(video_id: &str, rows: &[MetricsExportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());

    writer.write_record([
        "Video ID",
        "Date",
        "Views",
        "Watch Time (minutes)",
        "Likes",
        "Comments",
        "Shares",
        "CTR (%)",
        "Engagement Rate (%)",
    ])?;

    for row in rows {
        writer.write_record([
            video_id,
            &row.date.format("%Y-%m-%d").to_string(),
            &row.views.to_string(),
            &row.watch_minutes.to_string(),
            &row.likes.to_string(),
            &row.comments.to_string(),
            &row.shares.to_string(),
            &format!("{:.2}", row.ctr),
            &format!("{:.2}", row.engagement_rate),
        ])?;
    }

    writer.write_record([""])?;
    writer.write_record(["Summary"])?;
    writer.write_record([
        "Total Views",
        &rows.iter().map(|r| r.views).sum::<i64>().to_string(),
    ])?;
    writer.write_record([
        "Total Watch Time",
        &rows.iter().map(|r| r.watch_minutes).sum::<i64>().to_string(),
    ])?;
    writer.write_record([
        "Total Likes",
        &rows.iter().map(|r| r.likes).sum::<i64>().to_string(),
    ])?;
    writer.write_record([
        "Total Comments",
        &rows.iter().map(|r| r.comments).sum::<i64>().to_string(),
    ])?;
    writer.write_record([
        "Total Shares",
        &rows.iter().map(|r| r.shares).sum::<i64>().to_string(),
    ])?;

    Ok(writer.into_inner()?)
}
