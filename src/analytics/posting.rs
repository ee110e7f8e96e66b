//! Posting-time analysis over historical per-video performance. Falls back
//! to per-category industry-standard slots when the channel has too little
//! history to learn from.

use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Below this many videos the recommendations come from industry standards.
pub const MIN_VIDEOS_FOR_ANALYSIS: usize = 10;

/// (hour of day, rationale) slots per channel category.
const DEFAULT_SLOTS: &[(u32, &str)] = &[
    (14, "Weekday afternoon"),
    (18, "Evening"),
    (12, "Weekend noon"),
];
const GAMING_SLOTS: &[(u32, &str)] = &[
    (15, "After school"),
    (20, "Evening gaming"),
    (12, "Weekend noon"),
];
const EDUCATION_SLOTS: &[(u32, &str)] = &[
    (10, "Morning learning"),
    (14, "Afternoon study"),
    (19, "Evening review"),
];
const ENTERTAINMENT_SLOTS: &[(u32, &str)] = &[
    (18, "After work"),
    (20, "Prime time"),
    (14, "Weekend afternoon"),
];

pub fn industry_standards(category: &str) -> &'static [(u32, &'static str)] {
    match category {
        "gaming" => GAMING_SLOTS,
        "education" => EDUCATION_SLOTS,
        "entertainment" => ENTERTAINMENT_SLOTS,
        _ => DEFAULT_SLOTS,
    }
}

/// One published video's performance, the input row for every analysis here.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoPerformance {
    pub published_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub engagement_rate: f64,
}

impl VideoPerformance {
    /// Provided rate, or (likes + comments) / views as a percentage.
    fn engagement(&self) -> f64 {
        if self.engagement_rate > 0.0 {
            return self.engagement_rate;
        }
        if self.views > 0 {
            (self.likes + self.comments) as f64 / self.views as f64 * 100.0
        } else {
            0.0
        }
    }

    fn weekday(&self) -> u32 {
        self.published_at.weekday().num_days_from_monday()
    }

    fn hour(&self) -> u32 {
        self.published_at.hour()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotStats {
    pub day_of_week: u32,
    pub hour: u32,
    pub count: usize,
    pub avg_views: f64,
    pub avg_engagement: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayRank {
    pub day_of_week: u32,
    pub views: f64,
    pub engagement: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourRank {
    pub hour: u32,
    pub views: f64,
    pub engagement: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatternAnalysis {
    pub slots: Vec<SlotStats>,
    pub best_days: Vec<DayRank>,
    pub best_hours: Vec<HourRank>,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeakSlot {
    pub day_of_week: u32,
    pub hour: u32,
    pub activity_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudienceActivity {
    pub activity_by_day: BTreeMap<u32, f64>,
    pub activity_by_hour: BTreeMap<u32, f64>,
    pub peak_times: Vec<PeakSlot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub day_of_week: u32,
    pub hour: u32,
    pub expected_engagement: f64,
    pub confidence_score: f64,
    pub reason: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups history into (weekday, hour) slots with average views/engagement,
/// and ranks the best 3 days and 5 hours by engagement then views.
pub fn analyze_posting_patterns(videos: &[VideoPerformance]) -> PatternAnalysis {
    let mut slots: BTreeMap<(u32, u32), (usize, i64, f64)> = BTreeMap::new();
    for video in videos {
        let entry = slots.entry((video.weekday(), video.hour())).or_insert((0, 0, 0.0));
        entry.0 += 1;
        entry.1 += video.views;
        entry.2 += video.engagement();
    }

    let slots: Vec<SlotStats> = slots
        .into_iter()
        .map(|((day_of_week, hour), (count, total_views, total_engagement))| SlotStats {
            day_of_week,
            hour,
            count,
            avg_views: total_views as f64 / count as f64,
            avg_engagement: total_engagement / count as f64,
        })
        .collect();

    let mut day_perf: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
    let mut hour_perf: BTreeMap<u32, (f64, f64)> = BTreeMap::new();
    for slot in &slots {
        let day = day_perf.entry(slot.day_of_week).or_insert((0.0, 0.0));
        day.0 += slot.avg_views;
        day.1 += slot.avg_engagement;
        let hour = hour_perf.entry(slot.hour).or_insert((0.0, 0.0));
        hour.0 += slot.avg_views;
        hour.1 += slot.avg_engagement;
    }

    let mut best_days: Vec<DayRank> = day_perf
        .into_iter()
        .map(|(day_of_week, (views, engagement))| DayRank {
            day_of_week,
            views,
            engagement,
        })
        .collect();
    best_days.sort_by(|a, b| {
        (b.engagement, b.views)
            .partial_cmp(&(a.engagement, a.views))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    best_days.truncate(3);

    let mut best_hours: Vec<HourRank> = hour_perf
        .into_iter()
        .map(|(hour, (views, engagement))| HourRank {
            hour,
            views,
            engagement,
        })
        .collect();
    best_hours.sort_by(|a, b| {
        (b.engagement, b.views)
            .partial_cmp(&(a.engagement, a.views))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    best_hours.truncate(5);

    PatternAnalysis {
        slots,
        best_days,
        best_hours,
        sample_size: videos.len(),
    }
}

/// Average engagement per weekday and hour, with the ten strongest
/// (weekday, hour) combinations as peak slots.
pub fn audience_activity(videos: &[VideoPerformance]) -> AudienceActivity {
    let mut day_totals: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    let mut hour_totals: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for video in videos {
        let day = day_totals.entry(video.weekday()).or_insert((0.0, 0));
        day.0 += video.engagement();
        day.1 += 1;
        let hour = hour_totals.entry(video.hour()).or_insert((0.0, 0));
        hour.0 += video.engagement();
        hour.1 += 1;
    }

    let activity_by_day: BTreeMap<u32, f64> = day_totals
        .into_iter()
        .map(|(day, (total, count))| (day, round2(total / count as f64)))
        .collect();
    let activity_by_hour: BTreeMap<u32, f64> = hour_totals
        .into_iter()
        .map(|(hour, (total, count))| (hour, round2(total / count as f64)))
        .collect();

    let mut peak_times = Vec::new();
    for (&day, &day_score) in &activity_by_day {
        for (&hour, &hour_score) in &activity_by_hour {
            peak_times.push(PeakSlot {
                day_of_week: day,
                hour,
                activity_score: round2((day_score + hour_score) / 2.0),
            });
        }
    }
    peak_times.sort_by(|a, b| {
        b.activity_score
            .partial_cmp(&a.activity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    peak_times.truncate(10);

    AudienceActivity {
        activity_by_day,
        activity_by_hour,
        peak_times,
    }
}

/// Top 3 posting-time recommendations. With enough history each observed slot
/// is scored from its views, engagement and audience-activity peak; otherwise
/// the per-category industry-standard slots fill in at low confidence.
pub fn recommend_posting_times(
    videos: &[VideoPerformance],
    category: &str,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if videos.len() >= MIN_VIDEOS_FOR_ANALYSIS {
        let patterns = analyze_posting_patterns(videos);
        let activity = audience_activity(videos);

        let mut scored: Vec<Recommendation> = patterns
            .slots
            .iter()
            .map(|slot| {
                let activity_score = activity
                    .peak_times
                    .iter()
                    .find(|p| p.day_of_week == slot.day_of_week && p.hour == slot.hour)
                    .map(|p| p.activity_score)
                    .unwrap_or(0.0);

                // Engagement weighs heavier than raw views.
                let combined =
                    (slot.avg_views + slot.avg_engagement * 100.0 + activity_score) / 3.0;

                Recommendation {
                    day_of_week: slot.day_of_week,
                    hour: slot.hour,
                    expected_engagement: round2(combined),
                    confidence_score: round2((slot.count as f64 / 5.0).min(1.0)),
                    reason: format!(
                        "Based on {} videos with avg {:.0} views",
                        slot.count, slot.avg_views
                    ),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.expected_engagement
                .partial_cmp(&a.expected_engagement)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(3);
        recommendations = scored;
    }

    if recommendations.len() < 3 {
        for &(hour, reason) in industry_standards(category) {
            // Weekend slots land on Saturday, the rest mid-week.
            let day_of_week = if reason.to_lowercase().contains("weekend") { 5 } else { 2 };
            recommendations.push(Recommendation {
                day_of_week,
                hour,
                expected_engagement: 50.0,
                confidence_score: 0.3,
                reason: format!("Industry standard: {reason}"),
            });
        }
        recommendations.truncate(3);
    }

    recommendations
}

pub fn format_day_name(day_of_week: u32) -> &'static str {
    const DAYS: [&str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];
    DAYS.get(day_of_week as usize).copied().unwrap_or("Unknown")
}

pub fn format_time(hour: u32) -> String {
    match hour {
        0 => "12:00 AM".to_string(),
        1..=11 => format!("{hour}:00 AM"),
        12 => "12:00 PM".to_string(),
        _ => format!("{}:00 PM", hour - 12),
    }
}
