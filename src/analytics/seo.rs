//! Metadata scoring for video SEO. Pure text analysis over the submitted
//! title, description and tags; nothing here talks to the network.

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

pub const TITLE_WEIGHT: f64 = 0.30;
pub const DESCRIPTION_WEIGHT: f64 = 0.25;
pub const TAGS_WEIGHT: f64 = 0.20;
pub const KEYWORDS_WEIGHT: f64 = 0.25;

pub const OPTIMAL_TITLE_LENGTH: (usize, usize) = (50, 70);
pub const OPTIMAL_DESCRIPTION_LENGTH: (usize, usize) = (200, 5000);
pub const OPTIMAL_TAG_COUNT: (usize, usize) = (5, 15);

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
    "it", "its", "of", "on", "that", "the", "to", "was", "will", "with", "you", "your", "this",
    "but", "they", "have", "had", "what", "when", "where", "who", "which", "why", "how",
];

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[a-z]{3,}\b").expect("valid regex"))
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://").expect("valid regex"))
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}").expect("valid regex"))
}

fn hashtag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\w+").expect("valid regex"))
}

fn shouting_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[!?]{2,}").expect("valid regex"))
}

#[derive(Debug, Clone, Serialize)]
pub struct SeoReport {
    pub seo_score: i32,
    pub title_score: i32,
    pub description_score: i32,
    pub tags_score: i32,
    pub keywords_score: i32,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionStructure {
    pub has_links: bool,
    pub has_timestamps: bool,
    pub has_hashtags: bool,
    pub length_ok: bool,
    pub length: usize,
    pub paragraph_count: usize,
    pub recommendations: Vec<String>,
}

/// Scores the metadata per component and combines them into the weighted
/// overall score, with actionable recommendations for every weak component.
pub fn analyze_video(title: &str, description: &str, tags: &[String]) -> SeoReport {
    let title_score = score_title(title);
    let description_score = score_description(description);
    let tags_score = score_tags(tags);
    let keywords_score = score_keywords(title, description, tags);

    let seo_score = (title_score as f64 * TITLE_WEIGHT
        + description_score as f64 * DESCRIPTION_WEIGHT
        + tags_score as f64 * TAGS_WEIGHT
        + keywords_score as f64 * KEYWORDS_WEIGHT) as i32;

    let recommendations = recommendations_for(
        title,
        description,
        tags,
        title_score,
        description_score,
        tags_score,
        keywords_score,
    );

    SeoReport {
        seo_score,
        title_score,
        description_score,
        tags_score,
        keywords_score,
        recommendations,
    }
}

/// Lowercase words of three letters or more, minus stop words. Repeats are
/// kept so callers can weight by frequency.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_re()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Top keywords across title and description: the ten most frequent, keeping
/// any that repeat or come from the title.
pub fn suggest_keywords(title: &str, description: &str) -> Vec<String> {
    let title_keywords = extract_keywords(title);
    let description_keywords = extract_keywords(description);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for word in title_keywords.iter().chain(description_keywords.iter()) {
        let entry = counts.entry(word.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(word.as_str());
        }
        *entry += 1;
    }

    // Frequency order, first occurrence breaking ties.
    let mut ranked: Vec<&str> = first_seen.clone();
    ranked.sort_by_key(|w| std::cmp::Reverse(counts[w]));

    ranked
        .into_iter()
        .take(10)
        .filter(|w| counts[w] > 1 || title_keywords.iter().any(|t| t == w))
        .map(str::to_string)
        .collect()
}

pub fn check_title_length(title: &str) -> (bool, String) {
    let length = title.chars().count();
    let (min_len, max_len) = OPTIMAL_TITLE_LENGTH;

    if length < min_len {
        (
            false,
            format!("Title is too short ({length} chars). Aim for {min_len}-{max_len} characters."),
        )
    } else if length > max_len {
        (
            false,
            format!("Title is too long ({length} chars). Aim for {min_len}-{max_len} characters."),
        )
    } else {
        (true, format!("Title length is optimal ({length} chars)."))
    }
}

pub fn check_description_structure(description: &str) -> DescriptionStructure {
    let length = description.chars().count();
    let (min_len, max_len) = OPTIMAL_DESCRIPTION_LENGTH;

    let has_links = link_re().is_match(description);
    let has_timestamps = timestamp_re().is_match(description);
    let has_hashtags = hashtag_re().is_match(description);
    let paragraph_count = paragraphs(description);
    let length_ok = (min_len..=max_len).contains(&length);

    let mut recommendations = Vec::new();
    if !length_ok {
        if length < min_len {
            recommendations.push(format!(
                "Description is too short ({length} chars). Add more detail."
            ));
        } else {
            recommendations.push(format!(
                "Description is very long ({length} chars). Consider condensing."
            ));
        }
    }
    if !has_links {
        recommendations.push("Add relevant links (social media, website, resources).".to_string());
    }
    if !has_timestamps && length > 500 {
        recommendations.push("Consider adding timestamps for longer videos.".to_string());
    }
    if !has_hashtags {
        recommendations.push("Add 2-3 relevant hashtags for discoverability.".to_string());
    }
    if paragraph_count < 2 {
        recommendations
            .push("Break description into multiple paragraphs for readability.".to_string());
    }

    DescriptionStructure {
        has_links,
        has_timestamps,
        has_hashtags,
        length_ok,
        length,
        paragraph_count,
        recommendations,
    }
}

fn paragraphs(description: &str) -> usize {
    description.lines().filter(|l| !l.trim().is_empty()).count()
}

fn score_title(title: &str) -> i32 {
    if title.is_empty() {
        return 0;
    }

    let mut score = 0;
    let length = title.chars().count();
    let (min_len, max_len) = OPTIMAL_TITLE_LENGTH;

    if (min_len..=max_len).contains(&length) {
        score += 40;
    } else if length < min_len {
        score += (40.0 * length as f64 / min_len as f64) as i32;
    } else {
        let excess = (length - max_len) as i32;
        score += (40 - excess * 2).max(0);
    }

    let keywords = extract_keywords(title);
    if !keywords.is_empty() {
        score += (keywords.len() as i32 * 10).min(30);
    }

    if title.chars().next().is_some_and(char::is_uppercase) {
        score += 15;
    }

    if !shouting_re().is_match(title) {
        score += 15;
    }

    score.min(100)
}

fn score_description(description: &str) -> i32 {
    if description.is_empty() {
        return 0;
    }

    let mut score = 0;
    let length = description.chars().count();
    let (min_len, max_len) = OPTIMAL_DESCRIPTION_LENGTH;

    if (min_len..=max_len).contains(&length) {
        score += 30;
    } else if length < min_len {
        score += (30.0 * length as f64 / min_len as f64) as i32;
    } else {
        // Long descriptions keep full credit.
        score += 30;
    }

    if link_re().is_match(description) {
        score += 20;
    }

    let keywords = extract_keywords(description);
    if !keywords.is_empty() {
        score += (keywords.len() as i32 * 2).min(25);
    }

    let hashtags = hashtag_re().find_iter(description).count() as i32;
    if hashtags > 0 {
        score += (hashtags * 5).min(15);
    }

    if paragraphs(description) >= 2 {
        score += 10;
    }

    score.min(100)
}

fn score_tags(tags: &[String]) -> i32 {
    if tags.is_empty() {
        return 0;
    }

    let mut score = 0;
    let tag_count = tags.len();
    let (min_tags, max_tags) = OPTIMAL_TAG_COUNT;

    if (min_tags..=max_tags).contains(&tag_count) {
        score += 50;
    } else if tag_count < min_tags {
        score += (50.0 * tag_count as f64 / min_tags as f64) as i32;
    } else {
        score += (50 - (tag_count - max_tags) as i32 * 2).max(30);
    }

    // Multi-word tags are more specific.
    let multi_word = tags.iter().filter(|t| t.trim().contains(' ')).count() as i32;
    score += (multi_word * 5).min(25);

    let lengths: Vec<usize> = tags.iter().map(|t| t.chars().count()).collect();
    if let (Some(max), Some(min)) = (lengths.iter().max(), lengths.iter().min()) {
        if max - min > 5 {
            score += 25;
        }
    }

    score.min(100)
}

fn score_keywords(title: &str, description: &str, tags: &[String]) -> i32 {
    let title_keywords: HashSet<String> = extract_keywords(title).into_iter().collect();
    let description_keywords: HashSet<String> =
        extract_keywords(description).into_iter().collect();
    let mut tag_keywords: HashSet<String> = HashSet::new();
    for tag in tags {
        tag_keywords.extend(extract_keywords(tag));
    }

    if title_keywords.is_empty() {
        return 0;
    }

    let mut score = 0;

    let title_in_desc = title_keywords.intersection(&description_keywords).count();
    score += (40.0 * title_in_desc as f64 / title_keywords.len() as f64) as i32;

    let title_in_tags = title_keywords.intersection(&tag_keywords).count();
    score += (40.0 * title_in_tags as f64 / title_keywords.len() as f64) as i32;

    let all_three = title_keywords
        .iter()
        .filter(|w| description_keywords.contains(*w) && tag_keywords.contains(*w))
        .count() as i32;
    if all_three > 0 {
        score += (all_three * 10).min(20);
    }

    score.min(100)
}

#[allow(clippy::too_many_arguments)]
fn recommendations_for(
    title: &str,
    description: &str,
    tags: &[String],
    title_score: i32,
    description_score: i32,
    tags_score: i32,
    keywords_score: i32,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if title_score < 70 {
        let (is_optimal, message) = check_title_length(title);
        if !is_optimal {
            recommendations.push(message);
        }
        if extract_keywords(title).is_empty() {
            recommendations.push("Add relevant keywords to your title.".to_string());
        }
    }

    if description_score < 70 {
        recommendations.extend(check_description_structure(description).recommendations);
    }

    if tags_score < 70 {
        let tag_count = tags.len();
        let (min_tags, max_tags) = OPTIMAL_TAG_COUNT;
        if tag_count < min_tags {
            recommendations.push(format!(
                "Add more tags (currently {tag_count}, aim for {min_tags}-{max_tags})."
            ));
        } else if tag_count > max_tags {
            recommendations.push(format!(
                "Consider reducing tags (currently {tag_count}, aim for {min_tags}-{max_tags})."
            ));
        }
    }

    if keywords_score < 70 {
        recommendations
            .push("Ensure keywords from title appear in description and tags.".to_string());

        let suggested = suggest_keywords(title, description);
        if !suggested.is_empty() {
            let top: Vec<&str> = suggested.iter().take(5).map(String::as_str).collect();
            recommendations.push(format!("Consider using these keywords: {}", top.join(", ")));
        }
    }

    recommendations
}
