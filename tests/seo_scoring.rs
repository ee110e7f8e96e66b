use creator_backoffice::analytics::seo::{
    analyze_video, check_description_structure, check_title_length, extract_keywords,
    suggest_keywords,
};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn keyword_extraction_drops_stop_words_and_short_words() {
    let keywords = extract_keywords("How to Edit a Video in DaVinci Resolve");
    assert!(keywords.contains(&"edit".to_string()));
    assert!(keywords.contains(&"video".to_string()));
    assert!(keywords.contains(&"davinci".to_string()));
    // Stop words and two-letter words never surface.
    assert!(!keywords.contains(&"how".to_string()));
    assert!(!keywords.contains(&"to".to_string()));
    assert!(!keywords.contains(&"in".to_string()));
}

#[test]
fn suggested_keywords_favor_repeats_and_title_words() {
    let suggestions = suggest_keywords(
        "Video editing masterclass",
        "Learn video editing from scratch. This editing course covers everything.",
    );
    assert!(suggestions.contains(&"editing".to_string()));
    assert!(suggestions.contains(&"video".to_string()));
    // Title-only words survive even without repeats.
    assert!(suggestions.contains(&"masterclass".to_string()));
    assert!(suggestions.len() <= 10);
}

#[test]
fn title_length_bands() {
    let (ok, message) = check_title_length("short");
    assert!(!ok);
    assert!(message.contains("too short"));

    let optimal = "A Complete Beginner Guide to Color Grading in Resolve";
    let (ok, message) = check_title_length(optimal);
    assert!(ok, "{message}");

    let long = "This is an extremely long video title that keeps going well past the point anyone would read";
    let (ok, message) = check_title_length(long);
    assert!(!ok);
    assert!(message.contains("too long"));
}

#[test]
fn description_structure_flags_missing_elements() {
    let sparse = check_description_structure("Just a line.");
    assert!(!sparse.has_links);
    assert!(!sparse.has_hashtags);
    assert!(!sparse.length_ok);
    assert!(sparse
        .recommendations
        .iter()
        .any(|r| r.contains("too short")));
    assert!(sparse.recommendations.iter().any(|r| r.contains("links")));
    assert!(sparse.recommendations.iter().any(|r| r.contains("hashtags")));

    let rich = check_description_structure(
        "In this tutorial we cover color grading start to finish.\n\n\
         Chapters:\n0:00 Intro\n2:15 Scopes\n\n\
         More resources: https://example.com/grading\n\n\
         #colorgrading #davinci",
    );
    assert!(rich.has_links);
    assert!(rich.has_timestamps);
    assert!(rich.has_hashtags);
    assert!(rich.paragraph_count >= 2);
}

#[test]
fn empty_metadata_scores_zero() {
    let report = analyze_video("", "", &[]);
    assert_eq!(report.seo_score, 0);
    assert_eq!(report.title_score, 0);
    assert_eq!(report.description_score, 0);
    assert_eq!(report.tags_score, 0);
    assert_eq!(report.keywords_score, 0);
    assert!(!report.recommendations.is_empty());
}

#[test]
fn well_optimized_metadata_scores_high() {
    let title = "Complete DaVinci Resolve Color Grading Tutorial for Beginners";
    let description = format!(
        "Learn color grading in DaVinci Resolve with this complete tutorial for beginners. \
         We walk through scopes, nodes, and grading a full scene step by step.\n\n\
         Chapters:\n0:00 Intro\n3:40 Scopes\n12:30 Nodes\n\n\
         Grab the free grading checklist: https://example.com/checklist\n\n\
         #davinciresolve #colorgrading {}",
        "More detail on every technique so the description comfortably clears the minimum length."
    );
    let tags = tags(&[
        "davinci resolve",
        "color grading",
        "resolve tutorial",
        "color grading tutorial for beginners",
        "video editing",
        "grading",
    ]);

    let report = analyze_video(title, &description, &tags);
    assert!(report.title_score >= 70, "title {}", report.title_score);
    assert!(
        report.description_score >= 70,
        "description {}",
        report.description_score
    );
    assert!(report.tags_score >= 70, "tags {}", report.tags_score);
    assert!(report.seo_score >= 70, "overall {}", report.seo_score);
}

#[test]
fn overall_score_is_the_weighted_mix() {
    let title = "Complete DaVinci Resolve Color Grading Tutorial for Beginners";
    let report = analyze_video(title, "", &[]);

    let expected = (report.title_score as f64 * 0.30
        + report.description_score as f64 * 0.25
        + report.tags_score as f64 * 0.20
        + report.keywords_score as f64 * 0.25) as i32;
    assert_eq!(report.seo_score, expected);
}

#[test]
fn weak_components_produce_recommendations() {
    let report = analyze_video("ok!!", "short description", &tags(&["one"]));

    assert!(report.title_score < 70);
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Title is too short")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("Add more tags")));
    assert!(report
        .recommendations
        .iter()
        .any(|r| r.contains("keywords from title")));
}
