use creator_backoffice::abtest::winner::{
    best_by_ctr, ctr_percent, evaluate, VariantStanding, WinnerCheck,
};
use uuid::Uuid;

fn standing(name: &str, impressions: i64, clicks: i64) -> VariantStanding {
    VariantStanding {
        variant_id: Uuid::new_v4(),
        variant_name: name.to_string(),
        impressions,
        clicks,
        ctr: ctr_percent(clicks, impressions),
    }
}

#[test]
fn ctr_is_a_rounded_percentage() {
    assert_eq!(ctr_percent(1, 3), 33.33);
    assert_eq!(ctr_percent(1, 10), 10.0);
    assert_eq!(ctr_percent(0, 100), 0.0);
    assert_eq!(ctr_percent(5, 0), 0.0);
}

#[test]
fn needs_at_least_two_variants() {
    let standings = vec![standing("A", 1000, 100)];
    assert_eq!(evaluate(&standings, 0.05, 100), WinnerCheck::NotEnoughVariants);
}

#[test]
fn every_variant_needs_minimum_impressions() {
    let standings = vec![standing("A", 1000, 100), standing("B", 50, 10)];
    assert_eq!(evaluate(&standings, 0.05, 100), WinnerCheck::InsufficientData);
}

#[test]
fn leader_below_threshold_is_not_a_winner() {
    // 10.0% vs 9.8%: a 2% relative lift, under the 5% threshold.
    let standings = vec![standing("A", 1000, 100), standing("B", 1000, 98)];
    assert_eq!(evaluate(&standings, 0.05, 100), WinnerCheck::BelowThreshold);
}

#[test]
fn leader_clearing_threshold_wins() {
    let standings = vec![standing("A", 1000, 120), standing("B", 1000, 100)];
    let expected = standings[0].variant_id;
    assert_eq!(evaluate(&standings, 0.05, 100), WinnerCheck::Winner(expected));
}

#[test]
fn leader_must_beat_every_variant() {
    // A clears B comfortably but only ties C.
    let standings = vec![
        standing("A", 1000, 120),
        standing("B", 1000, 80),
        standing("C", 1000, 120),
    ];
    assert_eq!(evaluate(&standings, 0.05, 100), WinnerCheck::BelowThreshold);
}

#[test]
fn zero_ctr_opponents_count_as_fully_beaten() {
    let standings = vec![standing("A", 1000, 50), standing("B", 1000, 0)];
    let expected = standings[0].variant_id;
    assert_eq!(evaluate(&standings, 0.05, 100), WinnerCheck::Winner(expected));

    // Both at zero: nobody wins.
    let standings = vec![standing("A", 1000, 0), standing("B", 1000, 0)];
    assert_eq!(evaluate(&standings, 0.05, 100), WinnerCheck::BelowThreshold);
}

#[test]
fn best_by_ctr_picks_the_argmax() {
    let standings = vec![
        standing("A", 1000, 80),
        standing("B", 1000, 120),
        standing("C", 1000, 100),
    ];
    assert_eq!(best_by_ctr(&standings).unwrap().variant_name, "B");
}
