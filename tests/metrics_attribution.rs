use chrono::{NaiveDate, TimeZone, Utc};
use creator_backoffice::abtest::attribution::{
    active_periods, estimate_metrics, views_for_variant,
};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[test]
fn periods_follow_the_change_log() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let changes = vec![(a, at(2024, 3, 1, 9)), (b, at(2024, 3, 4, 9)), (a, at(2024, 3, 7, 9))];

    let periods = active_periods(&changes, at(2024, 3, 10, 12));

    assert_eq!(periods.len(), 3);
    assert_eq!(periods[0].variant_id, a);
    assert_eq!(periods[0].start, day(2024, 3, 1));
    assert_eq!(periods[0].end, day(2024, 3, 4));
    assert_eq!(periods[1].variant_id, b);
    assert_eq!(periods[1].start, day(2024, 3, 4));
    assert_eq!(periods[1].end, day(2024, 3, 7));
    // The still-live variant runs through the end of the window.
    assert_eq!(periods[2].end, day(2024, 3, 10));
}

#[test]
fn views_are_summed_over_live_days() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let changes = vec![(a, at(2024, 3, 1, 0)), (b, at(2024, 3, 3, 0))];
    let periods = active_periods(&changes, at(2024, 3, 5, 0));

    let daily = vec![
        (day(2024, 3, 1), 100),
        (day(2024, 3, 2), 150),
        (day(2024, 3, 3), 200),
        (day(2024, 3, 4), 250),
        (day(2024, 3, 5), 300),
    ];

    // The switchover day belongs to both variants at day granularity.
    assert_eq!(views_for_variant(&periods, a, &daily), 100 + 150 + 200);
    assert_eq!(views_for_variant(&periods, b, &daily), 200 + 250 + 300);

    let unknown = Uuid::new_v4();
    assert_eq!(views_for_variant(&periods, unknown, &daily), 0);
}

#[test]
fn no_changes_means_no_attribution() {
    let periods = active_periods(&[], at(2024, 3, 5, 0));
    assert!(periods.is_empty());
    assert_eq!(
        views_for_variant(&periods, Uuid::new_v4(), &[(day(2024, 3, 1), 100)]),
        0
    );
}

#[test]
fn estimates_derive_from_attributed_views() {
    let est = estimate_metrics(240);
    assert_eq!(est.views, 240);
    assert_eq!(est.impressions, 2400);
    assert_eq!(est.clicks, 240);
    assert_eq!(est.ctr, 10.0);

    let empty = estimate_metrics(0);
    assert_eq!(empty.impressions, 0);
    assert_eq!(empty.ctr, 0.0);
}
