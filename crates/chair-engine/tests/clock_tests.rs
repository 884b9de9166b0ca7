//! Tests for wall-clock parsing, formatting, and half-open range arithmetic.

use chair_engine::clock::{TimeRange, WallTime};
use chair_engine::InputError;

fn t(s: &str) -> WallTime {
    WallTime::parse(s).unwrap()
}

#[test]
fn parses_hh_mm_and_sql_time_forms() {
    assert_eq!(t("09:30").minutes(), 570);
    assert_eq!(t("09:30:00").minutes(), 570);
    assert_eq!(t("00:00"), WallTime::MIDNIGHT);
    assert_eq!(t("24:00"), WallTime::END_OF_DAY);
}

#[test]
fn rejects_seconds_out_of_range_and_garbage() {
    assert!(matches!(WallTime::parse("09:30:15"), Err(InputError::InvalidTime(_))));
    assert!(WallTime::parse("25:00").is_err());
    assert!(WallTime::parse("12:60").is_err());
    assert!(WallTime::parse("nine").is_err());
    assert!(WallTime::parse("").is_err());
}

#[test]
fn display_is_zero_padded_hh_mm() {
    assert_eq!(WallTime::from_hm(7, 5).unwrap().to_string(), "07:05");
    assert_eq!(WallTime::END_OF_DAY.to_string(), "24:00");
    assert_eq!(t("13:00:00").to_string(), "13:00");
}

#[test]
fn from_hm_rejects_out_of_range() {
    assert!(WallTime::from_hm(24, 1).is_err());
    assert!(WallTime::from_hm(10, 60).is_err());
    assert!(WallTime::from_hm(24, 0).is_ok());
}

#[test]
fn checked_add_stops_at_end_of_day() {
    assert_eq!(t("23:30").checked_add_minutes(30), Some(WallTime::END_OF_DAY));
    assert_eq!(t("23:30").checked_add_minutes(31), None);
    assert_eq!(t("09:00").checked_add_minutes(45), Some(t("09:45")));
}

#[test]
fn serde_uses_hh_mm_strings() {
    let json = serde_json::to_string(&t("08:15")).unwrap();
    assert_eq!(json, "\"08:15\"");

    let back: WallTime = serde_json::from_str("\"08:15:00\"").unwrap();
    assert_eq!(back, t("08:15"));

    assert!(serde_json::from_str::<WallTime>("\"8 am\"").is_err());
}

#[test]
fn abutting_ranges_do_not_overlap() {
    let a = TimeRange::new(t("09:00"), t("10:00"));
    let b = TimeRange::new(t("10:00"), t("11:00"));
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
    assert_eq!(a.overlap_minutes(&b), 0);
}

#[test]
fn partial_and_contained_overlap_minutes() {
    let a = TimeRange::new(t("09:00"), t("10:00"));
    let b = TimeRange::new(t("09:30"), t("11:00"));
    assert_eq!(a.overlap_minutes(&b), 30);
    assert_eq!(b.overlap_minutes(&a), 30);

    let day = TimeRange::new(t("09:00"), t("18:00"));
    let inner = TimeRange::new(t("12:00"), t("13:00"));
    assert!(day.contains(&inner));
    assert!(!inner.contains(&day));
    assert_eq!(day.overlap_minutes(&inner), 60);
    assert_eq!(inner.duration_minutes(), 60);
}
