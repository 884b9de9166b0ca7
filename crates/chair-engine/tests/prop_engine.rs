//! Property-based tests for the conflict validator and slot calculator.
//!
//! These check invariants that must hold for *any* schedule and booking set,
//! not just the hand-picked scenarios in the other test files.

use chair_engine::{
    compute_slots, is_available, BookingInterval, CandidateInterval, DaySchedule, TimeRange,
    WallTime,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn wall(minutes: u32) -> WallTime {
    WallTime::from_minutes(minutes).unwrap()
}

fn arb_range() -> impl Strategy<Value = TimeRange> {
    (0u32..1440, 1u32..=240).prop_map(|(start, len)| {
        let end = (start + len).min(1440);
        TimeRange::new(wall(start), wall(end))
    })
}

/// A working day between 06:00 and 22:00, optionally with a break inside it.
fn arb_day() -> impl Strategy<Value = DaySchedule> {
    (6u32 * 60..=12 * 60, 4u32 * 60..=10 * 60, proptest::option::of(15u32..=90))
        .prop_map(|(open, len, lunch)| {
            let close = open + len;
            let day = DaySchedule::new(wall(open), wall(close));
            match lunch {
                Some(lunch_len) => {
                    let start = open + len / 2;
                    day.with_break(wall(start), wall(start + lunch_len))
                }
                None => day,
            }
        })
}

/// Bookings on a 5-minute grid. They may overlap each other; the engine must
/// not care.
fn arb_bookings() -> impl Strategy<Value = Vec<BookingInterval>> {
    proptest::collection::vec((72u32..264, 1u32..=24), 0..8).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (start, len))| {
                let start = start * 5;
                BookingInterval::new(format!("b{}", i), wall(start), wall(start + len * 5))
            })
            .collect()
    })
}

fn arb_duration() -> impl Strategy<Value = u32> {
    prop_oneof![Just(15u32), Just(30), Just(45), Just(60), Just(90), 5u32..=120]
}

fn arb_granularity() -> impl Strategy<Value = u32> {
    prop_oneof![Just(5u32), Just(10), Just(15), Just(30), Just(60)]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Overlap is symmetric
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn overlap_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }
}

// ---------------------------------------------------------------------------
// Property 2: Abutting intervals never overlap
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn abutting_never_overlaps(split in 1u32..1439, before in 1u32..=240, after in 1u32..=240) {
        let a = TimeRange::new(wall(split.saturating_sub(before)), wall(split));
        let b = TimeRange::new(wall(split), wall((split + after).min(1440)));
        prop_assert!(!a.overlaps(&b));
        prop_assert!(!b.overlaps(&a));
    }
}

// ---------------------------------------------------------------------------
// Property 3: Every emitted slot is accepted by the validator
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_agree_with_validator(
        day in arb_day(),
        bookings in arb_bookings(),
        duration in arb_duration(),
        step in arb_granularity(),
    ) {
        let slots = compute_slots(Some(&day), &bookings, duration, step).unwrap();
        for slot in &slots {
            let candidate = CandidateInterval::new(*slot, i64::from(duration)).unwrap();
            prop_assert!(
                is_available(Some(&day), &candidate, &bookings, None).unwrap(),
                "slot {} for {} min rejected by validator",
                slot,
                duration
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Grid starts the validator accepts are all emitted
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn validator_accepted_grid_starts_are_emitted(
        day in arb_day(),
        bookings in arb_bookings(),
        duration in arb_duration(),
        step in arb_granularity(),
    ) {
        let slots = compute_slots(Some(&day), &bookings, duration, step).unwrap();
        let mut start = day.start_time.minutes();
        while start + duration <= day.end_time.minutes() {
            let candidate = CandidateInterval::new(wall(start), i64::from(duration)).unwrap();
            let ok = is_available(Some(&day), &candidate, &bookings, None).unwrap();
            prop_assert_eq!(ok, slots.contains(&wall(start)), "start {}", wall(start));
            start += step;
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: Shorter services fit wherever longer ones do
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn shorter_service_fits_where_longer_does(
        day in arb_day(),
        bookings in arb_bookings(),
        short in 5u32..=60,
        extra in 1u32..=60,
        step in arb_granularity(),
    ) {
        let long = short + extra;
        let short_slots = compute_slots(Some(&day), &bookings, short, step).unwrap();
        let long_slots = compute_slots(Some(&day), &bookings, long, step).unwrap();
        for slot in &long_slots {
            prop_assert!(short_slots.contains(slot), "{} valid for {} but not {}", slot, long, short);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Idempotent and ascending
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_idempotent_and_sorted(
        day in arb_day(),
        bookings in arb_bookings(),
        duration in arb_duration(),
        step in arb_granularity(),
    ) {
        let first = compute_slots(Some(&day), &bookings, duration, step).unwrap();
        let second = compute_slots(Some(&day), &bookings, duration, step).unwrap();
        prop_assert_eq!(&first, &second);
        for pair in first.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 7: Inactive day offers nothing
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn inactive_day_offers_nothing(
        day in arb_day(),
        bookings in arb_bookings(),
        duration in arb_duration(),
        start in 0u32..1200,
    ) {
        let mut closed = day.clone();
        closed.active = false;
        prop_assert!(compute_slots(Some(&closed), &bookings, duration, 15).unwrap().is_empty());
        prop_assert!(compute_slots(None, &bookings, duration, 15).unwrap().is_empty());

        let candidate = CandidateInterval::new(wall(start), i64::from(duration)).unwrap();
        prop_assert!(!is_available(Some(&closed), &candidate, &bookings, None).unwrap());
        prop_assert!(!is_available(None, &candidate, &bookings, None).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Property 8: Excluding a booking is the same as removing it
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn excluding_equals_removing(
        day in arb_day(),
        bookings in arb_bookings(),
        duration in arb_duration(),
        start in 360u32..1200,
        pick in 0usize..8,
    ) {
        prop_assume!(!bookings.is_empty());
        let victim = bookings[pick % bookings.len()].id.clone();
        let remaining: Vec<BookingInterval> =
            bookings.iter().filter(|b| b.id != victim).cloned().collect();

        let candidate = CandidateInterval::new(wall(start), i64::from(duration)).unwrap();
        prop_assert_eq!(
            is_available(Some(&day), &candidate, &bookings, Some(&victim)).unwrap(),
            is_available(Some(&day), &candidate, &remaining, None).unwrap()
        );
    }
}
