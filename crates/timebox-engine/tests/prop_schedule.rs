//! Property-based tests for the scheduler invariants using proptest.
//!
//! Random day layouts are pushed through random drags and drops; after every
//! settle the committed schedule must be disjoint, inside the day window and
//! no block may be shorter than the minimum duration.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use timebox_engine::{
    minutes_to_time, resolve_conflicts, time_to_minutes, PointerTarget, SchedulerConfig,
    SchedulerSession, Section, TimeInterval,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A valid `HH:mm` string, including the `24:00` end-of-day sentinel.
fn arb_hhmm() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..=23, 0u32..=59).prop_map(|(h, m)| format!("{:02}:{:02}", h, m)),
        Just("24:00".to_string()),
    ]
}

/// A section on the quarter-hour grid, 15 minutes to 3 hours long, between
/// 04:00 and 22:00. Overlaps between sections are allowed.
fn arb_section(id: usize) -> impl Strategy<Value = Section> {
    (16i32..88, 1i32..=12).prop_map(move |(start_q, len_q)| {
        let start = start_q * 15;
        let end = (start + len_q * 15).min(1440);
        Section::new(format!("s{}", id), format!("Section {}", id))
            .with_times(&minutes_to_time(start), &minutes_to_time(end))
    })
}

/// A section with any two valid times: before 04:00, zero-length or with
/// the end before the start.
fn arb_raw_section(id: usize) -> impl Strategy<Value = Section> {
    (0i32..=1440, 0i32..=1440).prop_map(move |(start, end)| {
        Section::new(format!("s{}", id), format!("Section {}", id))
            .with_times(&minutes_to_time(start), &minutes_to_time(end))
    })
}

fn arb_any_section(id: usize) -> impl Strategy<Value = Section> {
    prop_oneof![3 => arb_section(id), 1 => arb_raw_section(id)]
}

/// Well-formed sections only.
fn arb_grid_day() -> impl Strategy<Value = Vec<Section>> {
    (1usize..=6).prop_flat_map(|n| (0..n).map(arb_section).collect::<Vec<_>>())
}

/// A day as it might be imported, including spans the window must repair.
fn arb_day() -> impl Strategy<Value = Vec<Section>> {
    (1usize..=6).prop_flat_map(|n| (0..n).map(arb_any_section).collect::<Vec<_>>())
}

fn arb_target() -> impl Strategy<Value = PointerTarget> {
    prop_oneof![
        Just(PointerTarget::Body),
        Just(PointerTarget::TopEdge),
        Just(PointerTarget::BottomEdge),
    ]
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 2)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

fn open(sections: Vec<Section>) -> SchedulerSession {
    SchedulerSession::open(
        sections,
        None,
        now().date(),
        SchedulerConfig::default(),
    )
    .unwrap()
}

fn assert_settled(intervals: &[TimeInterval]) -> Result<(), TestCaseError> {
    for (i, a) in intervals.iter().enumerate() {
        prop_assert!(a.start >= 240, "{:?} starts before 04:00", a);
        prop_assert!(a.end <= 1440, "{:?} ends after 24:00", a);
        prop_assert!(a.duration() >= 15, "{:?} is shorter than 15 minutes", a);
        for b in &intervals[i + 1..] {
            prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
        }
    }
    for w in intervals.windows(2) {
        prop_assert!(w[0].start <= w[1].start, "not sorted by start");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Property 1: HH:mm round-trips
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn hhmm_roundtrip(t in arb_hhmm()) {
        let minutes = time_to_minutes(&t);
        prop_assert!(minutes.is_some());
        prop_assert_eq!(minutes_to_time(minutes.unwrap()), t);
    }
}

// ---------------------------------------------------------------------------
// Property 2: every drag settles into a valid schedule
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn drags_settle_into_valid_schedule(
        day in arb_day(),
        pick in any::<prop::sample::Index>(),
        target in arb_target(),
        moves in prop::collection::vec(-1500.0f64..1500.0, 1..6),
    ) {
        let mut session = open(day);
        let id = session.scheduled().sorted_by_start()[pick.index(session.scheduled().len())]
            .id
            .clone();

        session.pointer_down(&id, target, 0.0).unwrap();
        for y in moves {
            session.pointer_move(y, None);
            let frame = session.drag().and_then(|d| d.frame).unwrap();
            prop_assert!(frame.end - frame.start >= 15, "frame inverted: {:?}", frame);
        }
        session.pointer_up(now());

        prop_assert!(!session.is_dragging());
        assert_settled(session.scheduled().sorted_by_start())?;
    }
}

// ---------------------------------------------------------------------------
// Property 3: drops from the tray settle into a valid schedule
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn drops_settle_into_valid_schedule(
        day in arb_day(),
        timeline_y in 0.0f64..1600.0,
    ) {
        let mut sections = day;
        sections.push(Section::new("tray", "Tray"));
        let mut session = open(sections);

        session.pointer_down_unscheduled("tray", 0.0).unwrap();
        session.pointer_move(timeline_y, Some(timeline_y));
        session.pointer_up(now());

        prop_assert!(session.scheduled().contains("tray"));
        prop_assert!(session.unscheduled().is_empty());
        assert_settled(session.scheduled().sorted_by_start())?;
    }
}

// ---------------------------------------------------------------------------
// Property 4: resolution keeps durations of shifted intervals
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn resolution_preserves_durations(day in arb_grid_day()) {
        let mut intervals: Vec<TimeInterval> =
            day.iter().filter_map(|s| s.interval()).collect();
        let before: Vec<TimeInterval> = intervals.clone();

        resolve_conflicts(&mut intervals);

        for before_iv in &before {
            let after = intervals.iter().find(|i| i.id == before_iv.id).unwrap();
            prop_assert_eq!(after.duration(), before_iv.duration());
            prop_assert!(after.start >= before_iv.start, "intervals only move later");
        }
        for (i, a) in intervals.iter().enumerate() {
            for b in &intervals[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: saving hands back every section exactly once
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn save_returns_every_section_once(day in arb_day()) {
        let mut sections = day;
        sections.push(Section::new("tray", "Tray"));
        let mut ids: Vec<String> = sections.iter().map(|s| s.id.clone()).collect();

        let mut session = open(sections);
        session.settle_all(now());
        let saved = session.save(now());

        let mut saved_ids: Vec<String> = saved.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        saved_ids.sort();
        prop_assert_eq!(saved_ids, ids);

        let intervals: Vec<TimeInterval> = saved.iter().filter_map(|s| s.interval()).collect();
        assert_settled(&intervals)?;
    }
}
