//! Tests for the plan model and the JSON plan store.

use chrono::NaiveDate;
use timebox_engine::plan::Trackers;
use timebox_engine::template::COLOR_PALETTE;
use timebox_engine::{
    DailyPlan, PlanStore, PointerTarget, SchedulerConfig, Section, Task, TaskKind, TimeboxError,
};

/// A Monday.
fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn titles(plan: &DailyPlan) -> Vec<&str> {
    plan.sections.iter().map(|s| s.title.as_str()).collect()
}

fn checkbox(id: &str, checked: bool, signal: bool) -> Task {
    Task {
        id: id.to_string(),
        label: format!("task {}", id),
        description: None,
        is_signal: signal,
        kind: TaskKind::Checkbox { checked },
    }
}

fn sample_plan() -> DailyPlan {
    let focus = Section {
        is_timeboxed: Some(false),
        tasks: vec![Task {
            id: "win".to_string(),
            label: "The ONE thing that makes today a win:".to_string(),
            description: None,
            is_signal: false,
            kind: TaskKind::TextLong {
                value: "ship it".to_string(),
            },
        }],
        ..Section::new("focus", "Today's Focus")
    };
    let morning = Section {
        tasks: vec![checkbox("t1", true, true), checkbox("t2", false, false)],
        ..Section::new("morning", "Morning Launch").with_times("07:00", "09:30")
    };
    let work = Section {
        tasks: vec![
            checkbox("t3", true, false),
            Task {
                id: "t4".to_string(),
                label: "Life Admin:".to_string(),
                description: None,
                is_signal: true,
                kind: TaskKind::CheckboxWithText {
                    checked: false,
                    value: "laundry".to_string(),
                },
            },
        ],
        ..Section::new("work", "Work Block").with_times("09:00", "13:00")
    };
    DailyPlan::new(date(), vec![focus, morning, work])
}

#[test]
fn productivity_counts_checkable_tasks_only() {
    let scores = sample_plan().productivity();
    // 2 of 4 checkable tasks done; 1 of 2 signal tasks done.
    assert_eq!(scores.absolute, 50);
    assert_eq!(scores.signal, 50);
}

#[test]
fn productivity_is_zero_without_tasks() {
    let plan = DailyPlan::new(date(), vec![Section::new("a", "Empty")]);
    let scores = plan.productivity();
    assert_eq!((scores.signal, scores.absolute), (0, 0));
}

#[test]
fn productivity_rounds_to_whole_percent() {
    let plan = DailyPlan::new(
        date(),
        vec![Section {
            tasks: vec![
                checkbox("a", true, true),
                checkbox("b", false, true),
                checkbox("c", false, true),
            ],
            ..Section::new("s", "S")
        }],
    );
    assert_eq!(plan.productivity().absolute, 33);
}

#[test]
fn plan_json_uses_camel_case_and_numeric_task_types() {
    let json = serde_json::to_value(sample_plan()).unwrap();
    assert_eq!(json["date"], "2026-03-02");
    assert_eq!(json["sections"][0]["isTimeboxed"], false);
    assert_eq!(json["sections"][1]["startTime"], "07:00");
    assert_eq!(json["sections"][0]["tasks"][0]["type"], 2);
    assert_eq!(json["sections"][1]["tasks"][0]["type"], 0);
    assert_eq!(json["sections"][1]["tasks"][0]["checked"], true);
    assert!(json["sections"][1]["tasks"][0].get("value").is_none());
    assert_eq!(json["sections"][1]["tasks"][0]["isSignal"], true);
    assert!(json["sections"][1]["tasks"][1].get("isSignal").is_none());

    let back: DailyPlan = serde_json::from_value(json).unwrap();
    assert_eq!(back, sample_plan());
}

#[test]
fn stored_task_types_map_to_kinds() {
    let tasks: Vec<Task> = serde_json::from_str(
        r#"[
            {"id": "a", "label": "Walk", "type": 0},
            {"id": "b", "label": "Mood", "type": 1, "value": "calm"},
            {"id": "c", "label": "Notes", "type": 2},
            {"id": "d", "label": "Call", "type": 3, "checked": true, "value": "mum"}
        ]"#,
    )
    .unwrap();
    assert_eq!(tasks[0].kind, TaskKind::Checkbox { checked: false });
    assert_eq!(tasks[1].kind, TaskKind::TextShort { value: "calm".into() });
    assert_eq!(tasks[2].kind, TaskKind::TextLong { value: String::new() });
    assert_eq!(
        tasks[3].kind,
        TaskKind::CheckboxWithText {
            checked: true,
            value: "mum".into()
        }
    );

    let json = serde_json::to_value(&tasks[3]).unwrap();
    assert_eq!(json["type"], 3);
    assert_eq!(json["value"], "mum");
}

#[test]
fn unknown_task_type_is_rejected() {
    let err = serde_json::from_str::<Task>(r#"{"id": "x", "label": "?", "type": 9}"#)
        .unwrap_err()
        .to_string();
    assert!(err.contains("unknown task type 9"), "{}", err);
}

#[test]
fn apply_schedule_keeps_non_timeboxed_sections_first() {
    let mut plan = sample_plan();
    plan.apply_schedule(vec![
        Section::new("work", "Work Block").with_times("09:30", "13:00"),
        Section::new("morning", "Morning Launch").with_times("07:00", "09:30"),
    ]);
    let ids: Vec<_> = plan.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["focus", "work", "morning"]);
}

#[test]
fn scheduler_round_trip_through_store() {
    let mut store = PlanStore::in_memory();
    store.insert(sample_plan());

    let mut session = store
        .open_scheduler(date(), Some("work".to_string()), SchedulerConfig::default())
        .unwrap();
    assert_eq!(session.scheduled().len(), 2, "focus section is not timeboxed");

    // Work overlaps Morning; nudging it settles the overlap.
    session.pointer_down("work", PointerTarget::Body, 0.0).unwrap();
    let now = date().and_hms_opt(8, 0, 0).unwrap();
    session.pointer_up(now);
    let sections = session.save(now);

    store.commit_schedule(date(), sections).unwrap();
    let plan = store.get(date()).unwrap();
    let work = plan.sections.iter().find(|s| s.id == "work").unwrap();
    assert_eq!(work.start_time.as_deref(), Some("09:30"));
    assert_eq!(work.end_time.as_deref(), Some("13:30"));
    assert_eq!(work.tasks.len(), 2, "task data survives the scheduler");
    assert_eq!(plan.sections[0].id, "focus");
}

#[test]
fn cancelled_session_leaves_store_untouched() {
    let mut store = PlanStore::in_memory();
    store.insert(sample_plan());

    let mut session = store
        .open_scheduler(date(), None, SchedulerConfig::default())
        .unwrap();
    session.pointer_down("morning", PointerTarget::Body, 0.0).unwrap();
    session.pointer_move(200.0, None);
    session.cancel();

    assert_eq!(store.get(date()), Some(&sample_plan()));
}

#[test]
fn reviewed_plan_is_locked() {
    let mut store = PlanStore::in_memory();
    store.insert(sample_plan());

    store.confirm(date()).unwrap();
    let review = store.record_review(date(), "good day").unwrap();
    assert_eq!(review.absolute_productivity, 50);
    assert!(store.get(date()).unwrap().is_confirmed);

    let err = store.commit_schedule(date(), vec![]).unwrap_err();
    assert!(matches!(err, TimeboxError::PlanLocked(d) if d == date()));

    assert!(store.reset_review(date()).unwrap().is_some());
    store.commit_schedule(date(), vec![]).unwrap();
}

// ── Day lifecycle ──────────────────────────────────────────────────────────

#[test]
fn first_weekday_starts_from_weekday_template() {
    let mut store = PlanStore::in_memory();
    let tuesday = date().succ_opt().unwrap();
    let plan = store.open_day(tuesday);

    assert_eq!(plan.date, tuesday);
    assert_eq!(
        titles(plan),
        [
            "Today’s Focus",
            "Morning Launch",
            "Work Block 1",
            "Recharge Block",
            "Work Block 2",
            "Evening Shutdown",
        ]
    );
    assert!(!plan.sections[0].is_timeboxed());
    assert_eq!(plan.sections[0].tasks[0].kind, TaskKind::TextLong { value: String::new() });

    let morning = &plan.sections[1];
    assert_eq!(morning.color.as_deref(), Some("sky"));
    assert_eq!(morning.icon, "🌅");
    let iv = morning.interval().unwrap();
    assert_eq!((iv.start, iv.end), (420, 570));

    // Start time only: the shutdown block begins in the tray.
    let shutdown = &plan.sections[5];
    assert_eq!(shutdown.start_time.as_deref(), Some("17:30"));
    assert!(shutdown.interval().is_none());

    assert!(!plan.is_confirmed);
    assert_eq!(plan.productivity().absolute, 0);
}

#[test]
fn first_weekend_day_starts_from_weekend_template() {
    let mut store = PlanStore::in_memory();
    let saturday = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
    let plan = store.open_day(saturday);

    assert_eq!(
        titles(plan),
        ["Weekend Intention", "Morning", "Afternoon", "Evening"]
    );
    assert!(!plan.sections[0].is_timeboxed());
    assert!(plan.sections.iter().all(|s| s.start_time.is_none()));
    assert_eq!(
        plan.sections[2].tasks[0].kind,
        TaskKind::CheckboxWithText {
            checked: false,
            value: "Groceries, laundry, meal prep".to_string()
        }
    );
}

#[test]
fn template_ids_are_unique() {
    let plan = DailyPlan::from_template(date());
    let mut ids: Vec<&str> = plan
        .sections
        .iter()
        .flat_map(|s| std::iter::once(s.id.as_str()).chain(s.tasks.iter().map(|t| t.id.as_str())))
        .collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn next_day_carries_over_and_resets_progress() {
    let mut store = PlanStore::in_memory();
    let mut yesterday = sample_plan();
    yesterday.trackers.urges = 3;
    yesterday.sections[1].tasks.push(Task::new(
        "Mood",
        TaskKind::TextShort {
            value: "calm".to_string(),
        },
    ));
    store.insert(yesterday.clone());
    store.confirm(date()).unwrap();
    store.record_review(date(), "done").unwrap();

    let tomorrow = date().succ_opt().unwrap();
    let plan = store.open_day(tomorrow).clone();

    assert_eq!(plan.date, tomorrow);
    assert_eq!(titles(&plan), titles(&yesterday));
    assert!(!plan.is_confirmed);
    assert!(plan.review.is_none());
    assert_eq!(plan.trackers, Trackers::default());

    for (new, old) in plan.sections.iter().zip(&yesterday.sections) {
        assert_ne!(new.id, old.id);
        assert_eq!(new.start_time, old.start_time);
        assert_eq!(new.end_time, old.end_time);
        assert_eq!(new.is_timeboxed, old.is_timeboxed);
        for (t, o) in new.tasks.iter().zip(&old.tasks) {
            assert_ne!(t.id, o.id);
            assert_eq!(t.is_signal, o.is_signal);
            assert_ne!(t.checked(), Some(true));
        }
    }

    // The daily prompt is emptied; other text survives.
    assert_eq!(
        plan.sections[0].tasks[0].kind,
        TaskKind::TextLong { value: String::new() }
    );
    assert_eq!(
        plan.sections[1].tasks[2].kind,
        TaskKind::TextShort {
            value: "calm".to_string()
        }
    );
    assert_eq!(
        plan.sections[2].tasks[1].kind,
        TaskKind::CheckboxWithText {
            checked: false,
            value: "laundry".to_string()
        }
    );

    // Yesterday is untouched.
    assert_eq!(store.get(date()).unwrap().sections, yesterday.sections);
}

#[test]
fn open_day_returns_the_stored_plan() {
    let mut store = PlanStore::in_memory();
    store.insert(sample_plan());
    assert_eq!(store.open_day(date()), &sample_plan());
    assert_eq!(store.dates().count(), 1);
}

#[test]
fn added_sections_take_the_next_palette_colour() {
    let mut store = PlanStore::in_memory();
    store.insert(sample_plan());

    // Two timeboxed sections already: the third colour is next.
    let first = store.add_section(date()).unwrap();
    assert_eq!(first.title, "New Section");
    assert_eq!(first.icon, "📝");
    assert_eq!(first.is_timeboxed, Some(true));
    assert_eq!(first.color.as_deref(), Some("rose"));
    assert!(first.tasks.is_empty());
    assert!(first.interval().is_none());

    let second = store.add_section(date()).unwrap();
    assert_eq!(second.color.as_deref(), Some("orange"));
    assert_ne!(first.id, second.id);

    let plan = store.get(date()).unwrap();
    assert_eq!(plan.sections.len(), 5);
    assert_eq!(plan.sections[4].id, second.id);
}

#[test]
fn palette_wraps_around() {
    let sections = (0..COLOR_PALETTE.len())
        .map(|i| Section::new(format!("s{}", i), "Block"))
        .collect();
    let mut plan = DailyPlan::new(date(), sections);
    assert_eq!(plan.add_section().color.as_deref(), Some(COLOR_PALETTE[0]));
}

#[test]
fn removing_a_section_drops_its_tasks() {
    let mut store = PlanStore::in_memory();
    store.insert(sample_plan());

    let removed = store.remove_section(date(), "work").unwrap();
    assert_eq!(removed.title, "Work Block");
    assert_eq!(removed.tasks.len(), 2);

    let plan = store.get(date()).unwrap();
    let ids: Vec<_> = plan.sections.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["focus", "morning"]);

    let err = store.remove_section(date(), "work").unwrap_err();
    assert!(matches!(err, TimeboxError::UnknownSection(id) if id == "work"));
}

#[test]
fn reviewed_day_rejects_section_edits() {
    let mut store = PlanStore::in_memory();
    store.insert(sample_plan());
    store.record_review(date(), "").unwrap();

    assert!(matches!(
        store.add_section(date()),
        Err(TimeboxError::PlanLocked(_))
    ));
    assert!(matches!(
        store.remove_section(date(), "work"),
        Err(TimeboxError::PlanLocked(_))
    ));
    assert_eq!(store.get(date()).unwrap().sections.len(), 3);
}

#[test]
fn missing_plan_is_reported() {
    let mut store = PlanStore::in_memory();
    assert!(matches!(
        store.confirm(date()),
        Err(TimeboxError::PlanNotFound(_))
    ));
    assert!(store
        .open_scheduler(date(), None, SchedulerConfig::default())
        .is_err());
    assert!(matches!(
        store.add_section(date()),
        Err(TimeboxError::PlanNotFound(_))
    ));
}

#[test]
fn store_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plans.json");

    let mut store = PlanStore::load(&path).unwrap();
    assert_eq!(store.dates().count(), 0, "missing file loads empty");

    let mut plan = sample_plan();
    plan.trackers = Trackers {
        urges: 2,
        payday_checked: true,
        daily_win: "walked".to_string(),
    };
    store.insert(plan.clone());
    store.save().unwrap();

    let reloaded = PlanStore::load(&path).unwrap();
    assert_eq!(reloaded.get(date()), Some(&plan));
}

#[test]
fn corrupt_store_file_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plans.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(matches!(PlanStore::load(&path), Err(TimeboxError::Json(_))));
}
