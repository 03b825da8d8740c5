use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use timebox_engine::{
    resolve_conflicts, DayWindow, PointerTarget, ScheduledSet, SchedulerConfig, SchedulerSession,
    Section, TimeInterval,
};

/// `n` blocks of 45 minutes starting every 30 minutes, so each one overlaps
/// the next.
fn overlapping(n: usize) -> Vec<TimeInterval> {
    (0..n)
        .map(|i| {
            let start = 240 + (i as i32) * 30 % 1100;
            TimeInterval::new(format!("s{}", i), start, start + 45)
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_conflicts");

    for n in [8usize, 32, 128] {
        let input = overlapping(n);
        group.bench_with_input(BenchmarkId::new("chain", n), &input, |b, input| {
            b.iter(|| {
                let mut intervals = input.clone();
                black_box(resolve_conflicts(black_box(&mut intervals)))
            });
        });
    }

    group.finish();
}

fn bench_set_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduled_set_resolve");

    for n in [8usize, 32] {
        let input = overlapping(n);
        group.bench_with_input(BenchmarkId::new("day", n), &input, |b, input| {
            b.iter(|| {
                let mut set = ScheduledSet::from_intervals(DayWindow::default(), 15, input.clone());
                black_box(set.resolve())
            });
        });
    }

    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag");
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let now = date.and_hms_opt(8, 0, 0).unwrap();
    let sections: Vec<Section> = (0..12)
        .map(|i| {
            let start = 300 + i * 75;
            Section::new(format!("s{}", i), format!("Section {}", i)).with_times(
                &timebox_engine::minutes_to_time(start),
                &timebox_engine::minutes_to_time(start + 60),
            )
        })
        .collect();

    group.bench_function("move_60_frames_and_drop", |b| {
        b.iter(|| {
            let mut session =
                SchedulerSession::open(sections.clone(), None, date, SchedulerConfig::default())
                    .unwrap();
            session.pointer_down("s5", PointerTarget::Body, 0.0).unwrap();
            for step in 0..60 {
                session.pointer_move(f64::from(step) * 2.0, None);
            }
            black_box(session.pointer_up(now))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_set_resolve, bench_drag);
criterion_main!(benches);
