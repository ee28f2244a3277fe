//! Integration tests for the counting timeline.
//!
//! These tests drive a session through the controller the way a host
//! would, one pass per user action, and check what ends up on screen.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use kakeibo_core::gradient::{AMBER, DEEP_RED, GREEN_OK_LIGHT};
use kakeibo_core::timeline::{Shape, TimelineConfig, TimelineRenderer, TimelineView};
use kakeibo_core::{CounterKind, Event, EventKind, FixedClock, SessionContext, SessionController};

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn tokyo() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

#[test]
fn test_full_counting_pass() {
    let clock = FixedClock::new(t0());
    let mut ctl = SessionController::with_clock(SessionContext::new("alice"), &clock);

    assert!(ctl.start().is_some());
    clock.advance(Duration::minutes(2));
    ctl.adjust(CounterKind::Core, 1);
    clock.advance(Duration::seconds(90));
    ctl.adjust(CounterKind::Frag45, 1);
    clock.advance(Duration::seconds(330));
    ctl.adjust(CounterKind::Wipe, 1);
    clock.advance(Duration::minutes(1));

    let intervals = ctl.snapshot();
    let kinds: Vec<_> = intervals.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Start, EventKind::Core, EventKind::Frag45, EventKind::Wipe]
    );
    let durations: Vec<_> = intervals.iter().map(|i| i.duration_min).collect();
    assert_eq!(durations, vec![2.0, 1.5, 5.5, 1.0]);
    assert!(intervals[3].open);

    assert_eq!(intervals[0].color(), GREEN_OK_LIGHT);
    assert_eq!(intervals[2].color(), DEEP_RED);

    let renderer = TimelineRenderer::new(TimelineConfig::default()).with_offset(tokyo());
    let view = ctl.render(&renderer);
    let rendered = view.rendered().expect("timeline should be drawn");
    assert_eq!(rendered.geometry.span_min, 10.0);
    assert_eq!(rendered.summary.total_elapsed_min, 9.0);
    assert_eq!(rendered.summary.mean_interval_min, 3.0);
    assert_eq!(rendered.summary.slow_intervals, 1);
    assert_eq!(rendered.summary.elapsed_caption(), "Total elapsed: 9.0 min");

    let svg = rendered.svg();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<title>21:02:00 | +2.0 min from start | total 1 | kind: core</title>"));
}

#[test]
fn test_placeholder_until_first_event() {
    let clock = FixedClock::new(t0());
    let ctl = SessionController::with_clock(SessionContext::default(), &clock);
    match ctl.render(&TimelineRenderer::new(TimelineConfig::default())) {
        TimelineView::NotStarted(placeholder) => {
            assert_eq!(placeholder.message, "No count history yet.");
            assert_eq!(placeholder.action_label, "Start counting");
        }
        TimelineView::Drawn(_) => panic!("nothing has been counted"),
    }
}

#[test]
fn test_counting_without_start_synthesizes_origin() {
    let clock = FixedClock::new(t0());
    let mut ctl = SessionController::with_clock(SessionContext::default(), &clock);
    ctl.adjust(CounterKind::Frag75, 1);
    clock.advance(Duration::minutes(3));

    let intervals = ctl.snapshot();
    assert_eq!(intervals.len(), 2);
    assert_eq!(intervals[0].kind, EventKind::Start);
    assert_eq!(intervals[0].duration_min, 0.0);
    assert_eq!(intervals[1].duration_min, 3.0);
}

#[test]
fn test_open_interval_grows_with_clock() {
    let clock = FixedClock::new(t0());
    let mut ctl = SessionController::with_clock(SessionContext::default(), &clock);
    ctl.start();
    ctl.adjust(CounterKind::Core, 1);

    clock.advance(Duration::minutes(3));
    let early = ctl.snapshot();
    assert_eq!(early.last().unwrap().color(), AMBER);

    clock.advance(Duration::minutes(5));
    let late = ctl.snapshot();
    assert_eq!(late.last().unwrap().duration_min, 8.0);
    assert_eq!(late.last().unwrap().color(), DEEP_RED);
    assert_eq!(late.len(), early.len());
}

#[test]
fn test_short_session_uses_minimum_span() {
    let clock = FixedClock::new(t0());
    let mut ctl = SessionController::with_clock(SessionContext::default(), &clock);
    ctl.start();
    clock.advance(Duration::seconds(20));

    let view = ctl.render(&TimelineRenderer::new(TimelineConfig::default()));
    let rendered = view.rendered().unwrap();
    assert_eq!(rendered.geometry.span_min, 5.0);
    assert_eq!(rendered.geometry.ticks().len(), 6);
}

#[test]
fn test_undo_redo_sequence() {
    let clock = FixedClock::new(t0());
    let mut ctl = SessionController::with_clock(SessionContext::default(), &clock);
    ctl.start();

    clock.advance(Duration::minutes(1));
    assert!(ctl.adjust(CounterKind::Frag45, 1).is_some());
    clock.advance(Duration::minutes(1));
    assert!(ctl.adjust(CounterKind::Frag45, -1).is_none());
    assert!(ctl.adjust(CounterKind::Frag45, -1).is_none());
    clock.advance(Duration::minutes(1));
    let redo = ctl.adjust(CounterKind::Frag45, 1);
    assert!(matches!(redo, Some(Event::CountRecorded { total: 1, .. })));

    let totals: Vec<_> = ctl.log().events().iter().map(|e| e.total).collect();
    assert_eq!(totals, vec![0, 1, 1]);
}

#[test]
fn test_reset_is_idempotent() {
    let clock = FixedClock::new(t0());
    let mut ctl = SessionController::with_clock(SessionContext::default(), &clock);
    ctl.start();
    ctl.adjust(CounterKind::Core, 3);

    let first = ctl.reset();
    let second = ctl.reset();
    assert_eq!(first.message(), "Counts and history cleared");
    assert_eq!(second.message(), first.message());
    assert!(ctl.snapshot().is_empty());

    clock.advance(Duration::minutes(1));
    assert!(matches!(
        ctl.adjust(CounterKind::Core, 1),
        Some(Event::CountRecorded { total: 1, .. })
    ));
}

#[test]
fn test_one_group_per_event() {
    let clock = FixedClock::new(t0());
    let mut ctl = SessionController::with_clock(SessionContext::default(), &clock);
    ctl.start();
    for kind in CounterKind::ALL {
        clock.advance(Duration::seconds(45));
        ctl.adjust(kind, 1);
    }

    let view = ctl.render(&TimelineRenderer::new(TimelineConfig::default()));
    let scene = &view.rendered().unwrap().scene;
    let groups = scene
        .walk()
        .into_iter()
        .filter(|s| matches!(s, Shape::Group { title: Some(_), .. }))
        .count();
    assert_eq!(groups, 5);
}
