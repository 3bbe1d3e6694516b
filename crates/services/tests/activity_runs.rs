use std::cell::Cell;

use shapeville_core::model::{
    ActivityKind, ActivityMode, AngleClass, AttemptOutcome, CircleMeasure, CorrectAnswer,
    Dimension, ItemId, PolygonFamily, Settlement, TutorSettings,
};
use shapeville_core::time::fixed_clock;
use shapeville_core::validator::InputError;
use services::{
    ActivityError, ActivityIntent, AlwaysConfirm, AngleChoice, Control, LeaveRequest,
    LedgerHandle, NextStep, Phase, TaskMachine, TickOutcome, Tutor,
};

fn machine(kind: ActivityKind) -> (TaskMachine, LedgerHandle) {
    let ledger = LedgerHandle::new(fixed_clock());
    let settings = TutorSettings::default().with_seed(5);
    (TaskMachine::new(kind, &settings, ledger.clone()), ledger)
}

fn correct_answer(machine: &TaskMachine) -> String {
    match machine.current_problem().unwrap().correct_answer() {
        CorrectAnswer::Numeric(value) => format!("{value:.2}"),
        CorrectAnswer::Label(label) => label.clone(),
    }
}

#[test]
fn angle_run_needs_each_type_once() {
    let (mut machine, ledger) = machine(ActivityKind::AngleClassification);
    machine.enter().unwrap();

    let picks = [("40", "Acute"), ("90", "Right"), ("120", "Obtuse"), ("200", "Reflex")];
    for (index, (degrees, label)) in picks.into_iter().enumerate() {
        let choice = machine.choose_angle(degrees).unwrap();
        assert!(matches!(choice, AngleChoice::Accepted { .. }));
        assert_eq!(
            machine.submit_answer(label).unwrap(),
            AttemptOutcome::Correct { points: 3 }
        );
        let next = machine.next_problem().unwrap();
        if index < 3 {
            assert!(matches!(next, NextStep::Problem(_)));
        } else {
            assert_eq!(next, NextStep::Completed);
        }
    }

    assert_eq!(machine.phase(), Phase::Idle);
    let snapshot = ledger.snapshot().unwrap();
    assert_eq!(snapshot.score, 12);
    assert_eq!(
        snapshot.completed_activities,
        vec![ActivityKind::AngleClassification]
    );
    assert_eq!(snapshot.progress_percent, 17);
}

#[test]
fn completed_angle_type_is_rejected_without_penalty() {
    let (mut machine, ledger) = machine(ActivityKind::AngleClassification);
    machine.enter().unwrap();
    machine.choose_angle("30").unwrap();
    machine.submit_answer("Acute").unwrap();
    machine.next_problem().unwrap();

    let choice = machine.choose_angle("60").unwrap();

    assert_eq!(
        choice,
        AngleChoice::AlreadyCompleted {
            class: AngleClass::Acute
        }
    );
    assert_eq!(machine.phase(), Phase::Settled(Settlement::AlreadyCompleted));
    assert_eq!(
        machine.feedback().unwrap().message,
        "You have already completed this angle type! Try a different angle."
    );
    assert_eq!(machine.attempts().unwrap().used(), 0);
    assert_eq!(ledger.snapshot().unwrap().score, 3);
    assert!(!machine.controls().reveal);

    let retry = machine.choose_angle("100").unwrap();
    assert!(matches!(retry, AngleChoice::Accepted { degrees: 100, .. }));
    assert_eq!(machine.phase(), Phase::InProgress);
}

#[test]
fn angle_entry_is_validated() {
    let (mut machine, _) = machine(ActivityKind::AngleClassification);
    machine.enter().unwrap();

    assert!(matches!(
        machine.choose_angle("95"),
        Err(ActivityError::Input(InputError::OutOfRange { value: 95 }))
    ));
    assert_eq!(
        machine.feedback().unwrap().message,
        "Invalid input! Please enter a number between 0 - 360 that's a multiple of 10."
    );
    assert!(matches!(
        machine.choose_angle("ninety"),
        Err(ActivityError::Input(InputError::InvalidNumeric { .. }))
    ));

    machine.submit_answer("Wrong").unwrap();
    assert!(matches!(
        machine.choose_angle("90"),
        Err(ActivityError::ControlDisabled(Control::ChooseAngle))
    ));
}

#[test]
fn shape_run_counts_every_settled_shape() {
    let (mut machine, ledger) = machine(ActivityKind::ShapeRecognition);
    machine.enter().unwrap();
    assert_eq!(machine.phase(), Phase::Selecting);
    machine
        .start_activity(ActivityMode::Shapes(Dimension::Two))
        .unwrap();

    let mut seen = Vec::new();
    for index in 0..4 {
        seen.push(machine.current_problem().unwrap().item().clone());
        if index == 0 {
            for _ in 0..3 {
                machine.submit_answer("hexagonal prism").unwrap();
            }
            assert_eq!(machine.phase(), Phase::Settled(Settlement::Exhausted));
        } else {
            let answer = correct_answer(&machine);
            machine.submit_answer(&answer).unwrap();
        }
        if index < 3 {
            assert!(matches!(machine.next_problem().unwrap(), NextStep::Problem(_)));
        }
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 4);
    assert!(machine.progress().is_complete());
    assert!(ledger.is_complete(ActivityKind::ShapeRecognition).unwrap());
    assert_eq!(ledger.snapshot().unwrap().score, 9);
    assert_eq!(machine.next_problem().unwrap(), NextStep::Completed);
}

#[test]
fn solid_shapes_pay_bonus_points() {
    let (mut machine, ledger) = machine(ActivityKind::ShapeRecognition);
    machine.enter().unwrap();
    machine
        .start_activity(ActivityMode::Shapes(Dimension::Three))
        .unwrap();
    let answer = correct_answer(&machine);
    assert_eq!(
        machine.submit_answer(&answer.to_uppercase()).unwrap(),
        AttemptOutcome::Correct { points: 6 }
    );
    assert_eq!(ledger.snapshot().unwrap().score, 6);
    assert!(
        machine
            .snapshot()
            .asset_key
            .unwrap()
            .starts_with("shape3D/")
    );
}

#[test]
fn polygon_families_are_picked_by_the_user() {
    let (mut machine, ledger) = machine(ActivityKind::PolygonArea);
    machine.enter().unwrap();

    for (index, family) in PolygonFamily::ALL.into_iter().enumerate() {
        machine
            .start_activity(ActivityMode::Polygon(Some(family)))
            .unwrap();
        let answer = correct_answer(&machine);
        machine.submit_answer(&answer).unwrap();
        let next = machine.next_problem().unwrap();
        if index < 3 {
            assert_eq!(next, NextStep::Selecting);
            let controls = machine.controls();
            assert!(
                controls
                    .items
                    .iter()
                    .any(|choice| choice.item == ItemId::new(family.name()) && !choice.enabled)
            );
        } else {
            assert_eq!(next, NextStep::Completed);
        }
    }
    assert_eq!(ledger.snapshot().unwrap().score, 12);
    assert!(ledger.is_complete(ActivityKind::PolygonArea).unwrap());
}

#[test]
fn pinning_a_completed_item_is_recoverable() {
    let (mut machine, ledger) = machine(ActivityKind::PolygonArea);
    machine.enter().unwrap();
    machine
        .start_activity(ActivityMode::Polygon(Some(PolygonFamily::Rectangle)))
        .unwrap();
    let answer = correct_answer(&machine);
    machine.submit_answer(&answer).unwrap();
    machine.next_problem().unwrap();

    let err = machine
        .start_activity(ActivityMode::Polygon(Some(PolygonFamily::Rectangle)))
        .unwrap_err();

    assert!(matches!(err, ActivityError::DuplicateCompletedItem { .. }));
    assert!(err.is_recoverable());
    assert_eq!(machine.phase(), Phase::Selecting);
    assert_eq!(ledger.snapshot().unwrap().score, 3);
}

#[test]
fn composite_run_walks_every_figure() {
    let (mut machine, ledger) = machine(ActivityKind::CompositeArea);
    machine.enter().unwrap();
    machine
        .start_activity(ActivityMode::Composite(None))
        .unwrap();

    let mut steps = 0;
    loop {
        let answer = correct_answer(&machine);
        assert_eq!(
            machine.submit_answer(&answer).unwrap(),
            AttemptOutcome::Correct { points: 6 }
        );
        steps += 1;
        match machine.next_problem().unwrap() {
            NextStep::Problem(_) => {}
            NextStep::Completed => break,
            NextStep::Selecting => panic!("unpinned runs never ask for a selection"),
        }
    }

    assert_eq!(steps, 6);
    assert_eq!(ledger.snapshot().unwrap().score, 36);
}

#[test]
fn missed_problems_come_back_later_in_the_run() {
    let (mut machine, _) = machine(ActivityKind::CircleMeasure);
    machine.enter().unwrap();
    machine
        .start_activity(ActivityMode::Circle(CircleMeasure::Area))
        .unwrap();
    for _ in 0..3 {
        machine.submit_answer("0").unwrap();
    }
    assert!(!machine.progress().is_complete());

    assert!(matches!(machine.next_problem().unwrap(), NextStep::Problem(_)));
    let answer = correct_answer(&machine);
    machine.submit_answer(&answer).unwrap();
    assert!(machine.progress().is_complete());
    assert_eq!(machine.snapshot().display_radius.map(|r| r % 4), Some(0));
}

#[test]
fn reentering_a_completed_activity_starts_a_fresh_run() {
    let (mut machine, ledger) = machine(ActivityKind::CircleMeasure);
    machine.enter().unwrap();
    machine
        .start_activity(ActivityMode::Circle(CircleMeasure::Circumference))
        .unwrap();
    let answer = correct_answer(&machine);
    machine.submit_answer(&answer).unwrap();
    assert!(ledger.is_complete(ActivityKind::CircleMeasure).unwrap());

    machine.reset_activity();
    machine.enter().unwrap();

    assert_eq!(machine.progress().count(), 0);
    assert_eq!(machine.phase(), Phase::Selecting);
    assert!(ledger.is_complete(ActivityKind::CircleMeasure).unwrap());
}

#[test]
fn tutor_guards_navigation_away_from_a_live_problem() {
    let mut tutor = Tutor::new(TutorSettings::default().with_seed(8), fixed_clock());
    tutor.open(ActivityKind::PolygonArea, &AlwaysConfirm).unwrap();
    tutor
        .dispatch(ActivityIntent::Start(ActivityMode::Polygon(Some(
            PolygonFamily::Triangle,
        ))))
        .unwrap();
    let ticket = tutor.machine(ActivityKind::PolygonArea).ticket().unwrap();

    let asked = Cell::new(0);
    let decline = |request: &LeaveRequest| {
        asked.set(asked.get() + 1);
        assert_eq!(request.activity, ActivityKind::PolygonArea);
        false
    };
    assert!(matches!(
        tutor.open(ActivityKind::SectorArea, &decline),
        Err(ActivityError::NavigationCancelled)
    ));
    assert_eq!(asked.get(), 1);
    assert_eq!(tutor.current(), Some(ActivityKind::PolygonArea));
    assert_eq!(
        tutor.machine(ActivityKind::PolygonArea).phase(),
        Phase::InProgress
    );

    tutor.open(ActivityKind::SectorArea, &AlwaysConfirm).unwrap();
    assert_eq!(tutor.current(), Some(ActivityKind::SectorArea));
    assert_eq!(tutor.machine(ActivityKind::PolygonArea).phase(), Phase::Idle);
    assert_eq!(tutor.tick_ticket(ticket).unwrap(), TickOutcome::Ignored);

    let never = |_: &LeaveRequest| -> bool { panic!("nothing is in progress") };
    tutor.leave(&never).unwrap();
    assert_eq!(tutor.current(), None);
}

#[test]
fn abandoned_ticket_never_ticks_the_next_activity() {
    let mut tutor = Tutor::new(TutorSettings::default().with_seed(8), fixed_clock());
    tutor.open(ActivityKind::PolygonArea, &AlwaysConfirm).unwrap();
    tutor
        .dispatch(ActivityIntent::Start(ActivityMode::Polygon(Some(
            PolygonFamily::Rectangle,
        ))))
        .unwrap();
    let polygon = tutor.machine(ActivityKind::PolygonArea).ticket().unwrap();

    tutor.open(ActivityKind::CompositeArea, &AlwaysConfirm).unwrap();
    tutor
        .dispatch(ActivityIntent::Start(ActivityMode::Composite(None)))
        .unwrap();
    let composite = tutor.machine(ActivityKind::CompositeArea).ticket().unwrap();
    assert_eq!(polygon.epoch(), composite.epoch());

    assert_eq!(tutor.tick_ticket(polygon).unwrap(), TickOutcome::Ignored);
    assert_eq!(
        tutor.machine(ActivityKind::CompositeArea).remaining_seconds(),
        Some(300)
    );
    assert_eq!(
        tutor.tick_ticket(composite).unwrap(),
        TickOutcome::Running { remaining: 299 }
    );
}

#[test]
fn tutor_home_and_summary_reflect_the_ledger() {
    let mut tutor = Tutor::new(TutorSettings::default().with_seed(8), fixed_clock());
    tutor.open(ActivityKind::CircleMeasure, &AlwaysConfirm).unwrap();
    tutor
        .dispatch(ActivityIntent::Start(ActivityMode::Circle(CircleMeasure::Area)))
        .unwrap();
    let answer = correct_answer(tutor.machine(ActivityKind::CircleMeasure));
    tutor.dispatch(ActivityIntent::Submit(answer)).unwrap();

    let home = tutor.home().unwrap();
    assert_eq!(home.score, 3);
    assert_eq!(home.progress_percent, 17);
    assert!(
        home.tiles
            .iter()
            .any(|tile| tile.activity == ActivityKind::CircleMeasure && tile.completed)
    );

    let summary = tutor.end_session().unwrap();
    assert_eq!(summary.score, 3);
    assert_eq!(summary.correct, 1);
    assert_eq!(summary.completed_activities, vec![ActivityKind::CircleMeasure]);
}

#[test]
fn snapshots_serialize_for_renderers() {
    let (mut machine, _) = machine(ActivityKind::SectorArea);
    machine.enter().unwrap();
    machine.start_activity(ActivityMode::Sector(Some(2))).unwrap();

    let value = serde_json::to_value(machine.snapshot()).unwrap();

    assert_eq!(value["phase"], "in_progress");
    assert_eq!(value["activity"], "sector_area");
    assert_eq!(value["asset_key"], "sector/2");
    assert_eq!(value["attempts_remaining"], 3);
    assert_eq!(value["remaining_seconds"], 300);
    assert_eq!(value["controls"]["submit"], true);
}
