use shapeville_core::catalog::find_shape;
use shapeville_core::model::{
    ActivityKind, ActivityMode, AttemptOutcome, ItemId, PointTiers, PolygonFamily, PolygonShape,
    Problem, ProblemParams, Settlement, TutorSettings,
};
use shapeville_core::time::fixed_clock;
use shapeville_core::validator::InputError;
use services::{
    ActivityError, ActivityIntent, DispatchOutcome, LedgerHandle, Phase, TaskMachine, TickOutcome,
};

fn machine(kind: ActivityKind) -> (TaskMachine, LedgerHandle) {
    let ledger = LedgerHandle::new(fixed_clock());
    let settings = TutorSettings::default().with_seed(21);
    (TaskMachine::new(kind, &settings, ledger.clone()), ledger)
}

fn polygon(shape: PolygonShape, time_limit_secs: u32) -> Problem {
    Problem::new(
        ProblemParams::Polygon(shape),
        PointTiers::STANDARD,
        time_limit_secs,
    )
}

const RECTANGLE: PolygonShape = PolygonShape::Rectangle {
    length: 5,
    width: 4,
};

#[test]
fn rectangle_first_try_earns_three_points() {
    let (mut machine, ledger) = machine(ActivityKind::PolygonArea);
    machine.start_prepared(polygon(RECTANGLE, 180)).unwrap();

    let outcome = machine.submit_answer("20").unwrap();

    assert_eq!(outcome, AttemptOutcome::Correct { points: 3 });
    assert_eq!(
        machine.phase(),
        Phase::Settled(Settlement::Correct { points: 3 })
    );
    assert_eq!(ledger.snapshot().unwrap().score, 3);
    assert!(machine.progress().contains(&ItemId::new("Rectangle")));
    assert_eq!(
        machine.feedback().unwrap().message,
        "Great job! You earned 3 points!"
    );
}

#[test]
fn triangle_area_is_half_base_times_height() {
    let (mut machine, ledger) = machine(ActivityKind::PolygonArea);
    machine
        .start_prepared(polygon(PolygonShape::Triangle { base: 6, height: 4 }, 180))
        .unwrap();

    assert_eq!(machine.submit_answer("13").unwrap(), AttemptOutcome::IncorrectRetry { remaining: 2 });
    assert_eq!(machine.submit_answer("12.0").unwrap(), AttemptOutcome::Correct { points: 2 });
    assert_eq!(ledger.snapshot().unwrap().score, 2);
}

#[test]
fn three_wrong_answers_exhaust_with_zero_points() {
    let (mut machine, ledger) = machine(ActivityKind::PolygonArea);
    machine.start_prepared(polygon(RECTANGLE, 180)).unwrap();

    machine.submit_answer("1").unwrap();
    machine.submit_answer("2").unwrap();
    let outcome = machine.submit_answer("3").unwrap();

    assert_eq!(outcome, AttemptOutcome::IncorrectExhausted);
    assert_eq!(machine.phase(), Phase::Settled(Settlement::Exhausted));
    assert_eq!(machine.attempts().unwrap().used(), 3);
    assert_eq!(ledger.snapshot().unwrap().score, 0);
    assert!(!machine.progress().contains(&ItemId::new("Rectangle")));

    let snapshot = machine.snapshot();
    assert_eq!(
        snapshot.solution.as_deref(),
        Some("Area = length × width = 5 × 4 = 20.00 cm²")
    );
    assert!(snapshot.controls.next);
    assert!(!snapshot.controls.submit);
    assert!(matches!(
        machine.submit_answer("20"),
        Err(ActivityError::NotInProgress)
    ));
    assert_eq!(ledger.history().unwrap().len(), 1);
}

#[test]
fn non_numeric_input_keeps_attempts_and_timer() {
    let (mut machine, _) = machine(ActivityKind::PolygonArea);
    machine.start_prepared(polygon(RECTANGLE, 180)).unwrap();
    machine.tick().unwrap();

    let err = machine.submit_answer("  ").unwrap_err();

    assert!(matches!(
        err,
        ActivityError::Input(InputError::InvalidNumeric { .. })
    ));
    assert_eq!(machine.attempts().unwrap().remaining(), 3);
    assert_eq!(machine.remaining_seconds(), Some(179));
    assert_eq!(machine.tick().unwrap(), TickOutcome::Running { remaining: 178 });
}

#[test]
fn angle_classifications_accept_labels() {
    for (degrees, label) in [(95, "Obtuse"), (90, "Right"), (270, "Reflex"), (40, "acute")] {
        let (mut machine, ledger) = machine(ActivityKind::AngleClassification);
        machine
            .start_prepared(Problem::new(
                ProblemParams::Angle { degrees },
                PointTiers::STANDARD,
                180,
            ))
            .unwrap();
        assert_eq!(
            machine.submit_answer(label).unwrap(),
            AttemptOutcome::Correct { points: 3 },
            "{degrees}° should be {label}"
        );
        assert_eq!(ledger.snapshot().unwrap().score, 3);
    }
}

#[test]
fn shape_names_ignore_case() {
    let (mut machine, ledger) = machine(ActivityKind::ShapeRecognition);
    machine
        .start_prepared(Problem::new(
            ProblemParams::Shape(find_shape("circle").unwrap()),
            PointTiers::STANDARD,
            180,
        ))
        .unwrap();

    assert_eq!(
        machine.submit_answer("Circle").unwrap(),
        AttemptOutcome::Correct { points: 3 }
    );
    assert_eq!(ledger.snapshot().unwrap().score, 3);
}

#[test]
fn sector_one_pays_bonus_points() {
    let (mut machine, ledger) = machine(ActivityKind::SectorArea);
    machine.enter().unwrap();
    machine.start_activity(ActivityMode::Sector(Some(1))).unwrap();

    assert_eq!(machine.remaining_seconds(), Some(300));
    assert_eq!(
        machine.submit_answer("50.24").unwrap(),
        AttemptOutcome::Correct { points: 6 }
    );
    assert_eq!(ledger.snapshot().unwrap().score, 6);
    assert_eq!(
        machine.request_reveal().unwrap(),
        "Area = π×r²×(θ/360) = 3.14×8.0²×(90/360) = 50.24"
    );
}

#[test]
fn expiry_settles_with_zero_points() {
    let (mut machine, ledger) = machine(ActivityKind::PolygonArea);
    machine.enter().unwrap();
    machine
        .start_activity(ActivityMode::Polygon(Some(PolygonFamily::Triangle)))
        .unwrap();

    for expected in (1..180).rev() {
        assert_eq!(
            machine.tick().unwrap(),
            TickOutcome::Running {
                remaining: expected
            }
        );
    }
    assert_eq!(machine.tick().unwrap(), TickOutcome::Expired);

    assert_eq!(machine.phase(), Phase::Settled(Settlement::Expired));
    assert_eq!(machine.remaining_seconds(), Some(0));
    assert_eq!(ledger.snapshot().unwrap().score, 0);
    let feedback = machine.feedback().unwrap();
    assert!(feedback.message.starts_with("Time's up! Area = (base × height) ÷ 2"));
    assert_eq!(machine.tick().unwrap(), TickOutcome::Ignored);
}

#[test]
fn timer_wins_a_tie_with_a_correct_answer() {
    let (mut machine, ledger) = machine(ActivityKind::PolygonArea);
    machine.start_prepared(polygon(RECTANGLE, 1)).unwrap();

    let results = machine.dispatch_cycle([
        ActivityIntent::Submit("20".to_string()),
        ActivityIntent::Tick,
    ]);

    assert!(matches!(
        results[0],
        Ok(DispatchOutcome::Ticked(TickOutcome::Expired))
    ));
    assert!(matches!(results[1], Err(ActivityError::NotInProgress)));
    assert_eq!(machine.phase(), Phase::Settled(Settlement::Expired));
    assert_eq!(ledger.snapshot().unwrap().score, 0);
}

#[test]
fn stale_ticks_do_not_touch_the_next_problem() {
    let (mut machine, _) = machine(ActivityKind::CompositeArea);
    machine.enter().unwrap();
    let first = machine.start_activity(ActivityMode::Composite(None)).unwrap();
    machine.submit_answer("0").unwrap();
    machine.submit_answer("0").unwrap();
    machine.submit_answer("0").unwrap();

    let DispatchOutcome::Advanced(_) = machine.dispatch(ActivityIntent::Next).unwrap() else {
        panic!("expected to advance");
    };
    let second = machine.ticket().unwrap();
    assert_ne!(first, second);

    assert_eq!(
        machine.dispatch(ActivityIntent::TimerTick(first)).unwrap(),
        DispatchOutcome::Ticked(TickOutcome::Ignored)
    );
    assert_eq!(machine.remaining_seconds(), Some(300));
}
