//! Focused unit tests covering the interactive session command.

use std::io::Cursor;

use super::helpers::Workspace;
use super::*;
use crate::session::run_session_with;
use carmatch_core::PersonaField;
use carmatch_core::test_support::city_persona;
use carmatch_scorer::FeedbackError;
use rstest::{fixture, rstest};

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn session_args(workspace: &Workspace) -> SessionArgs {
    SessionArgs {
        catalog: Some(workspace.catalog()),
        preferences: Some(workspace.preferences()),
        ..SessionArgs::default()
    }
}

fn run(args: SessionArgs, input: &str) -> (Result<(), CliError>, String) {
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut stdout = Vec::new();
    let result = run_session_with(args, &mut reader, &mut stdout);
    let printed = String::from_utf8(stdout).expect("stdout utf-8");
    (result, printed)
}

#[rstest]
fn answering_every_question_then_rating(workspace: Workspace) {
    let (result, printed) = run(
        session_args(&workspace),
        "6\nPetrol\nManual\nSmall\nCity\n5\n",
    );
    result.expect("session succeeds");

    for field in PersonaField::ALL {
        assert!(printed.contains(field.prompt()), "missing prompt for {field}");
    }
    assert!(printed.contains("1. Alto (score 5.00)"));
    assert!(printed.contains("Thank you for your feedback!"));
    let key = city_persona("6").key();
    assert_eq!(workspace.stored_value(&key, "Alto"), Some(0.1));
}

#[rstest]
fn flags_skip_their_questions(workspace: Workspace) {
    let args = SessionArgs {
        budget: Some("6".to_owned()),
        fuel: Some("Petrol".to_owned()),
        transmission: Some("Manual".to_owned()),
        ..session_args(&workspace)
    };
    let (result, printed) = run(args, "Small\nCity\n\n");
    result.expect("session succeeds");

    assert!(!printed.contains(PersonaField::Budget.prompt()));
    assert!(printed.contains(PersonaField::Space.prompt()));
    assert!(printed.contains("1. Alto"));
}

#[rstest]
fn blank_rating_skips_feedback(workspace: Workspace) {
    let (result, printed) = run(
        session_args(&workspace),
        "6\nPetrol\nManual\nSmall\nCity\n\n",
    );
    result.expect("session succeeds");
    assert!(!printed.contains("Thank you"));
    assert!(!workspace.preferences().as_std_path().exists());
}

#[rstest]
fn blank_answers_are_asked_again(workspace: Workspace) {
    let (result, printed) = run(
        session_args(&workspace),
        "\n  \n6\nPetrol\nManual\nSmall\nCity\n",
    );
    result.expect("session succeeds");
    assert_eq!(printed.matches(PersonaField::Budget.prompt()).count(), 3);
}

#[rstest]
fn input_ending_early_names_the_pending_question(workspace: Workspace) {
    let (result, _) = run(session_args(&workspace), "6\n");
    match result {
        Err(CliError::InputEnded { field }) => assert_eq!(field, ARG_FUEL),
        other => panic!("expected InputEnded, found {other:?}"),
    }
}

#[rstest]
fn unmatched_persona_reports_no_suitable_cars(workspace: Workspace) {
    let (result, printed) = run(
        session_args(&workspace),
        "1\nHydrogen\nSequential\nTiny\nTrack\n",
    );
    result.expect("session succeeds");
    assert!(printed.contains("Sorry, we couldn't find any cars"));
    assert!(!printed.contains("1. "));
}

#[rstest]
fn non_numeric_rating_is_rejected(workspace: Workspace) {
    let (result, _) = run(
        session_args(&workspace),
        "6\nPetrol\nManual\nSmall\nCity\ngreat\n",
    );
    match result {
        Err(CliError::InvalidRatingText { raw }) => assert_eq!(raw, "great"),
        other => panic!("expected InvalidRatingText, found {other:?}"),
    }
}

#[rstest]
fn invalid_budget_fails_the_session(workspace: Workspace) {
    let (result, _) = run(
        session_args(&workspace),
        "lots\nPetrol\nManual\nSmall\nCity\n",
    );
    match result {
        Err(CliError::Session(_)) => {}
        other => panic!("expected Session, found {other:?}"),
    }
}

#[rstest]
fn unpersisted_rating_fails_after_showing_the_ranking(workspace: Workspace) {
    workspace.block_preference_writes();
    let (result, printed) = run(
        session_args(&workspace),
        "6\nPetrol\nManual\nSmall\nCity\n5\n",
    );

    match result {
        Err(CliError::Feedback(inner)) => match *inner {
            FeedbackError::Persist { outcome, .. } => {
                assert_eq!(outcome.car, "Alto");
                assert_eq!(outcome.value, 0.1);
            }
            other => panic!("expected Persist, found {other:?}"),
        },
        other => panic!("expected Feedback, found {other:?}"),
    }
    assert!(printed.contains("1. Alto (score 5.00)"));
    assert!(!printed.contains("Thank you"));
    assert!(!workspace.preferences().as_std_path().exists());
}
