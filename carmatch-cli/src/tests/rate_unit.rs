//! Focused unit tests covering the rate command.

use super::helpers::Workspace;
use super::*;
use crate::rate::{RateConfig, run_rate_with};
use carmatch_core::test_support::city_persona;
use carmatch_scorer::{FeedbackError, LearningRate};
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn workspace() -> Workspace {
    Workspace::new()
}

fn rate_args(workspace: &Workspace, rating: u8) -> RateArgs {
    RateArgs {
        rating: Some(rating),
        budget: Some("6".to_owned()),
        fuel: Some("Petrol".to_owned()),
        transmission: Some("Manual".to_owned()),
        space: Some("Small".to_owned()),
        usage: Some("City".to_owned()),
        catalog: Some(workspace.catalog()),
        preferences: Some(workspace.preferences()),
        ..RateArgs::default()
    }
}

fn printed_value(stdout: &[u8]) -> f64 {
    let outcome: Value = serde_json::from_slice(stdout).expect("output should be JSON");
    outcome
        .get("value")
        .and_then(Value::as_f64)
        .expect("outcome carries the updated value")
}

#[rstest]
fn converting_without_rating_errors(workspace: Workspace) {
    let args = RateArgs {
        rating: None,
        ..rate_args(&workspace, 5)
    };
    let err = RateConfig::try_from(args).expect_err("missing rating should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_RATING);
            assert_eq!(env, ENV_RATE_RATING);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(0)]
#[case(6)]
fn converting_rejects_out_of_range_ratings(workspace: Workspace, #[case] rating: u8) {
    let err = RateConfig::try_from(rate_args(&workspace, rating))
        .expect_err("rating should be rejected");
    match err {
        CliError::InvalidRating(_) => {}
        other => panic!("expected InvalidRating, found {other:?}"),
    }
}

#[rstest]
#[case(0.0)]
#[case(1.5)]
fn converting_rejects_out_of_range_learning_rates(workspace: Workspace, #[case] rate: f64) {
    let args = RateArgs {
        learning_rate: Some(rate),
        ..rate_args(&workspace, 5)
    };
    let err = RateConfig::try_from(args).expect_err("learning rate should be rejected");
    match err {
        CliError::InvalidLearningRate(_) => {}
        other => panic!("expected InvalidLearningRate, found {other:?}"),
    }
}

#[rstest]
fn rate_config_defaults_learning_rate(workspace: Workspace) {
    let config = RateConfig::try_from(rate_args(&workspace, 4)).expect("config should build");
    assert_eq!(config.learning_rate, LearningRate::default());
    assert_eq!(config.rating.get(), 4);
}

#[rstest]
fn rating_persists_the_top_car(workspace: Workspace) {
    let mut stdout = Vec::new();
    run_rate_with(rate_args(&workspace, 5), &mut stdout).expect("rate succeeds");

    assert_eq!(printed_value(&stdout), 0.1);
    let key = city_persona("6").key();
    assert_eq!(workspace.stored_value(&key, "Alto"), Some(0.1));
    assert_eq!(workspace.stored_table().len(), 1);
}

#[rstest]
fn repeated_ratings_accumulate(workspace: Workspace) {
    let mut first = Vec::new();
    run_rate_with(rate_args(&workspace, 5), &mut first).expect("first rating succeeds");
    let mut second = Vec::new();
    run_rate_with(rate_args(&workspace, 5), &mut second).expect("second rating succeeds");

    assert_eq!(printed_value(&second), 0.19);
}

#[rstest]
fn low_rating_stores_negative_value(workspace: Workspace) {
    let mut stdout = Vec::new();
    run_rate_with(rate_args(&workspace, 1), &mut stdout).expect("rate succeeds");
    assert_eq!(printed_value(&stdout), -0.1);
}

#[rstest]
fn custom_learning_rate_is_applied(workspace: Workspace) {
    let args = RateArgs {
        learning_rate: Some(0.5),
        ..rate_args(&workspace, 5)
    };
    let mut stdout = Vec::new();
    run_rate_with(args, &mut stdout).expect("rate succeeds");
    assert_eq!(printed_value(&stdout), 0.5);
}

#[rstest]
fn unpersisted_rating_is_printed_then_reported(workspace: Workspace) {
    workspace.block_preference_writes();
    let mut stdout = Vec::new();
    let err = run_rate_with(rate_args(&workspace, 5), &mut stdout)
        .expect_err("blocked flush should fail the command");

    match err {
        CliError::Feedback(inner) => match *inner {
            FeedbackError::Persist { outcome, .. } => {
                assert_eq!(outcome.car, "Alto");
                assert_eq!(outcome.value, 0.1);
            }
            other => panic!("expected Persist, found {other:?}"),
        },
        other => panic!("expected Feedback, found {other:?}"),
    }
    assert_eq!(printed_value(&stdout), 0.1);
    assert!(!workspace.preferences().as_std_path().exists());
}

#[cfg(feature = "store-sqlite")]
#[rstest]
fn sqlite_backend_persists_ratings(workspace: Workspace) {
    use carmatch_core::{PreferenceStore, SqlitePreferenceStore};

    let args = RateArgs {
        store: Some(crate::options::StoreBackend::Sqlite),
        preferences: Some(workspace.preferences_db()),
        ..rate_args(&workspace, 5)
    };
    let mut stdout = Vec::new();
    run_rate_with(args, &mut stdout).expect("rate succeeds");

    let store = SqlitePreferenceStore::open(workspace.preferences_db()).expect("reopen database");
    assert_eq!(store.get(&city_persona("6").key(), "Alto"), Some(0.1));
    assert!(!workspace.preferences().as_std_path().exists());
}
