//! Behaviour-driven step definitions driving the CLI scenarios.

use super::helpers::write_utf8;
use super::*;
use crate::rate::run_rate_with;
use crate::recommend::{RecommendationReport, run_recommend_with};
use camino::Utf8PathBuf;
use carmatch_core::test_support::{city_persona, sample_cars};
use carmatch_core::PreferenceTable;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

#[derive(Debug)]
struct CommandWorld {
    _tmp: TempDir,
    catalog_path: Utf8PathBuf,
    preferences_path: Utf8PathBuf,
    persona_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            catalog_path: root.join("carDB.json"),
            preferences_path: root.join("qTable.json"),
            _tmp: tmp,
            persona_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self, subcommand: &[&str]) -> Vec<String> {
        let mut argv = vec!["carmatch".to_owned()];
        argv.extend(subcommand.iter().map(|arg| (*arg).to_owned()));
        argv.extend([
            format!("--{ARG_CATALOG}"),
            self.catalog_path.as_str().to_owned(),
            format!("--{ARG_PREFERENCES}"),
            self.preferences_path.as_str().to_owned(),
        ]);
        argv.extend(self.persona_args.borrow().iter().cloned());
        argv
    }

    fn run(&self, subcommand: &[&str]) {
        let invocation = self.build_command_line(subcommand);
        let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
        let mut buffer = self.stdout.borrow_mut();
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::Recommend(args) => run_recommend_with(args, &mut *buffer),
            Command::Rate(args) => run_rate_with(args, &mut *buffer),
            Command::Session(_) => panic!("session is not driven from scenarios"),
        });
        self.result.replace(Some(outcome));
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }

    fn assert_succeeded(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

#[given("the sample catalog exists on disk")]
fn sample_catalog_exists(#[from(world)] world: &CommandWorld) {
    let payload = serde_json::to_vec_pretty(&sample_cars()).expect("serialize catalog");
    write_utf8(&world.catalog_path, &payload);
}

#[given("I answer every persona question for a city driver")]
fn answer_city_driver(#[from(world)] world: &CommandWorld) {
    let answers = [
        (ARG_BUDGET, "6"),
        (ARG_FUEL, "Petrol"),
        (ARG_TRANSMISSION, "Manual"),
        (ARG_SPACE, "Small"),
        (ARG_USAGE, "City"),
    ];
    let mut args = world.persona_args.borrow_mut();
    for (flag, value) in answers {
        args.push(format!("--{flag}"));
        args.push(value.to_owned());
    }
}

#[when("I run the recommend command")]
fn run_recommend_command(#[from(world)] world: &CommandWorld) {
    world.run(&["recommend"]);
}

#[when("I run the rate command with rating 5")]
fn run_rate_command(#[from(world)] world: &CommandWorld) {
    world.run(&["rate", "5"]);
}

#[then("the command succeeds and recommends the Alto first")]
fn command_recommends_alto(#[from(world)] world: &CommandWorld) {
    world.assert_succeeded();
    let report: RecommendationReport =
        serde_json::from_slice(&world.stdout.borrow()).expect("output should be a JSON report");
    assert!(report.recommended);
    assert_eq!(
        report.cars.first().map(|car| car.name.as_str()),
        Some("Alto")
    );
}

#[then("the command fails because the catalog is missing")]
fn command_fails_missing_catalog(#[from(world)] world: &CommandWorld) {
    match &*world.error() {
        CliError::MissingSourceFile { field, .. } => assert_eq!(*field, ARG_CATALOG),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[then("the command fails because the budget is missing")]
fn command_fails_missing_budget(#[from(world)] world: &CommandWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_BUDGET),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command succeeds and stores 0.1 for the Alto")]
fn command_stores_preference(#[from(world)] world: &CommandWorld) {
    world.assert_succeeded();
    let raw = std::fs::read_to_string(world.preferences_path.as_std_path())
        .expect("preference table written");
    let table: PreferenceTable = serde_json::from_str(&raw).expect("decode preference table");
    assert_eq!(table.get(&city_persona("6").key(), "Alto"), Some(0.1));
}

macro_rules! register_command_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/carmatch_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_command_scenario!(recommend_happy_path, "recommending cars for a city driver");
register_command_scenario!(recommend_missing_catalog, "rejecting a missing catalog");
register_command_scenario!(recommend_missing_answer, "rejecting a missing persona answer");
register_command_scenario!(rate_happy_path, "rating the top recommendation");
