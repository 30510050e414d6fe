//! Interactive session command for the carmatch CLI.
//!
//! Unanswered persona questions are asked one line at a time. Once the
//! persona is complete the ranking is shown and a single rating line is
//! read; a blank rating skips feedback.

use std::io::{BufRead, Write};

use camino::Utf8PathBuf;
use carmatch_core::{PersonaField, PreferenceStore, Ranking};
use carmatch_scorer::{
    FeedbackError, FeedbackUpdater, LearningRate, Rating, RuleVariant, Session, SessionError,
};
use clap::Parser;
use log::{debug, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::options::{PersonaAnswers, StoreBackend, StoreConfig, resolve_learning_rate};
use crate::{
    ARG_BUDGET, ARG_CATALOG, ARG_FUEL, ARG_LEARNING_RATE, ARG_PREFERENCES, ARG_SPACE, ARG_STORE,
    ARG_TRANSMISSION, ARG_USAGE, ARG_VARIANT, CliError,
};

const HEADING: &str = "Your top car recommendations:";
const NO_MATCH: &str =
    "Sorry, we couldn't find any cars matching your preferences. Try changing some values.";
const RATING_PROMPT: &str = "How would you rate this recommendation? (1-5, blank to skip)";
const THANKS: &str = "Thank you for your feedback! The system will learn from this.";

/// CLI arguments for the `session` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Ask the five persona questions on standard input (skipping \
                 any already supplied as flags), show the recommendations and \
                 read one rating.",
    about = "Answer the questions interactively, then rate the result"
)]
#[ortho_config(prefix = "CARMATCH")]
pub(crate) struct SessionArgs {
    /// Budget, in the same unit as catalog prices.
    #[arg(long = ARG_BUDGET, value_name = "amount")]
    #[serde(default)]
    pub(crate) budget: Option<String>,
    /// Preferred fuel type.
    #[arg(long = ARG_FUEL, value_name = "text")]
    #[serde(default)]
    pub(crate) fuel: Option<String>,
    /// Automatic or manual.
    #[arg(long = ARG_TRANSMISSION, value_name = "text")]
    #[serde(default)]
    pub(crate) transmission: Option<String>,
    /// Seating or boot space needs.
    #[arg(long = ARG_SPACE, value_name = "text")]
    #[serde(default)]
    pub(crate) space: Option<String>,
    /// City, highway or off-roading.
    #[arg(long = ARG_USAGE, value_name = "text")]
    #[serde(default)]
    pub(crate) usage: Option<String>,
    /// Path to the car catalog (`carDB.json`).
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Path to the preference table (`qTable.json`).
    #[arg(long = ARG_PREFERENCES, value_name = "path")]
    #[serde(default)]
    pub(crate) preferences: Option<Utf8PathBuf>,
    /// Backend for the preference table.
    #[arg(long = ARG_STORE, value_enum)]
    #[serde(default)]
    pub(crate) store: Option<StoreBackend>,
    /// Rule set: `additive` or `legacy`.
    #[arg(long = ARG_VARIANT, value_name = "name")]
    #[serde(default)]
    pub(crate) variant: Option<RuleVariant>,
    /// Step size for the preference update, in (0, 1]. Defaults to 0.1.
    #[arg(long = ARG_LEARNING_RATE, value_name = "rate")]
    #[serde(default)]
    pub(crate) learning_rate: Option<f64>,
}

impl SessionArgs {
    pub(crate) fn into_config(self) -> Result<SessionConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SessionConfig::try_from(merged)
    }
}

/// Resolved `session` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SessionConfig {
    /// Answers supplied up front; the rest are asked for.
    pub(crate) answers: PersonaAnswers,
    /// Catalog, table and rule options.
    pub(crate) store: StoreConfig,
    /// Step size for the update.
    pub(crate) learning_rate: LearningRate,
}

impl TryFrom<SessionArgs> for SessionConfig {
    type Error = CliError;

    fn try_from(args: SessionArgs) -> Result<Self, Self::Error> {
        Ok(Self {
            answers: PersonaAnswers {
                budget: args.budget,
                fuel: args.fuel,
                transmission: args.transmission,
                space: args.space,
                usage: args.usage,
            },
            store: StoreConfig::resolve(args.catalog, args.preferences, args.store, args.variant),
            learning_rate: resolve_learning_rate(args.learning_rate)?,
        })
    }
}

pub(crate) fn run_session(args: SessionArgs) -> Result<(), CliError> {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    run_session_with(args, &mut stdin, &mut stdout)
}

pub(crate) fn run_session_with(
    args: SessionArgs,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.store.validate_sources()?;
    let catalog = config.store.load_catalog()?;
    let mut preferences = config.store.open_store()?;

    let mut session = Session::new();
    for field in PersonaField::ALL {
        if let Some(answer) = config.answers.get(field) {
            session.answer(field, answer);
        }
    }
    collect_answers(&mut session, input, output)?;

    let matcher = config.store.matcher();
    debug!("scoring the session under {} rules", matcher.variant());
    let ranking = session.score(&matcher, &catalog, preferences.table())?;
    write_ranking(output, ranking)?;

    writeln!(output, "{RATING_PROMPT}").map_err(CliError::WriteOutput)?;
    let Some(line) = read_line(input)? else {
        return Ok(());
    };
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let rating = parse_rating(trimmed)?;
    let updater = FeedbackUpdater::new(config.learning_rate);
    debug!(
        "applying rating {} at learning rate {}",
        rating.get(),
        updater.learning_rate().get()
    );
    rate(&mut session, &updater, preferences.as_mut(), rating)?;
    writeln!(output, "{THANKS}").map_err(CliError::WriteOutput)
}

fn collect_answers(
    session: &mut Session,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), CliError> {
    while let Some(field) = session.missing_fields().first().copied() {
        writeln!(output, "{}", field.prompt()).map_err(CliError::WriteOutput)?;
        let answer = read_line(input)?.ok_or(CliError::InputEnded {
            field: field.as_str(),
        })?;
        session.answer(field, answer.trim());
    }
    Ok(())
}

fn read_line(input: &mut dyn BufRead) -> Result<Option<String>, CliError> {
    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(CliError::ReadInput)?;
    Ok((read > 0).then_some(line))
}

fn parse_rating(raw: &str) -> Result<Rating, CliError> {
    let value = raw.parse::<u8>().map_err(|_| CliError::InvalidRatingText {
        raw: raw.to_owned(),
    })?;
    Ok(Rating::new(value)?)
}

fn write_ranking(output: &mut dyn Write, ranking: &Ranking) -> Result<(), CliError> {
    writeln!(output, "{HEADING}").map_err(CliError::WriteOutput)?;
    if !ranking.is_recommendation() {
        return writeln!(output, "{NO_MATCH}").map_err(CliError::WriteOutput);
    }
    for (position, car) in (1_usize..).zip(ranking.recommended()) {
        writeln!(output, "{position}. {} (score {:.2})", car.name, car.total)
            .map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

fn rate(
    session: &mut Session,
    updater: &FeedbackUpdater,
    store: &mut dyn PreferenceStore,
    rating: Rating,
) -> Result<(), CliError> {
    match session.rate(updater, store, rating) {
        Ok(_) => Ok(()),
        Err(SessionError::Feedback(FeedbackError::Persist { outcome, source })) => {
            warn!("rating for {} kept in memory only: {source}", outcome.car);
            Err(FeedbackError::Persist { outcome, source }.into())
        }
        Err(err) => Err(err.into()),
    }
}
