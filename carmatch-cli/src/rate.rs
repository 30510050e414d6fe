//! Rate command implementation for the carmatch CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use carmatch_core::{Matcher, Persona, PersonaField};
use carmatch_scorer::{FeedbackError, FeedbackUpdater, LearningRate, Rating, RuleVariant};
use clap::Parser;
use log::{debug, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::options::{
    PersonaAnswers, StoreBackend, StoreConfig, resolve_learning_rate, write_json,
};
use crate::{
    ARG_BUDGET, ARG_CATALOG, ARG_FUEL, ARG_LEARNING_RATE, ARG_PREFERENCES, ARG_RATING, ARG_SPACE,
    ARG_STORE, ARG_TRANSMISSION, ARG_USAGE, ARG_VARIANT, CliError, ENV_RATE_RATING,
};

/// CLI arguments for the `rate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the catalog for the persona, credit the top car with \
                 the rating and persist the updated preference table. \
                 Ratings of 3 or more count as positive.",
    about = "Rate the top recommendation for a persona"
)]
#[ortho_config(prefix = "CARMATCH")]
pub(crate) struct RateArgs {
    /// Rating from 1 to 5.
    #[arg(value_name = ARG_RATING)]
    #[serde(default)]
    pub(crate) rating: Option<u8>,
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

impl RateArgs {
    pub(crate) fn into_config(self) -> Result<RateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RateConfig::try_from(merged)
    }
}

/// Resolved `rate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RateConfig {
    /// The validated rating.
    pub(crate) rating: Rating,
    /// The persona whose top car is rated.
    pub(crate) persona: Persona,
    /// Catalog, table and rule options.
    pub(crate) store: StoreConfig,
    /// Step size for the update.
    pub(crate) learning_rate: LearningRate,
}

impl TryFrom<RateArgs> for RateConfig {
    type Error = CliError;

    fn try_from(args: RateArgs) -> Result<Self, Self::Error> {
        let raw_rating = args.rating.ok_or(CliError::MissingArgument {
            field: ARG_RATING,
            env: ENV_RATE_RATING,
        })?;
        let answers = PersonaAnswers {
            budget: args.budget,
            fuel: args.fuel,
            transmission: args.transmission,
            space: args.space,
            usage: args.usage,
        };
        Ok(Self {
            rating: Rating::new(raw_rating)?,
            persona: answers.into_persona(persona_env)?,
            store: StoreConfig::resolve(args.catalog, args.preferences, args.store, args.variant),
            learning_rate: resolve_learning_rate(args.learning_rate)?,
        })
    }
}

pub(crate) const fn persona_env(field: PersonaField) -> &'static str {
    match field {
        PersonaField::Budget => "CARMATCH_CMDS_RATE_BUDGET",
        PersonaField::Fuel => "CARMATCH_CMDS_RATE_FUEL",
        PersonaField::Transmission => "CARMATCH_CMDS_RATE_TRANSMISSION",
        PersonaField::Space => "CARMATCH_CMDS_RATE_SPACE",
        PersonaField::Usage => "CARMATCH_CMDS_RATE_USAGE",
    }
}

pub(crate) fn run_rate(args: RateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_rate_with(args, &mut stdout)
}

/// Rank, rate and print the outcome.
///
/// An update that could not be persisted is still printed before the error is
/// returned.
pub(crate) fn run_rate_with(args: RateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.store.validate_sources()?;

    let catalog = config.store.load_catalog()?;
    let mut preferences = config.store.open_store()?;
    let matcher = config.store.matcher();
    let ranking = matcher.rank(&config.persona, &catalog, preferences.table())?;
    let updater = FeedbackUpdater::new(config.learning_rate);
    debug!(
        "rating {} under {} rules at learning rate {}",
        config.persona.key(),
        matcher.variant(),
        updater.learning_rate().get()
    );
    match updater.rate_top(
        preferences.as_mut(),
        &config.persona,
        &ranking,
        config.rating,
    ) {
        Ok(outcome) => write_json(writer, &outcome),
        Err(FeedbackError::Persist { outcome, source }) => {
            warn!(
                "could not persist preferences to {}: {source}",
                config.store.preferences
            );
            write_json(writer, &outcome)?;
            Err(FeedbackError::Persist { outcome, source }.into())
        }
        Err(err) => Err(err.into()),
    }
}
