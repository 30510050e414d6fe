//! Recommend command implementation for the carmatch CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use carmatch_core::{Matcher, Persona, PersonaField, PersonaKey, RankedCar, Ranking};
use carmatch_scorer::RuleVariant;
use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::options::{PersonaAnswers, StoreBackend, StoreConfig, write_json};
use crate::{
    ARG_BUDGET, ARG_CATALOG, ARG_FUEL, ARG_PREFERENCES, ARG_SPACE, ARG_STORE, ARG_TRANSMISSION,
    ARG_USAGE, ARG_VARIANT, CliError,
};

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the catalog against the five persona answers and print \
                 the top three cars as JSON. Answers and paths can come from \
                 CLI flags, configuration files, or environment variables.",
    about = "Rank the catalog for a persona"
)]
#[ortho_config(prefix = "CARMATCH")]
pub(crate) struct RecommendArgs {
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
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    /// The persona to rank for.
    pub(crate) persona: Persona,
    /// Catalog, table and rule options.
    pub(crate) store: StoreConfig,
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let answers = PersonaAnswers {
            budget: args.budget,
            fuel: args.fuel,
            transmission: args.transmission,
            space: args.space,
            usage: args.usage,
        };
        Ok(Self {
            persona: answers.into_persona(persona_env)?,
            store: StoreConfig::resolve(args.catalog, args.preferences, args.store, args.variant),
        })
    }
}

pub(crate) const fn persona_env(field: PersonaField) -> &'static str {
    match field {
        PersonaField::Budget => "CARMATCH_CMDS_RECOMMEND_BUDGET",
        PersonaField::Fuel => "CARMATCH_CMDS_RECOMMEND_FUEL",
        PersonaField::Transmission => "CARMATCH_CMDS_RECOMMEND_TRANSMISSION",
        PersonaField::Space => "CARMATCH_CMDS_RECOMMEND_SPACE",
        PersonaField::Usage => "CARMATCH_CMDS_RECOMMEND_USAGE",
    }
}

/// JSON document printed by `recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RecommendationReport {
    /// Key under which ratings for this persona are stored.
    pub(crate) persona_key: PersonaKey,
    /// Whether any ranked car reached the recommendation threshold.
    pub(crate) recommended: bool,
    /// Up to three ranked cars, best first.
    pub(crate) cars: Vec<ReportedCar>,
}

/// One ranked car in a [`RecommendationReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ReportedCar {
    pub(crate) name: String,
    pub(crate) rule_score: u8,
    pub(crate) adjustment: f64,
    pub(crate) total: f64,
    pub(crate) recommended: bool,
}

impl From<&RankedCar> for ReportedCar {
    fn from(car: &RankedCar) -> Self {
        Self {
            name: car.name.clone(),
            rule_score: car.rule_score,
            adjustment: car.adjustment,
            total: car.total,
            recommended: car.is_recommended(),
        }
    }
}

impl RecommendationReport {
    pub(crate) fn new(persona: &Persona, ranking: &Ranking) -> Self {
        Self {
            persona_key: persona.key(),
            recommended: ranking.is_recommendation(),
            cars: ranking.iter().map(ReportedCar::from).collect(),
        }
    }
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_with(args, &mut stdout)
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_recommend_config(args)?;
    let ranking = rank_persona(&config.persona, &config.store)?;
    write_json(writer, &RecommendationReport::new(&config.persona, &ranking))
}

fn resolve_recommend_config(args: RecommendArgs) -> Result<RecommendConfig, CliError> {
    let config = args.into_config()?;
    config.store.validate_sources()?;
    Ok(config)
}

/// Load the catalog and table named by `store` and rank `persona`.
pub(crate) fn rank_persona(persona: &Persona, store: &StoreConfig) -> Result<Ranking, CliError> {
    let catalog = store.load_catalog()?;
    let preferences = store.open_store()?;
    let ranking = store
        .matcher()
        .rank(persona, &catalog, preferences.table())?;
    debug!(
        "ranked {} of {} cars from {}",
        ranking.len(),
        catalog.len(),
        store.catalog
    );
    Ok(ranking)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
