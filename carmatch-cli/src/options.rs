//! Options shared by the subcommands: file locations, store backend, rule
//! variant and persona answers.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use carmatch_core::{
    Catalog, JsonPreferenceStore, Persona, PersonaField, PreferenceStore, load_catalog,
};
use carmatch_scorer::{AttributeMatcher, LearningRate, RuleVariant};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{ARG_CATALOG, CliError, DEFAULT_CATALOG, DEFAULT_PREFERENCES, DEFAULT_PREFERENCES_DB};

/// Backend holding the preference table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StoreBackend {
    /// A single JSON document.
    #[default]
    Json,
    /// A SQLite database.
    Sqlite,
}

/// Resolved locations and matching rules common to every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreConfig {
    /// Path to the car catalog.
    pub(crate) catalog: Utf8PathBuf,
    /// Path to the preference table.
    pub(crate) preferences: Utf8PathBuf,
    /// Backend used for the preference table.
    pub(crate) backend: StoreBackend,
    /// Rule set used by the matcher.
    pub(crate) variant: RuleVariant,
}

impl StoreConfig {
    /// Fill unset options with their defaults.
    pub(crate) fn resolve(
        catalog: Option<Utf8PathBuf>,
        preferences: Option<Utf8PathBuf>,
        backend: Option<StoreBackend>,
        variant: Option<RuleVariant>,
    ) -> Self {
        let backend = backend.unwrap_or_default();
        let preferences = preferences.unwrap_or_else(|| {
            Utf8PathBuf::from(match backend {
                StoreBackend::Json => DEFAULT_PREFERENCES,
                StoreBackend::Sqlite => DEFAULT_PREFERENCES_DB,
            })
        });
        Self {
            catalog: catalog.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CATALOG)),
            preferences,
            backend,
            variant: variant.unwrap_or_default(),
        }
    }

    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.catalog, ARG_CATALOG)
    }

    pub(crate) fn load_catalog(&self) -> Result<Catalog, CliError> {
        Ok(load_catalog(&self.catalog)?)
    }

    pub(crate) fn open_store(&self) -> Result<Box<dyn PreferenceStore>, CliError> {
        match self.backend {
            StoreBackend::Json => {
                let store = JsonPreferenceStore::open(self.preferences.clone())?;
                debug!("using JSON preference table at {}", store.path());
                Ok(Box::new(store))
            }
            StoreBackend::Sqlite => open_sqlite(&self.preferences),
        }
    }

    pub(crate) const fn matcher(&self) -> AttributeMatcher {
        AttributeMatcher::with_variant(self.variant)
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite(path: &Utf8Path) -> Result<Box<dyn PreferenceStore>, CliError> {
    let store = carmatch_core::SqlitePreferenceStore::open(path.to_path_buf())?;
    debug!("using SQLite preference table at {}", store.path());
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite(_path: &Utf8Path) -> Result<Box<dyn PreferenceStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "opening a SQLite preference table",
    })
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match carmatch_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn resolve_learning_rate(raw: Option<f64>) -> Result<LearningRate, CliError> {
    Ok(raw.map_or(Ok(LearningRate::default()), LearningRate::new)?)
}

/// Persona answers as supplied through flags, environment or files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PersonaAnswers {
    pub(crate) budget: Option<String>,
    pub(crate) fuel: Option<String>,
    pub(crate) transmission: Option<String>,
    pub(crate) space: Option<String>,
    pub(crate) usage: Option<String>,
}

impl PersonaAnswers {
    fn take(&mut self, field: PersonaField) -> Option<String> {
        match field {
            PersonaField::Budget => self.budget.take(),
            PersonaField::Fuel => self.fuel.take(),
            PersonaField::Transmission => self.transmission.take(),
            PersonaField::Space => self.space.take(),
            PersonaField::Usage => self.usage.take(),
        }
    }

    pub(crate) fn get(&self, field: PersonaField) -> Option<&str> {
        match field {
            PersonaField::Budget => self.budget.as_deref(),
            PersonaField::Fuel => self.fuel.as_deref(),
            PersonaField::Transmission => self.transmission.as_deref(),
            PersonaField::Space => self.space.as_deref(),
            PersonaField::Usage => self.usage.as_deref(),
        }
    }

    /// Require all five answers.
    ///
    /// `env` names the environment variable reported for a missing field.
    pub(crate) fn into_persona(
        mut self,
        env: fn(PersonaField) -> &'static str,
    ) -> Result<Persona, CliError> {
        let mut answer = |field: PersonaField| {
            self.take(field)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| CliError::MissingArgument {
                    field: field.as_str(),
                    env: env(field),
                })
        };
        Ok(Persona::new(
            answer(PersonaField::Budget)?,
            answer(PersonaField::Fuel)?,
            answer(PersonaField::Transmission)?,
            answer(PersonaField::Space)?,
            answer(PersonaField::Usage)?,
        )?)
    }
}

pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
