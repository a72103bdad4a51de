use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Configuration de l'enregistreur.
///
/// Sérialisable en TOML (section `[record]`). Chaque champ a une valeur par
/// défaut saine, reprise des défauts historiques de l'outil.
///
/// # Example
/// ```
/// use rf_core::config::RecordConfig;
/// let config = RecordConfig::default();
/// assert_eq!(config.pin, 2);
/// assert_eq!(config.buffer_pairs, 250);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RecordConfig {
    /// Broche d'entrée GPIO. `0 ≤ pin < 64`.
    pub pin: u8,
    /// Capacité du buffer de capture en paires (ON, OFF). `≥ 2`.
    pub buffer_pairs: u32,
    /// Nombre d'échantillons concordants à collecter. `1 ≤ n < 256`.
    pub record_samples: u32,
    /// Nombre d'échantillons discordants tolérés avant de tout rejeter. `≥ 1`.
    pub record_failures: u32,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            pin: 2,
            buffer_pairs: 250,
            record_samples: 5,
            record_failures: 2,
        }
    }
}

impl RecordConfig {
    /// Vérifie les bornes de chaque champ.
    ///
    /// # Errors
    /// Returns a usage-style error naming the offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.pin >= 64 {
            return Err(CoreError::Config(format!(
                "pin doit être < 64 (reçu {})",
                self.pin
            )));
        }
        if self.buffer_pairs < 2 {
            return Err(CoreError::Config(format!(
                "buffer_pairs doit être ≥ 2 (reçu {})",
                self.buffer_pairs
            )));
        }
        if self.record_samples < 1 || self.record_samples >= 256 {
            return Err(CoreError::Config(format!(
                "record_samples doit être dans [1, 255] (reçu {})",
                self.record_samples
            )));
        }
        if self.record_failures < 1 {
            return Err(CoreError::Config(format!(
                "record_failures doit être ≥ 1 (reçu {})",
                self.record_failures
            )));
        }
        Ok(())
    }
}

/// Configuration du lecteur.
///
/// Sérialisable en TOML (section `[play]`).
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayConfig {
    /// Broche de sortie GPIO. `0 ≤ pin < 64`.
    pub pin: u8,
    /// Durée totale de rejeu en millisecondes.
    pub playtime_ms: u32,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            pin: 0,
            playtime_ms: 500,
        }
    }
}

impl PlayConfig {
    /// Vérifie les bornes de chaque champ.
    ///
    /// # Errors
    /// Returns a usage-style error naming the offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.pin >= 64 {
            return Err(CoreError::Config(format!(
                "pin doit être < 64 (reçu {})",
                self.pin
            )));
        }
        Ok(())
    }
}

/// Configuration complète, une section par outil.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Section de l'enregistreur.
    pub record: RecordConfig,
    /// Section du lecteur.
    pub play: PlayConfig,
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    record: Option<RecordSection>,
    play: Option<PlaySection>,
}

/// Record section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RecordSection {
    pin: Option<u8>,
    buffer_pairs: Option<u32>,
    record_samples: Option<u32>,
    record_failures: Option<u32>,
}

/// Play section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct PlaySection {
    pin: Option<u8>,
    playtime_ms: Option<u32>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// La validation des bornes est faite par l'appelant, APRÈS application des
/// surcharges CLI, car une valeur hors bornes est une erreur d'usage quelle que
/// soit son origine.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use rf_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = AppConfig::default();

    if let Some(r) = file.record {
        if let Some(v) = r.pin {
            config.record.pin = v;
        }
        if let Some(v) = r.buffer_pairs {
            config.record.buffer_pairs = v;
        }
        if let Some(v) = r.record_samples {
            config.record.record_samples = v;
        }
        if let Some(v) = r.record_failures {
            config.record.record_failures = v;
        }
    }

    if let Some(p) = file.play {
        if let Some(v) = p.pin {
            config.play.pin = v;
        }
        if let Some(v) = p.playtime_ms {
            config.play.playtime_ms = v;
        }
    }

    log::debug!("configuration chargée depuis {}", path.display());
    Ok(config)
}
