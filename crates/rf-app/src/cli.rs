use std::path::PathBuf;

use clap::Parser;

/// rfrecorder : enregistre le code d'une télécommande RF depuis une broche GPIO.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct RecorderCli {
    /// Fichier de sortie. Défaut : YYYYMMDDHHMMSS.rfdat (heure locale).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Broche d'entrée GPIO (voir http://pinout.xyz). 0 ≤ n < 64.
    #[arg(short, long)]
    pub pin: Option<u8>,

    /// Capacité du buffer de capture, en paires d'impulsions. n ≥ 2.
    #[arg(long)]
    pub buffer_size: Option<u32>,

    /// Nombre d'échantillons concordants à collecter. 1 ≤ n < 256.
    #[arg(long)]
    pub record_samples: Option<u32>,

    /// Nombre d'échantillons discordants avant de tout rejeter. n ≥ 1.
    #[arg(long)]
    pub record_failures: Option<u32>,

    /// Fichier de configuration TOML (sections [record] et [play]).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// rfplayer : rejoue un motif .rfdat sur une broche de sortie GPIO.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct PlayerCli {
    /// Fichier .rfdat à rejouer.
    pub file: PathBuf,

    /// Broche de sortie GPIO. 0 ≤ n < 64.
    #[arg(short, long)]
    pub pin: Option<u8>,

    /// Durée totale de rejeu en millisecondes.
    #[arg(short = 't', long)]
    pub playtime: Option<u32>,

    /// Fichier de configuration TOML (sections [record] et [play]).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// rfscanner : affiche chaque transition de niveau d'une broche GPIO.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ScannerCli {
    /// Broche d'entrée GPIO. 0 ≤ n < 64.
    #[arg(short, long, default_value_t = 2)]
    pub pin: u8,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Parse la ligne de commande ; usage et aide sortent tous deux en code 1.
#[must_use]
pub fn parse_or_usage<T: Parser>() -> T {
    match T::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    }
}

/// Initialise le logging depuis le flag `--log-level`.
pub fn init_logging(level: &str) {
    env_logger::Builder::new()
        .filter_level(level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();
}
