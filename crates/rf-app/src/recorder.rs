use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

use rf_capture::capture::{CaptureEvent, EdgeCapture};
use rf_capture::consensus::{SampleCollector, Verdict};
use rf_capture::extract::extract;
use rf_core::config::{AppConfig, RecordConfig, load_config};
use rf_core::pattern::Pattern;
use rf_core::rfdat;
use rf_core::traits::{Gpio, LevelSampler, PinMode};
use rf_gpio::PinSampler;

use crate::cli::RecorderCli;

/// Résout la configuration : défauts < fichier TOML < flags CLI, puis valide.
///
/// # Errors
/// Returns an error if the config file is unreadable or a value is out of
/// range, whatever its origin.
pub fn resolve_record_config(cli: &RecorderCli) -> Result<RecordConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => load_config(path)?.record,
        None => AppConfig::default().record,
    };

    if let Some(v) = cli.pin {
        config.pin = v;
    }
    if let Some(v) = cli.buffer_size {
        config.buffer_pairs = v;
    }
    if let Some(v) = cli.record_samples {
        config.record_samples = v;
    }
    if let Some(v) = cli.record_failures {
        config.record_failures = v;
    }

    config.validate()?;
    Ok(config)
}

/// Nom de fichier par défaut : heure locale compacte + extension.
#[must_use]
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "{}.{}",
        chrono::Local::now().format("%Y%m%d%H%M%S"),
        rfdat::RFDAT_EXT
    ))
}

/// Boucle de session complète : capture → extraction → consensus.
///
/// Tourne jusqu'à ce que le collecteur atteigne sa cible, puis rend le motif
/// canonique et son score. `None` si `stop` passe à vrai avant la fin ;
/// l'annulation est vérifiée une fois par itération de poll.
pub fn capture_session<S, F>(
    sampler: &mut S,
    config: &RecordConfig,
    stop: F,
) -> Option<(Pattern, usize)>
where
    S: LevelSampler,
    F: Fn() -> bool,
{
    let mut capture = EdgeCapture::new(config.buffer_pairs);
    let mut collector = SampleCollector::new(config.record_samples, config.record_failures);

    while !collector.is_complete() {
        if stop() {
            return None;
        }

        match capture.poll(sampler.sample()) {
            CaptureEvent::BufferFull => {
                if let Some(pattern) = extract(capture.buffer()) {
                    let len = pattern.len();
                    let target = collector.target();
                    match collector.offer(pattern) {
                        Verdict::Accepted { collected } => {
                            println!("Received sample ({len}) {collected}/{target}...");
                        }
                        Verdict::LengthMismatch { .. } => {
                            println!(
                                "Received invalid sample ({len}) {}/{target}...",
                                collector.collected()
                            );
                        }
                        Verdict::Restarted => {
                            println!("Failed! Restarting...");
                        }
                    }
                } else {
                    log::debug!("buffer plein sans blob qualifié, capture poursuivie");
                }
                capture.rearm();
            }
            CaptureEvent::TimedOut => {
                log::debug!("fin de transmission : silence bas prolongé");
            }
            _ => {}
        }
    }

    collector.into_best()
}

/// Point d'entrée de l'enregistreur.
///
/// # Errors
/// Returns an error on invalid configuration, hardware setup failure, or
/// file write failure.
pub fn run(cli: &RecorderCli) -> Result<()> {
    let config = resolve_record_config(cli)?;

    let mut gpio = rf_gpio::open_default()?;
    gpio.set_pin_mode(config.pin, PinMode::Input)?;
    let mut sampler = PinSampler::new(gpio, config.pin);

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("Installation du handler Ctrl-C impossible")?;

    println!("Recording...");
    let Some((pattern, score)) = capture_session(&mut sampler, &config, || {
        stop.load(Ordering::Relaxed)
    }) else {
        anyhow::bail!("Interrompu avant la fin de la collecte");
    };

    println!("Done! Sample:");
    for (on, off) in pattern.pairs() {
        println!(">>> ON for {on} usec, OFF for {off} usec");
    }
    println!();
    // Le score compte les AUTRES membres concordants ; un motif se matche
    // toujours lui-même, d'où le +1 sur n.
    println!(
        "Sample has a score of {:.2}%.",
        (score + 1) as f64 / f64::from(config.record_samples) * 100.0
    );

    let path = cli.output.clone().unwrap_or_else(default_output_path);
    rfdat::write_pattern(&path, &pattern)
        .with_context(|| format!("Écriture de {} impossible", path.display()))?;
    println!("Saved to {}!", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::cell::Cell;
    use std::io::Write;

    use rf_gpio::MockGpio;

    /// Blob de 6 paires, gap inter-blobs en dernière position.
    const BLOB: [u32; 12] = [
        500, 1_500, 500, 1_500, 1_000, 500, 500, 500, 1_000, 1_500, 500, 9_000,
    ];

    /// Prédicat d'arrêt de secours : borne le nombre d'itérations de poll
    /// pour qu'un test ne puisse pas boucler indéfiniment.
    fn poll_budget(limit: u64) -> impl Fn() -> bool {
        let left = Cell::new(limit);
        move || {
            let remaining = left.get();
            left.set(remaining.saturating_sub(1));
            remaining == 0
        }
    }

    #[test]
    fn end_to_end_session_over_mock_gpio() {
        let mut gpio = MockGpio::new(1);
        gpio.push_pulse_train(1_000, &BLOB, 12);
        let mut sampler = PinSampler::new(gpio, 2);

        let config = RecordConfig {
            pin: 2,
            buffer_pairs: 24,
            record_samples: 2,
            record_failures: 2,
        };

        let (pattern, score) = capture_session(&mut sampler, &config, poll_budget(2_000_000))
            .expect("la session doit aboutir avant épuisement de la timeline");

        assert_eq!(pattern.len(), BLOB.len());
        assert!(
            rf_core::timing::near_match_blob(pattern.as_slice(), &BLOB),
            "le motif élu doit matcher le blob simulé à la tolérance près"
        );
        // Deux échantillons concordants : chacun matche l'autre
        assert_eq!(score, 1);
    }

    #[test]
    fn session_stops_on_cancellation() {
        // Ligne muette : sans annulation, la boucle ne terminerait jamais
        let gpio = MockGpio::new(1);
        let mut sampler = PinSampler::new(gpio, 2);
        let config = RecordConfig::default();

        assert!(capture_session(&mut sampler, &config, poll_budget(1_000)).is_none());
    }

    #[test]
    fn config_resolution_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rfpulse.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[record]\npin = 5\nbuffer_pairs = 100").unwrap();
        drop(f);

        let cli = RecorderCli::try_parse_from([
            "rfrecorder",
            "--config",
            path.to_str().unwrap(),
            "-p",
            "9",
        ])
        .unwrap();

        let config = resolve_record_config(&cli).unwrap();
        assert_eq!(config.pin, 9, "le flag CLI prime sur le fichier");
        assert_eq!(config.buffer_pairs, 100, "le fichier prime sur le défaut");
        assert_eq!(config.record_samples, 5, "défaut conservé");
    }

    #[test]
    fn out_of_range_cli_value_is_a_usage_error() {
        let cli = RecorderCli::try_parse_from(["rfrecorder", "--buffer-size", "1"]).unwrap();
        assert!(resolve_record_config(&cli).is_err());
    }

    #[test]
    fn default_output_path_has_rfdat_extension() {
        let path = default_output_path();
        assert_eq!(path.extension().unwrap(), "rfdat");
        // YYYYMMDDHHMMSS : 14 chiffres
        assert_eq!(path.file_stem().unwrap().len(), 14);
    }
}
