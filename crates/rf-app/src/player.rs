use anyhow::{Context, Result};

use rf_core::config::{AppConfig, PlayConfig, load_config};
use rf_core::pattern::Pattern;
use rf_core::rfdat;
use rf_core::traits::{Gpio, PinMode};

use crate::cli::PlayerCli;

/// Résout la configuration : défauts < fichier TOML < flags CLI, puis valide.
///
/// # Errors
/// Returns an error if the config file is unreadable or a value is out of
/// range.
pub fn resolve_play_config(cli: &PlayerCli) -> Result<PlayConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => load_config(path)?.play,
        None => AppConfig::default().play,
    };

    if let Some(v) = cli.pin {
        config.pin = v;
    }
    if let Some(v) = cli.playtime {
        config.playtime_ms = v;
    }

    config.validate()?;
    Ok(config)
}

/// Rejoue le motif en boucle jusqu'à écoulement du temps de jeu total.
///
/// Chaque passe rejoue le motif entier ; le temps restant n'est vérifié
/// qu'entre deux passes complètes.
pub fn replay<G: Gpio>(gpio: &mut G, pin: u8, pattern: &Pattern, playtime_us: u64) {
    let start = gpio.monotonic_micros();

    while gpio.monotonic_micros().saturating_sub(start) < playtime_us {
        for (on, off) in pattern.pairs() {
            gpio.write_level(pin, true);
            block_micros(gpio, u64::from(on));
            gpio.write_level(pin, false);
            block_micros(gpio, u64::from(off));
        }
    }
}

/// Attente active : boucle sur l'horloge monotone pendant `us` microsecondes.
///
/// Le rejeu exige une précision à la dizaine de µs près, qu'un sleep système
/// n'offre pas sur un noyau non temps-réel.
fn block_micros<G: Gpio>(gpio: &G, us: u64) {
    let start = gpio.monotonic_micros();
    while gpio.monotonic_micros().saturating_sub(start) < us {}
}

/// Point d'entrée du lecteur.
///
/// # Errors
/// Returns an error on invalid configuration, unreadable pattern file, or
/// hardware setup failure.
pub fn run(cli: &PlayerCli) -> Result<()> {
    let config = resolve_play_config(cli)?;

    let pattern = rfdat::read_pattern(&cli.file)
        .with_context(|| format!("Lecture de {} impossible", cli.file.display()))?;
    log::info!(
        "motif de {} paires, rejeu {} ms sur broche {}",
        pattern.pair_count(),
        config.playtime_ms,
        config.pin
    );

    let mut gpio = rf_gpio::open_default()?;
    gpio.set_pin_mode(config.pin, PinMode::Output)?;

    replay(
        &mut gpio,
        config.pin,
        &pattern,
        u64::from(config.playtime_ms) * 1_000,
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use rf_gpio::MockGpio;

    #[test]
    fn replay_toggles_output_with_pattern_timing() {
        let mut gpio = MockGpio::new(1);
        let pattern = Pattern::new(vec![100, 200]);

        // Temps de jeu : 500 µs → deux passes complètes (300 µs chacune)
        replay(&mut gpio, 0, &pattern, 500);

        let writes = gpio.writes();
        assert_eq!(writes.len(), 4, "deux passes de une paire");
        assert!(writes.iter().all(|&(_, pin, _)| pin == 0));

        // Alternance haut/bas
        let levels: Vec<bool> = writes.iter().map(|&(_, _, level)| level).collect();
        assert_eq!(levels, vec![true, false, true, false]);

        // Espacement : ~100 µs haut puis ~200 µs bas (tolérance de tick)
        let high_us = writes[1].0 - writes[0].0;
        let low_us = writes[2].0 - writes[1].0;
        assert!((98..=104).contains(&high_us), "ON ~100 µs, mesuré {high_us}");
        assert!((198..=204).contains(&low_us), "OFF ~200 µs, mesuré {low_us}");
    }

    #[test]
    fn replay_with_zero_playtime_writes_nothing() {
        let mut gpio = MockGpio::new(1);
        let pattern = Pattern::new(vec![100, 200]);

        replay(&mut gpio, 0, &pattern, 0);
        assert!(gpio.writes().is_empty());
    }

    #[test]
    fn play_config_cli_overrides() {
        let cli =
            PlayerCli::try_parse_from(["rfplayer", "code.rfdat", "-p", "4", "-t", "1500"]).unwrap();
        let config = resolve_play_config(&cli).unwrap();
        assert_eq!(config.pin, 4);
        assert_eq!(config.playtime_ms, 1_500);
    }

    #[test]
    fn play_config_rejects_bad_pin() {
        let cli = PlayerCli::try_parse_from(["rfplayer", "code.rfdat", "-p", "64"]).unwrap();
        assert!(resolve_play_config(&cli).is_err());
    }
}
