use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

use rf_core::timing::round_down_us;
use rf_core::traits::{Gpio, LevelSampler, PinMode};
use rf_gpio::PinSampler;

use crate::cli::ScannerCli;

/// Boucle de scan : rapporte chaque transition avec la durée du niveau
/// précédent, arrondie à la granularité de capture.
///
/// Le premier front montant est supprimé (impulsion partielle de tête,
/// d'origine inconnue). Le rapport reçoit le nouveau niveau et la durée
/// écoulée : `(true, 800)` se lit « passage à ON après 800 µs bas ».
pub fn run_scan<S, F, R>(sampler: &mut S, stop: F, mut report: R)
where
    S: LevelSampler,
    F: Fn() -> bool,
    R: FnMut(bool, u32),
{
    let mut last_high = false;
    let mut last_change_us = 0u64;
    let mut first = true;

    while !stop() {
        let sample = sampler.sample();
        if sample.high == last_high {
            continue;
        }

        let elapsed = round_down_us(sample.at_us.saturating_sub(last_change_us));
        last_high = sample.high;
        last_change_us = sample.at_us;

        if first && sample.high {
            first = false;
            continue;
        }

        report(sample.high, elapsed);
    }
}

/// Point d'entrée du scanner.
///
/// # Errors
/// Returns an error on invalid pin or hardware setup failure.
pub fn run(cli: &ScannerCli) -> Result<()> {
    if cli.pin >= 64 {
        anyhow::bail!("Configuration invalide : pin doit être < 64 (reçu {})", cli.pin);
    }

    let mut gpio = rf_gpio::open_default()?;
    gpio.set_pin_mode(cli.pin, PinMode::Input)?;
    let mut sampler = PinSampler::new(gpio, cli.pin);

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("Installation du handler Ctrl-C impossible")?;

    println!("Scanning...");
    run_scan(
        &mut sampler,
        || stop.load(Ordering::Relaxed),
        |high, elapsed| {
            println!("{} for {elapsed} usec", if high { "ON " } else { "OFF" });
        },
    );

    Ok(())
}
