// GPIO backends for rfpulse, behind the rf-core hardware traits.

pub mod mock;
#[cfg(feature = "raspi")]
pub mod raspi;
pub mod sampler;

pub use mock::MockGpio;
#[cfg(feature = "raspi")]
pub use raspi::RaspiGpio;
pub use sampler::PinSampler;

/// Ouvre le backend matériel par défaut.
///
/// # Errors
/// Returns an error if the GPIO subsystem cannot be initialized.
#[cfg(feature = "raspi")]
pub fn open_default() -> anyhow::Result<raspi::RaspiGpio> {
    raspi::RaspiGpio::open()
}

/// Ouvre le backend matériel par défaut.
///
/// # Errors
/// Always fails: hardware support is not compiled in. Rebuild with
/// `--features raspi` on a Raspberry Pi.
#[cfg(not(feature = "raspi"))]
pub fn open_default() -> anyhow::Result<mock::MockGpio> {
    anyhow::bail!("Support matériel non compilé. Rebuilder avec --features raspi")
}
