use std::collections::HashMap;
use std::time::Instant;

use anyhow::Context;
use rppal::gpio::{Gpio as RppalGpio, IoPin, Level, Mode};

use rf_core::traits::{Gpio, PinMode};

/// Backend Raspberry Pi, via le périphérique GPIO du BCM283x/BCM2711.
///
/// Chaque broche est réclamée à la première configuration puis conservée
/// pour la durée de vie du backend. L'horloge monotone est l'`Instant`
/// d'ouverture.
pub struct RaspiGpio {
    chip: RppalGpio,
    pins: HashMap<u8, IoPin>,
    origin: Instant,
}

impl RaspiGpio {
    /// Initialise le sous-système GPIO.
    ///
    /// # Errors
    /// Returns the underlying system error if the GPIO device cannot be
    /// opened (permissions, hardware absent).
    pub fn open() -> anyhow::Result<Self> {
        let chip = RppalGpio::new().context("Initialisation du GPIO impossible")?;
        Ok(Self {
            chip,
            pins: HashMap::new(),
            origin: Instant::now(),
        })
    }
}

impl Gpio for RaspiGpio {
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> anyhow::Result<()> {
        let target = match mode {
            PinMode::Input => Mode::Input,
            PinMode::Output => Mode::Output,
        };

        if let Some(io) = self.pins.get_mut(&pin) {
            io.set_mode(target);
            return Ok(());
        }

        let io = self
            .chip
            .get(pin)
            .with_context(|| format!("Broche GPIO {pin} indisponible"))?
            .into_io(target);
        self.pins.insert(pin, io);
        Ok(())
    }

    fn read_level(&mut self, pin: u8) -> bool {
        match self.pins.get(&pin) {
            Some(io) => io.is_high(),
            None => {
                log::error!("lecture sur broche non configurée : {pin}");
                false
            }
        }
    }

    fn write_level(&mut self, pin: u8, level: bool) {
        match self.pins.get_mut(&pin) {
            Some(io) => io.write(if level { Level::High } else { Level::Low }),
            None => log::error!("écriture sur broche non configurée : {pin}"),
        }
    }

    fn monotonic_micros(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}
