/// Direction d'une broche GPIO.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    /// Lecture de niveau.
    Input,
    /// Écriture de niveau.
    Output,
}

/// Accès matériel minimal requis par les outils.
///
/// Implémenté par : `MockGpio` (tests, déterministe) et `RaspiGpio`
/// (Raspberry Pi, feature `raspi`). Le cœur ne dépend jamais d'un binding
/// matériel précis, uniquement de ces opérations. L'initialisation du
/// sous-système (l'équivalent de `setup()`) est portée par les constructeurs
/// des backends, qui sont faillibles.
///
/// # Example
/// ```
/// use rf_core::traits::{Gpio, PinMode};
///
/// struct DummyGpio;
/// impl Gpio for DummyGpio {
///     fn set_pin_mode(&mut self, _pin: u8, _mode: PinMode) -> anyhow::Result<()> { Ok(()) }
///     fn read_level(&mut self, _pin: u8) -> bool { false }
///     fn write_level(&mut self, _pin: u8, _level: bool) {}
///     fn monotonic_micros(&self) -> u64 { 0 }
/// }
/// ```
pub trait Gpio {
    /// Configure la direction d'une broche.
    ///
    /// # Errors
    /// Returns an error if the pin cannot be claimed or configured.
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> anyhow::Result<()>;

    /// Niveau courant de la broche. `true` = haut.
    ///
    /// CONTRAT : ne bloque JAMAIS — une lecture est un échantillon instantané.
    fn read_level(&mut self, pin: u8) -> bool;

    /// Force le niveau d'une broche de sortie.
    fn write_level(&mut self, pin: u8, level: bool);

    /// Horloge monotone, en microsecondes depuis une origine arbitraire.
    fn monotonic_micros(&self) -> u64;
}

/// Une observation : niveau de ligne et date monotone de la lecture.
#[derive(Clone, Copy, Debug)]
pub struct LevelSample {
    /// `true` = niveau haut.
    pub high: bool,
    /// Date de la lecture, µs monotones.
    pub at_us: u64,
}

/// Fournit le flux d'observations (niveau, date) consommé par la boucle de
/// capture.
///
/// Isoler le busy-wait derrière ce trait permet de substituer plus tard un
/// échantillonnage par interruption sans toucher ni à l'extracteur ni au
/// collecteur.
///
/// # Example
/// ```
/// use rf_core::traits::{LevelSample, LevelSampler};
///
/// struct DummySampler;
/// impl LevelSampler for DummySampler {
///     fn sample(&mut self) -> LevelSample {
///         LevelSample { high: false, at_us: 0 }
///     }
/// }
/// ```
pub trait LevelSampler {
    /// Lit le niveau courant et le date. Un appel = une itération de poll.
    fn sample(&mut self) -> LevelSample;
}
