use std::cell::Cell;

use rf_core::traits::{Gpio, PinMode};

/// Backend GPIO déterministe pour les tests.
///
/// La ligne d'entrée rejoue une timeline de changements de niveau datés ;
/// l'horloge monotone est virtuelle et avance de `tick_us` à chaque accès
/// matériel (lecture de niveau ou d'horloge), ce qui modélise le coût d'une
/// itération de poll. Les écritures sont enregistrées, datées, pour
/// vérification.
///
/// # Example
/// ```
/// use rf_core::traits::Gpio;
/// use rf_gpio::mock::MockGpio;
///
/// let mut gpio = MockGpio::new(1);
/// gpio.push_change(1_000, true);
/// assert!(!gpio.read_level(2)); // avant 1 000 µs : niveau bas
/// ```
pub struct MockGpio {
    /// Horloge virtuelle. Cell : la capture est mono-thread, une lecture
    /// d'horloge fait quand même avancer le temps simulé.
    now_us: Cell<u64>,
    /// Avance de l'horloge par accès matériel.
    tick_us: u64,
    /// Changements de niveau de la ligne d'entrée, datés, triés.
    timeline: Vec<(u64, bool)>,
    /// Écritures enregistrées : (date, broche, niveau).
    writes: Vec<(u64, u8, bool)>,
    /// Modes configurés : (broche, mode).
    modes: Vec<(u8, PinMode)>,
}

impl MockGpio {
    /// Crée un mock dont l'horloge avance de `tick_us` par accès.
    #[must_use]
    pub fn new(tick_us: u64) -> Self {
        Self {
            now_us: Cell::new(0),
            tick_us,
            timeline: Vec::new(),
            writes: Vec::new(),
            modes: Vec::new(),
        }
    }

    /// Ajoute un changement de niveau daté sur la ligne d'entrée.
    ///
    /// Les changements doivent être ajoutés par dates croissantes.
    pub fn push_change(&mut self, at_us: u64, high: bool) {
        debug_assert!(
            self.timeline.last().is_none_or(|&(t, _)| t <= at_us),
            "timeline non triée"
        );
        self.timeline.push((at_us, high));
    }

    /// Rejoue un train d'impulsions : montée à `start_us`, puis alternance
    /// selon les paires (ON, OFF) de `pattern`, répétée `reps` fois.
    pub fn push_pulse_train(&mut self, start_us: u64, pattern: &[u32], reps: usize) {
        let mut t = start_us;
        self.push_change(t, true);
        for _ in 0..reps {
            for pair in pattern.chunks_exact(2) {
                t += u64::from(pair[0]);
                self.push_change(t, false);
                t += u64::from(pair[1]);
                self.push_change(t, true);
            }
        }
        // La ligne retombe après la dernière montée de fin de gap.
        t += u64::from(pattern.first().copied().unwrap_or(0));
        self.push_change(t, false);
    }

    /// Écritures enregistrées, dans l'ordre : (date µs, broche, niveau).
    #[must_use]
    pub fn writes(&self) -> &[(u64, u8, bool)] {
        &self.writes
    }

    /// Configurations de broche enregistrées, dans l'ordre.
    #[must_use]
    pub fn modes(&self) -> &[(u8, PinMode)] {
        &self.modes
    }

    fn tick(&self) -> u64 {
        let now = self.now_us.get() + self.tick_us;
        self.now_us.set(now);
        now
    }
}

impl Gpio for MockGpio {
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> anyhow::Result<()> {
        self.modes.push((pin, mode));
        Ok(())
    }

    fn read_level(&mut self, _pin: u8) -> bool {
        let now = self.tick();
        self.timeline
            .iter()
            .take_while(|&&(t, _)| t <= now)
            .last()
            .is_some_and(|&(_, high)| high)
    }

    fn write_level(&mut self, pin: u8, level: bool) {
        let now = self.now_us.get();
        self.writes.push((now, pin, level));
    }

    fn monotonic_micros(&self) -> u64 {
        self.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_line_follows_timeline() {
        let mut gpio = MockGpio::new(10);
        gpio.push_change(25, true);
        gpio.push_change(65, false);

        assert!(!gpio.read_level(2)); // t = 10
        assert!(!gpio.read_level(2)); // t = 20
        assert!(gpio.read_level(2)); // t = 30
        assert!(gpio.read_level(2)); // t = 40
        assert!(gpio.read_level(2)); // t = 50
        assert!(gpio.read_level(2)); // t = 60
        assert!(!gpio.read_level(2)); // t = 70
    }

    #[test]
    fn clock_advances_on_every_access() {
        let gpio = MockGpio::new(3);
        assert_eq!(gpio.monotonic_micros(), 3);
        assert_eq!(gpio.monotonic_micros(), 6);
    }

    #[test]
    fn pin_modes_are_recorded() {
        let mut gpio = MockGpio::new(1);
        gpio.set_pin_mode(2, PinMode::Input).unwrap();
        gpio.set_pin_mode(0, PinMode::Output).unwrap();
        assert_eq!(gpio.modes(), &[(2, PinMode::Input), (0, PinMode::Output)]);
    }

    #[test]
    fn writes_are_recorded_with_timestamps() {
        let mut gpio = MockGpio::new(5);
        let _ = gpio.monotonic_micros(); // t = 5
        gpio.write_level(0, true);
        let _ = gpio.monotonic_micros(); // t = 10
        gpio.write_level(0, false);

        assert_eq!(gpio.writes(), &[(5, 0, true), (10, 0, false)]);
    }

    #[test]
    fn pulse_train_builds_alternating_timeline() {
        let mut gpio = MockGpio::new(1);
        gpio.push_pulse_train(100, &[500, 1_000], 2);
        // montée, puis 2 × (descente après ON, montée après OFF), descente finale
        assert_eq!(
            gpio.timeline,
            vec![
                (100, true),
                (600, false),
                (1_600, true),
                (2_100, false),
                (3_100, true),
                (3_600, false),
            ]
        );
    }
}
