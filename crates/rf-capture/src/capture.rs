use rf_core::timing::round_down_us;
use rf_core::traits::LevelSample;

use crate::buffer::CaptureBuffer;

/// Temps bas (µs) au-delà duquel la transmission est considérée terminée.
pub const CAPTURE_TIMEOUT_US: u64 = 1_000_000;

/// Nombre minimal de paires enregistrées pour qu'un timeout vide le buffer.
pub const TIMEOUT_MIN_PAIRS: usize = 10;

/// Sub-state of the capture loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Aucune transition enregistrée : l'impulsion partielle de tête est
    /// supprimée, le premier front montant arme la capture.
    Idle,
    /// Chaque changement de niveau ajoute sa durée au buffer.
    Armed,
    /// Après un reset survenu niveau haut : le prochain front descendant est
    /// consommé silencieusement (queue de blob incomplète).
    WaitingForLow,
}

/// Résultat d'une itération de poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Pas de transition, pas de timeout.
    Quiet,
    /// Transition observée mais non enregistrée (tête ou queue supprimée).
    Suppressed,
    /// Durée ajoutée au buffer.
    Stored,
    /// Le buffer vient d'atteindre sa capacité : extraire, puis `rearm()`.
    BufferFull,
    /// Timeout bas : buffer vidé sans extraction, capture réarmée.
    TimedOut,
}

/// Boucle de capture de fronts.
///
/// Machine à états alimentée par un échantillon (niveau, date) par itération
/// de poll. Elle possède le buffer ; l'extracteur en emprunte une vue quand
/// `poll` rend [`CaptureEvent::BufferFull`], puis l'appelant réarme.
///
/// # Example
/// ```
/// use rf_capture::capture::{CaptureEvent, EdgeCapture};
/// use rf_core::traits::LevelSample;
///
/// let mut capture = EdgeCapture::new(250);
/// let event = capture.poll(LevelSample { high: true, at_us: 10 });
/// assert_eq!(event, CaptureEvent::Suppressed);
/// ```
pub struct EdgeCapture {
    buffer: CaptureBuffer,
    state: State,
    last_high: bool,
    last_change_us: u64,
}

impl EdgeCapture {
    /// Crée une capture avec un buffer de `buffer_pairs` paires.
    #[must_use]
    pub fn new(buffer_pairs: u32) -> Self {
        Self {
            buffer: CaptureBuffer::new(buffer_pairs),
            state: State::Idle,
            last_high: false,
            last_change_us: 0,
        }
    }

    /// Traite une observation du sampler.
    ///
    /// À appeler en boucle serrée, une fois par itération de poll. Sur
    /// [`CaptureEvent::BufferFull`], l'appelant lit [`Self::buffer`] puis
    /// appelle [`Self::rearm`] avant le poll suivant.
    pub fn poll(&mut self, sample: LevelSample) -> CaptureEvent {
        if sample.high != self.last_high {
            let elapsed = round_down_us(sample.at_us.saturating_sub(self.last_change_us));
            self.last_high = sample.high;
            self.last_change_us = sample.at_us;

            return match self.state {
                State::Idle => {
                    if sample.high {
                        self.state = State::Armed;
                    }
                    CaptureEvent::Suppressed
                }
                State::WaitingForLow if !sample.high => {
                    self.state = State::Armed;
                    CaptureEvent::Suppressed
                }
                _ => {
                    // La première entrée est toujours une durée ON : un front
                    // montant sur buffer vide mesurerait un OFF de tête.
                    if self.buffer.is_empty() && sample.high {
                        return CaptureEvent::Suppressed;
                    }
                    self.buffer.push(elapsed);
                    if self.buffer.is_full() {
                        CaptureEvent::BufferFull
                    } else {
                        CaptureEvent::Stored
                    }
                }
            };
        }

        // Pas de transition : fin de transmission sur silence prolongé ?
        let idle_us = sample.at_us.saturating_sub(self.last_change_us);
        if !sample.high
            && idle_us > CAPTURE_TIMEOUT_US
            && self.buffer.pair_count() >= TIMEOUT_MIN_PAIRS
        {
            log::debug!(
                "timeout après {} paires, buffer vidé sans extraction",
                self.buffer.pair_count()
            );
            self.reset();
            return CaptureEvent::TimedOut;
        }

        CaptureEvent::Quiet
    }

    /// Vue sur le buffer de capture, pour extraction sur `BufferFull`.
    #[must_use]
    pub fn buffer(&self) -> &[u32] {
        self.buffer.as_slice()
    }

    /// Vide le buffer et réarme après une extraction.
    pub fn rearm(&mut self) {
        self.reset();
    }

    /// Clear + bookkeeping d'état : si le dernier niveau observé est haut, la
    /// queue du blob en cours est incomplète et sera consommée au prochain
    /// front descendant.
    fn reset(&mut self) {
        self.buffer.clear();
        self.state = if self.last_high {
            State::WaitingForLow
        } else {
            State::Idle
        };
    }
}
