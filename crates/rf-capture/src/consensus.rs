use rf_core::pattern::Pattern;

/// Verdict rendu par [`SampleCollector::offer`] pour un motif extrait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Motif accepté ; nombre d'échantillons collectés à ce stade.
    Accepted {
        /// Taille du jeu après insertion.
        collected: usize,
    },
    /// Longueur discordante : motif rejeté, compteur d'échecs incrémenté.
    LengthMismatch {
        /// Valeur du compteur d'échecs après incrément.
        failures: u32,
    },
    /// Trop d'échecs : jeu entier rejeté, collecte repartie de zéro.
    Restarted,
}

/// Collecte des motifs de longueur concordante jusqu'à une cible, puis élit
/// le plus représentatif par score de consensus.
///
/// La longueur du premier motif accepté fixe la longueur attendue de la
/// session ; elle est oubliée à chaque redémarrage.
///
/// # Example
/// ```
/// use rf_capture::consensus::{SampleCollector, Verdict};
/// use rf_core::pattern::Pattern;
///
/// let mut collector = SampleCollector::new(2, 2);
/// collector.offer(Pattern::new(vec![500, 1000]));
/// collector.offer(Pattern::new(vec![505, 995]));
/// assert!(collector.is_complete());
/// ```
pub struct SampleCollector {
    target: usize,
    max_failures: u32,
    failures: u32,
    samples: Vec<Pattern>,
}

impl SampleCollector {
    /// Crée un collecteur visant `record_samples` motifs, avec redémarrage
    /// au-delà de `record_failures` échecs.
    #[must_use]
    pub fn new(record_samples: u32, record_failures: u32) -> Self {
        Self {
            target: record_samples as usize,
            max_failures: record_failures,
            failures: 0,
            samples: Vec::with_capacity(record_samples as usize),
        }
    }

    /// Longueur attendue, fixée par le premier motif accepté de la session.
    #[must_use]
    pub fn expected_len(&self) -> Option<usize> {
        self.samples.first().map(Pattern::len)
    }

    /// Nombre d'échantillons collectés.
    #[must_use]
    pub fn collected(&self) -> usize {
        self.samples.len()
    }

    /// Cible de collecte.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// `true` quand la cible est atteinte.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.samples.len() >= self.target
    }

    /// Soumet un motif extrait.
    ///
    /// Un motif de longueur discordante est rejeté et compte comme un échec ;
    /// quand le compteur DÉPASSE le seuil (strictement), le jeu entier est
    /// rejeté et la collecte repart de zéro, longueur attendue oubliée.
    pub fn offer(&mut self, pattern: Pattern) -> Verdict {
        match self.expected_len() {
            Some(expected) if pattern.len() != expected => {
                self.failures += 1;
                if self.failures > self.max_failures {
                    log::info!(
                        "{} échecs de concordance : jeu de {} échantillons rejeté",
                        self.failures,
                        self.samples.len()
                    );
                    self.samples.clear();
                    self.failures = 0;
                    return Verdict::Restarted;
                }
                Verdict::LengthMismatch {
                    failures: self.failures,
                }
            }
            _ => {
                self.samples.push(pattern);
                Verdict::Accepted {
                    collected: self.samples.len(),
                }
            }
        }
    }

    /// Élit le motif canonique : celui dont le contenu near-matche le plus
    /// grand nombre d'AUTRES membres du jeu. Égalité : le premier dans
    /// l'ordre de collecte gagne.
    ///
    /// Rend le motif élu et son score. `None` sur un jeu vide.
    #[must_use]
    pub fn into_best(self) -> Option<(Pattern, usize)> {
        if self.samples.is_empty() {
            return None;
        }

        let mut best_idx = 0usize;
        let mut best_score = 0usize;
        for (i, sample) in self.samples.iter().enumerate() {
            let score = self
                .samples
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && sample.near_matches(other))
                .count();

            if score > best_score {
                best_score = score;
                best_idx = i;
            }
        }

        self.samples
            .into_iter()
            .nth(best_idx)
            .map(|p| (p, best_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(base: u32, len: usize) -> Pattern {
        Pattern::new((0..len as u32).map(|i| base + i * 10).collect())
    }

    #[test]
    fn five_agreeing_samples_complete_without_restart() {
        let mut collector = SampleCollector::new(5, 2);
        for jitter in [0u32, 10, 20, 5, 15] {
            let verdict = collector.offer(pat(500 + jitter, 8));
            assert!(matches!(verdict, Verdict::Accepted { .. }));
        }
        assert!(collector.is_complete());
        assert_eq!(collector.collected(), 5);

        let (best, score) = collector.into_best().unwrap();
        assert_eq!(best.len(), 8);
        // Tous se matchent mutuellement : score maximal = 4 autres membres
        assert_eq!(score, 4);
    }

    #[test]
    fn mismatched_length_rejected_and_counted() {
        let mut collector = SampleCollector::new(5, 2);
        collector.offer(pat(500, 8));
        assert_eq!(collector.expected_len(), Some(8));

        let verdict = collector.offer(pat(500, 6));
        assert_eq!(verdict, Verdict::LengthMismatch { failures: 1 });
        assert_eq!(collector.collected(), 1, "le discordant n'est pas inséré");
    }

    #[test]
    fn failure_count_equal_to_threshold_does_not_restart() {
        // Scénario : 3 motifs de longueur L1, 2 de longueur L2, seuil 2.
        let mut collector = SampleCollector::new(5, 2);
        collector.offer(pat(500, 8));
        collector.offer(pat(510, 8));

        assert_eq!(
            collector.offer(pat(500, 6)),
            Verdict::LengthMismatch { failures: 1 }
        );
        assert_eq!(
            collector.offer(pat(505, 6)),
            Verdict::LengthMismatch { failures: 2 }
        );

        // failures == seuil : PAS de redémarrage, le jeu est conservé
        collector.offer(pat(520, 8));
        assert_eq!(collector.collected(), 3);
        assert_eq!(collector.expected_len(), Some(8));
        assert!(!collector.is_complete());
    }

    #[test]
    fn exceeding_threshold_restarts_and_forgets_length() {
        let mut collector = SampleCollector::new(5, 2);
        collector.offer(pat(500, 8));
        collector.offer(pat(500, 6));
        collector.offer(pat(500, 6));
        assert_eq!(collector.collected(), 1);

        // Troisième échec : dépasse le seuil → tout est rejeté
        assert_eq!(collector.offer(pat(500, 6)), Verdict::Restarted);
        assert_eq!(collector.collected(), 0);
        assert_eq!(collector.expected_len(), None);

        // La longueur attendue est ré-établie par le prochain accepté
        assert!(matches!(
            collector.offer(pat(500, 6)),
            Verdict::Accepted { collected: 1 }
        ));
        assert_eq!(collector.expected_len(), Some(6));
    }

    #[test]
    fn best_sample_wins_by_consensus_score() {
        let mut collector = SampleCollector::new(3, 2);
        // Le premier est isolé (très différent), les deux suivants se matchent
        collector.offer(pat(500, 4));
        collector.offer(pat(5_000, 4));
        collector.offer(pat(5_020, 4));
        assert!(collector.is_complete());

        let (best, score) = collector.into_best().unwrap();
        assert_eq!(score, 1);
        // Égalité entre les deux derniers : le premier rencontré gagne
        assert_eq!(best, pat(5_000, 4));
    }

    #[test]
    fn all_isolated_keeps_first_in_scan_order() {
        let mut collector = SampleCollector::new(3, 2);
        collector.offer(pat(500, 4));
        collector.offer(pat(5_000, 4));
        collector.offer(pat(20_000, 4));

        let (best, score) = collector.into_best().unwrap();
        assert_eq!(score, 0);
        assert_eq!(best, pat(500, 4));
    }

    #[test]
    fn into_best_on_empty_set_is_none() {
        let collector = SampleCollector::new(5, 2);
        assert!(collector.into_best().is_none());
    }
}
