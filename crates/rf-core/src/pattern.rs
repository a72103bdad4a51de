use crate::timing::near_match_blob;

/// Un motif d'impulsions canonique : une unité de répétition ("blob") du code
/// transmis, exprimée en durées µs alternées ON/OFF.
///
/// Toujours de longueur paire, toujours possédé : un `Pattern` est copié
/// hors du buffer de capture, jamais une vue dessus.
///
/// # Example
/// ```
/// use rf_core::pattern::Pattern;
/// let p = Pattern::new(vec![500, 1500, 500, 3000]);
/// assert_eq!(p.len(), 4);
/// assert_eq!(p.pair_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    durations: Vec<u32>,
}

impl Pattern {
    /// Construit un motif depuis une séquence de durées.
    ///
    /// # Panics
    /// Panics (debug) si la longueur est impaire.
    #[must_use]
    pub fn new(durations: Vec<u32>) -> Self {
        debug_assert!(durations.len() % 2 == 0, "pattern length must be even");
        Self { durations }
    }

    /// Nombre de durées (toujours pair).
    #[must_use]
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// `true` si le motif est vide.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Nombre de paires (ON, OFF).
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.durations.len() / 2
    }

    /// Vue sur les durées brutes.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.durations
    }

    /// Consomme le motif et rend les durées.
    #[must_use]
    pub fn into_vec(self) -> Vec<u32> {
        self.durations
    }

    /// Itère sur les paires (ON, OFF).
    ///
    /// # Example
    /// ```
    /// use rf_core::pattern::Pattern;
    /// let p = Pattern::new(vec![500, 1500, 500, 3000]);
    /// let pairs: Vec<_> = p.pairs().collect();
    /// assert_eq!(pairs, vec![(500, 1500), (500, 3000)]);
    /// ```
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.durations.chunks_exact(2).map(|c| (c[0], c[1]))
    }

    /// Element-wise near-match against another pattern.
    ///
    /// Equal lengths are required before any tolerance comparison.
    #[must_use]
    pub fn near_matches(&self, other: &Pattern) -> bool {
        near_match_blob(&self.durations, &other.durations)
    }
}
