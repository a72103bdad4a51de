/// Buffer de capture réutilisable. Pré-alloué, jamais redimensionné en hot path.
///
/// Stocke des durées µs alternées ON/OFF, la première entrée étant toujours
/// une durée ON. La capacité est exprimée en paires et l'occupation au repos
/// est toujours paire ; c'est la boucle de capture qui garantit l'alternance.
///
/// # Example
/// ```
/// use rf_capture::buffer::CaptureBuffer;
/// let buf = CaptureBuffer::new(250);
/// assert_eq!(buf.capacity_pairs(), 250);
/// assert!(buf.is_empty());
/// ```
pub struct CaptureBuffer {
    /// Durées stockées, µs arrondies.
    data: Vec<u32>,
    /// Capacité en entrées (2 × paires).
    capacity: usize,
}

impl CaptureBuffer {
    /// Crée un buffer pré-alloué pour `pairs` paires (ON, OFF).
    #[must_use]
    pub fn new(pairs: u32) -> Self {
        let capacity = pairs as usize * 2;
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Ajoute une durée. Sans effet si le buffer est déjà plein.
    pub fn push(&mut self, duration_us: u32) {
        debug_assert!(self.data.len() < self.capacity, "push sur buffer plein");
        if self.data.len() < self.capacity {
            self.data.push(duration_us);
        }
    }

    /// Vide le buffer sans libérer l'allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// `true` quand la capacité est atteinte.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// `true` quand aucune entrée n'a été enregistrée.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Nombre d'entrées enregistrées.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Nombre de paires complètes enregistrées.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.data.len() / 2
    }

    /// Capacité en paires.
    #[must_use]
    pub fn capacity_pairs(&self) -> usize {
        self.capacity / 2
    }

    /// Vue sur les durées enregistrées.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_to_capacity_then_stops() {
        let mut buf = CaptureBuffer::new(2);
        for d in [100, 200, 300, 400] {
            buf.push(d);
        }
        assert!(buf.is_full());
        assert_eq!(buf.as_slice(), &[100, 200, 300, 400]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = CaptureBuffer::new(3);
        buf.push(10);
        buf.push(20);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity_pairs(), 3);
    }

    #[test]
    fn pair_count_is_floor_of_half() {
        let mut buf = CaptureBuffer::new(4);
        buf.push(10);
        assert_eq!(buf.pair_count(), 0);
        buf.push(20);
        assert_eq!(buf.pair_count(), 1);
        buf.push(30);
        assert_eq!(buf.pair_count(), 1);
    }
}
