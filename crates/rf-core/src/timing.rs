/// Granularité d'arrondi des durées mesurées (µs). Toute durée est tronquée
/// au multiple inférieur de cette valeur avant d'entrer dans un buffer.
pub const ROUND_STEP_US: u32 = 5;

/// Tolérance de comparaison entre deux durées (µs). La comparaison est
/// strictement inférieure : un écart de 75 µs exactement ne matche PAS.
pub const MATCH_TOLERANCE_US: u32 = 75;

/// Round an elapsed time down to the capture granularity.
///
/// Input is the raw monotonic delta in µs; output is a storable duration.
/// Values beyond `u32::MAX` are capped (an OFF level held that long has
/// already been discarded by the capture timeout).
///
/// # Example
/// ```
/// use rf_core::timing::round_down_us;
/// assert_eq!(round_down_us(1234), 1230);
/// assert_eq!(round_down_us(4), 0);
/// ```
#[inline]
#[must_use]
pub fn round_down_us(elapsed_us: u64) -> u32 {
    let capped = elapsed_us.min(u64::from(u32::MAX)) as u32;
    (capped / ROUND_STEP_US) * ROUND_STEP_US
}

/// `true` si deux durées sont égales à la tolérance près (strict).
///
/// # Example
/// ```
/// use rf_core::timing::near_match;
/// assert!(near_match(500, 570));
/// assert!(!near_match(500, 575));
/// ```
#[inline]
#[must_use]
pub fn near_match(a: u32, b: u32) -> bool {
    (i64::from(a) - i64::from(b)).abs() < i64::from(MATCH_TOLERANCE_US)
}

/// `true` si deux paires (ON, OFF) matchent élément par élément.
#[inline]
#[must_use]
pub fn near_match_pair(a: (u32, u32), b: (u32, u32)) -> bool {
    near_match(a.0, b.0) && near_match(a.1, b.1)
}

/// Element-wise near-match of two duration sequences.
///
/// Lengths must be exactly equal before any tolerance comparison happens.
#[must_use]
pub fn near_match_blob(a: &[u32], b: &[u32]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).all(|(&x, &y)| near_match(x, y))
}
