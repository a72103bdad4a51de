use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::CoreError;
use crate::pattern::Pattern;

/// Extension des fichiers de motif.
pub const RFDAT_EXT: &str = "rfdat";

/// Écrit un motif dans un fichier `.rfdat`.
///
/// Format : les durées en `u32` natifs, à plat. Pas d'en-tête, pas de
/// checksum, pas de préfixe de longueur. La taille du fichier divisée par 4
/// puis par 2 donne le nombre de paires.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_pattern(path: &Path, pattern: &Pattern) -> Result<(), CoreError> {
    let mut file = fs::File::create(path)?;
    for &duration in pattern.as_slice() {
        file.write_all(&duration.to_ne_bytes())?;
    }
    file.flush()?;
    Ok(())
}

/// Lit un motif depuis un fichier `.rfdat`.
///
/// # Errors
/// Returns an error if the file cannot be read, or if its byte length is not
/// a positive multiple of 8 (4 bytes per duration, 2 durations per pair).
///
/// # Example
/// ```no_run
/// use rf_core::rfdat::read_pattern;
/// use std::path::Path;
/// let pattern = read_pattern(Path::new("20250316142217.rfdat")).unwrap();
/// ```
pub fn read_pattern(path: &Path) -> Result<Pattern, CoreError> {
    let bytes = fs::read(path)?;

    if bytes.is_empty() || bytes.len() % 8 != 0 {
        return Err(CoreError::PatternFile {
            path: path.display().to_string(),
            bytes: bytes.len() as u64,
        });
    }

    let durations = bytes
        .chunks_exact(4)
        .map(|c| u32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(Pattern::new(durations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_durations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pattern.rfdat");

        let original = Pattern::new(vec![500, 1500, 250, 750, 500, 9000]);
        write_pattern(&path, &original).unwrap();

        let loaded = read_pattern(&path).unwrap();
        assert_eq!(loaded, original, "les durées doivent être identiques octet pour octet");
    }

    #[test]
    fn file_size_is_exactly_four_bytes_per_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sized.rfdat");

        let pattern = Pattern::new(vec![10, 20, 30, 40]);
        write_pattern(&path, &pattern).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.len(), 16, "pas d'en-tête ni de préfixe de longueur");
    }

    #[test]
    fn rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.rfdat");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(
            read_pattern(&path),
            Err(CoreError::PatternFile { bytes: 0, .. })
        ));
    }

    #[test]
    fn rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.rfdat");
        // 12 octets : trois u32, soit une paire et demie
        std::fs::write(&path, [0u8; 12]).unwrap();

        assert!(matches!(
            read_pattern(&path),
            Err(CoreError::PatternFile { bytes: 12, .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.rfdat");

        assert!(matches!(read_pattern(&path), Err(CoreError::Io(_))));
    }
}
