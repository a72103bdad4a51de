use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// I/O failure while reading or writing a pattern file.
    #[error("Erreur d'E/S : {0}")]
    Io(#[from] std::io::Error),

    /// A `.rfdat` file whose byte length is not a positive multiple of 8.
    #[error("Fichier de motif invalide : {path} ({bytes} octets, attendu un multiple non nul de 8)")]
    PatternFile {
        /// Path of the rejected file.
        path: String,
        /// Observed byte length.
        bytes: u64,
    },
}
