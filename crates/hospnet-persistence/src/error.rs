//! Persistence error types.
//!
//! Every error carries a user-facing message and, where one exists, a hint
//! on how to recover.

use std::path::PathBuf;
use thiserror::Error;

/// Draft persistence error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a draft file.
    #[error("Invalid draft file format: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Written by a newer version.
    #[error("Draft file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Payload does not match its recorded checksum.
    #[error("Draft checksum mismatch in {path}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Failed to serialize draft data")]
    Serialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to deserialize draft data")]
    Deserialization {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The temp file could not be moved over the target.
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistenceError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => {
                format!("Não foi possível acessar o arquivo {}.", path.display())
            }
            Self::InvalidFormat { path, .. } => {
                format!("O arquivo {} não é um rascunho válido.", path.display())
            }
            Self::UnsupportedVersion { found, .. } => {
                format!("Este rascunho foi salvo por uma versão mais nova do aplicativo (versão {found}).")
            }
            Self::ChecksumMismatch { .. } => {
                "O rascunho está corrompido e não pode ser retomado.".to_string()
            }
            Self::Serialization { .. } => "Ocorreu um erro ao salvar o rascunho.".to_string(),
            Self::Deserialization { .. } => "Ocorreu um erro ao ler o rascunho.".to_string(),
            Self::AtomicWriteFailed { target_path, .. } => {
                format!("Não foi possível salvar o rascunho em {}.", target_path.display())
            }
        }
    }

    /// How the user might resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Verifique se o arquivo existe e se você tem permissão de leitura.".into())
                } else {
                    Some("Verifique se você tem permissão de escrita neste local.".into())
                }
            }
            Self::InvalidFormat { .. } | Self::ChecksumMismatch { .. } => {
                Some("Descarte o rascunho e recomece o preenchimento.".into())
            }
            Self::UnsupportedVersion { .. } => Some("Atualize o aplicativo.".into()),
            Self::Serialization { .. } => None,
            Self::Deserialization { .. } => Some("Tente novamente em alguns instantes.".into()),
            Self::AtomicWriteFailed { .. } => {
                Some("Libere espaço em disco ou escolha outro diretório.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
