//! Storage fault types shared across crates

/// Faults raised by a durable key-value backend
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Stored value is corrupt: {message}")]
    Corrupt { message: String },
}

impl StorageError {
    /// Create an unavailable-storage error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a corrupt-value error
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::corrupt(err.to_string())
    }
}

/// Outcome of a best-effort write to durable storage.
///
/// Session and token operations never fail because of storage; they report
/// what happened to the durable copy and let the caller decide whether to care.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorageStatus {
    #[default]
    Ok,
    Unavailable(String),
    Corrupt(String),
}

impl StorageStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<StorageError> for StorageStatus {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Unavailable { message } => Self::Unavailable(message),
            StorageError::Corrupt { message } => Self::Corrupt(message),
        }
    }
}

impl From<Result<(), StorageError>> for StorageStatus {
    fn from(result: Result<(), StorageError>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(err) => err.into(),
        }
    }
}
