//! Application error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file type: {}", path.display())]
    UnsupportedFile { path: PathBuf },

    #[error("{} is {size} bytes, larger than the {limit} byte limit", path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("DICOM error: {message}")]
    Dicom { message: String },

    #[error("Preview error: {message}")]
    Preview { message: String },

    #[error("Inference error: {message}")]
    Inference { message: String },

    #[error("Patient store error: {message}")]
    PatientStore { message: String },
}

impl Error {
    pub fn dicom(message: impl Into<String>) -> Self {
        Self::Dicom {
            message: message.into(),
        }
    }

    pub fn preview(message: impl Into<String>) -> Self {
        Self::Preview {
            message: message.into(),
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    pub fn patient_store(message: impl Into<String>) -> Self {
        Self::PatientStore {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FileTooLarge {
            path: PathBuf::from("scan.png"),
            size: 20,
            limit: 10,
        };
        assert_eq!(
            err.to_string(),
            "scan.png is 20 bytes, larger than the 10 byte limit"
        );

        let err = Error::inference("model offline");
        assert_eq!(err.to_string(), "Inference error: model offline");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
