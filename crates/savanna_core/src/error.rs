//! Error types for savanna_core.
//!
//! Only configuration can fail. Deaths, starvation and overcrowding are
//! ordinary state changes and never surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Config file could not be read
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for `AppConfig`
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but a value is out of range
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::validation("max_temp below min_temp");
        assert_eq!(err.to_string(), "Validation error: max_temp below min_temp");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SimError = io_err.into();
        assert!(matches!(err, SimError::Io(_)));
    }
}
