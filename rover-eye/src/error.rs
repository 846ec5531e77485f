//! Error types for rover-eye

use rover_core::Error as CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("OpenCV error: {0}")]
    OpenCv(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<opencv::Error> for VisionError {
    fn from(err: opencv::Error) -> Self {
        VisionError::OpenCv(err.to_string())
    }
}

impl From<VisionError> for CoreError {
    fn from(err: VisionError) -> Self {
        match err {
            VisionError::Config(msg) => CoreError::Configuration(format!("Vision config: {}", msg)),
            other => CoreError::InvalidRequest(format!("Vision error: {}", other)),
        }
    }
}
