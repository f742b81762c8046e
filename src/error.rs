use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Endpoint not found: {0}")]
    EndpointNotFound(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Capture error: {0}")]
    Capture(String),
}

pub type LinkResult<T> = std::result::Result<T, LinkError>;
