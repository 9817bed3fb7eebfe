//! Ошибки генерации мира

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Invalid map dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid noise settings for `{field}`: {reason}")]
    InvalidNoise { field: &'static str, reason: String },

    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Generation cancelled at {percent}%")]
    Cancelled { percent: u8 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;
