use std::path::PathBuf;

use thiserror::Error;

use crate::config::API_KEY_ENV;
use crate::models::MAX_INPUT_IMAGES;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no API key provided (use --api-key or set {API_KEY_ENV})")]
    MissingApiKey,

    #[error("too many input images ({count}); maximum is {MAX_INPUT_IMAGES}")]
    TooManyInputImages { count: usize },

    #[error("failed to load input image '{}': {reason}", path.display())]
    InputImage { path: PathBuf, reason: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    #[error("no image was generated by {model}")]
    NoImage { model: String },

    #[error("failed to decode generated image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
