pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod output;

pub use cli::Cli;
pub use config::GeminiConfig;
pub use error::{Error, Result};
pub use gemini::{GeminiClient, ImageClient};
pub use models::{
    GenerationRequest, InputImage, Model, ModelRun, Resolution, ResponsePart, MAX_INPUT_IMAGES,
};
pub use orchestrator::ImageModelBackend;
