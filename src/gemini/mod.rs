pub mod image_client;

use std::time::Duration;

use crate::{config::GeminiConfig, error::Result};

pub use image_client::ImageClient;

/// Client handle for the Gemini generative API, built once per run from an
/// explicit [`GeminiConfig`].
#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            image_client: ImageClient::new(http, config),
        })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }
}
