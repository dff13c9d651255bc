use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{Error, Result};

/// Upper bound on reference images accepted by the generation endpoint.
pub const MAX_INPUT_IMAGES: usize = 14;

/// Smallest input dimension that upgrades the output tier to 4K.
const FOUR_K_MIN_INPUT_DIM: u32 = 3000;
/// Smallest input dimension that upgrades the output tier to 2K.
const TWO_K_MIN_INPUT_DIM: u32 = 1500;

/// The two Nano Banana model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    /// Nano Banana Pro: highest quality, more expensive.
    Pro,
    /// Nano Banana 2: same quality, Flash speed, ~40% cheaper.
    Nb2,
}

impl Model {
    /// Fixed ordering for A/B runs.
    pub const AB_ORDER: [Model; 2] = [Model::Pro, Model::Nb2];

    pub fn id(&self) -> &'static str {
        match self {
            Model::Pro => "gemini-3-pro-image-preview",
            Model::Nb2 => "gemini-3.1-flash-image-preview",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Model::Pro => "Nano Banana Pro",
            Model::Nb2 => "Nano Banana 2",
        }
    }

    /// Filename suffix used when both models run against one output name.
    pub fn tag(&self) -> &'static str {
        match self {
            Model::Pro => "pro",
            Model::Nb2 => "nb2",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Output resolution tier requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Resolution {
    #[value(name = "1K")]
    OneK,
    #[value(name = "2K")]
    TwoK,
    #[value(name = "4K")]
    FourK,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::OneK => "1K",
            Resolution::TwoK => "2K",
            Resolution::FourK => "4K",
        }
    }

    /// Classify the largest input dimension into an output tier. Lower
    /// bounds are inclusive: 3000 maps to 4K, 1500 to 2K.
    pub fn from_max_input_dimension(dim: u32) -> Self {
        if dim >= FOUR_K_MIN_INPUT_DIM {
            Resolution::FourK
        } else if dim >= TWO_K_MIN_INPUT_DIM {
            Resolution::TwoK
        } else {
            Resolution::OneK
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::OneK
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference image loaded from disk and validated by decoding it.
#[derive(Debug, Clone)]
pub struct InputImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

impl InputImage {
    /// Read and decode an image file. The decoded pixels are only needed
    /// for their dimensions; the original bytes are what gets uploaded.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| Error::InputImage {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| Error::InputImage {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mime_type = image::guess_format(&bytes)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream");

        Ok(Self {
            path: path.to_path_buf(),
            mime_type,
            width: decoded.width(),
            height: decoded.height(),
            bytes,
        })
    }

    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// A validated generation request: prompt plus ordered reference images.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub images: Vec<InputImage>,
    pub resolution: Resolution,
}

/// One fragment of a model response, normalized at the API boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    Text(String),
    Image(Vec<u8>),
}

/// Outcome of a single model invocation.
#[derive(Debug)]
pub struct ModelRun {
    pub model: Model,
    pub saved_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl ModelRun {
    pub fn succeeded(&self) -> bool {
        self.saved_path.is_some()
    }
}
