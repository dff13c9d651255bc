use std::path::Path;

use async_trait::async_trait;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::models::{
    GenerationRequest, InputImage, Model, ModelRun, Resolution, ResponsePart, MAX_INPUT_IMAGES,
};
use crate::output;

/// The one operation the orchestrator needs from a generation backend.
#[async_trait]
pub trait ImageModelBackend: Send + Sync {
    async fn generate(
        &self,
        model_id: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<ResponsePart>>;
}

/// Validate the CLI inputs into a [`GenerationRequest`]: enforce the input
/// count limit, load and decode every reference image, then settle the
/// output resolution. Fails fast; nothing here touches the network.
pub fn resolve_request(cli: &Cli) -> Result<GenerationRequest> {
    if cli.input_images.len() > MAX_INPUT_IMAGES {
        return Err(Error::TooManyInputImages {
            count: cli.input_images.len(),
        });
    }

    let mut images = Vec::with_capacity(cli.input_images.len());
    for path in &cli.input_images {
        let image = InputImage::load(path)?;
        log::info!("Loaded input image: {}", path.display());
        images.push(image);
    }

    let resolution = effective_resolution(cli.resolution, &images);
    if resolution != cli.resolution {
        let max_dim = images.iter().map(InputImage::max_dimension).max().unwrap_or(0);
        log::info!(
            "Auto-detected resolution: {} (from max input dimension {})",
            resolution,
            max_dim
        );
    }

    Ok(GenerationRequest {
        prompt: cli.prompt.clone(),
        images,
        resolution,
    })
}

/// An explicit non-default resolution is honored verbatim. At the default
/// tier with reference images present, the largest input dimension picks
/// the tier, so edits of high-resolution sources are not silently
/// downscaled. Without inputs the default stands.
pub fn effective_resolution(requested: Resolution, images: &[InputImage]) -> Resolution {
    if requested != Resolution::OneK || images.is_empty() {
        return requested;
    }
    let max_dim = images
        .iter()
        .map(InputImage::max_dimension)
        .max()
        .unwrap_or(0);
    Resolution::from_max_input_dimension(max_dim)
}

/// Invoke one model and persist its response. A success echoes the saved
/// path and a `MEDIA:` marker on stdout; a failure logs the model's label
/// and writes nothing.
pub async fn run_model<B: ImageModelBackend>(
    backend: &B,
    model: Model,
    request: &GenerationRequest,
    output_path: &Path,
) -> ModelRun {
    log::info!("--- {} ({}) ---", model.label(), model.id());

    let outcome = async {
        let parts = backend.generate(model.id(), request).await?;
        output::persist_parts(&parts, output_path, model.label())
    }
    .await;

    match outcome {
        Ok(saved) => {
            println!("Image saved: {}", saved.display());
            println!("MEDIA: {}", saved.display());
            ModelRun {
                model,
                saved_path: Some(saved),
                error: None,
            }
        }
        Err(e) => {
            log::error!("Error generating image with {}: {}", model.label(), e);
            ModelRun {
                model,
                saved_path: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Run both models in their fixed order, one after the other, each against
/// its own tagged output path. A failed run never aborts its sibling.
pub async fn run_ab_test<B: ImageModelBackend>(
    backend: &B,
    request: &GenerationRequest,
    filename: &Path,
) -> Vec<ModelRun> {
    let mut runs = Vec::with_capacity(Model::AB_ORDER.len());
    for model in Model::AB_ORDER {
        let output_path = output::tagged_output_path(filename, model.tag());
        runs.push(run_model(backend, model, request, &output_path).await);
    }
    runs
}
