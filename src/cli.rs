use std::path::PathBuf;

use clap::Parser;

use crate::models::{Model, Resolution};

/// Generate images using Nano Banana (Pro or 2).
#[derive(Debug, Parser)]
#[command(name = "bananagen", version, about)]
pub struct Cli {
    /// Image description/prompt
    #[arg(short, long)]
    pub prompt: String,

    /// Output filename (e.g. sunset-mountains.png)
    #[arg(short, long)]
    pub filename: PathBuf,

    /// Model to use: pro = Nano Banana Pro (highest quality), nb2 = Nano
    /// Banana 2 (Flash speed, ~40% cheaper)
    #[arg(short, long, value_enum, default_value_t = Model::Nb2)]
    pub model: Model,

    /// Run generation with both models, saving with -pro and -nb2 suffixes
    #[arg(long)]
    pub ab_test: bool,

    /// Input image path(s) for editing/composition. Can be given multiple
    /// times (up to 14 images).
    #[arg(short = 'i', long = "input-image", value_name = "IMAGE")]
    pub input_images: Vec<PathBuf>,

    /// Output resolution
    #[arg(short, long, value_enum, default_value_t = Resolution::OneK)]
    pub resolution: Resolution,

    /// Gemini API key (overrides the GEMINI_API_KEY environment variable)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["bananagen"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-p", "a cat", "-f", "cat.png"]);
        assert_eq!(cli.model, Model::Nb2);
        assert_eq!(cli.resolution, Resolution::OneK);
        assert!(!cli.ab_test);
        assert!(cli.input_images.is_empty());
        assert!(cli.api_key.is_none());
    }

    #[test]
    fn test_prompt_and_filename_are_required() {
        assert!(Cli::try_parse_from(["bananagen", "-p", "a cat"]).is_err());
        assert!(Cli::try_parse_from(["bananagen", "-f", "cat.png"]).is_err());
    }

    #[test]
    fn test_repeated_input_images_preserve_order() {
        let cli = parse(&[
            "-p", "merge", "-f", "out.png", "-i", "a.png", "-i", "b.png", "-i", "c.png",
        ]);
        assert_eq!(
            cli.input_images,
            vec![
                PathBuf::from("a.png"),
                PathBuf::from("b.png"),
                PathBuf::from("c.png")
            ]
        );
    }

    #[test]
    fn test_model_and_resolution_values() {
        let cli = parse(&["-p", "x", "-f", "o.png", "-m", "pro", "-r", "4K"]);
        assert_eq!(cli.model, Model::Pro);
        assert_eq!(cli.resolution, Resolution::FourK);

        assert!(Cli::try_parse_from(["bananagen", "-p", "x", "-f", "o.png", "-r", "8K"]).is_err());
    }

    #[test]
    fn test_ab_test_flag() {
        let cli = parse(&["-p", "x", "-f", "o.png", "--ab-test"]);
        assert!(cli.ab_test);
    }
}
