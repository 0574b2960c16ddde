//! Pixelfly CLI
//!
//! Commands: svg, data, manifest, validate
//! SVG or JSON to stdout, logs to stderr
//! Returns non-zero on generation or validation failure

use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

use pixelfly::{
    compute_manifest_hash, render_svg, resolve_config, to_data_uri, ImageManifest, Pixelfly,
    PixelflyError, PixelflyOptions, Validator,
};

#[derive(Parser)]
#[command(name = "pixelfly-cli")]
#[command(about = "Pixelfly CLI - deterministic pixel-art SVG avatars")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON options file (colors, margin, gridSize, pixelSize)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Reject configurations that fail validation
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SVG for a seed
    Svg {
        #[arg(short, long, allow_negative_numbers = true)]
        seed: i64,

        /// Print a base64 data URI instead of raw markup
        #[arg(long)]
        data_uri: bool,
    },

    /// Print the grid and resolved configuration as JSON
    Data {
        #[arg(short, long, allow_negative_numbers = true)]
        seed: i64,
    },

    /// Print a reproducibility manifest as JSON
    Manifest {
        #[arg(short, long, allow_negative_numbers = true)]
        seed: i64,
    },

    /// Validate the resolved configuration
    Validate,
}

fn load_options(path: Option<&PathBuf>) -> Result<PixelflyOptions, PixelflyError> {
    match path {
        Some(path) => {
            info!("loading options from {}", path.display());
            PixelflyOptions::load_from_file(path)
        }
        None => Ok(PixelflyOptions::default()),
    }
}

fn build(options: PixelflyOptions, strict: bool) -> Pixelfly {
    let pixelfly = Pixelfly::new(options);
    if strict {
        pixelfly.with_validator(Validator::new())
    } else {
        pixelfly
    }
}

fn run(cli: Cli) -> Result<ExitCode, PixelflyError> {
    let options = load_options(cli.config.as_ref())?;

    match cli.command {
        Commands::Svg { seed, data_uri } => {
            let svg = build(options, cli.strict).create_svg(seed)?;
            if data_uri {
                println!("{}", to_data_uri(&svg));
            } else {
                println!("{}", svg);
            }
        }
        Commands::Data { seed } => {
            let data = build(options, cli.strict).generate(seed)?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Commands::Manifest { seed } => {
            let data = build(options, cli.strict).generate(seed)?;
            let svg = render_svg(&data);
            let manifest = ImageManifest::new(seed, data.config, &svg);
            let hash = compute_manifest_hash(&manifest)?;
            let output = serde_json::json!({
                "manifest": manifest,
                "manifestHash": hash,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Validate => {
            let result = Validator::new().validate(&resolve_config(&options));
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.valid {
                return Ok(ExitCode::from(2)); // Validation failure
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let output = serde_json::json!({ "error": e.to_string() });
            println!("{}", output);
            match e {
                PixelflyError::ValidationFailed(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
