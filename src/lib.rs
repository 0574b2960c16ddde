//! Pixelfly - Deterministic Pixel-Art Avatars
//!
//! A seed drives a multiply-with-carry generator, the generator fills a
//! horizontally mirrored grid, and the grid is serialized to SVG markup.
//!
//! ```
//! use pixelfly::{Pixelfly, PixelflyOptions};
//!
//! let mut pixelfly = Pixelfly::new(PixelflyOptions::new().with_grid_size(8));
//! let svg = pixelfly.create_svg(42).unwrap();
//! assert!(svg.starts_with("<svg "));
//! ```
//!
//! # Guarantees
//! 1. Same seed, same configuration, same bytes
//! 2. Every row is a palindrome
//! 3. Margin rows and columns are background
//! 4. Providers run once per generation call

pub mod config;
pub mod generator;
pub mod hashing;
pub mod markup;
pub mod random;
pub mod render;
pub mod validation;

pub use config::{resolve_config, ConfigValue, Extent, Pair, PixelflyOptions, ResolvedConfig};
pub use generator::{create_grid, Grid, ImageData, Pixelfly, PixelflyError};
pub use hashing::{canonical_json, compute_manifest_hash, sha256_hex, ImageManifest};
pub use random::Random;
pub use render::{render_svg, to_data_uri};
pub use validation::{FailureMode, ValidationResult, ValidationRule, ValidationViolation, Validator, ViolationSeverity};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
