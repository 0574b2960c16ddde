//! Configuration - Literal or Provided Values
//!
//! Every option can be a fixed value or a zero-argument provider. Providers
//! are called once per generation call, never cached.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::generator::PixelflyError;

pub const DEFAULT_GRID_SIZE: u32 = 10;
pub const DEFAULT_PIXEL_SIZE: f64 = 8.0;
pub const DEFAULT_MARGIN: u32 = 1;
pub const DEFAULT_COLORS: [&str; 2] = ["#710b2c", "#fd8978"];

type Provider<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A configuration value, either fixed or produced on demand
pub enum ConfigValue<T> {
    Literal(T),
    Provider(Provider<T>),
}

impl<T: Clone> ConfigValue<T> {
    pub fn provider<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        ConfigValue::Provider(Arc::new(f))
    }

    /// Produce the concrete value, calling the provider if there is one
    pub fn resolve(&self) -> T {
        match self {
            ConfigValue::Literal(value) => value.clone(),
            ConfigValue::Provider(f) => f(),
        }
    }
}

impl<T> From<T> for ConfigValue<T> {
    fn from(value: T) -> Self {
        ConfigValue::Literal(value)
    }
}

impl<T: Clone> Clone for ConfigValue<T> {
    fn clone(&self) -> Self {
        match self {
            ConfigValue::Literal(value) => ConfigValue::Literal(value.clone()),
            ConfigValue::Provider(f) => ConfigValue::Provider(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ConfigValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            ConfigValue::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

// Config files can only carry literals.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for ConfigValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(ConfigValue::Literal)
    }
}

/// Independent horizontal and vertical values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair<T> {
    pub x: T,
    pub y: T,
}

/// A single value shared by both axes, or one value per axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Extent<T> {
    Scalar(T),
    Pair(T, T),
}

impl<T: Copy> Extent<T> {
    pub fn normalize(self) -> Pair<T> {
        match self {
            Extent::Scalar(v) => Pair { x: v, y: v },
            Extent::Pair(x, y) => Pair { x, y },
        }
    }
}

impl From<u32> for Extent<u32> {
    fn from(v: u32) -> Self {
        Extent::Scalar(v)
    }
}

impl From<[u32; 2]> for Extent<u32> {
    fn from([x, y]: [u32; 2]) -> Self {
        Extent::Pair(x, y)
    }
}

impl From<f64> for Extent<f64> {
    fn from(v: f64) -> Self {
        Extent::Scalar(v)
    }
}

impl From<[f64; 2]> for Extent<f64> {
    fn from([x, y]: [f64; 2]) -> Self {
        Extent::Pair(x, y)
    }
}

/// Generator options. The first colour is the background.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PixelflyOptions {
    pub colors: ConfigValue<Vec<String>>,
    pub margin: ConfigValue<Extent<u32>>,
    pub grid_size: ConfigValue<Extent<u32>>,
    pub pixel_size: ConfigValue<Extent<f64>>,
}

impl Default for PixelflyOptions {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect::<Vec<_>>().into(),
            margin: Extent::Scalar(DEFAULT_MARGIN).into(),
            grid_size: Extent::Scalar(DEFAULT_GRID_SIZE).into(),
            pixel_size: Extent::Scalar(DEFAULT_PIXEL_SIZE).into(),
        }
    }
}

impl PixelflyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = ConfigValue::Literal(colors.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_colors_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Vec<String> + Send + Sync + 'static,
    {
        self.colors = ConfigValue::provider(f);
        self
    }

    pub fn with_margin(mut self, margin: impl Into<Extent<u32>>) -> Self {
        self.margin = ConfigValue::Literal(margin.into());
        self
    }

    pub fn with_margin_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Extent<u32> + Send + Sync + 'static,
    {
        self.margin = ConfigValue::provider(f);
        self
    }

    pub fn with_grid_size(mut self, size: impl Into<Extent<u32>>) -> Self {
        self.grid_size = ConfigValue::Literal(size.into());
        self
    }

    pub fn with_grid_size_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Extent<u32> + Send + Sync + 'static,
    {
        self.grid_size = ConfigValue::provider(f);
        self
    }

    pub fn with_pixel_size(mut self, size: impl Into<Extent<f64>>) -> Self {
        self.pixel_size = ConfigValue::Literal(size.into());
        self
    }

    pub fn with_pixel_size_fn<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Extent<f64> + Send + Sync + 'static,
    {
        self.pixel_size = ConfigValue::provider(f);
        self
    }

    /// Parse options from JSON. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PixelflyError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, PixelflyError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
            .map_err(|e| PixelflyError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Options after provider calls and scalar-to-pair normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub colors: Vec<String>,
    pub margin_x: u32,
    pub margin_y: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl ResolvedConfig {
    pub fn background(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    pub fn svg_width(&self) -> f64 {
        self.grid_width as f64 * self.pixel_width
    }

    pub fn svg_height(&self) -> f64 {
        self.grid_height as f64 * self.pixel_height
    }
}

/// Resolve every option exactly once
pub fn resolve_config(options: &PixelflyOptions) -> ResolvedConfig {
    let colors = options.colors.resolve();
    let margin = options.margin.resolve().normalize();
    let grid = options.grid_size.resolve().normalize();
    let pixel = options.pixel_size.resolve().normalize();

    ResolvedConfig {
        colors,
        margin_x: margin.x,
        margin_y: margin.y,
        grid_width: grid.x,
        grid_height: grid.y,
        pixel_width: pixel.x,
        pixel_height: pixel.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_resolution() {
        let resolved = resolve_config(&PixelflyOptions::default());
        assert_eq!(resolved.colors, vec!["#710b2c", "#fd8978"]);
        assert_eq!((resolved.margin_x, resolved.margin_y), (1, 1));
        assert_eq!((resolved.grid_width, resolved.grid_height), (10, 10));
        assert_eq!((resolved.pixel_width, resolved.pixel_height), (8.0, 8.0));
    }

    #[test]
    fn test_scalar_normalizes_to_pair() {
        assert_eq!(Extent::Scalar(2u32).normalize(), Pair { x: 2, y: 2 });
        assert_eq!(Extent::Pair(3u32, 4).normalize(), Pair { x: 3, y: 4 });
    }

    #[test]
    fn test_provider_called_on_each_resolve() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let options = PixelflyOptions::new().with_grid_size_fn(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Extent::Scalar(4 + n)
        });

        assert_eq!(resolve_config(&options).grid_width, 4);
        assert_eq!(resolve_config(&options).grid_width, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_json_scalar_and_pair() {
        let options = PixelflyOptions::from_json_str(
            r##"{"margin": 2, "gridSize": [12, 8], "pixelSize": 4.5, "colors": ["#000", "#fff", "#f00"]}"##,
        )
        .unwrap();
        let resolved = resolve_config(&options);
        assert_eq!((resolved.margin_x, resolved.margin_y), (2, 2));
        assert_eq!((resolved.grid_width, resolved.grid_height), (12, 8));
        assert_eq!(resolved.pixel_width, 4.5);
        assert_eq!(resolved.colors.len(), 3);
    }

    #[test]
    fn test_json_missing_keys_default() {
        let options = PixelflyOptions::from_json_str("{}").unwrap();
        assert_eq!(resolve_config(&options), resolve_config(&PixelflyOptions::default()));
    }

    #[test]
    fn test_json_rejects_negative_margin() {
        assert!(PixelflyOptions::from_json_str(r#"{"margin": -1}"#).is_err());
    }

    #[test]
    fn test_resolved_serializes_camel_case() {
        let json = serde_json::to_value(resolve_config(&PixelflyOptions::default())).unwrap();
        assert_eq!(json["gridWidth"], 10);
        assert_eq!(json["marginY"], 1);
        assert_eq!(json["pixelHeight"], 8.0);
    }

    #[test]
    fn test_provider_debug_is_opaque() {
        let value: ConfigValue<u32> = ConfigValue::provider(|| 1);
        assert_eq!(format!("{:?}", value), "Provider(..)");
    }
}
