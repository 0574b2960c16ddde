//! Grid Generator - Seed to Mirrored Grid
//!
//! Only the left half (centre column included for odd widths) is drawn; every
//! draw is mirrored onto the right half, so the image is always symmetric.

use log::{debug, trace};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::{resolve_config, PixelflyOptions, ResolvedConfig};
use crate::random::Random;
use crate::render::render_svg;
use crate::validation::Validator;

#[derive(Debug, Error)]
pub enum PixelflyError {
    #[error("Color palette is empty")]
    EmptyPalette,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Row-major grid of colour cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<String>,
}

impl Grid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).map(String::as_str)
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Cells in row-major order as `(x, y, colour)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i % self.width, i / self.width, c.as_str()))
    }

    fn set(&mut self, x: usize, y: usize, color: &str) {
        let i = y * self.width + x;
        self.cells[i] = color.to_string();
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.height))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

/// A generated grid with the configuration it was generated from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageData {
    pub grid: Grid,
    pub config: ResolvedConfig,
}

/// Allocate a `height x width` grid filled with `background`
pub fn create_grid(width: u32, height: u32, background: &str) -> Grid {
    let width = width as usize;
    let height = height as usize;
    Grid {
        width,
        height,
        cells: vec![background.to_string(); width * height],
    }
}

/// Image generator. Owns its random source; use one instance per thread.
pub struct Pixelfly {
    options: PixelflyOptions,
    generator: Random,
    validator: Option<Validator>,
}

impl Pixelfly {
    pub fn new(options: PixelflyOptions) -> Self {
        Self {
            options,
            generator: Random::new(),
            validator: None,
        }
    }

    /// Check every resolved configuration before drawing
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn options(&self) -> &PixelflyOptions {
        &self.options
    }

    pub fn generator(&self) -> &Random {
        &self.generator
    }

    pub fn seed(&mut self, seed: i64) {
        self.generator.seed(seed);
    }

    /// Build a grid from the current generator state without reseeding
    pub fn create_data(&mut self) -> Result<ImageData, PixelflyError> {
        let config = resolve_config(&self.options);

        if let Some(validator) = &self.validator {
            let result = validator.validate(&config);
            if !result.valid {
                return Err(PixelflyError::ValidationFailed(result.summary()));
            }
        }

        let background = config.background().ok_or(PixelflyError::EmptyPalette)?;
        let mut grid = create_grid(config.grid_width, config.grid_height, background);

        let width = config.grid_width as usize;
        let height = config.grid_height as usize;
        let margin_x = config.margin_x as usize;
        let margin_y = config.margin_y as usize;
        // x < width / 2 in real division
        let half = width.div_ceil(2);

        let mut draws = 0usize;
        for y in margin_y..height.saturating_sub(margin_y) {
            for x in margin_x..half {
                let color = self
                    .generator
                    .pick(&config.colors)
                    .ok_or(PixelflyError::EmptyPalette)?;
                grid.set(x, y, color);
                grid.set(width - x - 1, y, color);
                draws += 1;
            }
        }

        debug!(
            "generated {}x{} grid, margin {}x{}, {} draws",
            width, height, margin_x, margin_y, draws
        );

        Ok(ImageData { grid, config })
    }

    /// Seed then build a grid
    pub fn generate(&mut self, seed: i64) -> Result<ImageData, PixelflyError> {
        trace!("seeding generator with {}", seed);
        self.seed(seed);
        self.create_data()
    }

    /// Seed, generate and render an SVG string
    pub fn create_svg(&mut self, seed: i64) -> Result<String, PixelflyError> {
        let data = self.generate(seed)?;
        Ok(render_svg(&data))
    }
}

impl Default for Pixelfly {
    fn default() -> Self {
        Self::new(PixelflyOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Extent;

    const BG: &str = "#710b2c";
    const FG: &str = "#fd8978";

    fn pattern(grid: &Grid) -> Vec<String> {
        grid.rows()
            .map(|row| row.iter().map(|c| if c == BG { '.' } else { '#' }).collect())
            .collect()
    }

    #[test]
    fn test_create_grid_filled() {
        let grid = create_grid(3, 2, "red");
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.cells().all(|(_, _, c)| c == "red"));
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn test_grid_get_out_of_bounds() {
        let grid = create_grid(2, 2, "red");
        assert_eq!(grid.get(1, 1), Some("red"));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn test_seed_42_golden_pattern() {
        let mut pixelfly = Pixelfly::default();
        let data = pixelfly.generate(42).unwrap();
        let expected = vec![
            "..........",
            "..######..",
            "....##....",
            "...#..#...",
            ".###..###.",
            "..#.##.#..",
            ".#.####.#.",
            ".##....##.",
            "..#.##.#..",
            "..........",
        ];
        assert_eq!(pattern(&data.grid), expected);
        assert!(data.grid.cells().all(|(_, _, c)| c == BG || c == FG));
    }

    #[test]
    fn test_odd_width_draws_centre_column() {
        let options = PixelflyOptions::new().with_grid_size(5);
        let mut pixelfly = Pixelfly::new(options);
        let data = pixelfly.generate(7).unwrap();
        let expected = vec![".....", ".#.#.", "..#..", ".###.", "....."];
        assert_eq!(pattern(&data.grid), expected);
    }

    #[test]
    fn test_draw_count_matches_half_area() {
        // 8 inner rows x 4 drawn columns
        let mut pixelfly = Pixelfly::default();
        pixelfly.generate(1).unwrap();
        let mut reference = Random::seeded(1);
        for _ in 0..32 {
            reference.random();
        }
        assert_eq!(pixelfly.generator(), &reference);
    }

    #[test]
    fn test_oversized_margin_is_all_background() {
        let options = PixelflyOptions::new().with_margin(Extent::Pair(5, 1));
        let mut pixelfly = Pixelfly::new(options);
        let data = pixelfly.generate(9).unwrap();
        assert!(data.grid.cells().all(|(_, _, c)| c == BG));
        assert_eq!(pixelfly.generator(), &Random::seeded(9));
    }

    #[test]
    fn test_vertical_margin_larger_than_grid() {
        let options = PixelflyOptions::new().with_grid_size(4).with_margin([0, 3]);
        let mut pixelfly = Pixelfly::new(options);
        let data = pixelfly.generate(1).unwrap();
        assert!(data.grid.cells().all(|(_, _, c)| c == BG));
    }

    #[test]
    fn test_empty_palette_is_error() {
        let options = PixelflyOptions::new().with_colors(Vec::<String>::new());
        let mut pixelfly = Pixelfly::new(options);
        assert!(matches!(pixelfly.generate(1), Err(PixelflyError::EmptyPalette)));
    }

    #[test]
    fn test_create_data_does_not_reseed() {
        let mut pixelfly = Pixelfly::default();
        pixelfly.seed(5);
        let first = pixelfly.create_data().unwrap();
        let second = pixelfly.create_data().unwrap();
        assert_ne!(first.grid, second.grid);
        assert_eq!(pixelfly.generate(5).unwrap(), first);
    }

    #[test]
    fn test_grid_serializes_as_rows() {
        let json = serde_json::to_value(create_grid(2, 1, "x")).unwrap();
        assert_eq!(json, serde_json::json!([["x", "x"]]));
    }
}
