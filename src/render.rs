//! Markup Renderer - Grid to SVG

use base64::Engine;

use crate::generator::ImageData;
use crate::markup::{element, Attributes};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Render one `rect` per cell inside a sized `svg` root
pub fn render_svg(data: &ImageData) -> String {
    let config = &data.config;
    let svg_width = config.svg_width();
    let svg_height = config.svg_height();
    let background = config.background().unwrap_or_default();

    let rects: Vec<String> = data
        .grid
        .cells()
        .map(|(x, y, cell)| {
            let attrs = Attributes::new()
                .with("x", x as f64 * config.pixel_width)
                .with("y", y as f64 * config.pixel_height)
                .with("width", config.pixel_width)
                .with("height", config.pixel_height)
                .with("fill", cell);
            element("rect", &attrs, Vec::<String>::new())
        })
        .collect();

    let root = Attributes::new()
        .with("width", svg_width)
        .with("height", svg_height)
        .with("viewBox", format!("0 0 {} {}", svg_width, svg_height))
        .with("fill", background)
        .with("xmlns", SVG_NAMESPACE);

    element("svg", &root, rects)
}

/// Wrap SVG markup in a base64 `data:` URI for `<img src>` use
pub fn to_data_uri(svg: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use crate::generator::create_grid;

    fn tiny() -> ImageData {
        ImageData {
            grid: create_grid(2, 1, "#000"),
            config: ResolvedConfig {
                colors: vec!["#000".into(), "#fff".into()],
                margin_x: 0,
                margin_y: 0,
                grid_width: 2,
                grid_height: 1,
                pixel_width: 4.0,
                pixel_height: 3.0,
            },
        }
    }

    #[test]
    fn test_render_exact_markup() {
        let svg = render_svg(&tiny());
        assert_eq!(
            svg,
            concat!(
                r##"<svg width="8" height="3" viewBox="0 0 8 3" fill="#000" xmlns="http://www.w3.org/2000/svg">"##,
                r##"<rect x="0" y="0" width="4" height="3" fill="#000"></rect> "##,
                r##"<rect x="4" y="0" width="4" height="3" fill="#000"></rect>"##,
                "</svg>"
            )
        );
    }

    #[test]
    fn test_data_uri_prefix() {
        let uri = to_data_uri("<svg></svg>");
        assert_eq!(uri, "data:image/svg+xml;base64,PHN2Zz48L3N2Zz4=");
    }
}
