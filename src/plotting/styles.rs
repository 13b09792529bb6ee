use plotters::style::{Color, HSLColor, RGBAColor, RGBColor};

/// Stroke color of the "added lines" series.
pub const ADDED_COLOR: RGBColor = RGBColor(75, 192, 192);
/// Stroke color of the "removed lines" series.
pub const REMOVED_COLOR: RGBColor = RGBColor(255, 99, 132);
/// Opacity of bar fills; borders are drawn opaque.
pub const BAR_FILL_ALPHA: f64 = 0.2;

/// Hue step between consecutive authors, in degrees.
const HUE_STEP_DEGREES: f64 = 30.0;

/// Sector color for the author at `index` in display order.
pub fn author_color(index: usize) -> RGBColor {
    let hue = (index as f64 * HUE_STEP_DEGREES) % 360.0;
    let (r, g, b) = HSLColor(hue / 360.0, 0.7, 0.7).rgb();
    RGBColor(r, g, b)
}

/// Chart theme configuration
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(40, 40, 40, 0.9),
            grid_color: RGBAColor(0, 0, 0, 0.1),
            axis_color: RGBAColor(0, 0, 0, 0.6),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub line_width: u32,
    pub font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Draw captions, axis labels and legends. Needs a system font.
    pub show_labels: bool,
}

impl ChartStyle {
    /// Bitmap size in pixels, never zero.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width.max(1), self.height.max(1))
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            line_width: 1,
            font_size: 15,
            margin: 10,
            label_area_size: 50,
            show_labels: true,
        }
    }
}
