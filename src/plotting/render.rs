use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;
use tracing::trace;

use super::chart::ChartSurface;
use super::spec::{ChartSpec, Sector, Series};
use super::styles::{ChartStyle, ChartTheme, BAR_FILL_ALPHA};
use crate::error::{Result, VizError};
use crate::utils::{format::share, format_count};

type PlotError = Box<dyn Error + Send + Sync>;

/// A chart rendered to an RGB pixel buffer.
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// Row-major RGB triples.
    pub pixels: Vec<u8>,
}

impl RenderedChart {
    /// Export the chart as an image; the format follows the file extension.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let image = image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| VizError::Plot("pixel buffer does not match chart size".to_string()))?;
        image.save(path.as_ref())?;
        Ok(())
    }
}

/// Renders charts with plotters into in-memory bitmaps.
#[derive(Debug, Clone, Default)]
pub struct BitmapSurface {
    theme: ChartTheme,
    style: ChartStyle,
    next_id: u64,
}

impl BitmapSurface {
    pub fn new(theme: ChartTheme, style: ChartStyle) -> Self {
        Self {
            theme,
            style,
            next_id: 0,
        }
    }
}

impl ChartSurface for BitmapSurface {
    type Chart = RenderedChart;

    fn create(&mut self, spec: &ChartSpec) -> Result<RenderedChart> {
        let pixels = render_chart(spec, &self.theme, &self.style)?;
        let (width, height) = self.style.dimensions();
        self.next_id += 1;
        trace!(id = self.next_id, title = spec.title(), "created chart");
        Ok(RenderedChart {
            id: self.next_id,
            width,
            height,
            pixels,
        })
    }

    fn destroy(&mut self, chart: RenderedChart) {
        trace!(id = chart.id, "destroyed chart");
    }
}

/// Draw `spec` into a fresh RGB buffer of the configured size.
pub fn render_chart(spec: &ChartSpec, theme: &ChartTheme, style: &ChartStyle) -> Result<Vec<u8>> {
    let (width, height) = style.dimensions();
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw_chart(&root, spec, theme, style).map_err(|e| VizError::Plot(e.to_string()))?;
        root.present()
            .map_err(|e| VizError::Plot(e.to_string()))?;
    }
    Ok(pixels)
}

fn draw_chart(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    spec: &ChartSpec,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> std::result::Result<(), PlotError> {
    root.fill(&theme.background_color)?;

    match spec {
        ChartSpec::Proportion { title, sectors } => {
            draw_proportion(root, title, sectors, theme, style)
        }
        ChartSpec::GroupedBar {
            title,
            categories,
            series,
        } => draw_grouped_bars(root, title, categories, series, theme, style),
    }
}

fn draw_proportion(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    sectors: &[Sector],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> std::result::Result<(), PlotError> {
    let total = sectors
        .iter()
        .fold(0u64, |acc, sector| acc.saturating_add(sector.value));
    let text_style = ("sans-serif", style.font_size as f64)
        .into_font()
        .color(&theme.text_color);

    let pie_area = if style.show_labels {
        let titled = root.titled(
            title,
            ("sans-serif", style.font_size as f64 * 1.5)
                .into_font()
                .color(&theme.text_color),
        )?;
        let (width, _) = titled.dim_in_pixel();
        let (pie_area, legend_area) = titled.split_horizontally((width * 2 / 3) as i32);

        let row_height = style.font_size as i32 + 8;
        for (index, sector) in sectors.iter().enumerate() {
            let y = style.margin as i32 + index as i32 * row_height;
            legend_area.draw(&Rectangle::new(
                [(0, y), (14, y + 14)],
                sector.color.filled(),
            ))?;
            legend_area.draw(&Text::new(
                format!("{} ({:.1}%)", sector.label, share(sector.value, total)),
                (20, y),
                text_style.clone(),
            ))?;
        }
        pie_area
    } else {
        root.clone()
    };

    let (width, height) = pie_area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = (width.min(height) as f64 / 2.0 - style.margin as f64).max(1.0);

    if total == 0 {
        pie_area.draw(&Circle::new(
            center,
            radius as i32,
            theme.axis_color.stroke_width(style.line_width),
        ))?;
        if style.show_labels {
            pie_area.draw(&Text::new(
                "No added lines in selection",
                (center.0 - radius as i32 / 2, center.1),
                text_style,
            ))?;
        }
        return Ok(());
    }

    let mut start = -FRAC_PI_2;
    for sector in sectors.iter().filter(|sector| sector.value > 0) {
        let sweep = sector.value as f64 / total as f64 * TAU;
        let points = sector_points(center, radius, start, sweep);
        pie_area.draw(&Polygon::new(points.clone(), sector.color.filled()))?;
        let mut outline = points;
        outline.push(center);
        pie_area.draw(&PathElement::new(
            outline,
            theme.background_color.stroke_width(2),
        ))?;
        start += sweep;
    }

    Ok(())
}

/// Outline of a pie sector: the center followed by points along the arc.
fn sector_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep.to_degrees().ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        points.push((
            center.0 + (radius * angle.cos()).round() as i32,
            center.1 + (radius * angle.sin()).round() as i32,
        ));
    }
    points
}

fn draw_grouped_bars(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    title: &str,
    categories: &[String],
    series: &[Series],
    theme: &ChartTheme,
    style: &ChartStyle,
) -> std::result::Result<(), PlotError> {
    let slots = categories.len().max(1);
    let max_value = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .max()
        .unwrap_or(0);
    let y_max = (max_value as f64 * 1.1).max(1.0);

    let mut builder = ChartBuilder::on(root);
    builder.margin(style.margin as i32);
    if style.show_labels {
        builder
            .caption(
                title,
                ("sans-serif", style.font_size as f64 * 1.5)
                    .into_font()
                    .color(&theme.text_color),
            )
            .set_all_label_area_size(style.label_area_size as i32);
    }
    let mut chart = builder.build_cartesian_2d(-0.5..(slots as f64 - 0.5), 0f64..y_max)?;

    if style.show_labels {
        let labels = categories.to_vec();
        let x_label_formatter = move |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && idx >= 0.0 && (idx as usize) < labels.len() {
                labels[idx as usize].clone()
            } else {
                String::new()
            }
        };
        let y_label_formatter = |y: &f64| format_count(*y);

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(theme.grid_color)
            .axis_style(theme.axis_color)
            .x_labels(slots)
            .x_label_formatter(&x_label_formatter)
            .y_label_formatter(&y_label_formatter)
            .y_desc("Lines")
            .label_style(
                ("sans-serif", style.font_size as f64)
                    .into_font()
                    .color(&theme.text_color),
            );
        mesh.draw()?;
    }

    let slot_width = 0.8 / series.len().max(1) as f64;
    for (series_idx, s) in series.iter().enumerate() {
        let bars: Vec<[(f64, f64); 2]> = s
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let x0 = i as f64 - 0.4 + series_idx as f64 * slot_width;
                [(x0, 0.0), (x0 + slot_width, *value as f64)]
            })
            .collect();

        let color = s.color;
        let annotation = chart.draw_series(
            bars.iter()
                .map(|corners| Rectangle::new(*corners, color.mix(BAR_FILL_ALPHA).filled())),
        )?;
        if style.show_labels {
            annotation.label(s.label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.mix(0.6).filled())
            });
        }

        chart.draw_series(
            bars.iter()
                .map(|corners| Rectangle::new(*corners, color.stroke_width(style.line_width))),
        )?;
    }

    if style.show_labels {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(theme.background_color.mix(0.8))
            .border_style(theme.axis_color)
            .label_font(
                ("sans-serif", style.font_size as f64)
                    .into_font()
                    .color(&theme.text_color),
            )
            .draw()?;
    }

    Ok(())
}
