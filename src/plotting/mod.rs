//! Chart construction and rendering.
//!
//! [`ChartSpec`] describes a chart independently of how it is drawn,
//! [`ChartController`] owns the single live chart, and [`BitmapSurface`]
//! draws specs with plotters.

pub mod chart;
pub mod render;
pub mod spec;
pub mod styles;


pub use chart::{ChartController, ChartSurface, CommitPanel, Redraw};
pub use render::{render_chart, BitmapSurface, RenderedChart};
pub use spec::{ChartSpec, Sector, Series};
pub use styles::{ChartStyle, ChartTheme};
