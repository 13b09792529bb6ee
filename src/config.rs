//! Runtime configuration for the viewer.

use std::path::PathBuf;

use crate::plotting::{ChartStyle, ChartTheme};

/// Default location of the contributions document.
pub const DEFAULT_DOCUMENT: &str = "contributions.json";

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "CONTRIBVIZ_LOG";

/// Settings for one viewer session.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub document: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    pub theme: ChartTheme,
    pub chart_style: ChartStyle,
}

impl ViewerConfig {
    pub fn with_document(document: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            ..Self::default()
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from(DEFAULT_DOCUMENT),
            window_size: [1200.0, 800.0],
            min_window_size: [800.0, 600.0],
            theme: ChartTheme::default(),
            chart_style: ChartStyle::default(),
        }
    }
}
