//! # Contribution Visualization Library
//!
//! `contribviz` reads a per-author contributions document and charts it.
//! With every author selected it draws each author's share of changed lines;
//! with one author selected it draws that author's added and removed lines
//! per file type, next to the author's commit list.
//!
//! ## Features
//!
//! - Load a contributions document produced by `contribviz generate`
//! - Filter by author and by file type
//! - Interactive egui viewer and headless PNG rendering
//! - Generate the document from any git repository
//!
//! ## Example
//!
//! ```no_run
//! use contribviz::analysis::{aggregate, DataStore, FilterState};
//! use contribviz::plotting::{BitmapSurface, ChartController, ChartStyle, ChartTheme};
//!
//! # async fn run() -> contribviz::Result<()> {
//! let store = DataStore::load("contributions.json").await?;
//! let filter = FilterState::initial(&store);
//! assert!(aggregate(&store, &filter).is_some());
//!
//! let mut chart = ChartController::new(BitmapSurface::new(
//!     ChartTheme::default(),
//!     ChartStyle::default(),
//! ));
//! chart.render(&store, &filter)?;
//! if let Some(rendered) = chart.active() {
//!     rendered.save_png("contributions.png")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::App as ContribVizApp;
pub use config::ViewerConfig;
pub use error::{Result, VizError};
pub use types::{CommitSummary, ContributionRecord, FileTypeStats, LineCounts};
