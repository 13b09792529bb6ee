use eframe::App as EApp;
use egui::TextureHandle;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use super::controls::{ControlEvent, ControlsBinder};
use crate::analysis::{DataStore, FilterState};
use crate::config::ViewerConfig;
use crate::error::{Result, VizError};
use crate::plotting::{BitmapSurface, ChartController, Redraw};

/// Where the contributions document is in its one-shot load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Main application state
pub struct App {
    pub config: ViewerConfig,
    pub status: LoadStatus,
    pub store: DataStore,
    pub filter: FilterState,
    pub controls: ControlsBinder,
    pub chart: ChartController<BitmapSurface>,
    pub plot_texture: Option<TextureHandle>,
    pub update_needed: bool,
    pub error_message: Option<String>,
    pub export_path: String,
}

impl App {
    pub fn new(config: ViewerConfig) -> Self {
        let surface = BitmapSurface::new(config.theme.clone(), config.chart_style.clone());
        Self {
            config,
            status: LoadStatus::Loading,
            store: DataStore::default(),
            filter: FilterState::default(),
            controls: ControlsBinder::default(),
            chart: ChartController::new(surface),
            plot_texture: None,
            update_needed: false,
            error_message: None,
            export_path: "contributions.png".to_string(),
        }
    }

    /// Install the loaded document, or record why it could not be loaded.
    pub fn on_loaded(&mut self, result: Result<DataStore>) {
        match result {
            Ok(store) => {
                info!(authors = store.len(), "contributions ready");
                self.controls = ControlsBinder::bind(&store);
                self.filter = FilterState::initial(&store);
                self.store = store;
                self.status = LoadStatus::Ready;
                self.refresh();
            }
            Err(e) => {
                error!(document = %self.config.document.display(), "failed to load contributions: {}", e);
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
    }

    /// Route a control event through the filter and redraw if it changed anything.
    pub fn handle(&mut self, event: ControlEvent) {
        if self.status != LoadStatus::Ready {
            return;
        }
        if self.controls.apply(&mut self.filter, event) {
            self.refresh();
        }
    }

    /// Recompute and redraw the chart for the current filter.
    pub fn refresh(&mut self) {
        match self.chart.render(&self.store, &self.filter) {
            Ok(Redraw::Drawn) => {
                self.error_message = None;
                self.update_needed = true;
            }
            Ok(Redraw::Unchanged) => {}
            Err(e) => {
                error!("Plotting error: {}", e);
                self.error_message = Some(e.to_string());
                self.update_needed = true;
            }
        }
    }

    /// Save the current chart as an image at `path`.
    pub fn export_chart(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let chart = self
            .chart
            .active()
            .ok_or_else(|| VizError::Plot("no chart to export".to_string()))?;
        chart.save_png(path)?;
        info!(path = %path.display(), "exported chart");
        Ok(path.to_path_buf())
    }

    /// Start loading the configured document in the background.
    pub fn spawn_load(app: Arc<Mutex<App>>, ctx: egui::Context) {
        let document = match app.lock() {
            Ok(app) => app.config.document.clone(),
            Err(_) => {
                error!("Failed to acquire app lock before loading");
                return;
            }
        };

        tokio::spawn(async move {
            let result = DataStore::load(&document).await;
            match app.lock() {
                Ok(mut app) => app.on_loaded(result),
                Err(_) => error!("Failed to acquire app lock after loading"),
            }
            ctx.request_repaint();
        });
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx);
        } else {
            error!("Failed to acquire app lock in update");
        }
    }
}
