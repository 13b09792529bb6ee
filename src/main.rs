//! Contribution Visualization Tool
//!
//! A GUI application for charting per-author contributions, plus commands to
//! generate the contributions document and render charts headlessly.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use contribviz::analysis::{generate_document, write_document, AuthorSelection, DataStore, FilterState};
use contribviz::app::{App, AppWrapper};
use contribviz::config::{ViewerConfig, DEFAULT_DOCUMENT, LOG_ENV};
use contribviz::plotting::{BitmapSurface, ChartController, Redraw};

#[derive(Parser, Debug)]
#[command(name = "contribviz")]
#[command(about = "Chart per-author contributions to a git repository", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set CONTRIBVIZ_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive viewer
    View {
        /// Contributions document to display
        #[arg(long, env = "CONTRIBVIZ_DOCUMENT", default_value = DEFAULT_DOCUMENT)]
        document: PathBuf,
    },

    /// Build the contributions document from a git repository
    Generate {
        /// Repository to analyze
        #[arg(default_value = ".")]
        repo: PathBuf,
        /// Where to write the document
        #[arg(long, default_value = DEFAULT_DOCUMENT)]
        output: PathBuf,
    },

    /// Render one chart to a PNG file without opening a window
    Render {
        /// Contributions document to chart
        #[arg(long, env = "CONTRIBVIZ_DOCUMENT", default_value = DEFAULT_DOCUMENT)]
        document: PathBuf,
        /// Chart a single author instead of all authors
        #[arg(long)]
        author: Option<String>,
        /// Restrict to these file types (repeatable; all when omitted)
        #[arg(long = "file-type", value_name = "EXT")]
        file_types: Vec<String>,
        /// Output image
        #[arg(long, default_value = "contributions.png")]
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose || cfg!(feature = "dev") {
        "contribviz=debug"
    } else {
        "contribviz=info"
    };
    let env = std::env::var(LOG_ENV).unwrap_or_else(|_| default.to_string());
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize the Tokio runtime
    let rt = Runtime::new().context("failed to start the async runtime")?;

    let command = cli.command.unwrap_or_else(|| Commands::View {
        document: std::env::var_os("CONTRIBVIZ_DOCUMENT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT)),
    });

    match command {
        Commands::View { document } => rt.block_on(run_viewer(ViewerConfig::with_document(document))),
        Commands::Generate { repo, output } => rt.block_on(generate_to_file(repo, output)),
        Commands::Render {
            document,
            author,
            file_types,
            output,
        } => rt.block_on(render_to_file(document, author, file_types, output)),
    }
}

async fn run_viewer(config: ViewerConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title("Contributions"),
        ..Default::default()
    };

    eframe::run_native(
        "Contributions",
        options,
        Box::new(move |cc| {
            // Configure default fonts and style
            let fonts = egui::FontDefinitions::default();
            cc.egui_ctx.set_fonts(fonts);

            let app: Arc<Mutex<App>> = Arc::new(Mutex::new(App::new(config)));
            App::spawn_load(Arc::clone(&app), cc.egui_ctx.clone());
            Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow!("error running application: {}", e))
}

async fn generate_to_file(repo: PathBuf, output: PathBuf) -> anyhow::Result<()> {
    let records = generate_document(&repo)
        .await
        .with_context(|| format!("failed to analyze {}", repo.display()))?;
    write_document(&records, &output)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(authors = records.len(), output = %output.display(), "document written");
    Ok(())
}

async fn render_to_file(
    document: PathBuf,
    author: Option<String>,
    file_types: Vec<String>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let store = DataStore::load(&document)
        .await
        .with_context(|| format!("failed to load {}", document.display()))?;

    let mut filter = FilterState::initial(&store);
    filter.select_author(AuthorSelection::from(author.clone()));
    if !file_types.is_empty() {
        filter.clear_file_types();
        filter.select_file_types(file_types);
    }

    let config = ViewerConfig::default();
    let mut chart = ChartController::new(BitmapSurface::new(config.theme, config.chart_style));
    if chart.render(&store, &filter)? == Redraw::Unchanged {
        bail!("no author named {:?} in {}", author.unwrap_or_default(), document.display());
    }

    let rendered = chart
        .active()
        .ok_or_else(|| anyhow!("no chart was produced"))?;
    rendered.save_png(&output)?;
    info!(output = %output.display(), "chart rendered");
    Ok(())
}
