use tracing::{debug, warn};

use super::spec::ChartSpec;
use crate::analysis::{aggregate, ChartData, DataStore, FilterState};
use crate::error::Result;
use crate::types::CommitSummary;

/// A place charts can be drawn on.
///
/// A surface hands out chart instances and takes them back for release;
/// the controller guarantees at most one instance is alive at a time.
pub trait ChartSurface {
    type Chart;

    fn create(&mut self, spec: &ChartSpec) -> Result<Self::Chart>;

    fn destroy(&mut self, chart: Self::Chart);
}

/// The commits listed next to a single-author chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitPanel {
    author: Option<String>,
    commits: Vec<CommitSummary>,
}

impl CommitPanel {
    pub fn clear(&mut self) {
        self.author = None;
        self.commits.clear();
    }

    pub fn show(&mut self, author: &str, commits: &[CommitSummary]) {
        self.author = Some(author.to_string());
        self.commits = commits.to_vec();
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn commits(&self) -> &[CommitSummary] {
        &self.commits
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none()
    }
}

/// Outcome of a render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Drawn,
    /// The selected author was not found; chart and commit panel are untouched.
    Unchanged,
}

/// Owns the single live chart and the commit panel that goes with it.
pub struct ChartController<S: ChartSurface> {
    surface: S,
    active: Option<S::Chart>,
    spec: Option<ChartSpec>,
    commit_panel: CommitPanel,
    generation: u64,
}

impl<S: ChartSurface> ChartController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            active: None,
            spec: None,
            commit_panel: CommitPanel::default(),
            generation: 0,
        }
    }

    /// Recompute the chart for `filter` and replace the live chart with it.
    pub fn render(&mut self, store: &DataStore, filter: &FilterState) -> Result<Redraw> {
        let Some(data) = aggregate(store, filter) else {
            warn!(author = %filter.author(), "selected author not found, keeping current chart");
            return Ok(Redraw::Unchanged);
        };

        let spec = ChartSpec::from_data(&data);
        self.teardown();

        match &data {
            ChartData::AuthorTotals(_) => self.commit_panel.clear(),
            ChartData::FileTypeBreakdown(breakdown) => {
                let commits = store
                    .get(&breakdown.author)
                    .map(|record| record.commits.as_slice())
                    .unwrap_or_default();
                self.commit_panel.show(&breakdown.author, commits);
            }
        }

        let chart = self.surface.create(&spec)?;
        self.active = Some(chart);
        self.spec = Some(spec);
        self.generation += 1;
        debug!(generation = self.generation, "chart redrawn");

        Ok(Redraw::Drawn)
    }

    /// Release the live chart, if any.
    pub fn teardown(&mut self) {
        if let Some(chart) = self.active.take() {
            self.surface.destroy(chart);
        }
        self.spec = None;
    }

    pub fn active(&self) -> Option<&S::Chart> {
        self.active.as_ref()
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        self.spec.as_ref()
    }

    /// Number of chart instances currently alive: zero or one.
    pub fn live_charts(&self) -> usize {
        usize::from(self.active.is_some())
    }

    pub fn commit_panel(&self) -> &CommitPanel {
        &self.commit_panel
    }

    /// Incremented on every successful redraw.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<S: ChartSurface> Drop for ChartController<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
