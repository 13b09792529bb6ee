use plotters::style::RGBColor;

use super::styles::{author_color, ADDED_COLOR, REMOVED_COLOR};
use crate::analysis::{AuthorTotals, ChartData, FileTypeBreakdown};

/// One pie sector.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub label: String,
    pub value: u64,
    pub color: RGBColor,
}

/// One bar series; `values[i]` belongs to `categories[i]` of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<u64>,
    pub color: RGBColor,
}

/// Everything needed to draw a chart, independent of the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    /// Share of added lines per author.
    Proportion { title: String, sectors: Vec<Sector> },
    /// Added vs removed lines per file type.
    GroupedBar {
        title: String,
        categories: Vec<String>,
        series: Vec<Series>,
    },
}

impl ChartSpec {
    pub fn from_data(data: &ChartData) -> Self {
        match data {
            ChartData::AuthorTotals(totals) => Self::proportion(totals),
            ChartData::FileTypeBreakdown(breakdown) => Self::grouped_bar(breakdown),
        }
    }

    pub fn proportion(totals: &AuthorTotals) -> Self {
        let sectors = totals
            .iter()
            .enumerate()
            .map(|(index, (author, total))| Sector {
                label: author.to_string(),
                value: total,
                color: author_color(index),
            })
            .collect();

        ChartSpec::Proportion {
            title: "Contributions".to_string(),
            sectors,
        }
    }

    pub fn grouped_bar(breakdown: &FileTypeBreakdown) -> Self {
        ChartSpec::GroupedBar {
            title: format!("{}: lines by file type", breakdown.author),
            categories: breakdown.file_types.clone(),
            series: vec![
                Series {
                    label: "Added Lines".to_string(),
                    values: breakdown.added.clone(),
                    color: ADDED_COLOR,
                },
                Series {
                    label: "Removed Lines".to_string(),
                    values: breakdown.removed.clone(),
                    color: REMOVED_COLOR,
                },
            ],
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Proportion { title, .. } | ChartSpec::GroupedBar { title, .. } => title,
        }
    }
}
