//! Per-artifact load outcomes and the aggregate report.

use colored::{ColoredString, Colorize};
use std::time::Duration;

/// What happened to one artifact during a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Not produced by this run, left alone
    SkippedNotBuilt,
    /// Already cached on the cluster nodes
    SkippedAlreadyPresent,
    /// Transferred into the nodes
    Loaded,
    /// Transfer failed
    Failed,
}

impl LoadOutcome {
    /// Console status word, `None` for silently skipped artifacts
    pub fn status_word(&self) -> Option<&'static str> {
        match self {
            LoadOutcome::SkippedNotBuilt => None,
            LoadOutcome::SkippedAlreadyPresent => Some("Found"),
            LoadOutcome::Loaded => Some("Loaded"),
            LoadOutcome::Failed => Some("Failed"),
        }
    }

    pub(crate) fn colored(&self) -> Option<ColoredString> {
        let word = self.status_word()?;
        Some(match self {
            LoadOutcome::Failed => word.red(),
            _ => word.green(),
        })
    }
}

/// Summary of a successful `load_images` call
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Every artifact in input order with its outcome
    pub entries: Vec<(String, LoadOutcome)>,
    /// Wall-clock time of the whole call
    pub elapsed: Duration,
    /// Node inventory queries issued, never more than one
    pub inventory_queries: usize,
}

impl LoadReport {
    fn with(&self, outcome: LoadOutcome) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, o)| *o == outcome)
            .map(|(tag, _)| tag.as_str())
            .collect()
    }

    pub fn loaded(&self) -> Vec<&str> {
        self.with(LoadOutcome::Loaded)
    }

    pub fn found(&self) -> Vec<&str> {
        self.with(LoadOutcome::SkippedAlreadyPresent)
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.with(LoadOutcome::SkippedNotBuilt)
    }
}
