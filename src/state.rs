use std::sync::Arc;

use crate::charts::{build_charts, ChartSet, ChartTab};
use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::filter::Selection;
use crate::data::loader::Upload;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Flow phases and the events that move between them
// ---------------------------------------------------------------------------

/// Where the dashboard is in the upload → select → render flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Nothing loaded yet.
    AwaitingFile,
    /// The last upload could not be loaded; stays here until a new upload.
    Failed { message: String },
    /// Dataset loaded but fewer than the minimum number of states picked.
    AwaitingSelection {
        dataset: Arc<Dataset>,
        selection: Selection,
        /// States still needed to unlock the charts.
        missing: usize,
    },
    Rendered {
        dataset: Arc<Dataset>,
        selection: Selection,
        charts: ChartSet,
    },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::AwaitingFile => "AwaitingFile",
            Phase::Failed { .. } => "Failed",
            Phase::AwaitingSelection { .. } => "AwaitingSelection",
            Phase::Rendered { .. } => "Rendered",
        }
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        match self {
            Phase::AwaitingSelection { dataset, .. } | Phase::Rendered { dataset, .. } => {
                Some(dataset)
            }
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Phase::AwaitingSelection { selection, .. } | Phase::Rendered { selection, .. } => {
                Some(selection)
            }
            _ => None,
        }
    }

    /// Charts exist only once the selection is large enough.
    pub fn charts(&self) -> Option<&ChartSet> {
        match self {
            Phase::Rendered { charts, .. } => Some(charts),
            _ => None,
        }
    }
}

/// A discrete user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    FileUploaded(Upload),
    /// The upload control could not hand over the file.
    UploadFailed(String),
    SelectionChanged(Vec<String>),
    /// Close the dataset and forget the cached upload.
    Reset,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Which of the three views is shown.
    pub active_tab: ChartTab,

    /// Status message from side actions such as exporting.
    pub status_message: Option<String>,

    phase: Phase,

    /// Dataset of the current upload; replaced by the next upload.
    cache: DatasetCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            active_tab: ChartTab::default(),
            status_message: None,
            phase: Phase::AwaitingFile,
            cache: DatasetCache::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[cfg(test)]
    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Apply one event. Every event replaces the phase with a freshly built one.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::FileUploaded(upload) => {
                self.transition(Phase::AwaitingFile);
                let next = self.load(&upload);
                self.transition(next);
            }
            Event::UploadFailed(message) => {
                log::error!("Upload failed: {message}");
                self.transition(Phase::Failed {
                    message: format!("Error reading file: {message}"),
                });
            }
            Event::SelectionChanged(states) => {
                let Some(dataset) = self.phase.dataset().cloned() else {
                    log::debug!("Ignoring selection change in {}", self.phase.name());
                    return;
                };
                let next = self.evaluate(dataset, Selection::new(states));
                self.transition(next);
            }
            Event::Reset => {
                self.cache.clear();
                self.transition(Phase::AwaitingFile);
            }
        }
    }

    /// Prompt shown while the selection is too small.
    pub fn selection_prompt(&self) -> String {
        format!(
            "Select at least {} states to continue.",
            self.config.min_selection
        )
    }

    fn transition(&mut self, next: Phase) {
        if self.phase.name() != next.name() {
            log::info!("{} -> {}", self.phase.name(), next.name());
        }
        self.phase = next;
        self.status_message = None;
    }

    fn load(&mut self, upload: &Upload) -> Phase {
        match self.cache.get_or_load(upload) {
            Ok(dataset) => {
                let selection = Selection::default_for(&dataset, self.config.default_selection);
                self.evaluate(dataset, selection)
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", upload.name);
                Phase::Failed {
                    message: format!("Error reading file: {e}"),
                }
            }
        }
    }

    fn evaluate(&self, dataset: Arc<Dataset>, selection: Selection) -> Phase {
        let selection = selection.restricted_to(&dataset);
        match selection.shortfall(self.config.min_selection) {
            Some(missing) => Phase::AwaitingSelection {
                dataset,
                selection,
                missing,
            },
            None => {
                let charts = build_charts(&dataset, &selection);
                Phase::Rendered {
                    dataset,
                    selection,
                    charts,
                }
            }
        }
    }
}
