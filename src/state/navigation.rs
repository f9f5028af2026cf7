//! Dashboard navigation: active mode and page.
//!
//! The dashboard has two operating modes, each with its own page set.
//! [`NavigationState`] holds the `(mode, page)` pair and guarantees that the
//! page always belongs to the mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::NavigationError;

/// Operating mode of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Batch data processing: parse, clean, analyze and export.
    #[default]
    Batch,
    /// Model-driven setpoint optimization.
    Optimization,
}

impl Mode {
    /// Page shown when the mode is entered.
    pub fn default_page(self) -> Page {
        match self {
            Mode::Batch => Page::BatchParse,
            Mode::Optimization => Page::OptMapping,
        }
    }

    /// Pages belonging to this mode, in sidebar order.
    pub fn pages(self) -> impl Iterator<Item = Page> {
        Page::ALL.into_iter().filter(move |page| page.mode() == self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Batch => "batch",
            Mode::Optimization => "optimization",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dashboard page. Each page belongs to exactly one [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    BatchParse,
    BatchClean,
    BatchStats,
    BatchTimeseries,
    BatchCorrelation,
    BatchQuality,
    BatchExport,
    OptMapping,
    OptRealtime,
    OptImportance,
    OptHistory,
    OptTraining,
}

impl Page {
    pub const ALL: [Page; 12] = [
        Page::BatchParse,
        Page::BatchClean,
        Page::BatchStats,
        Page::BatchTimeseries,
        Page::BatchCorrelation,
        Page::BatchQuality,
        Page::BatchExport,
        Page::OptMapping,
        Page::OptRealtime,
        Page::OptImportance,
        Page::OptHistory,
        Page::OptTraining,
    ];

    /// Stable string identifier, e.g. `batch_parse`.
    pub fn id(self) -> &'static str {
        match self {
            Page::BatchParse => "batch_parse",
            Page::BatchClean => "batch_clean",
            Page::BatchStats => "batch_stats",
            Page::BatchTimeseries => "batch_timeseries",
            Page::BatchCorrelation => "batch_correlation",
            Page::BatchQuality => "batch_quality",
            Page::BatchExport => "batch_export",
            Page::OptMapping => "opt_mapping",
            Page::OptRealtime => "opt_realtime",
            Page::OptImportance => "opt_importance",
            Page::OptHistory => "opt_history",
            Page::OptTraining => "opt_training",
        }
    }

    pub fn from_id(id: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|page| page.id() == id)
    }

    pub fn mode(self) -> Mode {
        match self {
            Page::BatchParse
            | Page::BatchClean
            | Page::BatchStats
            | Page::BatchTimeseries
            | Page::BatchCorrelation
            | Page::BatchQuality
            | Page::BatchExport => Mode::Batch,
            Page::OptMapping
            | Page::OptRealtime
            | Page::OptImportance
            | Page::OptHistory
            | Page::OptTraining => Mode::Optimization,
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Page::BatchParse => "Parse Files",
            Page::BatchClean => "Clean Data",
            Page::BatchStats => "Statistics",
            Page::BatchTimeseries => "Time Series",
            Page::BatchCorrelation => "Correlation",
            Page::BatchQuality => "Data Quality",
            Page::BatchExport => "Export",
            Page::OptMapping => "Feature Mapping",
            Page::OptRealtime => "Real-time Optimization",
            Page::OptImportance => "Feature Importance",
            Page::OptHistory => "History",
            Page::OptTraining => "Model Training",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Current `(mode, page)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub mode: Mode,
    pub page: Page,
}

impl Default for Location {
    fn default() -> Self {
        Self::entering(Mode::default())
    }
}

impl Location {
    fn entering(mode: Mode) -> Self {
        Self {
            mode,
            page: mode.default_page(),
        }
    }
}

/// Observable navigation state shared by the whole dashboard.
///
/// Starts in batch mode on the parse page. Switching mode always lands on
/// that mode's default page; selecting a page from the other mode is
/// rejected and leaves the state untouched.
#[derive(Debug)]
pub struct NavigationState {
    location: watch::Sender<Location>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        let (location, _) = watch::channel(Location::default());
        Self { location }
    }

    pub fn mode(&self) -> Mode {
        self.location.borrow().mode
    }

    pub fn current_page(&self) -> Page {
        self.location.borrow().page
    }

    pub fn location(&self) -> Location {
        *self.location.borrow()
    }

    /// Switch mode and reset the page to the mode's default.
    ///
    /// Re-selecting the active mode also resets the page.
    pub fn set_mode(&self, mode: Mode) {
        self.location.send_modify(|location| *location = Location::entering(mode));
        debug!(%mode, page = %mode.default_page(), "mode switched");
    }

    /// Select a page of the active mode.
    pub fn set_page(&self, page: Page) -> Result<(), NavigationError> {
        let mut rejected = None;
        self.location.send_if_modified(|location| {
            if page.mode() != location.mode {
                rejected = Some(location.mode);
                return false;
            }
            if location.page == page {
                return false;
            }
            location.page = page;
            true
        });

        match rejected {
            Some(mode) => {
                warn!(%page, %mode, "page rejected for active mode");
                Err(NavigationError::PageNotInMode { page, mode })
            }
            None => {
                debug!(%page, "page selected");
                Ok(())
            }
        }
    }

    /// Select a page by its string identifier.
    pub fn set_page_id(&self, id: &str) -> Result<(), NavigationError> {
        let page = Page::from_id(id).ok_or_else(|| NavigationError::UnknownPage(id.to_string()))?;
        self.set_page(page)
    }

    /// Receiver notified on every location change.
    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_batch_parse() {
        let nav = NavigationState::new();
        assert_eq!(nav.mode(), Mode::Batch);
        assert_eq!(nav.current_page(), Page::BatchParse);
    }

    #[test]
    fn test_set_mode_resets_page() {
        let nav = NavigationState::new();
        nav.set_page(Page::BatchStats).unwrap();

        nav.set_mode(Mode::Optimization);
        assert_eq!(nav.current_page(), Page::OptMapping);

        nav.set_page(Page::OptTraining).unwrap();
        nav.set_mode(Mode::Optimization);
        assert_eq!(nav.current_page(), Page::OptMapping);

        nav.set_mode(Mode::Batch);
        assert_eq!(nav.location(), Location { mode: Mode::Batch, page: Page::BatchParse });
    }

    #[test]
    fn test_cross_mode_page_rejected() {
        let nav = NavigationState::new();
        nav.set_page(Page::BatchClean).unwrap();

        let err = nav.set_page(Page::OptRealtime).unwrap_err();
        assert_eq!(
            err,
            NavigationError::PageNotInMode {
                page: Page::OptRealtime,
                mode: Mode::Batch
            }
        );
        assert_eq!(nav.current_page(), Page::BatchClean);
        assert_eq!(nav.mode(), Mode::Batch);
    }

    #[test]
    fn test_set_page_id() {
        let nav = NavigationState::new();
        nav.set_page_id("batch_export").unwrap();
        assert_eq!(nav.current_page(), Page::BatchExport);

        assert_eq!(
            nav.set_page_id("batch_nope"),
            Err(NavigationError::UnknownPage("batch_nope".to_string()))
        );
        assert_eq!(nav.current_page(), Page::BatchExport);
    }

    #[test]
    fn test_page_ids_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_id(page.id()), Some(page));
        }
        assert_eq!(Page::from_id(""), None);
    }

    #[test]
    fn test_mode_page_sets() {
        let batch: Vec<_> = Mode::Batch.pages().collect();
        let opt: Vec<_> = Mode::Optimization.pages().collect();
        assert_eq!(batch.len(), 7);
        assert_eq!(opt.len(), 5);
        assert_eq!(batch[0], Mode::Batch.default_page());
        assert_eq!(opt[0], Mode::Optimization.default_page());
        assert!(batch.iter().all(|p| p.id().starts_with("batch_")));
        assert!(opt.iter().all(|p| p.id().starts_with("opt_")));
    }

    #[test]
    fn test_subscriber_notified_on_change_only() {
        let nav = NavigationState::new();
        let mut rx = nav.subscribe();

        nav.set_page(Page::BatchParse).unwrap();
        assert!(!rx.has_changed().unwrap());

        let _ = nav.set_page(Page::OptHistory);
        assert!(!rx.has_changed().unwrap());

        nav.set_page(Page::BatchQuality).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().page, Page::BatchQuality);
    }

    #[test]
    fn test_display() {
        assert_eq!(Mode::Optimization.to_string(), "optimization");
        assert_eq!(Page::OptImportance.to_string(), "opt_importance");
        assert_eq!(Page::BatchTimeseries.label(), "Time Series");
    }
}
