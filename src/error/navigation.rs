//! Navigation guard errors.

use thiserror::Error;

use crate::state::navigation::{Mode, Page};

/// A rejected navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The page exists but belongs to the other mode.
    #[error("page '{page}' is not part of {mode} mode")]
    PageNotInMode { page: Page, mode: Mode },

    /// The identifier does not name any page.
    #[error("unknown page '{0}'")]
    UnknownPage(String),

    /// Bindings for one mode were requested while the other mode is active.
    #[error("{requested} bindings are unavailable while in {active} mode")]
    ModeMismatch { requested: Mode, active: Mode },
}
