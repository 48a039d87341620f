//! Application state.
//!
//! Shared state for all request handlers.

use crate::package::PackageStore;
use crate::render::Dispatcher;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Renders pages from the template set.
    pub(crate) dispatcher: Dispatcher,
    /// Package documents served by the site.
    pub(crate) packages: PackageStore,
}
