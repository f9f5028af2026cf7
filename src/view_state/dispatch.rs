//! Page-to-renderer dispatch.

use std::collections::HashMap;

use crate::state::Page;

/// Page shown for identifiers that name no page.
pub const FALLBACK_PAGE: Page = Page::BatchParse;

/// Resolve a page identifier, falling back to [`FALLBACK_PAGE`].
pub fn resolve_page(id: &str) -> Page {
    Page::from_id(id).unwrap_or(FALLBACK_PAGE)
}

/// Pure mapping from page to renderer.
///
/// `R` is whatever the front end renders with: a function pointer, a boxed
/// widget builder, or a plain description. Lookups never fail: unknown ids
/// and unregistered pages resolve to the fallback renderer.
#[derive(Debug, Clone)]
pub struct ViewDispatch<R> {
    renderers: HashMap<Page, R>,
    fallback: R,
}

impl<R> ViewDispatch<R> {
    /// Create a dispatcher whose fallback page renders with `fallback`.
    pub fn new(fallback: R) -> Self {
        Self {
            renderers: HashMap::new(),
            fallback,
        }
    }

    /// Register `renderer` for `page`. Registering [`FALLBACK_PAGE`]
    /// replaces the fallback renderer.
    pub fn register(mut self, page: Page, renderer: R) -> Self {
        if page == FALLBACK_PAGE {
            self.fallback = renderer;
        } else {
            self.renderers.insert(page, renderer);
        }
        self
    }

    pub fn dispatch_page(&self, page: Page) -> &R {
        self.renderers.get(&page).unwrap_or(&self.fallback)
    }

    pub fn dispatch(&self, id: &str) -> &R {
        self.dispatch_page(resolve_page(id))
    }

    /// True when `page` has its own renderer rather than the fallback.
    pub fn is_registered(&self, page: Page) -> bool {
        page == FALLBACK_PAGE || self.renderers.contains_key(&page)
    }
}
