//! Page surface and rendering.
//!
//! The page elements the list controller drives (list container, loading
//! indicator, pagination block, address bar) are reached through the
//! [`ListSurface`] trait so the controller can run without a browser.

pub mod render;

use crate::listing::Listing;
use chrono::{DateTime, Utc};
use reqwest::Url;
use std::sync::{Mutex, PoisonError};

pub use render::render_list;

/// Page elements a list controller writes to.
///
pub trait ListSurface {
    /// Show or hide the loading indicator.
    fn set_loading(&self, loading: bool);
    /// Show or hide the server pagination block.
    fn set_pagination_visible(&self, visible: bool);
    /// Replace the whole content of the list container.
    fn replace_list(&self, html: String);
    /// Replace the page URL without navigating.
    fn replace_url(&self, url: &Url);
}

/// Values every card needs besides the item itself.
///
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    pub excerpt_words: usize,
}

/// A list item that knows how to draw itself as a card.
///
pub trait Card: Listing {
    /// Message of the empty state for this kind of item.
    const EMPTY_MESSAGE: &'static str;

    fn card(&self, ctx: &RenderContext) -> String;
}

/// Last values written to a [`BufferedSurface`].
///
#[derive(Debug, Clone)]
pub struct SurfaceSnapshot {
    pub list_html: String,
    pub loading: bool,
    pub pagination_visible: bool,
    pub url: Option<Url>,
    /// Number of list replacements so far.
    pub renders: usize,
    /// Every loading indicator change, in order.
    pub loading_history: Vec<bool>,
}

impl Default for SurfaceSnapshot {
    fn default() -> Self {
        SurfaceSnapshot {
            list_html: String::new(),
            loading: false,
            pagination_visible: true,
            url: None,
            renders: 0,
            loading_history: Vec::new(),
        }
    }
}

/// In-memory surface that records what the controller wrote.
///
#[derive(Debug, Default)]
pub struct BufferedSurface {
    inner: Mutex<SurfaceSnapshot>,
}

impl BufferedSurface {
    pub fn new() -> Self {
        BufferedSurface::default()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, change: impl FnOnce(&mut SurfaceSnapshot)) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut guard);
    }
}

impl ListSurface for BufferedSurface {
    fn set_loading(&self, loading: bool) {
        self.update(|s| {
            s.loading = loading;
            s.loading_history.push(loading);
        });
    }

    fn set_pagination_visible(&self, visible: bool) {
        self.update(|s| s.pagination_visible = visible);
    }

    fn replace_list(&self, html: String) {
        self.update(|s| {
            s.list_html = html;
            s.renders += 1;
        });
    }

    fn replace_url(&self, url: &Url) {
        self.update(|s| s.url = Some(url.clone()));
    }
}
