//! SPA navigation watcher
//!
//! Single-page feeds swap content by rewriting the URL without a page load.
//! The host reports every URL it observes (typically from a DOM mutation
//! callback, so the same URL arrives many times); the watcher turns that
//! noisy stream into "entered content X" and "left scope" signals.

use crate::url::{extract_path, segment_after};

/// A deduplicated navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationSignal {
    /// Entered in-scope content with the given id
    Entered(String),
    /// The location is no longer in scope
    LeftScope,
}

/// Tracks the last observed URL and content id.
///
/// The cursor is never persisted; a fresh page starts with it empty.
#[derive(Debug, Clone)]
pub struct NavigationWatcher {
    marker: String,
    last_seen_url: String,
    last_seen_content_id: String,
}

impl NavigationWatcher {
    /// Watch for content under the `/{segment}/` path marker.
    pub fn new(segment: &str) -> Self {
        Self {
            marker: format!("/{segment}/"),
            last_seen_url: String::new(),
            last_seen_content_id: String::new(),
        }
    }

    pub fn is_in_scope(&self, url: &str) -> bool {
        extract_path(url).contains(self.marker.as_str())
    }

    /// First path segment after the marker; empty if there is none.
    pub fn extract_content_id(&self, url: &str) -> String {
        segment_after(extract_path(url), &self.marker).to_string()
    }

    /// Eager check for the location the page loaded at.
    ///
    /// Records `url` as seen so the first mutation on the same URL is not
    /// processed twice. Out-of-scope start locations produce no signal.
    pub fn start(&mut self, url: &str) -> Option<NavigationSignal> {
        self.last_seen_url = url.to_string();
        if !self.is_in_scope(url) {
            return None;
        }
        log::debug!("initial in-scope load: {url}");
        self.evaluate(url)
    }

    /// Handle a URL reported by the host's observation mechanism.
    pub fn on_url_observed(&mut self, url: &str) -> Option<NavigationSignal> {
        if url == self.last_seen_url {
            return None;
        }
        self.last_seen_url = url.to_string();
        log::debug!("url changed: {url}");
        self.evaluate(url)
    }

    fn evaluate(&mut self, url: &str) -> Option<NavigationSignal> {
        if !self.is_in_scope(url) {
            return Some(NavigationSignal::LeftScope);
        }

        let content_id = self.extract_content_id(url);
        if content_id.is_empty() {
            return None;
        }

        if content_id == self.last_seen_content_id {
            log::debug!("same content {content_id}, skipping");
            return None;
        }

        log::debug!("new content {content_id}");
        self.last_seen_content_id = content_id.clone();
        Some(NavigationSignal::Entered(content_id))
    }

    pub fn last_seen_url(&self) -> &str {
        &self.last_seen_url
    }

    pub fn last_seen_content_id(&self) -> &str {
        &self.last_seen_content_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watcher() -> NavigationWatcher {
        NavigationWatcher::new("reel")
    }

    fn entered(id: &str) -> Option<NavigationSignal> {
        Some(NavigationSignal::Entered(id.to_string()))
    }

    #[test]
    fn test_extract_content_id() {
        let w = watcher();
        assert_eq!(w.extract_content_id("https://x/reel/ABC123?ref=1"), "ABC123");
        assert_eq!(w.extract_content_id("https://x/reel/ABC123/#c"), "ABC123");
        assert_eq!(w.extract_content_id("https://x/reel/"), "");
        assert_eq!(w.extract_content_id("https://x/watch/"), "");
    }

    #[test]
    fn test_is_in_scope() {
        let w = watcher();
        assert!(w.is_in_scope("https://www.facebook.com/reel/123"));
        assert!(w.is_in_scope("https://x/reel/"));
        assert!(!w.is_in_scope("https://x/reels"));
        assert!(!w.is_in_scope("https://x/home?next=/reel/1"));
    }

    #[test]
    fn test_unchanged_url_is_ignored() {
        let mut w = watcher();
        assert_eq!(w.on_url_observed("https://x/reel/A"), entered("A"));
        assert_eq!(w.on_url_observed("https://x/reel/A"), None);
        assert_eq!(w.on_url_observed("https://x/reel/A"), None);
    }

    #[test]
    fn test_same_content_different_url_is_suppressed() {
        let mut w = watcher();
        assert_eq!(w.on_url_observed("https://x/reel/A"), entered("A"));
        assert_eq!(w.on_url_observed("https://x/reel/A?s=1"), None);
        assert_eq!(w.on_url_observed("https://x/reel/A/comments"), None);
        assert_eq!(w.on_url_observed("https://x/reel/B"), entered("B"));
        assert_eq!(w.last_seen_content_id(), "B");
    }

    #[test]
    fn test_left_scope() {
        let mut w = watcher();
        w.on_url_observed("https://x/reel/A");
        assert_eq!(w.on_url_observed("https://x/home"), Some(NavigationSignal::LeftScope));
        assert_eq!(w.last_seen_url(), "https://x/home");
    }

    #[test]
    fn test_content_id_survives_leaving_scope() {
        let mut w = watcher();
        w.on_url_observed("https://x/reel/A");
        w.on_url_observed("https://x/home");
        assert_eq!(w.on_url_observed("https://x/reel/A"), None);
    }

    #[test]
    fn test_empty_content_id_ignored() {
        let mut w = watcher();
        assert_eq!(w.on_url_observed("https://x/reel/"), None);
        assert_eq!(w.last_seen_content_id(), "");
    }

    #[test]
    fn test_start_in_scope() {
        let mut w = watcher();
        assert_eq!(w.start("https://x/reel/A"), entered("A"));
        // The first mutation on the load URL is not a change.
        assert_eq!(w.on_url_observed("https://x/reel/A"), None);
    }

    #[test]
    fn test_start_out_of_scope() {
        let mut w = watcher();
        assert_eq!(w.start("https://x/home"), None);
        assert_eq!(w.on_url_observed("https://x/home"), None);
        assert_eq!(w.on_url_observed("https://x/reel/A"), entered("A"));
    }
}
