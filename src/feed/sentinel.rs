//! Scroll-proximity trigger for loading more items.
//!
//! The sentinel is an imaginary row just past the end of the list.  When it
//! would be on screen, or the selection is within `distance` rows of the last
//! item, the view should ask its [`FeedLoader`](super::FeedLoader) for another
//! page.  The sentinel has no notion of in-flight or exhausted feeds; the
//! loader already ignores requests it cannot serve.

/// Decides when the end of a scrolled list is near.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSentinel {
    distance: usize,
}

impl ScrollSentinel {
    pub fn new(distance: usize) -> Self {
        Self { distance }
    }

    /// Whether the sentinel is visible.
    ///
    /// * `selected`: the highlighted row, if any.
    /// * `len`: number of rows in the list.
    /// * `viewport`: rows the list can show at once (`0` if not yet drawn).
    pub fn is_visible(&self, selected: Option<usize>, len: usize, viewport: usize) -> bool {
        if len == 0 || len <= viewport {
            return true;
        }
        let position = selected.unwrap_or(0);
        position.saturating_add(self.distance) >= len - 1
    }
}

impl Default for ScrollSentinel {
    fn default() -> Self {
        Self::new(2)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
