//! Optimistic per-photo interaction flags.
//!
//! Likes and bookmarks are flipped locally the moment the user taps and are
//! never reconciled with a server. The displayed like count is derived at read
//! time from the photo's base count and never written back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::event::PhotoId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    pub liked: bool,
    pub bookmarked: bool,
}

impl InteractionState {
    #[must_use]
    pub const fn displayed_like_count(self, base: u64) -> u64 {
        base.saturating_add(self.liked as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionTracker {
    states: HashMap<PhotoId, InteractionState>,
}

impl InteractionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flags for `photo_id`; unseen photos read as all-false without
    /// being recorded.
    #[must_use]
    pub fn state(&self, photo_id: &PhotoId) -> InteractionState {
        self.states.get(photo_id).copied().unwrap_or_default()
    }

    /// Creates the entry the first time a photo is viewed.
    pub fn ensure(&mut self, photo_id: &PhotoId) -> &mut InteractionState {
        self.states.entry(photo_id.clone()).or_default()
    }

    /// Returns the new value.
    pub fn toggle_liked(&mut self, photo_id: &PhotoId) -> bool {
        let state = self.ensure(photo_id);
        state.liked = !state.liked;
        state.liked
    }

    /// Returns the new value.
    pub fn toggle_bookmarked(&mut self, photo_id: &PhotoId) -> bool {
        let state = self.ensure(photo_id);
        state.bookmarked = !state.bookmarked;
        state.bookmarked
    }

    #[must_use]
    pub fn display_like_count(&self, photo_id: &PhotoId, base: u64) -> u64 {
        self.state(photo_id).displayed_like_count(base)
    }

    #[must_use]
    pub fn is_tracked(&self, photo_id: &PhotoId) -> bool {
        self.states.contains_key(photo_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> PhotoId {
        PhotoId::new(s)
    }

    #[test]
    fn like_adds_one_and_unlike_restores() {
        let mut tracker = InteractionTracker::new();
        let p1 = id("p1");

        assert_eq!(tracker.display_like_count(&p1, 1234), 1234);
        assert!(tracker.toggle_liked(&p1));
        assert_eq!(tracker.display_like_count(&p1, 1234), 1235);
        assert!(!tracker.toggle_liked(&p1));
        assert_eq!(tracker.display_like_count(&p1, 1234), 1234);
    }

    #[test]
    fn reading_does_not_create_state() {
        let tracker = InteractionTracker::new();
        assert_eq!(tracker.state(&id("p1")), InteractionState::default());
        assert_eq!(tracker.display_like_count(&id("p1"), 5), 5);
        assert!(tracker.is_empty());
    }

    #[test]
    fn ensure_creates_lazily_once() {
        let mut tracker = InteractionTracker::new();
        tracker.ensure(&id("p1"));
        tracker.toggle_bookmarked(&id("p1"));
        tracker.ensure(&id("p1"));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.state(&id("p1")).bookmarked);
        assert!(tracker.is_tracked(&id("p1")));
    }

    #[test]
    fn bookmark_does_not_affect_like() {
        let mut tracker = InteractionTracker::new();
        tracker.toggle_bookmarked(&id("p1"));
        let state = tracker.state(&id("p1"));
        assert!(state.bookmarked);
        assert!(!state.liked);
    }

    #[test]
    fn count_saturates() {
        let state = InteractionState {
            liked: true,
            bookmarked: false,
        };
        assert_eq!(state.displayed_like_count(u64::MAX), u64::MAX);
    }

    proptest! {
        #[test]
        fn liked_matches_toggle_parity(toggles in 0usize..64) {
            let mut tracker = InteractionTracker::new();
            let p = id("p");
            for _ in 0..toggles {
                tracker.toggle_liked(&p);
            }
            prop_assert_eq!(tracker.state(&p).liked, toggles % 2 == 1);
        }

        #[test]
        fn display_count_is_a_pure_read(base in 0u64..1_000_000, liked in any::<bool>()) {
            let mut tracker = InteractionTracker::new();
            let p = id("p");
            if liked {
                tracker.toggle_liked(&p);
            }
            let first = tracker.display_like_count(&p, base);
            let second = tracker.display_like_count(&p, base);
            prop_assert_eq!(first, second);
            prop_assert_eq!(first, base + u64::from(liked));
        }

        #[test]
        fn photos_are_independent(ops in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..40)) {
            // Each op: (target photo A?, toggle like?). Photo B is only touched
            // when the first flag is false.
            let mut tracker = InteractionTracker::new();
            let (a, b) = (id("a"), id("b"));
            let mut expected_b = InteractionState::default();

            for (on_a, like) in ops {
                let target = if on_a { &a } else { &b };
                if like {
                    tracker.toggle_liked(target);
                } else {
                    tracker.toggle_bookmarked(target);
                }
                if !on_a {
                    if like {
                        expected_b.liked = !expected_b.liked;
                    } else {
                        expected_b.bookmarked = !expected_b.bookmarked;
                    }
                }
                prop_assert_eq!(tracker.state(&b), expected_b);
            }
        }
    }
}
