//! Bounded in-memory window of recent events.
//!
//! Events are kept newest-first; inserting past the bound evicts the oldest.
//! The window is guarded by a single `RwLock`: one writer for insert, evict,
//! and clear, snapshot reads for everything else, which is what keeps the
//! "unique id, bounded size, newest-first" invariants under a multi-threaded
//! runtime.

use std::collections::VecDeque;

use parking_lot::RwLock;

use crate::event::Event;

/// The bounded, ordered, in-memory collection of the most recent events.
pub struct EventWindow {
    events: RwLock<VecDeque<Event>>,
    max_events: usize,
}

impl EventWindow {
    /// Create an empty window holding at most `max_events` entries.
    /// A zero bound is clamped to one.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
            max_events: max_events.max(1),
        }
    }

    /// The configured bound.
    pub fn capacity(&self) -> usize {
        self.max_events
    }

    /// Current number of events held.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Insert an event at the front, evicting the oldest past the bound.
    pub fn insert(&self, event: Event) {
        let mut events = self.events.write();
        events.push_front(event);
        if events.len() > self.max_events {
            events.pop_back();
        }
    }

    /// Snapshot of one page in newest-first order.
    ///
    /// Out-of-range offsets give an empty page, never an error. The second
    /// element of the return value is the window size at snapshot time.
    pub fn page(&self, limit: usize, offset: usize) -> (Vec<Event>, usize) {
        let events = self.events.read();
        let total = events.len();
        let page = events.iter().skip(offset).take(limit).cloned().collect();
        (page, total)
    }

    /// The newest event, if any.
    pub fn latest(&self) -> Option<Event> {
        self.events.read().front().cloned()
    }

    /// Linear lookup by id. Evicted events are not found here.
    pub fn find(&self, id: &str) -> Option<Event> {
        self.events.read().iter().find(|e| e.id == id).cloned()
    }

    /// Drop every event, returning how many were held.
    pub fn clear(&self) -> usize {
        let mut events = self.events.write();
        let count = events.len();
        events.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn test_event(tag: &str) -> Event {
        Event::capture(
            "POST",
            "/hook",
            BTreeMap::new(),
            BTreeMap::new(),
            Some(serde_json::json!({ "tag": tag })),
        )
    }

    #[test]
    fn test_insert_is_newest_first() {
        let window = EventWindow::new(10);
        let e1 = test_event("first");
        let e2 = test_event("second");
        window.insert(e1.clone());
        window.insert(e2.clone());

        let (page, total) = window.page(10, 0);
        assert_eq!(total, 2);
        assert_eq!(page[0].id, e2.id);
        assert_eq!(page[1].id, e1.id);
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let window = EventWindow::new(2);
        let e1 = test_event("e1");
        let e2 = test_event("e2");
        let e3 = test_event("e3");
        window.insert(e1.clone());
        window.insert(e2.clone());
        window.insert(e3.clone());

        assert_eq!(window.len(), 2);
        let (page, _) = window.page(10, 0);
        assert_eq!(page[0].id, e3.id);
        assert_eq!(page[1].id, e2.id);
        assert!(window.find(&e1.id).is_none());
    }

    #[test]
    fn test_size_stabilizes_at_bound() {
        let window = EventWindow::new(5);
        for i in 0..50 {
            window.insert(test_event(&format!("e{}", i)));
        }
        assert_eq!(window.len(), 5);

        // the five most recent, newest first
        let (page, _) = window.page(10, 0);
        let tags: Vec<String> = page
            .iter()
            .map(|e| e.body.as_ref().unwrap()["tag"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(tags, vec!["e49", "e48", "e47", "e46", "e45"]);
    }

    #[test]
    fn test_page_out_of_range_offset_is_empty() {
        let window = EventWindow::new(10);
        window.insert(test_event("only"));

        let (page, total) = window.page(50, 100);
        assert!(page.is_empty());
        assert_eq!(total, 1);
    }

    #[test]
    fn test_page_returns_min_of_limit_and_remainder() {
        let window = EventWindow::new(100);
        for i in 0..10 {
            window.insert(test_event(&format!("e{}", i)));
        }

        let (page, _) = window.page(3, 0);
        assert_eq!(page.len(), 3);

        let (page, _) = window.page(50, 7);
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn test_latest_and_find() {
        let window = EventWindow::new(10);
        assert!(window.latest().is_none());

        let e1 = test_event("e1");
        let e2 = test_event("e2");
        window.insert(e1.clone());
        window.insert(e2.clone());

        assert_eq!(window.latest().unwrap().id, e2.id);
        assert_eq!(window.find(&e1.id).unwrap().id, e1.id);
        assert!(window.find("missing").is_none());
    }

    #[test]
    fn test_clear_returns_count_and_empties() {
        let window = EventWindow::new(10);
        for i in 0..5 {
            window.insert(test_event(&format!("e{}", i)));
        }

        assert_eq!(window.clear(), 5);
        assert!(window.is_empty());
        assert!(window.latest().is_none());
        assert_eq!(window.clear(), 0);
    }

    #[test]
    fn test_zero_capacity_clamps_to_one() {
        let window = EventWindow::new(0);
        window.insert(test_event("a"));
        window.insert(test_event("b"));
        assert_eq!(window.len(), 1);
    }
}
