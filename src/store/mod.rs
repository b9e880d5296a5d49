//! The Event Store: bounded in-memory window plus durable per-event files.
//!
//! Every HTTP endpoint is a thin adapter over this component. Capture is
//! "best effort durable, guaranteed in-memory": the window insert always
//! succeeds, and a failed file write is logged without failing the request.

mod files;
mod window;

pub use files::{FileStore, RecordInfo};
pub use window::EventWindow;

use std::collections::BTreeMap;
use std::path::Path;

use metrics::counter;
use tracing::{info, warn};

use crate::error::Result;
use crate::event::Event;

/// Outcome of one capture: the created event plus the durable file name,
/// `None` when the write failed.
#[derive(Debug, Clone)]
pub struct Captured {
    pub event: Event,
    pub saved_file: Option<String>,
}

/// One page of the in-memory window.
#[derive(Debug, Clone)]
pub struct EventPage {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub data: Vec<Event>,
}

/// Process-scoped store owning the window and the file backing.
///
/// Constructed once at startup and shared behind an `Arc` by every handler.
pub struct EventStore {
    window: EventWindow,
    files: FileStore,
}

impl EventStore {
    /// Open the store: bound the window and create the data directory if
    /// absent.
    pub fn open(data_dir: impl AsRef<Path>, max_events: usize) -> Result<Self> {
        Ok(Self {
            window: EventWindow::new(max_events),
            files: FileStore::open(data_dir.as_ref())?,
        })
    }

    /// Ingest one inbound request as a new event.
    ///
    /// The event is inserted at the front of the window (evicting the oldest
    /// past the bound) and then persisted. Persistence failure does not roll
    /// back the insert and does not fail the capture.
    pub async fn capture(
        &self,
        method: impl Into<String>,
        path: impl Into<String>,
        headers: BTreeMap<String, String>,
        query: BTreeMap<String, String>,
        body: Option<serde_json::Value>,
    ) -> Captured {
        let event = Event::capture(method, path, headers, query, body);
        self.window.insert(event.clone());
        counter!("capture_events_total", "method" => event.method.clone()).increment(1);

        let saved_file = match self.files.save(&event).await {
            Ok(name) => {
                info!(id = %event.id, file = %name, "Webhook captured and saved");
                Some(name)
            }
            Err(e) => {
                // capture still succeeds; the event stays in the window
                warn!(id = %event.id, error = %e, "Webhook captured but not persisted");
                None
            }
        };

        Captured { event, saved_file }
    }

    /// One page of the window, newest first.
    pub fn list(&self, limit: usize, offset: usize) -> EventPage {
        let (data, total) = self.window.page(limit, offset);
        EventPage {
            total,
            limit,
            offset,
            data,
        }
    }

    /// The newest in-memory event, if any.
    pub fn latest(&self) -> Option<Event> {
        self.window.latest()
    }

    /// In-memory lookup by id; evicted events are not reachable here.
    pub fn get_by_id(&self, id: &str) -> Option<Event> {
        self.window.find(id)
    }

    /// Empty the window, returning the removed count. Durable records are
    /// untouched.
    pub fn clear(&self) -> usize {
        let count = self.window.clear();
        info!(removed = count, "Cleared in-memory webhooks");
        count
    }

    /// Current window size.
    pub fn count(&self) -> usize {
        self.window.len()
    }

    /// All durable records, newest-modified first.
    pub async fn list_persisted(&self) -> Result<Vec<RecordInfo>> {
        self.files.list().await
    }

    /// One durable record by its file-name key.
    pub async fn read_persisted(&self, key: &str) -> Result<Event> {
        self.files.read(key).await
    }

    /// The storage directory.
    pub fn data_dir(&self) -> &Path {
        self.files.dir()
    }
}
