//! Observation hooks for archive and template events
//!
//! Components never log through a global logger directly. They receive an
//! [`Observer`] and report [`DocEvent`]s to it; [`TracingObserver`] forwards
//! those to `tracing`, [`RecordingObserver`] keeps them for assertions.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

/// Something worth reporting while handling a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocEvent {
    /// An archive was opened and its text extracted
    Opened { source: String, entries: usize },
    /// Opening an archive failed
    OpenFailed { source: String, error: String },
    /// A rebuilt archive was written out
    Exported { destination: String, bytes: u64 },
    /// Rebuilding or writing an archive failed
    ExportFailed { destination: String, error: String },
    /// The underlying file was released
    Closed { source: String },
    /// The document text did not compile as a template
    ParseFailed { error: String },
    /// Rendering the template against data failed
    RenderFailed { error: String },
}

/// Receiver for [`DocEvent`]s
pub trait Observer: Send + Sync {
    fn notify(&self, event: &DocEvent);
}

/// Shared observer handle as stored by documents and templates
pub type SharedObserver = Arc<dyn Observer>;

/// Forwards events to the `tracing` macros
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, event: &DocEvent) {
        match event {
            DocEvent::Opened { source, entries } => {
                info!("Read file `{}` ({} entries)", source, entries)
            }
            DocEvent::OpenFailed { source, error } => {
                warn!("Failed to open `{}`: {}", source, error)
            }
            DocEvent::Exported { destination, bytes } => {
                info!("Exported {} bytes to {}", bytes, destination)
            }
            DocEvent::ExportFailed { destination, error } => {
                warn!("Failed to export to {}: {}", destination, error)
            }
            DocEvent::Closed { source } => debug!("Closed `{}`", source),
            DocEvent::ParseFailed { error } => warn!("Template parse failed: {}", error),
            DocEvent::RenderFailed { error } => warn!("Template render failed: {}", error),
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn notify(&self, _event: &DocEvent) {}
}

/// Collects events in memory, in the order they were reported
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<DocEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<DocEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, event: &DocEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// The observer used when the caller does not supply one
pub fn default_observer() -> SharedObserver {
    Arc::new(TracingObserver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.notify(&DocEvent::Opened {
            source: "a.docx".to_string(),
            entries: 3,
        });
        observer.notify(&DocEvent::Closed {
            source: "a.docx".to_string(),
        });

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], DocEvent::Opened { entries: 3, .. }));
        assert!(matches!(events[1], DocEvent::Closed { .. }));
    }

    #[test]
    fn test_tracing_observer_accepts_all_events() {
        // No subscriber installed; forwarding must still be a no-op without panicking
        let observer = TracingObserver;
        observer.notify(&DocEvent::ParseFailed {
            error: "unexpected end".to_string(),
        });
        observer.notify(&DocEvent::Exported {
            destination: "<memory>".to_string(),
            bytes: 10,
        });
    }
}
