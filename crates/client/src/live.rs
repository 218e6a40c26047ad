//! # Live Updates
//!
//! Adapter between a push channel delivering appointment payloads and the
//! shared [`AppointmentBook`]. The transport itself (websocket, SSE, ...) only
//! has to hand frames to a [`LiveUpdateSource`]; reconnection is its concern.
//!
//! A [`LiveSubscription`] lives as long as the calendar screen that opened it.
//! Dropping it stops the feed, so no update lands after the screen is gone.

use async_trait::async_trait;
use barbershop_core::{
    errors::{BookingError, BookingResult},
    models::appointment::Appointment,
    reconciler::{AppointmentBook, LiveUpdateOutcome},
};
use std::sync::Arc;
use tokio::{
    sync::{RwLock, mpsc},
    task::JoinHandle,
};
use tracing::{debug, warn};

pub type SharedBook = Arc<RwLock<AppointmentBook>>;

#[async_trait]
pub trait LiveUpdateSource: Send {
    /// The next pushed appointment, or `None` once the channel has closed.
    async fn next_update(&mut self) -> Option<Appointment>;
}

#[async_trait]
impl LiveUpdateSource for mpsc::Receiver<Appointment> {
    async fn next_update(&mut self) -> Option<Appointment> {
        self.recv().await
    }
}

/// Parses one text frame from the push channel.
pub fn parse_live_message(frame: &str) -> BookingResult<Appointment> {
    serde_json::from_str(frame).map_err(|e| BookingError::Internal(Box::new(e)))
}

/// Raw JSON frames from a transport. Malformed frames are logged and skipped.
pub struct JsonFrameSource {
    frames: mpsc::Receiver<String>,
}

impl JsonFrameSource {
    pub fn new(frames: mpsc::Receiver<String>) -> Self {
        Self { frames }
    }
}

#[async_trait]
impl LiveUpdateSource for JsonFrameSource {
    async fn next_update(&mut self) -> Option<Appointment> {
        while let Some(frame) = self.frames.recv().await {
            match parse_live_message(&frame) {
                Ok(appointment) => return Some(appointment),
                Err(e) => warn!("Dropping malformed live update: {}", e),
            }
        }
        None
    }
}

/// A running feed from a source into a shared book.
#[derive(Debug)]
pub struct LiveSubscription {
    handle: JoinHandle<()>,
}

impl LiveSubscription {
    pub fn spawn<S>(mut source: S, book: SharedBook) -> Self
    where
        S: LiveUpdateSource + 'static,
    {
        let handle = tokio::spawn(async move {
            while let Some(appointment) = source.next_update().await {
                let id = appointment.id.clone();
                let outcome = book.write().await.apply_live_update(appointment);
                match outcome {
                    LiveUpdateOutcome::Stale => {
                        warn!("Ignoring live update for {} older than the held copy", id)
                    }
                    outcome => debug!("Live update for {}: {:?}", id, outcome),
                }
            }
            debug!("Live update channel closed");
        });

        Self { handle }
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for LiveSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
