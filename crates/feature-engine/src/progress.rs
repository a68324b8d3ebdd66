//! Progress Reporting and Cancellation

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Receives progress notifications from the window driver
pub trait ProgressSink {
    /// A window has been fully processed
    fn on_window_done(&mut self, window: usize);

    /// A recording has been fully processed
    fn on_file_done(&mut self, file: usize) {
        let _ = file;
    }

    /// Number of recordings in the batch
    fn on_total_files(&mut self, total: usize) {
        let _ = total;
    }
}

/// Discards all notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_window_done(&mut self, _: usize) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    WindowDone(usize),
    FileDone(usize),
    TotalFiles(usize),
}

/// Forwards notifications to a channel, e.g. for a UI task
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelProgress {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: ProgressEvent) {
        // a dropped receiver only means nobody is watching
        let _ = self.tx.send(event);
    }
}

impl ProgressSink for ChannelProgress {
    fn on_window_done(&mut self, window: usize) {
        self.send(ProgressEvent::WindowDone(window));
    }

    fn on_file_done(&mut self, file: usize) {
        self.send(ProgressEvent::FileDone(file));
    }

    fn on_total_files(&mut self, total: usize) {
        self.send(ProgressEvent::TotalFiles(total));
    }
}

/// Cooperative cancellation flag shared between the caller and the driver
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
