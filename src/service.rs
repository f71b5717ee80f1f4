use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::automation::{LookupAutomation, LookupTarget, TickOutcome};
use crate::dispatch::{self, Destination, Routed};
use crate::settings::Settings;
use crate::snapshot::{SnapshotBuilder, SnapshotConfig};
use crate::uitree::{Desktop, FailureSink, OverlaySink};

enum Command {
    CaptureSnapshot,
    HandleText(Destination, String),
    RouteClipboard,
    StartLookup(String),
    CancelLookup,
    Shutdown,
}

/// Handle to the worker that owns the accessibility connection.
///
/// All introspection and actuation run on the worker thread, one command at
/// a time; the handle only enqueues. Dropping the handle shuts the worker
/// down and cancels any live lookup.
pub struct TextgrabService {
    sender: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

impl TextgrabService {
    pub fn spawn(
        settings: Settings,
        desktop: Box<dyn Desktop + Send>,
        overlay: Box<dyn OverlaySink + Send>,
        failures: Box<dyn FailureSink + Send>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::spawn(move || {
            Worker {
                settings,
                desktop,
                overlay,
                failures,
                lookup: None,
            }
            .run(receiver);
        });
        Self {
            sender,
            worker: Some(worker),
        }
    }

    /// Capture the currently visible text regions and hand them to the
    /// overlay sink.
    pub fn capture_snapshot(&self) {
        let _ = self.sender.send(Command::CaptureSnapshot);
    }

    /// Route `text` to `destination`.
    pub fn handle_text(&self, destination: Destination, text: impl Into<String>) {
        let _ = self
            .sender
            .send(Command::HandleText(destination, text.into()));
    }

    /// Route the current clipboard contents to the configured destination.
    pub fn route_clipboard(&self) {
        let _ = self.sender.send(Command::RouteClipboard);
    }

    /// Start an in-browser lookup for `text`, superseding any lookup still
    /// in flight.
    pub fn start_lookup(&self, text: impl Into<String>) {
        let _ = self.sender.send(Command::StartLookup(text.into()));
    }

    pub fn cancel_lookup(&self) {
        let _ = self.sender.send(Command::CancelLookup);
    }
}

impl Drop for TextgrabService {
    fn drop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct Worker {
    settings: Settings,
    desktop: Box<dyn Desktop + Send>,
    overlay: Box<dyn OverlaySink + Send>,
    failures: Box<dyn FailureSink + Send>,
    /// The at-most-one live automation, with the deadline of its next tick.
    lookup: Option<(LookupAutomation, Instant)>,
}

impl Worker {
    fn run(mut self, receiver: Receiver<Command>) {
        loop {
            let command = match self.lookup.as_ref().map(|(_, deadline)| *deadline) {
                // A lookup is in flight: wait for the next command, but no
                // longer than until its tick is due.
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(Instant::now());
                    match receiver.recv_timeout(timeout) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => {
                            self.tick_lookup();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => None,
                    }
                }
                None => receiver.recv().ok(),
            };
            let Some(command) = command else { break };
            match command {
                Command::CaptureSnapshot => self.capture_snapshot(),
                Command::HandleText(destination, text) => self.handle_text(destination, &text),
                Command::RouteClipboard => self.route_clipboard(),
                Command::StartLookup(text) => self.start_lookup(text),
                Command::CancelLookup => self.close_lookup(),
                Command::Shutdown => break,
            }
        }
        self.close_lookup();
    }

    fn capture_snapshot(&mut self) {
        let config = SnapshotConfig {
            grow_padding_px: self.settings.grow_padding_px,
            default_text_size_px: self.settings.default_text_size_px,
            implausibly_small_text_size_px: self.settings.implausibly_small_text_size_px,
        };
        let regions = SnapshotBuilder::new(config).build(&self.desktop.windows());
        self.overlay.present(regions);
    }

    fn handle_text(&mut self, destination: Destination, text: &str) {
        match dispatch::handle_text(&self.settings, destination, text) {
            Ok(Routed::Delivered) => {}
            Ok(Routed::NeedsLookup(text)) => self.start_lookup(text),
            Err(err) => tracing::error!("failed to route text: {err:#}"),
        }
    }

    fn route_clipboard(&mut self) {
        match dispatch::route_clipboard(&self.settings) {
            Ok(Routed::Delivered) => {}
            Ok(Routed::NeedsLookup(text)) => self.start_lookup(text),
            Err(err) => tracing::error!("failed to route clipboard: {err:#}"),
        }
    }

    fn start_lookup(&mut self, text: String) {
        // At most one automation alive: cancel before replacing.
        self.close_lookup();
        let target = LookupTarget {
            window_title: self.settings.browser_window_title.clone(),
            address_field_id: self.settings.address_field_id.clone(),
            results_container_id: self.settings.results_container_id.clone(),
            url_prefix: self.settings.lookup_url_prefix.clone(),
            max_retries: self.settings.lookup_max_retries,
        };
        let automation = LookupAutomation::new(self.desktop.as_ref(), target, text);
        self.lookup = Some((automation, Instant::now()));
        // The first tick runs eagerly rather than a poll interval from now.
        self.tick_lookup();
    }

    fn tick_lookup(&mut self) {
        let Some((mut automation, _)) = self.lookup.take() else {
            return;
        };
        match automation.tick(self.desktop.as_ref()) {
            TickOutcome::Reschedule => {
                let deadline =
                    Instant::now() + Duration::from_millis(self.settings.lookup_poll_interval_ms);
                self.lookup = Some((automation, deadline));
            }
            TickOutcome::Finished => automation.close(self.desktop.as_ref()),
            TickOutcome::GaveUp(state) => {
                self.failures
                    .report_failure(&format!("could not open the lookup page ({state})"));
                automation.close(self.desktop.as_ref());
            }
        }
    }

    fn close_lookup(&mut self) {
        if let Some((mut automation, _)) = self.lookup.take() {
            automation.close(self.desktop.as_ref());
        }
    }
}
