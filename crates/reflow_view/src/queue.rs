//! Reflow events and the two lanes that carry them to the workers.
//!
//! Layout requests (`DocumentSet`, `CanvasResized`) go to the layout worker on one
//! lane; `LayoutComplete` goes to the render worker on the other. Each lane is a
//! `tokio` unbounded channel drained by a blocking worker thread. Closing the queue
//! drops both senders, so the workers' `blocking_recv` returns `None` once the
//! lanes are empty.

use log::debug;
use reflow_layout::Size;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

/// Why a new layout or paint is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflowEvent {
    /// A new document was attached to the view.
    DocumentSet,
    /// The viewport changed size.
    CanvasResized(Size),
    /// A layout pass published a new tree.
    LayoutComplete,
}

impl ReflowEvent {
    /// Whether the event is served by the layout worker.
    #[inline]
    pub const fn is_layout_request(self) -> bool {
        matches!(self, Self::DocumentSet | Self::CanvasResized(_))
    }
}

/// Layout request stamped with the epoch it was dispatched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutRequest {
    pub epoch: u64,
    pub event: ReflowEvent,
}

/// Sending side of both lanes.
#[derive(Debug)]
pub struct ReflowQueue {
    layout: Mutex<Option<mpsc::UnboundedSender<LayoutRequest>>>,
    repaint: Mutex<Option<mpsc::UnboundedSender<ReflowEvent>>>,
}

/// Receiving side of the layout lane.
#[derive(Debug)]
pub struct LayoutLane {
    receiver: mpsc::UnboundedReceiver<LayoutRequest>,
}

/// Receiving side of the repaint lane.
#[derive(Debug)]
pub struct RepaintLane {
    receiver: mpsc::UnboundedReceiver<ReflowEvent>,
}

impl ReflowQueue {
    pub fn new() -> (Self, LayoutLane, RepaintLane) {
        let (layout_tx, layout_rx) = mpsc::unbounded_channel();
        let (repaint_tx, repaint_rx) = mpsc::unbounded_channel();
        let queue = Self {
            layout: Mutex::new(Some(layout_tx)),
            repaint: Mutex::new(Some(repaint_tx)),
        };
        (
            queue,
            LayoutLane {
                receiver: layout_rx,
            },
            RepaintLane {
                receiver: repaint_rx,
            },
        )
    }

    /// Enqueue a layout request. Returns `false` if the queue is closed.
    pub fn push_layout(&self, request: LayoutRequest) -> bool {
        let sender = self.layout.lock().unwrap_or_else(PoisonError::into_inner);
        let sent = sender
            .as_ref()
            .is_some_and(|sender| sender.send(request).is_ok());
        if !sent {
            debug!("Reflow queue closed; dropping {:?}", request.event);
        }
        sent
    }

    /// Enqueue an event for the render worker. Returns `false` if the queue is
    /// closed.
    pub fn push_repaint(&self, event: ReflowEvent) -> bool {
        let sender = self.repaint.lock().unwrap_or_else(PoisonError::into_inner);
        let sent = sender
            .as_ref()
            .is_some_and(|sender| sender.send(event).is_ok());
        if !sent {
            debug!("Repaint lane closed; dropping {event:?}");
        }
        sent
    }

    /// Drop both senders. Already queued events are still delivered.
    pub fn close(&self) {
        self.layout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.repaint
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    pub fn is_closed(&self) -> bool {
        self.layout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl LayoutLane {
    /// Block until a request arrives, then drain whatever else is already queued
    /// and return only the newest request. `None` once the lane is closed and
    /// empty.
    pub fn recv_latest(&mut self) -> Option<LayoutRequest> {
        let mut latest = self.receiver.blocking_recv()?;
        while let Ok(next) = self.receiver.try_recv() {
            if next.epoch >= latest.epoch {
                latest = next;
            }
        }
        Some(latest)
    }
}

impl RepaintLane {
    /// Block until an event arrives. `None` once the lane is closed and empty.
    pub fn recv(&mut self) -> Option<ReflowEvent> {
        self.receiver.blocking_recv()
    }
}
