//! Walk notifications for visualization and telemetry

use crate::common::types::{stringify_path, Coordinate};
use log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedSender;

/// Planned or walked path of a single walk
#[derive(Debug, Clone, PartialEq)]
pub struct PathEvent {
    /// `true` for the planned path, `false` for the path actually walked
    pub calculated: bool,
    /// Human readable coordinate list
    pub path: String,
}

impl PathEvent {
    pub fn planned(points: &[Coordinate]) -> Self {
        PathEvent {
            calculated: true,
            path: stringify_path(points),
        }
    }

    pub fn walked(points: &[Coordinate]) -> Self {
        PathEvent {
            calculated: false,
            path: stringify_path(points),
        }
    }
}

/// A notification emitted while walking
#[derive(Debug, Clone, PartialEq)]
pub enum WalkEvent {
    PositionChanged { latitude: f64, longitude: f64 },
    Path(PathEvent),
}

/// Subscriber interface handed to walking strategies at construction
pub trait WalkEvents: Send + Sync {
    /// Cheap notification fired once per committed step or reached waypoint
    fn position_changed(&self, latitude: f64, longitude: f64);

    /// Planned path at the start of a walk, walked path at the end
    fn path(&self, event: PathEvent);
}

/// Forwards walk events onto a tokio channel
#[derive(Debug)]
pub struct ChannelEvents {
    sender: UnboundedSender<WalkEvent>,
    closed: AtomicBool,
}

impl ChannelEvents {
    pub fn new(sender: UnboundedSender<WalkEvent>) -> Self {
        ChannelEvents {
            sender,
            closed: AtomicBool::new(false),
        }
    }

    fn send(&self, event: WalkEvent) {
        if self.sender.send(event).is_err() && !self.closed.swap(true, Ordering::Relaxed) {
            warn!("Walk event receiver dropped, further events are discarded");
        }
    }
}

impl WalkEvents for ChannelEvents {
    fn position_changed(&self, latitude: f64, longitude: f64) {
        self.send(WalkEvent::PositionChanged {
            latitude,
            longitude,
        });
    }

    fn path(&self, event: PathEvent) {
        self.send(WalkEvent::Path(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn forwards_events_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = ChannelEvents::new(tx);

        events.path(PathEvent::planned(&[Coordinate::new(1.0, 2.0)]));
        events.position_changed(1.0, 2.0);

        assert_eq!(
            rx.try_recv().unwrap(),
            WalkEvent::Path(PathEvent {
                calculated: true,
                path: "{lat: 1, lng: 2}".to_string(),
            })
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            WalkEvent::PositionChanged {
                latitude: 1.0,
                longitude: 2.0
            }
        );
    }

    #[test]
    fn dropped_receiver_is_not_fatal() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let events = ChannelEvents::new(tx);
        events.position_changed(0.0, 0.0);
        events.position_changed(0.0, 0.0);
    }
}
