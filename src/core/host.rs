//! Host notification link.
//!
//! The engine only decides *when* playback notifications happen; the host
//! editor owns actually animating the targets. Notifications queue here and
//! the host drains them once per turn with [`HostLink::poll`]. The queue is
//! bounded; a stalled host loses the oldest half with a warning instead of
//! growing without limit.

use log::warn;

/// Maximum queued notifications before the oldest are evicted.
const MAX_QUEUE_SIZE: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Move the animated targets to `time`.
    Seek { animation: String, time: f32 },
    /// Playback started.
    Play { animation: String, looping: bool, speed: f32 },
    /// Playback stopped (end reached or paused).
    Stop { animation: String },
    /// An event keyframe fired during playback.
    ClipEvent { name: String, payload: String },
}

#[derive(Debug, Default)]
pub struct HostLink {
    queue: Vec<HostEvent>,
}

impl HostLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: HostEvent) {
        if self.queue.len() >= MAX_QUEUE_SIZE {
            let evict = self.queue.len() / 2;
            warn!("host queue full ({} events), evicting oldest {}", self.queue.len(), evict);
            self.queue.drain(0..evict);
        }
        self.queue.push(event);
    }

    /// Drain all queued notifications, in emission order.
    pub fn poll(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}
