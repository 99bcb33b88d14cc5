//! Playback transport: the clock that decides when the host seeks, plays
//! and stops.
//!
//! Every tick while playing pushes a seek notification (continuous push,
//! not only on discontinuities). Reaching the end without looping clamps to
//! the duration, stops, and emits exactly one stop with no seek for that
//! tick.

use log::debug;

use crate::core::host::{HostEvent, HostLink};
use crate::entities::clip::{Clip, MIN_DURATION};

/// Playback speed floor.
pub const MIN_SPEED: f32 = 0.01;

/// Event keyframes within this absolute window of the playhead always fire.
const EVENT_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct Transport {
    pub current_time: f32,
    pub playing: bool,
    pub looping: bool,
    pub speed: f32,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            playing: false,
            looping: false,
            speed: 1.0,
        }
    }
}

impl Transport {
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.playing = false;
    }

    /// Advance the clock by `delta_seconds * speed` and notify the host.
    pub fn tick(&mut self, delta_seconds: f32, clip: &Clip, animation: &str, host: &mut HostLink) {
        if !self.playing || delta_seconds <= 0.0 {
            return;
        }
        let duration = clip.duration.max(MIN_DURATION);
        let mut next = self.current_time + delta_seconds * self.speed;
        if next > duration {
            if self.looping {
                next %= duration;
                debug!("playback wrapped to {next:.3}s");
            } else {
                self.current_time = duration;
                self.playing = false;
                debug!("playback reached end, stopping");
                host.emit(HostEvent::Stop { animation: animation.to_string() });
                return;
            }
        }
        self.current_time = next;
        host.emit(HostEvent::Seek { animation: animation.to_string(), time: next });
        dispatch_events(clip, next, host);
    }
}

/// Fire every event keyframe due at `time`: within [`EVENT_EPSILON`], or
/// inside the trailing frame window `(time - 1/frameRate, time]`.
pub fn dispatch_events(clip: &Clip, time: f32, host: &mut HostLink) {
    let frame_window = 1.0 / clip.frame_rate.max(1.0);
    for event in &clip.event_track {
        if (event.time - time).abs() < EVENT_EPSILON
            || (event.time <= time && event.time > time - frame_window)
        {
            host.emit(HostEvent::ClipEvent {
                name: event.name.clone(),
                payload: event.payload.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::clip::EventKeyframe;

    fn clip() -> Clip {
        Clip::new("walk", 8.0, 30.0)
    }

    #[test]
    fn test_looping_wraps_time() {
        let mut transport = Transport { current_time: 7.5, playing: true, looping: true, speed: 2.0 };
        let mut host = HostLink::new();
        transport.tick(1.0, &clip(), "walk", &mut host);
        assert!((transport.current_time - 1.5).abs() < 1e-5);
        assert!(transport.playing);
        let events = host.poll();
        assert!(matches!(events[0], HostEvent::Seek { time, .. } if (time - 1.5).abs() < 1e-5));
    }

    #[test]
    fn test_end_stop_emits_one_stop_no_seek() {
        let mut transport = Transport { current_time: 7.9, playing: true, looping: false, speed: 1.0 };
        let mut host = HostLink::new();
        transport.tick(0.5, &clip(), "walk", &mut host);
        assert_eq!(transport.current_time, 8.0);
        assert!(!transport.playing);
        let events = host.poll();
        assert_eq!(events, vec![HostEvent::Stop { animation: "walk".into() }]);
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut transport = Transport::default();
        let mut host = HostLink::new();
        transport.tick(1.0, &clip(), "walk", &mut host);
        assert_eq!(transport.current_time, 0.0);
        assert!(host.poll().is_empty());
    }

    #[test]
    fn test_every_playing_tick_seeks() {
        let mut transport = Transport { current_time: 0.0, playing: true, looping: false, speed: 1.0 };
        let mut host = HostLink::new();
        for _ in 0..3 {
            transport.tick(0.1, &clip(), "walk", &mut host);
        }
        let seeks = host.poll().iter().filter(|e| matches!(e, HostEvent::Seek { .. })).count();
        assert_eq!(seeks, 3);
    }

    #[test]
    fn test_event_dispatch_window() {
        let mut c = clip();
        c.add_event(EventKeyframe { time: 1.0, name: "step".into(), payload: String::new() });
        c.add_event(EventKeyframe { time: 2.0, name: "far".into(), payload: String::new() });
        let mut host = HostLink::new();

        // Playhead just past the event, inside the frame window (1/30 s)
        dispatch_events(&c, 1.02, &mut host);
        let events = host.poll();
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], HostEvent::ClipEvent { name, .. } if name == "step"));

        // Outside the window: nothing fires
        dispatch_events(&c, 1.2, &mut host);
        assert!(host.poll().is_empty());

        // An event slightly ahead still fires within the epsilon
        dispatch_events(&c, 0.9995, &mut host);
        assert_eq!(host.poll().len(), 1);
    }
}
