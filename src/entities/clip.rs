//! Clip: the top-level animation asset.
//!
//! A clip owns object tracks (one per animated target), each mapping dotted
//! property paths to property tracks, plus an event track ordered by time.
//! Duration is advisory for clamping new edits, never enforced retroactively
//! on keyframes that already exist.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::registry;
use crate::entities::track::PropertyTrack;

/// Floor applied wherever a duration is used as a divisor or window size.
pub const MIN_DURATION: f32 = 1e-3;

/// Named marker on the event track. No uniqueness constraint on time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventKeyframe {
    pub time: f32,
    pub name: String,
    pub payload: String,
}

/// All animated channels of one target, keyed by property path. Paths are
/// unique within the track; iteration order is insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectTrack {
    pub target_id: String,
    pub label: String,
    pub properties: IndexMap<String, PropertyTrack>,
}

impl ObjectTrack {
    pub fn new(target_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            label: label.into(),
            properties: IndexMap::new(),
        }
    }

    /// Get or create the property track for `path`, materializing unseen
    /// paths from the channel registry defaults.
    pub fn ensure_property(&mut self, path: &str) -> &mut PropertyTrack {
        self.properties.entry(path.to_string()).or_insert_with(|| {
            let spec = registry::defaults_for(path);
            PropertyTrack::new(path, spec.kind, spec.min_value, spec.max_value)
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub name: String,
    pub duration: f32,
    pub frame_rate: f32,
    pub object_tracks: Vec<ObjectTrack>,
    pub event_track: Vec<EventKeyframe>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f32, frame_rate: f32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            duration: duration.max(MIN_DURATION),
            frame_rate,
            object_tracks: Vec::new(),
            event_track: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn object_track(&self, target_id: &str) -> Option<&ObjectTrack> {
        self.object_tracks.iter().find(|t| t.target_id == target_id)
    }

    pub fn object_track_mut(&mut self, target_id: &str) -> Option<&mut ObjectTrack> {
        self.object_tracks.iter_mut().find(|t| t.target_id == target_id)
    }

    /// Get or create the object track for `target_id`, preserving order.
    pub fn ensure_object_track(&mut self, target_id: &str, label: &str) -> &mut ObjectTrack {
        if let Some(i) = self.object_tracks.iter().position(|t| t.target_id == target_id) {
            return &mut self.object_tracks[i];
        }
        self.object_tracks.push(ObjectTrack::new(target_id, label));
        let last = self.object_tracks.len() - 1;
        &mut self.object_tracks[last]
    }

    pub fn add_event(&mut self, event: EventKeyframe) {
        self.event_track.push(event);
        self.sort_events();
    }

    /// Replace the whole event track, keeping it ordered by time.
    pub fn set_event_track(&mut self, events: Vec<EventKeyframe>) {
        self.event_track = events;
        self.sort_events();
    }

    fn sort_events(&mut self) {
        self.event_track.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::keyframe::{Interpolation, Keyframe};
    use crate::entities::track::PropertyKind;

    #[test]
    fn test_ensure_object_track_reuses_existing() {
        let mut clip = Clip::new("walk", 4.0, 30.0);
        clip.ensure_object_track("cube", "Cube");
        clip.ensure_object_track("cube", "ignored");
        assert_eq!(clip.object_tracks.len(), 1);
        assert_eq!(clip.object_tracks[0].label, "Cube");
    }

    #[test]
    fn test_ensure_property_uses_registry_defaults() {
        let mut clip = Clip::new("walk", 4.0, 30.0);
        let object = clip.ensure_object_track("cube", "Cube");
        let track = object.ensure_property("rotation.z");
        assert_eq!(track.kind, PropertyKind::Angle);
        assert_eq!(track.min_value, Some(-360.0));
    }

    #[test]
    fn test_duration_floor() {
        let clip = Clip::new("empty", 0.0, 30.0);
        assert_eq!(clip.duration, MIN_DURATION);
    }

    #[test]
    fn test_event_track_stays_sorted() {
        let mut clip = Clip::new("walk", 4.0, 30.0);
        clip.add_event(EventKeyframe { time: 2.0, name: "b".into(), payload: String::new() });
        clip.add_event(EventKeyframe { time: 0.5, name: "a".into(), payload: String::new() });
        assert_eq!(clip.event_track[0].name, "a");

        clip.set_event_track(vec![
            EventKeyframe { time: 3.0, name: "z".into(), payload: String::new() },
            EventKeyframe { time: 1.0, name: "y".into(), payload: String::new() },
        ]);
        assert_eq!(clip.event_track[0].name, "y");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut clip = Clip::new("walk", 4.0, 30.0);
        let object = clip.ensure_object_track("cube", "Cube");
        let track = object.ensure_property("position.x");
        track.insert(Keyframe::new(1.0, 2.5, Interpolation::Linear));
        track.insert(Keyframe::new(2.0, -1.0, Interpolation::Bezier));
        clip.add_event(EventKeyframe { time: 1.5, name: "step".into(), payload: "{}".into() });
        clip.metadata.insert("author".into(), "tests".into());

        let json = serde_json::to_string(&clip).expect("serialize");
        let back: Clip = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.id, clip.id);
        assert_eq!(back.object_tracks.len(), 1);
        let restored = back.object_tracks[0].properties.get("position.x").expect("track");
        assert_eq!(restored.keyframes.len(), 2);
        assert_eq!(restored.keyframes[1].interpolation, Interpolation::Bezier);
        assert_eq!(back.event_track[0].name, "step");
    }
}
