//! Flattened track projection and session-only display state.
//!
//! One entry per (object track, property track) pair, in object-then-
//! property order. The list is rebuilt from scratch whenever the clip's
//! track set changes structurally; visibility, colors and user ordering
//! live only here and reset to defaults on every rebuild, they are never
//! part of the persisted clip.

use crate::entities::clip::Clip;
use crate::entities::track::PropertyTrack;

#[derive(Debug, Clone)]
pub struct TrackView {
    pub object_id: String,
    pub object_label: String,
    /// Display label, `"Object / property.path"`.
    pub label: String,
    pub path: String,
    pub visible: bool,
    pub color: [f32; 3],
}

impl TrackView {
    pub fn new(object_id: &str, object_label: &str, path: &str) -> Self {
        Self {
            object_id: object_id.to_string(),
            object_label: object_label.to_string(),
            label: format!("{object_label} / {path}"),
            path: path.to_string(),
            visible: true,
            color: color_for_path(path),
        }
    }

    /// Resolve this entry back into the clip's property map.
    pub fn track<'a>(&self, clip: &'a Clip) -> Option<&'a PropertyTrack> {
        clip.object_track(&self.object_id)?.properties.get(&self.path)
    }

    pub fn track_mut<'a>(&self, clip: &'a mut Clip) -> Option<&'a mut PropertyTrack> {
        clip.object_track_mut(&self.object_id)?.properties.get_mut(&self.path)
    }
}

/// Rebuild the projection from scratch in object-then-property order.
pub fn rebuild(clip: Option<&Clip>) -> Vec<TrackView> {
    let mut views = Vec::new();
    let Some(clip) = clip else {
        return views;
    };
    for object in &clip.object_tracks {
        let object_label = if object.label.is_empty() {
            object.target_id.as_str()
        } else {
            object.label.as_str()
        };
        for path in object.properties.keys() {
            views.push(TrackView::new(&object.target_id, object_label, path));
        }
    }
    views
}

/// Default display color by channel: X red, Y green, Z blue, opacity
/// yellow, intensity orange, everything else light gray.
pub fn color_for_path(path: &str) -> [f32; 3] {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".x") {
        return [1.0, 0.3, 0.3];
    }
    if lower.ends_with(".y") {
        return [0.3, 1.0, 0.3];
    }
    if lower.ends_with(".z") {
        return [0.3, 0.5, 1.0];
    }
    if lower.contains("opacity") || lower.contains("alpha") {
        return [1.0, 1.0, 0.3];
    }
    if lower.contains("intensity") || lower.contains("emission") {
        return [1.0, 0.6, 0.2];
    }
    [0.9, 0.9, 0.9]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::keyframe::{Interpolation, Keyframe};

    #[test]
    fn test_rebuild_follows_object_then_property_order() {
        let mut clip = Clip::new("walk", 4.0, 30.0);
        let a = clip.ensure_object_track("a", "A");
        a.ensure_property("position.x");
        a.ensure_property("position.y");
        let b = clip.ensure_object_track("b", "B");
        b.ensure_property("rotation.z");

        let views = rebuild(Some(&clip));
        let labels: Vec<&str> = views.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["A / position.x", "A / position.y", "B / rotation.z"]);
        assert!(views.iter().all(|v| v.visible));
    }

    #[test]
    fn test_rebuild_without_clip_is_empty() {
        assert!(rebuild(None).is_empty());
    }

    #[test]
    fn test_view_resolves_into_clip() {
        let mut clip = Clip::new("walk", 4.0, 30.0);
        clip.ensure_object_track("a", "A")
            .ensure_property("position.x")
            .insert(Keyframe::new(1.0, 2.0, Interpolation::Linear));

        let views = rebuild(Some(&clip));
        let track = views[0].track(&clip).expect("resolves");
        assert_eq!(track.keyframes.len(), 1);

        // A view for a removed property stops resolving
        let stale = TrackView::new("a", "A", "position.y");
        assert!(stale.track(&clip).is_none());
    }

    #[test]
    fn test_axis_colors() {
        assert_eq!(color_for_path("position.x"), [1.0, 0.3, 0.3]);
        assert_eq!(color_for_path("fakeplayer:head.rotation.y"), [0.3, 1.0, 0.3]);
        assert_eq!(color_for_path("opacity"), [1.0, 1.0, 0.3]);
        assert_eq!(color_for_path("custom.thing"), [0.9, 0.9, 0.9]);
    }
}
