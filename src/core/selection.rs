//! Keyframe selection and hit-testing against the visible projection.
//!
//! Selection identity is positional: an entry addresses a keyframe as
//! (track index, time), with time equality judged within
//! [`LOOKUP_EPSILON`](crate::entities::track::LOOKUP_EPSILON).

use crate::core::track_view::TrackView;
use crate::core::viewport::Viewport;
use crate::entities::clip::{Clip, MIN_DURATION};
use crate::entities::track::LOOKUP_EPSILON;

/// Pointer hit radius around a keyframe glyph, in pixels, per axis.
pub const HIT_RADIUS: f32 = 8.0;

/// Cross-track snap window in seconds.
pub const SNAP_WINDOW: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedKey {
    pub track: usize,
    pub time: f32,
}

pub fn is_selected(selection: &[SelectedKey], track: usize, time: f32) -> bool {
    selection
        .iter()
        .any(|s| s.track == track && (s.time - time).abs() < LOOKUP_EPSILON)
}

/// First keyframe whose glyph is within [`HIT_RADIUS`] of the point on both
/// axes, scanning visible tracks top to bottom. Keyframes outside the
/// visible window never hit.
pub fn hit_test(
    px: f32,
    py: f32,
    clip: &Clip,
    tracks: &[TrackView],
    viewport: &Viewport,
) -> Option<SelectedKey> {
    let duration = clip.duration.max(MIN_DURATION);
    let visible_start = viewport.visible_start(duration);
    let visible_end = viewport.visible_end(duration);
    for (row, view) in tracks.iter().enumerate() {
        if !view.visible {
            continue;
        }
        let center_y = viewport.row_center_y(row);
        if (py - center_y).abs() > HIT_RADIUS {
            continue;
        }
        let Some(track) = view.track(clip) else {
            continue;
        };
        for key in &track.keyframes {
            if key.time < visible_start || key.time > visible_end {
                continue;
            }
            let key_x = viewport.time_to_px(key.time, duration);
            if (px - key_x).abs() <= HIT_RADIUS {
                return Some(SelectedKey { track: row, time: key.time });
            }
        }
    }
    None
}

/// Point-click semantics: non-additive replaces the selection with the hit
/// (or clears it on a miss); additive toggles the hit's membership and
/// leaves the rest alone.
pub fn click(selection: &mut Vec<SelectedKey>, hit: Option<SelectedKey>, additive: bool) {
    let Some(hit) = hit else {
        if !additive {
            selection.clear();
        }
        return;
    };
    if !additive {
        selection.clear();
        selection.push(hit);
        return;
    }
    if let Some(i) = selection
        .iter()
        .position(|s| s.track == hit.track && (s.time - hit.time).abs() < LOOKUP_EPSILON)
    {
        selection.remove(i);
    } else {
        selection.push(hit);
    }
}

/// Replace the selection with every visible keyframe whose glyph center
/// lies inside the rectangle. Always non-additive.
pub fn box_select(
    selection: &mut Vec<SelectedKey>,
    (x0, y0): (f32, f32),
    (x1, y1): (f32, f32),
    clip: &Clip,
    tracks: &[TrackView],
    viewport: &Viewport,
) {
    let (min_x, max_x) = (x0.min(x1), x0.max(x1));
    let (min_y, max_y) = (y0.min(y1), y0.max(y1));
    let duration = clip.duration.max(MIN_DURATION);
    let visible_start = viewport.visible_start(duration);
    let visible_end = viewport.visible_end(duration);

    selection.clear();
    for (row, view) in tracks.iter().enumerate() {
        if !view.visible {
            continue;
        }
        let center_y = viewport.row_center_y(row);
        if center_y < min_y || center_y > max_y {
            continue;
        }
        let Some(track) = view.track(clip) else {
            continue;
        };
        for key in &track.keyframes {
            if key.time < visible_start || key.time > visible_end {
                continue;
            }
            let key_x = viewport.time_to_px(key.time, duration);
            if key_x >= min_x && key_x <= max_x {
                selection.push(SelectedKey { track: row, time: key.time });
            }
        }
    }
}

/// Nearest keyframe time on any *other* track within [`SNAP_WINDOW`] of
/// `target`; `target` itself when none qualifies. First-found wins ties.
pub fn snap_to_other_tracks(
    exclude_track: usize,
    target: f32,
    clip: &Clip,
    tracks: &[TrackView],
) -> f32 {
    let mut best = target;
    let mut best_diff = SNAP_WINDOW;
    for (row, view) in tracks.iter().enumerate() {
        if row == exclude_track {
            continue;
        }
        let Some(track) = view.track(clip) else {
            continue;
        };
        for key in &track.keyframes {
            let diff = (key.time - target).abs();
            if diff < best_diff {
                best_diff = diff;
                best = key.time;
            }
        }
    }
    best
}
