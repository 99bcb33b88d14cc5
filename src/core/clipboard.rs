//! Copy/paste of selected keyframes.
//!
//! Copy snapshots whatever the selection still resolves to. Paste re-anchors
//! the snapshot so its earliest keyframe lands on the anchor time, writing
//! each entry back to the track it was copied from; paste never retargets
//! across tracks.

use crate::core::history::{self, History, HistoryAction};
use crate::core::selection::SelectedKey;
use crate::core::track_view::TrackView;
use crate::entities::clip::Clip;
use crate::entities::keyframe::{Interpolation, Keyframe};
use crate::entities::track::LOOKUP_EPSILON;

#[derive(Debug, Clone, Copy)]
pub struct CopiedKeyframe {
    pub track: usize,
    pub time: f32,
    pub value: f32,
    pub interpolation: Interpolation,
}

/// Snapshot every selected keyframe that still resolves to a real one.
pub fn copy_selection(
    selection: &[SelectedKey],
    clip: &Clip,
    tracks: &[TrackView],
) -> Vec<CopiedKeyframe> {
    let mut copied = Vec::new();
    for selected in selection {
        let Some(view) = tracks.get(selected.track) else {
            continue;
        };
        let Some(track) = view.track(clip) else {
            continue;
        };
        if let Some(i) = track.find(selected.time, LOOKUP_EPSILON) {
            let key = track.keyframes[i];
            copied.push(CopiedKeyframe {
                track: selected.track,
                time: key.time,
                value: key.value,
                interpolation: key.interpolation,
            });
        }
    }
    copied
}

/// Insert the copied keyframes shifted so their earliest lands on
/// `anchor_time`, grouped under one history entry. Tangents are zeroed on
/// the pasted copies.
pub fn paste(
    copied: &[CopiedKeyframe],
    anchor_time: f32,
    clip: &mut Clip,
    tracks: &mut Vec<TrackView>,
    history: &mut History,
) {
    if copied.is_empty() {
        return;
    }
    let min_time = copied.iter().map(|c| c.time).fold(f32::MAX, f32::min);
    let shift = anchor_time - min_time;

    let mut undo = Vec::new();
    let mut redo = Vec::new();
    for entry in copied {
        let keyframe = Keyframe::new(entry.time + shift, entry.value, entry.interpolation);
        undo.push(HistoryAction::RemoveKeyframe { track: entry.track, time: keyframe.time });
        let action = HistoryAction::AddKeyframe { track: entry.track, keyframe };
        history::apply_action(&action, clip, tracks);
        redo.push(action);
    }
    history.push("Paste keyframes", undo, redo);
}
