//! Bounded undo/redo over grouped, reversible actions.
//!
//! Every mutating edit funnels through here: perform the mutation, push one
//! entry whose undo list exactly reverses it, clear the redo stack. Actions
//! address keyframes positionally by (track index, time within
//! [`LOOKUP_EPSILON`]); a target that no longer resolves is skipped with a
//! warning so the rest of the entry still applies.

use log::{debug, warn};

use crate::core::track_view::TrackView;
use crate::entities::clip::Clip;
use crate::entities::keyframe::{Interpolation, Keyframe};
use crate::entities::track::{PropertyTrack, LOOKUP_EPSILON};

/// Undo depth; pushing past this evicts the oldest entry.
pub const HISTORY_CAPACITY: usize = 50;

/// Full copy of a track, enough to recreate both the property track and its
/// projection entry. Structural actions carry one because add/remove are
/// not expressible as single-keyframe deltas.
#[derive(Debug, Clone)]
pub struct TrackSnapshot {
    pub object_id: String,
    pub object_label: String,
    pub path: String,
    pub track: PropertyTrack,
}

#[derive(Debug, Clone)]
pub enum HistoryAction {
    AddKeyframe { track: usize, keyframe: Keyframe },
    RemoveKeyframe { track: usize, time: f32 },
    MoveKeyframe { track: usize, from: f32, to: f32 },
    ChangeValue { track: usize, time: f32, value: f32 },
    ChangeInterpolation { track: usize, time: f32, interpolation: Interpolation },
    AddTrack { index: usize, snapshot: TrackSnapshot },
    RemoveTrack { index: usize, snapshot: TrackSnapshot },
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub description: String,
    pub undo_actions: Vec<HistoryAction>,
    pub redo_actions: Vec<HistoryAction>,
}

#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Push one entry for a mutation that already happened. Clears the redo
    /// stack; evicts the oldest entry past capacity.
    pub fn push(&mut self, description: &str, undo: Vec<HistoryAction>, redo: Vec<HistoryAction>) {
        debug!("history push: {description} ({} actions)", redo.len());
        self.undo_stack.push(HistoryEntry {
            description: description.to_string(),
            undo_actions: undo,
            redo_actions: redo,
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > HISTORY_CAPACITY {
            debug!("history at capacity, evicting oldest entry");
            self.undo_stack.remove(0);
        }
    }

    /// Apply the top undo entry. Returns true when a structural action ran,
    /// in which case the caller must drop stale selection/drag state.
    pub fn undo(&mut self, clip: &mut Clip, tracks: &mut Vec<TrackView>) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            return false;
        };
        debug!("undo: {}", entry.description);
        let mut structural = false;
        for action in &entry.undo_actions {
            structural |= apply_action(action, clip, tracks);
        }
        self.redo_stack.push(entry);
        structural
    }

    /// Mirror of [`History::undo`] over the redo stack.
    pub fn redo(&mut self, clip: &mut Clip, tracks: &mut Vec<TrackView>) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            return false;
        };
        debug!("redo: {}", entry.description);
        let mut structural = false;
        for action in &entry.redo_actions {
            structural |= apply_action(action, clip, tracks);
        }
        self.undo_stack.push(entry);
        structural
    }
}

/// Apply one action to the live clip and projection. Returns true for
/// structural (track-level) changes.
pub fn apply_action(action: &HistoryAction, clip: &mut Clip, tracks: &mut Vec<TrackView>) -> bool {
    match action {
        HistoryAction::AddKeyframe { track, keyframe } => {
            if let Some(t) = resolve_track(*track, clip, tracks) {
                t.insert(*keyframe);
            }
            false
        }
        HistoryAction::RemoveKeyframe { track, time } => {
            if let Some(t) = resolve_track(*track, clip, tracks) {
                t.remove_at(*time);
            }
            false
        }
        HistoryAction::MoveKeyframe { track, from, to } => {
            if let Some(t) = resolve_track(*track, clip, tracks) {
                if !t.move_key(*from, *to) {
                    warn!("history: no keyframe at {from:.4}s on track {track}, skipping move");
                }
            }
            false
        }
        HistoryAction::ChangeValue { track, time, value } => {
            if let Some(t) = resolve_track(*track, clip, tracks) {
                match t.find(*time, LOOKUP_EPSILON) {
                    Some(i) => t.keyframes[i].value = *value,
                    None => warn!("history: no keyframe at {time:.4}s on track {track}, skipping value change"),
                }
            }
            false
        }
        HistoryAction::ChangeInterpolation { track, time, interpolation } => {
            if let Some(t) = resolve_track(*track, clip, tracks) {
                match t.find(*time, LOOKUP_EPSILON) {
                    Some(i) => t.keyframes[i].interpolation = *interpolation,
                    None => warn!("history: no keyframe at {time:.4}s on track {track}, skipping interpolation change"),
                }
            }
            false
        }
        HistoryAction::AddTrack { index, snapshot } => {
            let object = clip.ensure_object_track(&snapshot.object_id, &snapshot.object_label);
            object.properties.insert(snapshot.path.clone(), snapshot.track.clone());
            let index = (*index).min(tracks.len());
            tracks.insert(
                index,
                TrackView::new(&snapshot.object_id, &snapshot.object_label, &snapshot.path),
            );
            true
        }
        HistoryAction::RemoveTrack { index, .. } => {
            if *index >= tracks.len() {
                warn!("history: track index {index} out of range, skipping remove");
                return false;
            }
            let removed = tracks.remove(*index);
            if let Some(object) = clip.object_track_mut(&removed.object_id) {
                object.properties.shift_remove(&removed.path);
            }
            true
        }
    }
}

fn resolve_track<'a>(
    index: usize,
    clip: &'a mut Clip,
    tracks: &[TrackView],
) -> Option<&'a mut PropertyTrack> {
    let Some(view) = tracks.get(index) else {
        warn!("history: track index {index} out of range, skipping action");
        return None;
    };
    let track = view.track_mut(clip);
    if track.is_none() {
        warn!("history: track {index} ({}) no longer resolves, skipping action", view.path);
    }
    track
}
