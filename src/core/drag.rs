//! Keyframe drag: cumulative pointer motion applied to the selection.
//!
//! Press snapshots the pre-drag time of every selected keyframe. Each
//! update recomputes every candidate from its *original* time plus the
//! cumulative delta, so intermediate rounding never accumulates. Release
//! collapses the whole gesture into one grouped history entry; a drag that
//! nets to zero movement leaves no trace.

use log::debug;

use crate::core::history::{History, HistoryAction};
use crate::core::selection::{self, SelectedKey};
use crate::core::track_view::TrackView;
use crate::core::viewport::Viewport;
use crate::entities::clip::{Clip, MIN_DURATION};

/// Net moves at or below this never reach the history.
pub const MOVE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone)]
pub struct DragState {
    start_x: f32,
    originals: Vec<SelectedKey>,
    current_times: Vec<f32>,
}

impl DragState {
    /// Begin a drag at pointer x with the current selection.
    pub fn begin(start_x: f32, selection: &[SelectedKey]) -> Self {
        Self {
            start_x,
            originals: selection.to_vec(),
            current_times: selection.iter().map(|s| s.time).collect(),
        }
    }

    /// Apply the cumulative pointer delta. With `snap` held, each candidate
    /// is replaced by the nearest keyframe time on any other track within
    /// the snap window before clamping to `[0, duration]`.
    pub fn update(
        &mut self,
        pointer_x: f32,
        snap: bool,
        clip: &mut Clip,
        tracks: &[TrackView],
        viewport: &Viewport,
        selection: &mut Vec<SelectedKey>,
    ) {
        let duration = clip.duration.max(MIN_DURATION);
        let dt = viewport.px_delta_to_dt(pointer_x - self.start_x, duration);

        let mut updated = Vec::with_capacity(self.originals.len());
        for (i, original) in self.originals.iter().enumerate() {
            let mut candidate = original.time + dt;
            if snap {
                candidate = selection::snap_to_other_tracks(original.track, candidate, clip, tracks);
            }
            candidate = candidate.clamp(0.0, duration);

            if let Some(view) = tracks.get(original.track) {
                if let Some(track) = view.track_mut(clip) {
                    track.move_key(self.current_times[i], candidate);
                }
            }
            self.current_times[i] = candidate;
            updated.push(SelectedKey { track: original.track, time: candidate });
        }
        *selection = updated;
    }

    /// End the gesture: one `MoveKeyframe` pair per keyframe whose net
    /// change exceeds [`MOVE_EPSILON`], grouped under a single entry.
    pub fn finish(self, selection: &[SelectedKey], history: &mut History) {
        let mut undo = Vec::new();
        let mut redo = Vec::new();
        for (i, original) in self.originals.iter().enumerate() {
            let new_time = selection
                .get(i)
                .map(|s| s.time)
                .unwrap_or(self.current_times[i]);
            if (new_time - original.time).abs() > MOVE_EPSILON {
                undo.push(HistoryAction::MoveKeyframe {
                    track: original.track,
                    from: new_time,
                    to: original.time,
                });
                redo.push(HistoryAction::MoveKeyframe {
                    track: original.track,
                    from: original.time,
                    to: new_time,
                });
            }
        }
        if !redo.is_empty() {
            debug!("drag moved {} keyframes", redo.len());
            history.push("Move keyframes", undo, redo);
        }
    }
}
