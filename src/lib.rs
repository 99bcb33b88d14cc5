//! keyline: the editing core of a keyframe animation tool.
//!
//! A data model for animation clips (object tracks, property tracks,
//! keyframes, event keyframes) plus the interactive engine a timeline
//! editor is built on: scrubbing, selection, drag with cross-track
//! snapping, transform capture, copy/paste, and bounded undo/redo of every
//! change.
//!
//! The crate renders nothing and persists nothing: the host editor draws
//! the timeline from the track projection and ruler ticks, feeds pointer
//! coordinates and pose samples in, and drains [`HostEvent`]s to drive the
//! actual animation targets.

pub mod core;
pub mod entities;

pub use crate::core::capture::{PoseSample, Recorder};
pub use crate::core::clipboard::CopiedKeyframe;
pub use crate::core::editor::Editor;
pub use crate::core::history::{History, HistoryAction, HistoryEntry, TrackSnapshot, HISTORY_CAPACITY};
pub use crate::core::host::{HostEvent, HostLink};
pub use crate::core::selection::SelectedKey;
pub use crate::core::track_view::TrackView;
pub use crate::core::transport::Transport;
pub use crate::core::viewport::{format_time, RulerTick, Viewport};
pub use crate::entities::clip::{Clip, EventKeyframe, ObjectTrack};
pub use crate::entities::keyframe::{Interpolation, Keyframe};
pub use crate::entities::track::{PropertyKind, PropertyTrack};
