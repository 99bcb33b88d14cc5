//! Persisted animation data model: clips, tracks, keyframes.

pub mod clip;
pub mod keyframe;
pub mod paths;
pub mod registry;
pub mod track;

pub use clip::{Clip, EventKeyframe, ObjectTrack, MIN_DURATION};
pub use keyframe::{Interpolation, Keyframe};
pub use registry::ChannelSpec;
pub use track::{PropertyKind, PropertyTrack, LOOKUP_EPSILON, UPSERT_EPSILON};
