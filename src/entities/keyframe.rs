//! Keyframe: a single scalar sample on a property track.

use serde::{Deserialize, Serialize};

/// Interpolation kind for the segment that starts at this keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Smooth,
    Linear,
    Step,
    EaseIn,
    EaseOut,
    Bezier,
}

/// Scalar keyframe. Tangents are only meaningful for `Smooth`/`Bezier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    pub interpolation: Interpolation,
    pub in_tangent: f32,
    pub out_tangent: f32,
}

impl Keyframe {
    /// New keyframe with zeroed tangents. Times are never negative.
    pub fn new(time: f32, value: f32, interpolation: Interpolation) -> Self {
        Self {
            time: time.max(0.0),
            value,
            interpolation,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }
}
