//! Property track: one animatable scalar channel.
//!
//! Keyframes are kept strictly ascending in time. Two keyframes closer than
//! [`UPSERT_EPSILON`] are the same slot, so inserts replace in place instead
//! of stacking near-duplicates. Operations that address an existing keyframe
//! by time resolve it within the tighter [`LOOKUP_EPSILON`].

use serde::{Deserialize, Serialize};

use crate::entities::keyframe::{Interpolation, Keyframe};

/// Keyframes within this window occupy the same slot: inserts replace.
pub const UPSERT_EPSILON: f32 = 1e-3;
/// Tolerance used when an operation addresses a keyframe by time.
pub const LOOKUP_EPSILON: f32 = 1e-4;

/// Semantic value type of a channel. Informs sampling (angle channels wrap
/// the segment delta), not storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    #[default]
    Float,
    Angle,
    Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTrack {
    pub path: String,
    pub kind: PropertyKind,
    pub min_value: Option<f32>,
    pub max_value: Option<f32>,
    pub keyframes: Vec<Keyframe>,
}

impl PropertyTrack {
    pub fn new(
        path: impl Into<String>,
        kind: PropertyKind,
        min_value: Option<f32>,
        max_value: Option<f32>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            min_value,
            max_value,
            keyframes: Vec::new(),
        }
    }

    /// Index of the keyframe at `time`, within `epsilon`.
    pub fn find(&self, time: f32, epsilon: f32) -> Option<usize> {
        self.keyframes.iter().position(|k| (k.time - time).abs() < epsilon)
    }

    /// Insert a keyframe, replacing any existing keyframe in the same slot.
    pub fn insert(&mut self, keyframe: Keyframe) {
        if let Some(i) = self.find(keyframe.time, UPSERT_EPSILON) {
            self.keyframes[i] = keyframe;
        } else {
            self.keyframes.push(keyframe);
            self.sort();
        }
    }

    /// Capture-style upsert: an existing keyframe in the slot keeps its
    /// interpolation and tangents and only takes the new time and value;
    /// otherwise a fresh keyframe is created with `default_interpolation`.
    pub fn upsert_value(&mut self, time: f32, value: f32, default_interpolation: Interpolation) {
        if let Some(i) = self.find(time, UPSERT_EPSILON) {
            self.keyframes[i].time = time;
            self.keyframes[i].value = value;
        } else {
            self.keyframes.push(Keyframe::new(time, value, default_interpolation));
            self.sort();
        }
    }

    /// Remove the keyframe at `time` (lookup tolerance), returning it.
    pub fn remove_at(&mut self, time: f32) -> Option<Keyframe> {
        let i = self.find(time, LOOKUP_EPSILON)?;
        Some(self.keyframes.remove(i))
    }

    /// Retime the keyframe at `from` to `to`, re-sorting. False if `from`
    /// resolves to nothing.
    pub fn move_key(&mut self, from: f32, to: f32) -> bool {
        let Some(i) = self.find(from, LOOKUP_EPSILON) else {
            return false;
        };
        self.keyframes[i].time = to;
        self.sort();
        true
    }

    /// Midpoint of the value range, used as the suggested value for new
    /// keyframes on bounded channels.
    pub fn default_value(&self) -> f32 {
        match (self.min_value, self.max_value) {
            (Some(min), Some(max)) => (min + max) * 0.5,
            _ => 0.0,
        }
    }

    /// Evaluate the channel at `time`.
    ///
    /// Endpoint values hold outside the keyed range. Inside, the segment's
    /// left keyframe selects the interpolation. Output is clamped to the
    /// channel's value range when one is set.
    pub fn sample(&self, time: f32) -> f32 {
        let Some(first) = self.keyframes.first() else {
            return self.clamp_value(0.0);
        };
        if self.keyframes.len() == 1 || time <= first.time {
            return self.clamp_value(first.value);
        }
        let last = self.keyframes[self.keyframes.len() - 1];
        if time >= last.time {
            return self.clamp_value(last.value);
        }
        for pair in self.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if time < a.time || time > b.time {
                continue;
            }
            let span = b.time - a.time;
            if span < 1e-6 {
                return self.clamp_value(b.value);
            }
            let t = (time - a.time) / span;
            return self.clamp_value(self.interpolate(a, b, t));
        }
        self.clamp_value(last.value)
    }

    fn interpolate(&self, a: &Keyframe, b: &Keyframe, t: f32) -> f32 {
        let start = a.value;
        let mut end = b.value;
        if self.kind == PropertyKind::Angle {
            // Shortest-arc: wrap the segment delta, not the endpoints.
            end = start + wrap_degrees(end - start);
        }
        match a.interpolation {
            Interpolation::Step => start,
            Interpolation::Linear => start + (end - start) * t,
            Interpolation::Smooth => start + (end - start) * smoothstep(t),
            Interpolation::EaseIn => start + (end - start) * t * t,
            Interpolation::EaseOut => start + (end - start) * (1.0 - (1.0 - t) * (1.0 - t)),
            Interpolation::Bezier => {
                let dt = (b.time - a.time).max(1e-4);
                hermite(t, start, end, a.out_tangent * dt, b.in_tangent * dt)
            }
        }
    }

    fn clamp_value(&self, value: f32) -> f32 {
        let mut v = value;
        if let Some(min) = self.min_value {
            v = v.max(min);
        }
        if let Some(max) = self.max_value {
            v = v.min(max);
        }
        v
    }

    fn sort(&mut self) {
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

/// Wrap a degree delta into [-180, 180).
pub fn wrap_degrees(degrees: f32) -> f32 {
    let mut d = degrees % 360.0;
    if d >= 180.0 {
        d -= 360.0;
    }
    if d < -180.0 {
        d += 360.0;
    }
    d
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn hermite(t: f32, p0: f32, p1: f32, m0: f32, m1: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
}
