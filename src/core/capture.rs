//! Transform capture: diffs externally sampled poses into sparse keyframes.
//!
//! While recording, each incoming pose is compared channel by channel
//! against the last recorded snapshot for its target key; only channels
//! whose delta exceeds [`CHANNEL_EPSILON`] write a keyframe. When anything
//! changed, the stored snapshot is replaced with the full new pose so later
//! comparisons run against the latest baseline, never a stale one. Capture
//! writes bypass the undo history.

use glam::Vec3;
use std::collections::HashMap;

use crate::entities::clip::Clip;
use crate::entities::keyframe::Interpolation;
use crate::entities::paths;

/// Per-channel change threshold.
pub const CHANNEL_EPSILON: f32 = 1e-4;

/// One sampled pose: the nine animatable transform channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl PoseSample {
    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    /// Channel values in the fixed capture order.
    fn channels(&self) -> [f32; 9] {
        [
            self.translation.x,
            self.translation.y,
            self.translation.z,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
            self.scale.x,
            self.scale.y,
            self.scale.z,
        ]
    }
}

/// What a capture write did to the clip.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleOutcome {
    /// At least one keyframe was written.
    pub wrote: bool,
    /// A new object or property track was materialized, so the projection
    /// must be rebuilt.
    pub structural: bool,
}

#[derive(Debug, Default)]
pub struct Recorder {
    enabled: bool,
    baselines: HashMap<String, PoseSample>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.enabled
    }

    /// Toggling recording on starts a fresh session: old baselines would
    /// suppress the first write of every channel.
    pub fn set_recording(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.baselines.clear();
        }
        self.enabled = enabled;
    }

    /// Drop all baselines (clip replaced).
    pub fn reset(&mut self) {
        self.baselines.clear();
    }

    /// Diff one pose against its baseline and upsert changed channels at
    /// `time`. A key with no baseline treats every channel as changed.
    pub fn sample(
        &mut self,
        clip: &mut Clip,
        object_id: &str,
        object_label: &str,
        part: Option<&str>,
        pose: PoseSample,
        time: f32,
    ) -> SampleOutcome {
        if !self.enabled {
            return SampleOutcome::default();
        }
        let key = match part {
            Some(part) => format!("{object_id}|{part}"),
            None => object_id.to_string(),
        };
        let baseline = self.baselines.get(&key).map(|b| b.channels());

        let had_object = clip.object_track(object_id).is_some();
        let object = clip.ensure_object_track(object_id, object_label);
        let properties_before = object.properties.len();

        let mut wrote = false;
        for (i, channel) in paths::TRANSFORM_CHANNELS.iter().enumerate() {
            let value = pose.channels()[i];
            let changed = match &baseline {
                None => true,
                Some(base) => (value - base[i]).abs() > CHANNEL_EPSILON,
            };
            if !changed {
                continue;
            }
            let path = match part {
                Some(part) => paths::with_part(part, channel),
                None => (*channel).to_string(),
            };
            object.ensure_property(&path).upsert_value(time, value, Interpolation::Smooth);
            wrote = true;
        }

        let structural = !had_object || object.properties.len() != properties_before;
        if wrote {
            self.baselines.insert(key, pose);
        }
        SampleOutcome { wrote, structural }
    }
}

/// Write all nine channels of `pose` at `time` unconditionally, through the
/// same upsert path capture uses (and with the same history exemption).
pub fn write_pose(
    clip: &mut Clip,
    object_id: &str,
    object_label: &str,
    part: Option<&str>,
    pose: PoseSample,
    time: f32,
) -> SampleOutcome {
    let had_object = clip.object_track(object_id).is_some();
    let object = clip.ensure_object_track(object_id, object_label);
    let properties_before = object.properties.len();
    for (i, channel) in paths::TRANSFORM_CHANNELS.iter().enumerate() {
        let path = match part {
            Some(part) => paths::with_part(part, channel),
            None => (*channel).to_string(),
        };
        object
            .ensure_property(&path)
            .upsert_value(time, pose.channels()[i], Interpolation::Smooth);
    }
    SampleOutcome {
        wrote: true,
        structural: !had_object || object.properties.len() != properties_before,
    }
}
