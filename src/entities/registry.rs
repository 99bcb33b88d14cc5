//! Default descriptors for animatable channels.
//!
//! When capture or a track operation has to materialize a property track for
//! a path the clip has never seen, this table supplies its kind and value
//! range. Part-prefixed paths (`fakeplayer:head.rotation.y`) resolve by
//! channel suffix.

use crate::entities::track::PropertyKind;

#[derive(Debug, Clone, Copy)]
pub struct ChannelSpec {
    pub path: &'static str,
    pub display_name: &'static str,
    pub kind: PropertyKind,
    pub min_value: Option<f32>,
    pub max_value: Option<f32>,
}

pub const TRANSFORM_DEFAULTS: [ChannelSpec; 9] = [
    channel("position.x", "Position X", PropertyKind::Float, -1024.0, 1024.0),
    channel("position.y", "Position Y", PropertyKind::Float, -1024.0, 1024.0),
    channel("position.z", "Position Z", PropertyKind::Float, -1024.0, 1024.0),
    channel("rotation.x", "Rotation X", PropertyKind::Angle, -360.0, 360.0),
    channel("rotation.y", "Rotation Y", PropertyKind::Angle, -360.0, 360.0),
    channel("rotation.z", "Rotation Z", PropertyKind::Angle, -360.0, 360.0),
    channel("scale.x", "Scale X", PropertyKind::Float, 0.0, 64.0),
    channel("scale.y", "Scale Y", PropertyKind::Float, 0.0, 64.0),
    channel("scale.z", "Scale Z", PropertyKind::Float, 0.0, 64.0),
];

pub const EXTRA_DEFAULTS: [ChannelSpec; 2] = [
    channel("opacity", "Opacity", PropertyKind::Float, 0.0, 1.0),
    channel("intensity", "Intensity", PropertyKind::Float, 0.0, 10.0),
];

/// Unregistered paths get an unbounded float channel.
pub const FALLBACK: ChannelSpec = ChannelSpec {
    path: "",
    display_name: "Custom",
    kind: PropertyKind::Float,
    min_value: None,
    max_value: None,
};

const fn channel(
    path: &'static str,
    display_name: &'static str,
    kind: PropertyKind,
    min: f32,
    max: f32,
) -> ChannelSpec {
    ChannelSpec {
        path,
        display_name,
        kind,
        min_value: Some(min),
        max_value: Some(max),
    }
}

/// Descriptor for `path`, matching exactly or by `.suffix`.
pub fn defaults_for(path: &str) -> ChannelSpec {
    TRANSFORM_DEFAULTS
        .iter()
        .chain(EXTRA_DEFAULTS.iter())
        .find(|s| path == s.path || has_channel_suffix(path, s.path))
        .copied()
        .unwrap_or(FALLBACK)
}

fn has_channel_suffix(path: &str, channel: &str) -> bool {
    path.len() > channel.len()
        && path.ends_with(channel)
        && path.as_bytes()[path.len() - channel.len() - 1] == b'.'
}
