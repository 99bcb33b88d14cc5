//! Channel path constants.
//!
//! Dotted property paths identify animatable scalar channels on a target
//! (`position.x`, `fakeplayer:head.rotation.y`). Constants here avoid
//! string typos and give capture a fixed iteration order over the nine
//! transform channels.

pub const POSITION_X: &str = "position.x";
pub const POSITION_Y: &str = "position.y";
pub const POSITION_Z: &str = "position.z";
pub const ROTATION_X: &str = "rotation.x";
pub const ROTATION_Y: &str = "rotation.y";
pub const ROTATION_Z: &str = "rotation.z";
pub const SCALE_X: &str = "scale.x";
pub const SCALE_Y: &str = "scale.y";
pub const SCALE_Z: &str = "scale.z";

/// The nine transform channels in capture order.
pub const TRANSFORM_CHANNELS: [&str; 9] = [
    POSITION_X, POSITION_Y, POSITION_Z,
    ROTATION_X, ROTATION_Y, ROTATION_Z,
    SCALE_X, SCALE_Y, SCALE_Z,
];

/// Prefix a channel with a sub-part key: `("fakeplayer:head", "rotation.y")`
/// becomes `"fakeplayer:head.rotation.y"`.
pub fn with_part(part: &str, channel: &str) -> String {
    format!("{part}.{channel}")
}
