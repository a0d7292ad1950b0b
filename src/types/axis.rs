//! Axis remapping for the global export transform.

use glam::{Mat3, Vec3};

/// A signed world axis, used to pick the exported forward and up
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

impl AxisDirection {
    /// Unit vector for this direction.
    pub fn unit(self) -> Vec3 {
        match self {
            AxisDirection::X => Vec3::X,
            AxisDirection::Y => Vec3::Y,
            AxisDirection::Z => Vec3::Z,
            AxisDirection::NegX => Vec3::NEG_X,
            AxisDirection::NegY => Vec3::NEG_Y,
            AxisDirection::NegZ => Vec3::NEG_Z,
        }
    }

    /// The unsigned axis index (0 = X, 1 = Y, 2 = Z), ignoring sign.
    pub fn axis_index(self) -> usize {
        match self {
            AxisDirection::X | AxisDirection::NegX => 0,
            AxisDirection::Y | AxisDirection::NegY => 1,
            AxisDirection::Z | AxisDirection::NegZ => 2,
        }
    }

    /// Parse "x", "-x", "y", "-y", "z", "-z" (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Some(AxisDirection::X),
            "y" => Some(AxisDirection::Y),
            "z" => Some(AxisDirection::Z),
            "-x" => Some(AxisDirection::NegX),
            "-y" => Some(AxisDirection::NegY),
            "-z" => Some(AxisDirection::NegZ),
            _ => None,
        }
    }
}

/// Build the rotation that remaps the scene's Y-forward / Z-up convention
/// onto the requested forward and up directions.
///
/// Returns `None` when forward and up lie on the same axis, which leaves the
/// remap underdetermined.
pub fn axis_conversion_matrix(forward: AxisDirection, up: AxisDirection) -> Option<Mat3> {
    if forward.axis_index() == up.axis_index() {
        return None;
    }

    let fwd = forward.unit();
    let up = up.unit();
    let right = fwd.cross(up);

    // Maps source right (X) / forward (Y) / up (Z) onto the target frame.
    Some(Mat3::from_cols(right, fwd, up))
}
