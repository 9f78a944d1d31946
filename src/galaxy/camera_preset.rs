//! Camera Presets
//!
//! Fixed viewpoints the camera can snap to. Both look at the galaxy center.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPreset {
    /// Looking down onto the disk.
    Top,
    /// Looking across the disk plane.
    Side,
}

impl CameraPreset {
    pub fn position(self) -> Vec3 {
        match self {
            // Slightly off the pole so the look-at basis is defined.
            CameraPreset::Top => Vec3::new(0.0, 10.0, 0.1),
            CameraPreset::Side => Vec3::new(10.0, 2.0, 0.0),
        }
    }

    pub fn target(self) -> Vec3 {
        Vec3::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_poses() {
        assert_eq!(CameraPreset::Top.position(), Vec3::new(0.0, 10.0, 0.1));
        assert_eq!(CameraPreset::Side.position(), Vec3::new(10.0, 2.0, 0.0));
        assert_eq!(CameraPreset::Top.target(), Vec3::ZERO);
    }

    #[test]
    fn test_preset_json_names() {
        let p: CameraPreset = serde_json::from_str("\"side\"").unwrap();
        assert_eq!(p, CameraPreset::Side);
    }
}
