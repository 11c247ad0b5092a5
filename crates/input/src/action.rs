use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Fixed camera placements. Every preset looks at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraPreset {
    Front,
    Right,
    Back,
    Left,
    Corner,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 5] = [
        Self::Front,
        Self::Right,
        Self::Back,
        Self::Left,
        Self::Corner,
    ];

    pub fn position(self) -> Vec3 {
        match self {
            Self::Front => Vec3::new(0.0, 2.0, 5.0),
            Self::Right => Vec3::new(5.0, 2.0, 0.0),
            Self::Back => Vec3::new(0.0, 2.0, -5.0),
            Self::Left => Vec3::new(-5.0, 2.0, 0.0),
            Self::Corner => Vec3::new(2.0, 2.0, 5.0),
        }
    }

    pub fn target(self) -> Vec3 {
        Vec3::ZERO
    }

    /// The key that selects this preset.
    pub fn key(self) -> &'static str {
        match self {
            Self::Front => "1",
            Self::Right => "2",
            Self::Back => "3",
            Self::Left => "4",
            Self::Corner => "5",
        }
    }
}

/// A high-level action produced from keyboard input.
///
/// The world consumes actions, never raw key events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneAction {
    /// Stop every clip, then play the named one.
    ActivateAnimation(String),
    /// Move the camera to a preset and look at the origin.
    CameraPreset(CameraPreset),
}

/// Map a key name (a character such as `"r"` or `"3"`) to its action.
pub fn action_for_key(key: &str) -> Option<SceneAction> {
    let clip = match key {
        "i" | "I" => Some("Idle"),
        "r" | "R" => Some("Run"),
        "t" | "T" => Some("TPose"),
        "w" | "W" => Some("Walk"),
        _ => None,
    };
    if let Some(clip) = clip {
        return Some(SceneAction::ActivateAnimation(clip.to_string()));
    }

    CameraPreset::ALL
        .into_iter()
        .find(|p| p.key() == key)
        .map(SceneAction::CameraPreset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_keys_both_cases() {
        for (key, clip) in [
            ("i", "Idle"),
            ("I", "Idle"),
            ("r", "Run"),
            ("R", "Run"),
            ("t", "TPose"),
            ("T", "TPose"),
            ("w", "Walk"),
            ("W", "Walk"),
        ] {
            assert_eq!(
                action_for_key(key),
                Some(SceneAction::ActivateAnimation(clip.into())),
                "key {key}"
            );
        }
    }

    #[test]
    fn digit_keys_select_presets() {
        assert_eq!(
            action_for_key("1"),
            Some(SceneAction::CameraPreset(CameraPreset::Front))
        );
        assert_eq!(
            action_for_key("5"),
            Some(SceneAction::CameraPreset(CameraPreset::Corner))
        );
    }

    #[test]
    fn preset_positions() {
        assert_eq!(CameraPreset::Right.position(), Vec3::new(5.0, 2.0, 0.0));
        assert_eq!(CameraPreset::Back.position(), Vec3::new(0.0, 2.0, -5.0));
        assert_eq!(CameraPreset::Left.position(), Vec3::new(-5.0, 2.0, 0.0));
        for preset in CameraPreset::ALL {
            assert_eq!(preset.target(), Vec3::ZERO);
        }
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        for key in ["a", "6", "0", "", "Idle", "F1", " "] {
            assert_eq!(action_for_key(key), None, "key {key:?}");
        }
    }
}
