//! Runtime policy knobs, loaded from an optional JSON file

use std::path::Path;

use interfaces::types::BlockKind;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Res};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub allow_break: bool,
    /// blocks that may be broken even when `allow_break` is false
    pub allow_break_anyway: Vec<BlockKind>,
    pub allow_place: bool,
    pub allow_sprint: bool,
    pub allow_parkour: bool,
    pub allow_parkour_place: bool,
    pub allow_parkour_ascend: bool,
    pub allow_jump_at_build_limit: bool,
    pub assume_walk_on_water: bool,
    pub allow_diagonal_descend: bool,
    pub allow_diagonal_ascend: bool,
    pub allow_downward: bool,
    pub allow_water_bucket_fall: bool,
    pub max_fall_height_no_water: i16,
    pub max_fall_height_bucket: i16,
    pub block_placement_penalty: f64,
    pub block_break_additional_penalty: f64,
    pub backtrack_cost_favoring_coefficient: f64,
    pub jump_penalty: f64,
    pub walk_on_water_one_penalty: f64,

    /// start walking to a ledge when told to fly while on the ground
    pub elytra_auto_jump: bool,
    pub elytra_allow_emergency_land: bool,
    pub elytra_minimum_durability: u16,
    pub elytra_min_fireworks_before_landing: u32,
    pub elytra_allow_land_on_nether_fortress: bool,
    pub elytra_predict_terrain: bool,
    pub elytra_nether_seed: i64,
    pub notification_on_path_complete: bool,
    pub disconnect_on_arrival: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_break: true,
            allow_break_anyway: Vec::new(),
            allow_place: true,
            allow_sprint: true,
            allow_parkour: false,
            allow_parkour_place: false,
            allow_parkour_ascend: true,
            allow_jump_at_build_limit: false,
            assume_walk_on_water: false,
            allow_diagonal_descend: false,
            allow_diagonal_ascend: false,
            allow_downward: true,
            allow_water_bucket_fall: true,
            max_fall_height_no_water: 3,
            max_fall_height_bucket: 20,
            block_placement_penalty: 20.0,
            block_break_additional_penalty: 2.0,
            backtrack_cost_favoring_coefficient: 0.5,
            jump_penalty: 2.0,
            walk_on_water_one_penalty: 3.0,
            elytra_auto_jump: false,
            elytra_allow_emergency_land: true,
            elytra_minimum_durability: 5,
            elytra_min_fireworks_before_landing: 5,
            elytra_allow_land_on_nether_fortress: false,
            elytra_predict_terrain: false,
            elytra_nether_seed: 146_008_555_100_680,
            notification_on_path_complete: true,
            disconnect_on_arrival: false,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use interfaces::types::BlockKind;

    use crate::{client::settings::Settings, error::Error};

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(
            r#"{ "allow_break": false, "allow_break_anyway": [87], "elytra_auto_jump": true }"#,
        )
        .unwrap();

        assert!(!settings.allow_break);
        assert_eq!(settings.allow_break_anyway, vec![BlockKind::NETHERRACK]);
        assert!(settings.elytra_auto_jump);

        // untouched keys keep defaults
        assert_eq!(settings.max_fall_height_no_water, 3);
        assert!(settings.elytra_allow_emergency_land);
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/definitely/not/a/settings.json").unwrap_err();
        assert_matches!(err, Error::Io { .. });
    }
}
