use serde::{Deserialize, Serialize};

/// The horizontal world border. Bounds are fractional because the border
/// can be centered anywhere.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldBorder {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for WorldBorder {
    fn default() -> Self {
        Self::centered(0.0, 0.0, 59_999_968.0)
    }
}

impl WorldBorder {
    pub fn centered(x: f64, z: f64, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            min_x: x - half,
            max_x: x + half,
            min_z: z - half,
            max_z: z + half,
        }
    }

    /// true if any part of the block column is inside the border
    pub fn entirely_contains(&self, x: i32, z: i32) -> bool {
        let (x, z) = (f64::from(x), f64::from(z));
        x + 1.0 > self.min_x && x < self.max_x && z + 1.0 > self.min_z && z < self.max_z
    }

    /// blocks touching the border cannot be placed against
    pub fn can_place_at(&self, x: i32, z: i32) -> bool {
        let (x, z) = (f64::from(x), f64::from(z));
        x > self.min_x && x + 1.0 < self.max_x && z > self.min_z && z + 1.0 < self.max_z
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::border::WorldBorder;

    #[test]
    fn test_place_inset() {
        let border = WorldBorder::centered(0.0, 0.0, 20.0);

        assert!(border.can_place_at(0, 0));
        assert!(border.can_place_at(-9, 8));

        // the block straddling the edge is inside but not placeable
        assert!(border.entirely_contains(9, 0));
        assert!(!border.can_place_at(9, 0));
        assert!(!border.can_place_at(-10, 0));

        assert!(!border.entirely_contains(10, 0));
        assert!(!border.entirely_contains(0, -11));
    }
}
