//! Physical constants and field geometry
//!
//! 좌표계: 홈플레이트 원점, +y = 2루/중견수 방향, 단위 m.
//! 방향각 0° = 좌측 파울라인, 45° = 중앙, 90° = 우측 파울라인.

// ============================================================
// Units
// ============================================================
pub mod units {
    /// km/h → m/s
    pub const KMH_TO_MPS: f64 = 1.0 / 3.6;

    #[inline]
    pub fn kmh_to_mps(kmh: f64) -> f64 {
        kmh * KMH_TO_MPS
    }
}

// ============================================================
// Diamond
// ============================================================
pub mod field {
    /// 베이스 간 거리 (90 ft)
    pub const BASE_PATH_M: f64 = 27.43;

    /// 1루 (x, y), 27.43/√2 ≈ 19.4
    pub const FIRST_BASE: (f64, f64) = (19.4, 19.4);

    /// 투수판 (60.5 ft)
    pub const PITCHERS_MOUND: (f64, f64) = (0.0, 18.4);

    /// 중앙 방향각
    pub const CENTER_DIRECTION_DEG: f64 = 45.0;
    pub const FOUL_LINE_LEFT_DEG: f64 = 0.0;
    pub const FOUL_LINE_RIGHT_DEG: f64 = 90.0;
}

// ============================================================
// Gravity
// ============================================================
pub mod gravity {
    pub const G_MPS2: f64 = 9.81;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{FieldingConfig, FlightConfig};

    #[test]
    fn test_diamond_geometry() {
        let (x, y) = field::FIRST_BASE;
        assert!((x.hypot(y) - field::BASE_PATH_M).abs() < 0.05);
        assert!((units::kmh_to_mps(36.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_config_defaults_use_field_constants() {
        let fielding = FieldingConfig::default();
        assert_eq!((fielding.first_base.x, fielding.first_base.y), field::FIRST_BASE);
        assert_eq!((fielding.start_positions[0].x, fielding.start_positions[0].y), field::PITCHERS_MOUND);
        assert_eq!(fielding.base_path, field::BASE_PATH_M);
        assert_eq!(FlightConfig::default().gravity, gravity::G_MPS2);
    }
}
