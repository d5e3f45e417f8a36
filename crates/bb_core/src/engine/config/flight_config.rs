//! Flight & Landing Configuration

use serde::{Deserialize, Serialize};

use crate::engine::physics_constants::gravity::G_MPS2;

/// 비거리/체공시간/땅볼 구름/펜스 형상 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// m/s² (기본: 9.81)
    pub gravity: f64,
    /// 공기저항 계수 k: R = R₀ / (1 + k·T) (기본: 0.09)
    pub drag_coefficient: f64,

    // === Ground balls ===
    /// 이 발사각 미만은 구르는 타구 (기본: 10.0)
    pub ground_ball_max_angle: f64,
    /// 첫 바운드 후 수평속도 유지율 (기본: 0.85)
    pub ground_speed_retention: f64,
    /// 구름 감속도 m/s² (기본: 5.0)
    pub ground_deceleration: f64,
    /// 땅볼 최대 거리 m (기본: 55.0)
    pub ground_ball_max_distance: f64,

    // === Fence: line + gain·sin(dir/90·π) ===
    /// 파울라인 펜스 거리 m (기본: 100.0)
    pub fence_line_distance: f64,
    /// 중앙 펜스 추가 거리 m (기본: 22.0)
    pub fence_center_gain: f64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            gravity: G_MPS2,
            drag_coefficient: 0.09,
            ground_ball_max_angle: 10.0,
            ground_speed_retention: 0.85,
            ground_deceleration: 5.0,
            ground_ball_max_distance: 55.0,
            fence_line_distance: 100.0,
            fence_center_gain: 22.0,
        }
    }
}

impl FlightConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err("flight.gravity must be positive".into());
        }
        if !(self.drag_coefficient.is_finite() && self.drag_coefficient >= 0.0) {
            return Err("flight.drag_coefficient must be non-negative".into());
        }
        if !(self.ground_deceleration.is_finite() && self.ground_deceleration > 0.0) {
            return Err("flight.ground_deceleration must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.ground_speed_retention) {
            return Err("flight.ground_speed_retention must be within [0, 1]".into());
        }
        if !(self.ground_ball_max_distance > 0.0 && self.fence_line_distance > 0.0) {
            return Err("flight distances must be positive".into());
        }
        if !(self.fence_center_gain.is_finite() && self.fence_center_gain >= 0.0) {
            return Err("flight.fence_center_gain must be non-negative".into());
        }
        Ok(())
    }
}
