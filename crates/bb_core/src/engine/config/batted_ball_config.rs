//! Batted Ball Configuration
//!
//! 타구 생성(방향/발사각/타구속도)과 타구 분류 임계값.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattedBallConfig {
    // === Direction (0° = 좌측 파울라인, 90° = 우측 파울라인) ===
    /// 스위치 타자 평균 방향 (기본: 45.0). 당겨치기 이동 없음
    pub direction_mean_switch: f64,
    /// 우타자 평균 방향 (기본: 38.0, 당겨치기 = 좌측)
    pub direction_mean_right: f64,
    /// 좌타자 평균 방향 (기본: 52.0)
    pub direction_mean_left: f64,
    /// 파워 1당 당겨치기 이동량 (기본: 0.08)
    pub pull_shift_per_power: f64,
    /// 방향 표준편차 (기본: 18.0)
    pub direction_sigma: f64,

    // === Launch angle ===
    /// 발사각 기준값 (기본: 12.0)
    pub launch_angle_base: f64,
    /// (기본: 0.08)
    pub launch_power_coef: f64,
    /// 컨택이 높을수록 낮은 라인드라이브 (기본: 0.04)
    pub launch_contact_coef: f64,
    /// 탄도 1단계당 (기본: 3.0)
    pub launch_trajectory_coef: f64,
    /// 싱커/슈트 최대 발사각 감소 (기본: 5.0)
    pub sinker_bonus_max: f64,
    /// (기본: 16.0)
    pub launch_angle_sigma: f64,
    pub launch_angle_min: f64,
    pub launch_angle_max: f64,

    // === Exit velocity (km/h) ===
    /// (기본: 132.0)
    pub exit_velocity_base: f64,
    /// (기본: 0.15)
    pub exit_velocity_power_coef: f64,
    /// (기본: 0.15)
    pub exit_velocity_contact_coef: f64,
    /// 변화구 위력 50 초과분당 감속 (기본: 0.15)
    pub breaking_penalty_coef: f64,
    /// (기본: 18.0)
    pub exit_velocity_sigma: f64,
    pub exit_velocity_min: f64,
    pub exit_velocity_max: f64,

    // === Breaking power = min(cap, Σ level² / divisor * scale) ===
    pub breaking_scale: f64,
    pub breaking_divisor: f64,
    pub breaking_cap: f64,
    /// 변화구가 없는 투수 (기본: 30.0)
    pub breaking_default: f64,

    // === Classification ===
    /// 이 각도 이상 + (popup_always_angle 이상 또는 느린 타구) → 팝업 (기본: 38.0)
    pub popup_angle: f64,
    /// (기본: 55.0)
    pub popup_always_angle: f64,
    /// 이 속도 미만의 높은 타구는 팝업 (기본: 135.0)
    pub popup_velocity_max: f64,
    /// 이 각도 미만은 땅볼 (기본: 10.0)
    pub ground_ball_max_angle: f64,
    /// 이 각도 미만은 라인드라이브 (기본: 20.0)
    pub line_drive_max_angle: f64,
    /// 약한 라인드라이브 → 땅볼 강등 각도 (기본: 15.0)
    pub weak_liner_angle: f64,
    /// 약한 라인드라이브 → 땅볼 강등 속도 (기본: 100.0)
    pub weak_liner_velocity: f64,
}

impl Default for BattedBallConfig {
    fn default() -> Self {
        Self {
            direction_mean_switch: 45.0,
            direction_mean_right: 38.0,
            direction_mean_left: 52.0,
            pull_shift_per_power: 0.08,
            direction_sigma: 18.0,

            launch_angle_base: 12.0,
            launch_power_coef: 0.08,
            launch_contact_coef: 0.04,
            launch_trajectory_coef: 3.0,
            sinker_bonus_max: 5.0,
            launch_angle_sigma: 16.0,
            launch_angle_min: -15.0,
            launch_angle_max: 70.0,

            exit_velocity_base: 132.0,
            exit_velocity_power_coef: 0.15,
            exit_velocity_contact_coef: 0.15,
            breaking_penalty_coef: 0.15,
            exit_velocity_sigma: 18.0,
            exit_velocity_min: 80.0,
            exit_velocity_max: 170.0,

            breaking_scale: 130.0,
            breaking_divisor: 245.0,
            breaking_cap: 100.0,
            breaking_default: 30.0,

            popup_angle: 38.0,
            popup_always_angle: 55.0,
            popup_velocity_max: 135.0,
            ground_ball_max_angle: 10.0,
            line_drive_max_angle: 20.0,
            weak_liner_angle: 15.0,
            weak_liner_velocity: 100.0,
        }
    }
}

impl BattedBallConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        let ranges = [
            ("launch_angle", self.launch_angle_min, self.launch_angle_max),
            ("exit_velocity", self.exit_velocity_min, self.exit_velocity_max),
        ];
        for (name, lo, hi) in ranges {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(format!("batted_ball.{name} range [{lo}, {hi}] is invalid"));
            }
        }
        for (name, sigma) in [
            ("direction_sigma", self.direction_sigma),
            ("launch_angle_sigma", self.launch_angle_sigma),
            ("exit_velocity_sigma", self.exit_velocity_sigma),
        ] {
            if !(sigma.is_finite() && sigma >= 0.0) {
                return Err(format!("batted_ball.{name} must be a non-negative number"));
            }
        }
        if self.breaking_divisor <= 0.0 {
            return Err("batted_ball.breaking_divisor must be positive".into());
        }
        if !(self.ground_ball_max_angle <= self.line_drive_max_angle
            && self.line_drive_max_angle <= self.popup_angle)
        {
            return Err("batted_ball classification angles must be ordered GB <= LD <= popup".into());
        }
        Ok(())
    }
}
