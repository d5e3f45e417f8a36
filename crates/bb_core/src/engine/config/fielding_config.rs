//! Fielding Configuration
//!
//! 수비 위치, 이동 속도 모델, 반응 시간, 송구/주루 경주, 실책률.

use serde::{Deserialize, Serialize};

use crate::engine::flight::FieldPoint;
use crate::engine::physics_constants::field::{BASE_PATH_M, FIRST_BASE, PITCHERS_MOUND};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldingConfig {
    /// 수비 번호 1~9 순서의 시작 위치 (m)
    pub start_positions: [FieldPoint; 9],

    // === Speed: (base + per_speed·speed)·(range_base + range_per_fielding·fielding) ===
    /// m/s (기본: 6.5)
    pub speed_base: f64,
    /// (기본: 0.04)
    pub speed_per_rating: f64,
    /// (기본: 0.9)
    pub range_base: f64,
    /// (기본: 0.002)
    pub range_per_fielding: f64,

    // === Reaction (seconds) ===
    /// 뜬공/라인드라이브 (기본: 0.4)
    pub air_reaction: f64,
    /// 팝업은 낙구 지점 판단이 늦다 (기본: 0.5)
    pub popup_reaction: f64,
    /// 내야수 땅볼 (기본: 0.45)
    pub infield_ground_reaction: f64,
    /// 투수/포수 땅볼 (기본: 0.7)
    pub battery_ground_reaction: f64,
    /// 외야수 땅볼 (기본: 0.4)
    pub outfield_ground_reaction: f64,

    // === Ground-ball interception ===
    /// 땅볼 횡이동 속도 비율 (기본: 0.66)
    pub ground_lateral_factor: f64,
    /// 포구 여유 시간 (기본: 0.15)
    pub ground_slack: f64,
    /// 내야수는 자기 수비 깊이 + 이 값까지만 타구 경로를 따라 잡는다 (기본: 3.0)
    pub infield_depth_allowance: f64,
    /// 경로 탐색 시작점 (기본: 3.0)
    pub intercept_start: f64,
    /// 경로 탐색 간격 (기본: 1.0)
    pub intercept_step: f64,
    /// 내야를 빠져나간 땅볼을 외야수가 회수할 때 페널티 (기본: 0.6)
    pub bounce_penalty: f64,

    // === Infield-hit race ===
    /// 포구 후 송구까지 (기본: 0.8)
    pub transfer_time: f64,
    /// 송구 속도 m/s (기본: 28.0)
    pub throw_speed_base: f64,
    /// (기본: 0.15)
    pub throw_speed_per_arm: f64,
    pub first_base: FieldPoint,
    /// 타자 출발 지연 (기본: 0.3)
    pub runner_start_delay: f64,
    /// 주자 속도 m/s (기본: 7.5)
    pub runner_speed_base: f64,
    /// (기본: 0.04)
    pub runner_speed_per_rating: f64,
    /// 홈-1루 거리 m (기본: 27.43)
    pub base_path: f64,
    /// 경주 판정 노이즈 표준편차 (기본: 0.2)
    pub race_noise_sigma: f64,

    // === Errors ===
    /// (기본: 0.018)
    pub ground_error_rate: f64,
    /// (기본: 0.006)
    pub air_error_rate: f64,
    /// rate × (base − per_catching·catching) (기본: 1.6)
    pub error_catching_base: f64,
    /// (기본: 0.012)
    pub error_per_catching: f64,
}

impl Default for FieldingConfig {
    fn default() -> Self {
        Self {
            start_positions: [
                FieldPoint::new(PITCHERS_MOUND.0, PITCHERS_MOUND.1),
                FieldPoint::new(0.0, -1.0),
                FieldPoint::from_polar(80.0, 30.0),
                FieldPoint::from_polar(60.0, 40.0),
                FieldPoint::from_polar(10.0, 30.0),
                FieldPoint::from_polar(30.0, 40.0),
                FieldPoint::from_polar(18.0, 84.0),
                FieldPoint::from_polar(45.0, 91.0),
                FieldPoint::from_polar(72.0, 84.0),
            ],

            speed_base: 6.5,
            speed_per_rating: 0.04,
            range_base: 0.9,
            range_per_fielding: 0.002,

            air_reaction: 0.4,
            popup_reaction: 0.5,
            infield_ground_reaction: 0.45,
            battery_ground_reaction: 0.7,
            outfield_ground_reaction: 0.4,

            ground_lateral_factor: 0.66,
            ground_slack: 0.15,
            infield_depth_allowance: 3.0,
            intercept_start: 3.0,
            intercept_step: 1.0,
            bounce_penalty: 0.6,

            transfer_time: 0.8,
            throw_speed_base: 28.0,
            throw_speed_per_arm: 0.15,
            first_base: FieldPoint::new(FIRST_BASE.0, FIRST_BASE.1),
            runner_start_delay: 0.3,
            runner_speed_base: 7.5,
            runner_speed_per_rating: 0.04,
            base_path: BASE_PATH_M,
            race_noise_sigma: 0.2,

            ground_error_rate: 0.018,
            air_error_rate: 0.006,
            error_catching_base: 1.6,
            error_per_catching: 0.012,
        }
    }
}

impl FieldingConfig {
    /// 야수 이동 속도 m/s
    #[inline]
    pub fn fielder_speed(&self, speed: u8, fielding: u8) -> f64 {
        (self.speed_base + self.speed_per_rating * f64::from(speed))
            * (self.range_base + self.range_per_fielding * f64::from(fielding))
    }

    /// 주자 속도 m/s
    #[inline]
    pub fn runner_speed(&self, speed: u8) -> f64 {
        self.runner_speed_base + self.runner_speed_per_rating * (f64::from(speed) - 50.0)
    }

    #[inline]
    pub fn throw_speed(&self, arm: u8) -> f64 {
        self.throw_speed_base + self.throw_speed_per_arm * (f64::from(arm) - 50.0)
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.fielder_speed(1, 1) <= 0.0 {
            return Err("fielding speed model yields non-positive speed".into());
        }
        if self.runner_speed(1) <= 0.0 || self.throw_speed(1) <= 0.0 {
            return Err("fielding runner/throw speed must stay positive".into());
        }
        if !(self.intercept_step > 0.0) {
            return Err("fielding.intercept_step must be positive".into());
        }
        for (name, rate) in [
            ("ground_error_rate", self.ground_error_rate),
            ("air_error_rate", self.air_error_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(format!("fielding.{name} must be within [0, 1]"));
            }
        }
        if self.start_positions.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err("fielding.start_positions must be finite".into());
        }
        Ok(())
    }
}
