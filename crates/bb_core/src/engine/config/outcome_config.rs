//! Outcome Classifier Configuration
//!
//! 홈런 구간/캐리 계수는 실측이 아닌 보정값이다. 리그 환경에 맞춰 조정한다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeConfig {
    // === Home run ===
    /// 이 비율 이상이면 무조건 홈런 (기본: 1.05)
    pub home_run_certain_ratio: f64,
    /// 확률 홈런 구간 하한 (기본: 0.95)
    pub home_run_band_floor: f64,
    /// 파워 1당 홈런 확률 보정 (기본: 0.002)
    pub home_run_power_coef: f64,
    pub home_run_chance_min: f64,
    pub home_run_chance_max: f64,
    /// 탄도 1~4별 비거리 배수 (기본: 0.90/1.00/1.05/1.10)
    pub carry_factors: [f64; 4],

    // === Hit typing (uncatchable) ===
    /// 파울라인 근처 판정 각도 (기본: 6.0)
    pub line_angle: f64,
    /// 라인 따라 빠지는 땅볼 최소 거리 (기본: 45.0)
    pub line_double_min_distance: f64,
    /// (기본: 0.35)
    pub line_double_chance: f64,
    /// r = 거리/펜스 ≥ 이 값이면 장타 (기본: 0.68)
    pub extra_base_ratio: f64,
    /// 2루타 가능 구간 하한 (기본: 0.42)
    pub double_ratio: f64,
    /// 구간 상단에서의 2루타 확률 (기본: 0.8)
    pub double_chance: f64,
    /// 주력 1당 2루타 확률 보정 (기본: 0.004)
    pub double_speed_coef: f64,
    /// 좌중간/우중간 판정: |dir − 45| ∈ [gap_min, gap_max]
    pub gap_min_offset: f64,
    pub gap_max_offset: f64,
    /// 펜스 직격 판정 비율 (기본: 0.95)
    pub off_wall_ratio: f64,
    /// 3루타 기본 확률 (기본: 0.15)
    pub triple_base: f64,
    pub triple_speed_coef: f64,
    pub triple_ratio_coef: f64,
    pub triple_ratio_pivot: f64,
    pub triple_chance_min: f64,
    pub triple_chance_max: f64,

    // === Double play / fielder's choice / sacrifice fly ===
    /// (기본: 0.5)
    pub double_play_base: f64,
    pub double_play_fielding_coef: f64,
    pub double_play_speed_coef: f64,
    pub double_play_min: f64,
    pub double_play_max: f64,
    /// 병살 실패 시 선행주자 아웃 확률 (기본: 0.5)
    pub fielders_choice_chance: f64,
    /// 희생플라이 최소 비거리 (기본: 60.0)
    pub sacrifice_fly_min_distance: f64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            home_run_certain_ratio: 1.05,
            home_run_band_floor: 0.95,
            home_run_power_coef: 0.002,
            home_run_chance_min: 0.01,
            home_run_chance_max: 0.90,
            carry_factors: [0.90, 1.00, 1.05, 1.10],

            line_angle: 6.0,
            line_double_min_distance: 45.0,
            line_double_chance: 0.35,
            extra_base_ratio: 0.68,
            double_ratio: 0.42,
            double_chance: 0.8,
            double_speed_coef: 0.004,
            gap_min_offset: 10.0,
            gap_max_offset: 35.0,
            off_wall_ratio: 0.95,
            triple_base: 0.15,
            triple_speed_coef: 0.004,
            triple_ratio_coef: 0.6,
            triple_ratio_pivot: 0.85,
            triple_chance_min: 0.01,
            triple_chance_max: 0.5,

            double_play_base: 0.5,
            double_play_fielding_coef: 0.005,
            double_play_speed_coef: 0.006,
            double_play_min: 0.05,
            double_play_max: 0.9,
            fielders_choice_chance: 0.5,
            sacrifice_fly_min_distance: 60.0,
        }
    }
}

impl OutcomeConfig {
    /// 탄도(1~4) → 캐리 계수. 범위 밖은 가장 가까운 값으로.
    #[inline]
    pub fn carry_factor(&self, trajectory: u8) -> f64 {
        let idx = usize::from(trajectory.clamp(1, 4)) - 1;
        self.carry_factors[idx]
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if !(self.home_run_band_floor < self.home_run_certain_ratio) {
            return Err("outcome home-run band floor must be below the certain ratio".into());
        }
        if self.carry_factors.iter().any(|c| !(c.is_finite() && *c > 0.0)) {
            return Err("outcome.carry_factors must be positive".into());
        }
        if !(self.double_ratio < self.extra_base_ratio) {
            return Err("outcome.double_ratio must be below extra_base_ratio".into());
        }
        for (name, lo, hi) in [
            ("home_run_chance", self.home_run_chance_min, self.home_run_chance_max),
            ("triple_chance", self.triple_chance_min, self.triple_chance_max),
            ("double_play", self.double_play_min, self.double_play_max),
        ] {
            if !(0.0 <= lo && lo <= hi && hi <= 1.0) {
                return Err(format!("outcome.{name} bounds [{lo}, {hi}] are invalid"));
            }
        }
        for (name, p) in [
            ("line_double_chance", self.line_double_chance),
            ("fielders_choice_chance", self.fielders_choice_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("outcome.{name} must be within [0, 1]"));
            }
        }
        Ok(())
    }
}
