//! Plate Appearance (pitch-by-pitch) Configuration

use serde::{Deserialize, Serialize};

/// 투구 단위 확률 모델. 모든 결과 확률은 [min, max]로 clamp된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchingConfig {
    // === Hit by pitch: base · (1.5 − control/100) ===
    /// (기본: 0.0028)
    pub hit_by_pitch_base: f64,

    // === Zone ===
    /// 스트라이크존 투구 확률 (기본: 0.47)
    pub zone_base: f64,
    /// (기본: 0.004)
    pub zone_control_coef: f64,
    /// 3볼에서 존 공략 (기본: 0.08)
    pub zone_three_ball_bonus: f64,
    /// 유리한 카운트(2S, 볼 2개 미만)의 유인구 (기본: 0.06)
    pub zone_two_strike_waste: f64,
    pub zone_min: f64,
    pub zone_max: f64,

    // === Swing ===
    /// 존 안 스윙 (기본: 0.66)
    pub swing_zone_base: f64,
    pub swing_contact_coef: f64,
    /// 2스트라이크 보호 스윙 (기본: 0.15)
    pub swing_two_strike_bonus: f64,
    /// 3볼 (2스트라이크 미만) 기다리기 (기본: 0.10)
    pub swing_three_ball_take: f64,
    pub swing_zone_min: f64,
    pub swing_zone_max: f64,
    /// 존 밖 스윙 (기본: 0.28)
    pub chase_base: f64,
    /// 선구안 1당 (기본: 0.005)
    pub chase_eye_coef: f64,
    /// 변화구 위력 1당 (기본: 0.002)
    pub chase_breaking_coef: f64,
    /// (기본: 0.12)
    pub chase_two_strike_bonus: f64,
    pub chase_min: f64,
    pub chase_max: f64,

    // === Contact ===
    /// 존 안 컨택 (기본: 0.84)
    pub contact_zone_base: f64,
    /// 컨택 1당 (기본: 0.004)
    pub contact_rating_coef: f64,
    /// 구속 1km/h당 (기본: 0.004)
    pub contact_velocity_coef: f64,
    /// 구속 기준 (기본: 145.0)
    pub contact_velocity_pivot: f64,
    /// (기본: 0.002)
    pub contact_zone_breaking_coef: f64,
    pub contact_zone_min: f64,
    pub contact_zone_max: f64,
    /// 존 밖 컨택 (기본: 0.55)
    pub contact_chase_base: f64,
    /// (기본: 0.003)
    pub contact_chase_breaking_coef: f64,
    pub contact_chase_min: f64,
    pub contact_chase_max: f64,

    // === Foul ===
    /// 컨택 중 파울 비율 (기본: 0.48)
    pub foul_chance: f64,
    /// 2스트라이크 파울 중 파울팁 삼진 (기본: 0.06)
    pub foul_tip_chance: f64,
    /// 이 투구수 이후 컨택은 무조건 인플레이 (기본: 15)
    pub max_pitches_before_forced_play: u16,

    // === Fatigue ===
    /// 완전 피로 시 구속 감소 km/h (기본: 6.0)
    pub fatigue_velocity_drop: f64,
    /// 완전 피로 시 제구 감소 (기본: 15.0)
    pub fatigue_control_drop: f64,
    /// 한도 초과 후 완전 피로까지 투구수 (기본: 30.0)
    pub fatigue_ramp_pitches: f64,
}

impl Default for PitchingConfig {
    fn default() -> Self {
        Self {
            hit_by_pitch_base: 0.0028,

            zone_base: 0.47,
            zone_control_coef: 0.004,
            zone_three_ball_bonus: 0.08,
            zone_two_strike_waste: 0.06,
            zone_min: 0.25,
            zone_max: 0.75,

            swing_zone_base: 0.66,
            swing_contact_coef: 0.002,
            swing_two_strike_bonus: 0.15,
            swing_three_ball_take: 0.10,
            swing_zone_min: 0.3,
            swing_zone_max: 0.97,
            chase_base: 0.28,
            chase_eye_coef: 0.005,
            chase_breaking_coef: 0.002,
            chase_two_strike_bonus: 0.12,
            chase_min: 0.05,
            chase_max: 0.7,

            contact_zone_base: 0.84,
            contact_rating_coef: 0.004,
            contact_velocity_coef: 0.004,
            contact_velocity_pivot: 145.0,
            contact_zone_breaking_coef: 0.002,
            contact_zone_min: 0.5,
            contact_zone_max: 0.98,
            contact_chase_base: 0.55,
            contact_chase_breaking_coef: 0.003,
            contact_chase_min: 0.3,
            contact_chase_max: 0.9,

            foul_chance: 0.48,
            foul_tip_chance: 0.06,
            max_pitches_before_forced_play: 15,

            fatigue_velocity_drop: 6.0,
            fatigue_control_drop: 15.0,
            fatigue_ramp_pitches: 30.0,
        }
    }
}

impl PitchingConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        for (name, lo, hi) in [
            ("zone", self.zone_min, self.zone_max),
            ("swing_zone", self.swing_zone_min, self.swing_zone_max),
            ("chase", self.chase_min, self.chase_max),
            ("contact_zone", self.contact_zone_min, self.contact_zone_max),
            ("contact_chase", self.contact_chase_min, self.contact_chase_max),
        ] {
            if !(0.0 <= lo && lo <= hi && hi <= 1.0) {
                return Err(format!("pitching.{name} bounds [{lo}, {hi}] are invalid"));
            }
        }
        for (name, p) in [
            ("foul_chance", self.foul_chance),
            ("foul_tip_chance", self.foul_tip_chance),
        ] {
            if !(0.0..1.0).contains(&p) {
                return Err(format!("pitching.{name} must be within [0, 1)"));
            }
        }
        if self.max_pitches_before_forced_play == 0 {
            return Err("pitching.max_pitches_before_forced_play must be at least 1".into());
        }
        if !(self.fatigue_ramp_pitches > 0.0) {
            return Err("pitching.fatigue_ramp_pitches must be positive".into());
        }
        Ok(())
    }
}
