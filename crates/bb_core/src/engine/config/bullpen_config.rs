//! Bullpen & Pitcher Usage Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BullpenConfig {
    // === Starter ===
    /// 선발 투구수 한도 = base + per_stamina·stamina (기본: 60.0)
    pub starter_limit_base: f64,
    /// (기본: 0.8)
    pub starter_limit_per_stamina: f64,
    /// (기본: 1.15)
    pub workhorse_factor: f64,
    /// (기본: 0.6)
    pub short_factor: f64,
    /// 등판 중 누적 실점 붕괴 기준 (기본: 6)
    pub collapse_runs_outing: u32,
    /// 한 이닝 실점 붕괴 기준 (기본: 4)
    pub collapse_runs_inning: u32,

    // === Reliever ===
    /// 불펜 투구수 한도 = base + per_stamina·stamina (기본: 15.0)
    pub reliever_limit_base: f64,
    /// (기본: 0.5)
    pub reliever_limit_per_stamina: f64,
    /// (기본: 3)
    pub reliever_collapse_runs: u32,

    // === Situations (수비팀 기준 점수차) ===
    /// |점수차| 이내는 접전 (기본: 2)
    pub close_game_margin: i32,
    /// |점수차| 이상은 큰 점수차 (기본: 5)
    pub blowout_margin: i32,

    // === Ledger rest rules ===
    /// 직전 N일 연속 등판 시 휴식 (기본: 2)
    pub rest_after_consecutive_days: u32,
    /// 전날 이 투구수 이상이면 휴식 (기본: 35)
    pub rest_after_pitches: u32,

    // === Decisions ===
    /// 퀄리티 스타트 최소 아웃 (기본: 18)
    pub quality_start_outs: u32,
    /// 퀄리티 스타트 최대 자책 (기본: 3)
    pub quality_start_max_earned_runs: u32,
    /// 선발승 최소 아웃 (기본: 15)
    pub starter_win_min_outs: u32,
}

impl Default for BullpenConfig {
    fn default() -> Self {
        Self {
            starter_limit_base: 60.0,
            starter_limit_per_stamina: 0.8,
            workhorse_factor: 1.15,
            short_factor: 0.6,
            collapse_runs_outing: 6,
            collapse_runs_inning: 4,

            reliever_limit_base: 15.0,
            reliever_limit_per_stamina: 0.5,
            reliever_collapse_runs: 3,

            close_game_margin: 2,
            blowout_margin: 5,

            rest_after_consecutive_days: 2,
            rest_after_pitches: 35,

            quality_start_outs: 18,
            quality_start_max_earned_runs: 3,
            starter_win_min_outs: 15,
        }
    }
}

impl BullpenConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        if !(self.starter_limit_base > 0.0 && self.reliever_limit_base > 0.0) {
            return Err("bullpen pitch-limit bases must be positive".into());
        }
        if !(self.workhorse_factor > 0.0 && self.short_factor > 0.0) {
            return Err("bullpen starter policy factors must be positive".into());
        }
        if self.close_game_margin < 0 || self.blowout_margin <= self.close_game_margin {
            return Err("bullpen margins must satisfy 0 <= close < blowout".into());
        }
        if self.rest_after_consecutive_days == 0 {
            return Err("bullpen.rest_after_consecutive_days must be at least 1".into());
        }
        Ok(())
    }
}
