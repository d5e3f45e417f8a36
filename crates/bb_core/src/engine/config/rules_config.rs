//! Game Rules & Base Running Configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRulesConfig {
    /// 정규 이닝 (기본: 9)
    pub innings: u8,
    /// 이 이닝까지 승부가 안 나면 무승부. None = 무제한 연장 (기본: None)
    pub extra_innings_limit: Option<u8>,
    /// 세이브 상황 최대 리드 (기본: 3)
    pub save_lead_max: i32,
}

impl Default for GameRulesConfig {
    fn default() -> Self {
        Self { innings: 9, extra_innings_limit: None, save_lead_max: 3 }
    }
}

impl GameRulesConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        if self.innings == 0 {
            return Err("rules.innings must be at least 1".into());
        }
        if let Some(limit) = self.extra_innings_limit {
            if limit < self.innings {
                return Err(format!(
                    "rules.extra_innings_limit ({limit}) is below scheduled innings ({})",
                    self.innings
                ));
            }
        }
        if self.save_lead_max < 1 {
            return Err("rules.save_lead_max must be at least 1".into());
        }
        Ok(())
    }
}

/// 주루 진루 확률. 주력과 2아웃(타구와 동시에 스타트)으로 보정된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseRunningConfig {
    /// 단타 때 2루 주자 득점 (기본: 0.60)
    pub score_from_second_on_single: f64,
    /// 단타 때 1루 → 3루 (기본: 0.33)
    pub first_to_third_on_single: f64,
    /// 2루타 때 1루 주자 득점 (기본: 0.42)
    pub score_from_first_on_double: f64,
    /// 주력 1당 (기본: 0.006)
    pub speed_coef: f64,
    /// 2아웃 보정 (기본: 0.15)
    pub two_out_bonus: f64,
    /// 비포스 3루 주자 땅볼 득점 (기본: 0.5)
    pub score_from_third_on_groundout: f64,
    /// 2루 주자 태그업 3루 진루 최소 비거리 (기본: 85.0)
    pub tag_up_to_third_distance: f64,
}

impl Default for BaseRunningConfig {
    fn default() -> Self {
        Self {
            score_from_second_on_single: 0.60,
            first_to_third_on_single: 0.33,
            score_from_first_on_double: 0.42,
            speed_coef: 0.006,
            two_out_bonus: 0.15,
            score_from_third_on_groundout: 0.5,
            tag_up_to_third_distance: 85.0,
        }
    }
}

impl BaseRunningConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        for (name, p) in [
            ("score_from_second_on_single", self.score_from_second_on_single),
            ("first_to_third_on_single", self.first_to_third_on_single),
            ("score_from_first_on_double", self.score_from_first_on_double),
            ("score_from_third_on_groundout", self.score_from_third_on_groundout),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("base_running.{name} must be within [0, 1]"));
            }
        }
        Ok(())
    }
}
