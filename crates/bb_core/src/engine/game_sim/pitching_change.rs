//! Pitcher substitution: 교체 시점 판단과 불펜 투수 선택
//!
//! 교체 사유 (우선순위 순):
//! 1. 세이브 기회 - 정규 마지막 이닝 이후 세이브 상황의 이닝 시작에 마무리 투입
//! 2. 투구수 한도
//! 3. 이닝 한도 (`max_innings`)
//! 4. 붕괴 - 선발은 등판 6실점 또는 이닝 4실점, 불펜은 3실점
//!
//! 불펜 선택은 상황(Situation)별 정책 우선순위 목록을 따른다.
//! 마무리(Closer)는 세이브 상황에만 나오고, 투구수/붕괴 교체에서 다른 투수가 없을 때만 예외로 쓴다.

use serde::{Deserialize, Serialize};

use super::state::Outing;
use crate::engine::bullpen::BullpenLedger;
use crate::engine::config::EngineConfig;
use crate::models::player::{PitcherAbilities, PlayerId};
use crate::models::team::{PitcherUsageConfig, RelieverPolicy, StarterPolicy, Team, UsagePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullReason {
    SaveOpportunity,
    PitchLimit,
    InningLimit,
    Collapse,
}

/// 수비팀 관점의 경기 상황
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    Save,
    Close,
    Trailing,
    Blowout,
    Comfortable,
}

impl Situation {
    pub fn classify(cfg: &EngineConfig, lead: i32, inning: u8) -> Situation {
        let b = &cfg.bullpen;
        if inning >= cfg.rules.innings && (1..=cfg.rules.save_lead_max).contains(&lead) {
            Situation::Save
        } else if lead.abs() >= b.blowout_margin {
            Situation::Blowout
        } else if lead.abs() <= b.close_game_margin {
            Situation::Close
        } else if lead < 0 {
            Situation::Trailing
        } else {
            Situation::Comfortable
        }
    }

    /// 이 상황에서 찾아볼 불펜 정책 순서
    pub fn preferences(self) -> &'static [RelieverPolicy] {
        use RelieverPolicy::*;
        match self {
            Situation::Save => &[Closer, CloseGame, BehindOk, MopUp],
            Situation::Close => &[CloseGame, BehindOk, MopUp],
            Situation::Trailing => &[BehindOk, MopUp, CloseGame],
            Situation::Blowout => &[MopUp, BehindOk, CloseGame],
            Situation::Comfortable => &[BehindOk, CloseGame, MopUp],
        }
    }
}

/// 투구수 한도. 선발 `60 + 0.8·stamina` × 정책 배율, 불펜 `15 + 0.5·stamina`.
pub fn pitch_limit(cfg: &EngineConfig, pitcher: &PitcherAbilities, usage: &PitcherUsageConfig) -> f64 {
    let b = &cfg.bullpen;
    let stamina = f64::from(pitcher.stamina);
    match usage.policy {
        UsagePolicy::Starter(policy) => {
            let factor = match policy {
                StarterPolicy::Standard => 1.0,
                StarterPolicy::Workhorse => b.workhorse_factor,
                StarterPolicy::Short => b.short_factor,
            };
            (b.starter_limit_base + b.starter_limit_per_stamina * stamina) * factor
        }
        UsagePolicy::Reliever(_) => b.reliever_limit_base + b.reliever_limit_per_stamina * stamina,
    }
}

/// 타석 전 교체 사유 점검 (세이브 기회 제외)
pub fn pull_reason(cfg: &EngineConfig, outing: &Outing) -> Option<PullReason> {
    let b = &cfg.bullpen;
    if f64::from(outing.pitches) >= outing.pitch_limit {
        return Some(PullReason::PitchLimit);
    }
    if outing.outs >= u32::from(outing.max_innings) * 3 {
        return Some(PullReason::InningLimit);
    }
    let collapsed = if outing.is_starter {
        outing.runs_allowed >= b.collapse_runs_outing || outing.runs_this_inning >= b.collapse_runs_inning
    } else {
        outing.runs_allowed >= b.reliever_collapse_runs
    };
    collapsed.then_some(PullReason::Collapse)
}

/// 불펜 후보 조회에 필요한 읽기 전용 문맥
pub struct BullpenView<'a> {
    pub team: &'a Team,
    pub ledger: &'a BullpenLedger,
    pub game_day: u32,
    pub used: &'a [PlayerId],
}

impl BullpenView<'_> {
    /// 아직 등판하지 않았고 원장상 휴식이 필요 없는 불펜 투수 (팀 우선순위 순)
    fn available<'b>(&'b self, cfg: &'b EngineConfig) -> impl Iterator<Item = (PlayerId, RelieverPolicy)> + 'b {
        self.team.reliever_ids.iter().filter_map(move |&id| {
            if self.used.contains(&id) || !self.ledger.is_available(id, self.game_day, &cfg.bullpen) {
                return None;
            }
            let policy = self.team.usage_for(id).reliever_policy().unwrap_or(RelieverPolicy::CloseGame);
            Some((id, policy))
        })
    }

    pub fn select(&self, cfg: &EngineConfig, situation: Situation, reason: PullReason) -> Option<PlayerId> {
        if reason == PullReason::SaveOpportunity {
            return self
                .available(cfg)
                .find(|(_, p)| *p == RelieverPolicy::Closer)
                .map(|(id, _)| id);
        }
        for wanted in situation.preferences() {
            if let Some((id, _)) = self.available(cfg).find(|(_, p)| p == wanted) {
                return Some(id);
            }
        }
        if matches!(reason, PullReason::PitchLimit | PullReason::Collapse) {
            return self
                .available(cfg)
                .find(|(_, p)| *p == RelieverPolicy::Closer)
                .map(|(id, _)| id);
        }
        None
    }

    pub fn closer_available(&self, cfg: &EngineConfig) -> bool {
        self.available(cfg).any(|(_, p)| p == RelieverPolicy::Closer)
    }
}
