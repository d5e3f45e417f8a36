//! Team model: roster, batting order, pitching staff and usage policies

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::player::{Player, PlayerId, Position};
use crate::error::{GameError, Result};

pub const LINEUP_SIZE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupSlot {
    pub player_id: PlayerId,
    /// 이 경기에서 맡는 수비 위치. `Pitcher` 슬롯은 현재 마운드의 투수로 해석된다.
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarterPolicy {
    #[default]
    Standard,
    /// 투구수 한도 +15%
    Workhorse,
    /// 투구수 한도 -40% (오프너/오프너성 선발)
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelieverPolicy {
    /// 9회 이후 3점 이내 리드 수호
    Closer,
    /// 접전 셋업
    CloseGame,
    /// 지고 있을 때도 투입 가능
    BehindOk,
    /// 큰 점수차 (롱릴리프)
    MopUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "policy", rename_all = "snake_case")]
pub enum UsagePolicy {
    Starter(StarterPolicy),
    Reliever(RelieverPolicy),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherUsageConfig {
    pub policy: UsagePolicy,
    pub max_innings: u8,
}

impl PitcherUsageConfig {
    pub fn starter(policy: StarterPolicy) -> Self {
        Self { policy: UsagePolicy::Starter(policy), max_innings: 9 }
    }

    pub fn reliever(policy: RelieverPolicy) -> Self {
        let max_innings = match policy {
            RelieverPolicy::MopUp => 3,
            RelieverPolicy::BehindOk => 2,
            RelieverPolicy::Closer | RelieverPolicy::CloseGame => 1,
        };
        Self { policy: UsagePolicy::Reliever(policy), max_innings }
    }

    pub fn reliever_policy(&self) -> Option<RelieverPolicy> {
        match self.policy {
            UsagePolicy::Reliever(p) => Some(p),
            UsagePolicy::Starter(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub players: Vec<Player>,
    /// 타순 (정확히 9명)
    pub lineup: Vec<LineupSlot>,
    pub starting_pitcher_id: PlayerId,
    /// 불펜 우선순위 순서
    #[serde(default)]
    pub reliever_ids: Vec<PlayerId>,
    #[serde(default)]
    pub pitcher_usage: BTreeMap<PlayerId, PitcherUsageConfig>,
}

impl Team {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// 명시적 설정이 없으면 선발은 Standard, 불펜은 CloseGame.
    pub fn usage_for(&self, id: PlayerId) -> PitcherUsageConfig {
        if let Some(cfg) = self.pitcher_usage.get(&id) {
            return *cfg;
        }
        if id == self.starting_pitcher_id {
            PitcherUsageConfig::starter(StarterPolicy::Standard)
        } else {
            PitcherUsageConfig::reliever(RelieverPolicy::CloseGame)
        }
    }

    pub fn uses_designated_hitter(&self) -> bool {
        self.lineup.iter().any(|s| s.position == Position::DesignatedHitter)
    }

    /// 경기 시작 전 사전조건 검사.
    ///
    /// - 9명 타순, 포수~우익수 각 1명
    /// - 투수 슬롯 또는 지명타자 중 정확히 하나
    /// - 선발/불펜 투수는 투수 능력치 보유
    pub fn validate(&self) -> Result<()> {
        let team = || self.name.clone();

        if self.players.is_empty() {
            return Err(GameError::EmptyRoster { team: team() });
        }

        let mut seen = HashSet::new();
        for p in &self.players {
            if !seen.insert(p.id) {
                return Err(GameError::DuplicatePlayer { team: team(), id: p.id });
            }
            p.validate()?;
        }

        if self.lineup.len() != LINEUP_SIZE {
            return Err(GameError::InvalidLineupSize {
                team: team(),
                expected: LINEUP_SIZE,
                found: self.lineup.len(),
            });
        }

        let mut in_lineup = HashSet::new();
        for slot in &self.lineup {
            if self.player(slot.player_id).is_none() {
                return Err(GameError::UnknownPlayer { team: team(), id: slot.player_id });
            }
            if !in_lineup.insert(slot.player_id) {
                return Err(GameError::DuplicatePlayer { team: team(), id: slot.player_id });
            }
        }

        for position in Position::DEFENSIVE.iter().skip(1) {
            let count = self.lineup.iter().filter(|s| s.position == *position).count();
            if count != 1 {
                return Err(GameError::PositionCoverage { team: team(), position: *position });
            }
        }

        let pitcher_slots: Vec<&LineupSlot> =
            self.lineup.iter().filter(|s| s.position == Position::Pitcher).collect();
        let dh_slots = self.lineup.iter().filter(|s| s.position == Position::DesignatedHitter).count();
        match (pitcher_slots.len(), dh_slots) {
            (0, 1) => {}
            (1, 0) => {
                if pitcher_slots[0].player_id != self.starting_pitcher_id {
                    return Err(GameError::NoEligiblePitcher {
                        team: team(),
                        reason: "pitcher batting slot must hold the starting pitcher".into(),
                    });
                }
            }
            _ => {
                let position = if pitcher_slots.len() > 1 {
                    Position::Pitcher
                } else {
                    Position::DesignatedHitter
                };
                return Err(GameError::PositionCoverage { team: team(), position });
            }
        }

        match self.player(self.starting_pitcher_id) {
            None => {
                return Err(GameError::NoEligiblePitcher {
                    team: team(),
                    reason: format!("starting pitcher {} is not on the roster", self.starting_pitcher_id),
                })
            }
            Some(p) if !p.is_pitcher() => {
                return Err(GameError::NoEligiblePitcher {
                    team: team(),
                    reason: format!("{} has no pitching abilities", p.id),
                })
            }
            Some(_) => {}
        }
        if self.uses_designated_hitter() && in_lineup.contains(&self.starting_pitcher_id) {
            return Err(GameError::NoEligiblePitcher {
                team: team(),
                reason: "starting pitcher cannot bat when a designated hitter is used".into(),
            });
        }

        let mut bullpen = HashSet::new();
        for &id in &self.reliever_ids {
            let first_listing = bullpen.insert(id);
            let reason = match self.player(id) {
                None => Some("not on the roster"),
                Some(p) if !p.is_pitcher() => Some("no pitching abilities"),
                Some(_) if id == self.starting_pitcher_id => Some("already the starting pitcher"),
                Some(_) if in_lineup.contains(&id) => Some("already in the batting order"),
                Some(_) if !first_listing => Some("listed twice"),
                Some(_) => None,
            };
            if let Some(reason) = reason {
                return Err(GameError::InvalidReliever { team: team(), id, reason: reason.into() });
            }
        }

        Ok(())
    }
}
