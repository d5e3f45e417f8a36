//! Bullpen Ledger
//!
//! 시즌 동안 투수 등판 기록(연투, 전날 투구수)을 추적하는 값 타입.
//! 경기 시뮬레이션은 원장을 읽기만 하고, 경기 후 `record_game`이 새 원장을 돌려준다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::config::BullpenConfig;
use crate::models::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArmUsage {
    /// 마지막 등판일
    pub last_day: u32,
    /// `last_day`까지 연속 등판 일수
    pub consecutive_days: u32,
    /// 마지막 등판 투구수
    pub last_pitches: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BullpenLedger {
    usage: BTreeMap<PlayerId, ArmUsage>,
}

impl BullpenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn usage(&self, id: PlayerId) -> Option<&ArmUsage> {
        self.usage.get(&id)
    }

    pub fn len(&self) -> usize {
        self.usage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usage.is_empty()
    }

    /// `day`에 등판 가능한지.
    /// 직전 N일 연속 등판했거나 전날 `rest_after_pitches` 이상 던졌으면 휴식.
    pub fn is_available(&self, id: PlayerId, day: u32, cfg: &BullpenConfig) -> bool {
        let Some(usage) = self.usage.get(&id) else {
            return true;
        };
        if day == 0 || usage.last_day != day - 1 {
            return true;
        }
        usage.consecutive_days < cfg.rest_after_consecutive_days && usage.last_pitches < cfg.rest_after_pitches
    }

    /// 한 경기의 등판 기록을 반영한 새 원장. `self`는 그대로 둔다.
    pub fn record_game(&self, day: u32, appearances: &[(PlayerId, u32)]) -> BullpenLedger {
        let mut next = self.clone();
        for &(id, pitches) in appearances {
            let consecutive_days = match self.usage.get(&id) {
                Some(prev) if prev.last_day == day => prev.consecutive_days,
                Some(prev) if day > 0 && prev.last_day == day - 1 => prev.consecutive_days + 1,
                _ => 1,
            };
            let entry = next.usage.entry(id).or_default();
            let same_day = entry.last_day == day && entry.consecutive_days > 0;
            entry.last_pitches = if same_day { entry.last_pitches + pitches } else { pitches };
            entry.last_day = day;
            entry.consecutive_days = consecutive_days;
        }
        next
    }
}
