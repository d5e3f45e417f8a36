//! Plate Appearance State Machine
//!
//! 투구 단위로 카운트를 진행시켜 타석 하나를 끝낸다.
//!
//! ```text
//! Count(b, s) ──pitch──▶ Count(b', s')
//!      │                   │
//!      ├─ 4볼 ─▶ Walk       ├─ 3스트라이크 / 파울팁 ─▶ Strikeout
//!      ├─ 사구 ─▶ HitByPitch └─ 인플레이 ─▶ Outcome Classifier
//! ```
//!
//! 투구 순서: 사구 판정 → 존 판정 → 스윙 판정 → 컨택 판정 → 파울/인플레이.
//! 투수가 한도 투구수를 넘기면 구속과 제구가 선형으로 떨어진다.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::batted_ball::calc_breaking_power_with;
use super::config::EngineConfig;
use super::fielding::FielderMap;
use super::outcome::{resolve_ball_in_play, BallInPlayResolution, BaseOutContext};
use super::probability::{clamp_range, rating_delta, roll};
use crate::models::events::{PitchRecord, PitchResult, PlateAppearanceResult};
use crate::models::player::{BatSide, BatterAbilities, PitcherAbilities};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
}

impl Count {
    #[inline]
    pub fn two_strikes(&self) -> bool {
        self.strikes == 2
    }

    #[inline]
    pub fn three_balls(&self) -> bool {
        self.balls == 3
    }
}

/// 타석 진행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitchState {
    InProgress(Count),
    Walk,
    Strikeout,
    HitByPitch,
    InPlay,
}

impl PitchState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PitchState::InProgress(_))
    }
}

/// 타자 vs 투수 매치업 (피로 반영 전 원본 능력치)
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub batter: &'a BatterAbilities,
    pub bats: BatSide,
    pub pitcher: &'a PitcherAbilities,
    /// 이 타석 이전까지 던진 투구수
    pub pitches_thrown: u32,
    /// 피로가 시작되는 투구수
    pub pitch_limit: f64,
}

/// 피로 반영 후 투수 능력
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivePitcher {
    pub velocity: f64,
    pub control: f64,
    pub breaking_power: f64,
}

/// 피로도 0~1. 한도 이후 `fatigue_ramp_pitches` 동안 선형 증가.
pub fn fatigue_level(cfg: &EngineConfig, pitches_thrown: u32, pitch_limit: f64) -> f64 {
    let over = f64::from(pitches_thrown) - pitch_limit;
    (over / cfg.pitching.fatigue_ramp_pitches).clamp(0.0, 1.0)
}

pub fn effective_pitcher(
    cfg: &EngineConfig,
    pitcher: &PitcherAbilities,
    pitches_thrown: u32,
    pitch_limit: f64,
) -> EffectivePitcher {
    let fatigue = fatigue_level(cfg, pitches_thrown, pitch_limit);
    EffectivePitcher {
        velocity: f64::from(pitcher.velocity) - fatigue * cfg.pitching.fatigue_velocity_drop,
        control: (f64::from(pitcher.control) - fatigue * cfg.pitching.fatigue_control_drop).max(1.0),
        breaking_power: calc_breaking_power_with(&cfg.batted_ball, &pitcher.pitches),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateAppearanceOutcome {
    pub result: PlateAppearanceResult,
    pub pitches: Vec<PitchRecord>,
    /// 인플레이 타석만 Some
    pub ball_in_play: Option<BallInPlayResolution>,
}

impl PlateAppearanceOutcome {
    pub fn pitch_count(&self) -> u16 {
        u16::try_from(self.pitches.len()).unwrap_or(u16::MAX)
    }
}

/// 투구 하나를 던지고 결과와 다음 상태를 돌려준다.
/// `pitch_number`는 이 타석에서 몇 번째 투구인지 (1부터).
pub fn next_pitch<R: Rng + ?Sized>(
    cfg: &EngineConfig,
    batter: &BatterAbilities,
    pitcher: &EffectivePitcher,
    count: Count,
    pitch_number: u16,
    rng: &mut R,
) -> (PitchResult, PitchState) {
    let p = &cfg.pitching;
    let control_delta = pitcher.control - 50.0;
    let breaking_delta = pitcher.breaking_power - 50.0;

    if roll(rng, p.hit_by_pitch_base * (1.5 - pitcher.control / 100.0)) {
        return (PitchResult::HitByPitch, PitchState::HitByPitch);
    }

    let mut zone = p.zone_base + control_delta * p.zone_control_coef;
    if count.three_balls() {
        zone += p.zone_three_ball_bonus;
    }
    if count.two_strikes() && count.balls < 2 {
        zone -= p.zone_two_strike_waste;
    }
    let in_zone = roll(rng, clamp_range(zone, p.zone_min, p.zone_max));

    let swing = if in_zone {
        let mut s = p.swing_zone_base + rating_delta(batter.contact) * p.swing_contact_coef;
        if count.two_strikes() {
            s += p.swing_two_strike_bonus;
        }
        if count.three_balls() && count.strikes < 2 {
            s -= p.swing_three_ball_take;
        }
        clamp_range(s, p.swing_zone_min, p.swing_zone_max)
    } else {
        let mut s = p.chase_base - rating_delta(batter.eye) * p.chase_eye_coef + breaking_delta * p.chase_breaking_coef;
        if count.two_strikes() {
            s += p.chase_two_strike_bonus;
        }
        clamp_range(s, p.chase_min, p.chase_max)
    };

    if !roll(rng, swing) {
        return if in_zone {
            strike(count, PitchResult::CalledStrike)
        } else {
            ball(count)
        };
    }

    let velocity_delta = pitcher.velocity - p.contact_velocity_pivot;
    let contact_delta = rating_delta(batter.contact) * p.contact_rating_coef - velocity_delta * p.contact_velocity_coef;
    let contact = if in_zone {
        clamp_range(
            p.contact_zone_base + contact_delta - breaking_delta * p.contact_zone_breaking_coef,
            p.contact_zone_min,
            p.contact_zone_max,
        )
    } else {
        clamp_range(
            p.contact_chase_base + contact_delta - breaking_delta * p.contact_chase_breaking_coef,
            p.contact_chase_min,
            p.contact_chase_max,
        )
    };

    if !roll(rng, contact) {
        return strike(count, PitchResult::SwingingStrike);
    }

    if pitch_number < p.max_pitches_before_forced_play && roll(rng, p.foul_chance) {
        if count.two_strikes() {
            if roll(rng, p.foul_tip_chance) {
                return (PitchResult::FoulTip, PitchState::Strikeout);
            }
            return (PitchResult::Foul, PitchState::InProgress(count));
        }
        return (
            PitchResult::Foul,
            PitchState::InProgress(Count { strikes: count.strikes + 1, ..count }),
        );
    }

    (PitchResult::InPlay, PitchState::InPlay)
}

fn strike(count: Count, result: PitchResult) -> (PitchResult, PitchState) {
    if count.two_strikes() {
        (result, PitchState::Strikeout)
    } else {
        (result, PitchState::InProgress(Count { strikes: count.strikes + 1, ..count }))
    }
}

fn ball(count: Count) -> (PitchResult, PitchState) {
    if count.three_balls() {
        (PitchResult::Ball, PitchState::Walk)
    } else {
        (PitchResult::Ball, PitchState::InProgress(Count { balls: count.balls + 1, ..count }))
    }
}

/// 타석 하나를 끝까지 진행
pub fn resolve_plate_appearance<R: Rng + ?Sized>(
    cfg: &EngineConfig,
    matchup: &Matchup<'_>,
    fielders: &FielderMap,
    ctx: BaseOutContext,
    rng: &mut R,
) -> PlateAppearanceOutcome {
    let mut pitches = Vec::with_capacity(6);
    let mut count = Count::default();
    let mut pitch_number: u16 = 0;

    let state = loop {
        pitch_number += 1;
        let thrown = matchup.pitches_thrown + u32::from(pitch_number) - 1;
        let pitcher = effective_pitcher(cfg, matchup.pitcher, thrown, matchup.pitch_limit);
        let (result, state) = next_pitch(cfg, matchup.batter, &pitcher, count, pitch_number, rng);

        let after = match state {
            PitchState::InProgress(c) => c,
            PitchState::Walk => Count { balls: 4, ..count },
            PitchState::Strikeout => Count { strikes: 3, ..count },
            PitchState::HitByPitch | PitchState::InPlay => count,
        };
        pitches.push(PitchRecord { result, balls: after.balls, strikes: after.strikes });

        match state {
            PitchState::InProgress(c) => count = c,
            terminal => break terminal,
        }
    };

    let (result, ball_in_play) = match state {
        PitchState::Walk => (PlateAppearanceResult::Walk, None),
        PitchState::Strikeout => (PlateAppearanceResult::Strikeout, None),
        PitchState::HitByPitch => (PlateAppearanceResult::HitByPitch, None),
        _ => {
            let resolution =
                resolve_ball_in_play(cfg, matchup.batter, matchup.bats, matchup.pitcher, fielders, ctx, rng);
            (resolution.outcome, Some(resolution))
        }
    };

    PlateAppearanceOutcome { result, pitches, ball_in_play }
}
