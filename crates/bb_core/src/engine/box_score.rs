//! Box Score Accumulator
//!
//! `GameEvent` 스트림을 선수별 누적 기록으로 접는다(fold).
//! 선수별 라인은 `BTreeMap`에 쌓이므로 이벤트 순서와 무관하고,
//! `merge`는 `AddAssign`만 사용하므로 결합법칙이 성립한다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::batted_ball::BattedBallClass;
use crate::models::events::{GameEvent, PlateAppearanceEvent, PlateAppearanceResult, TeamSide};
use crate::models::game_result::{BatterLine, PitcherLine, TeamTotals};
use crate::models::player::PlayerId;

/// 경기 종료 후 부여되는 투수 기록
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchingDecisions {
    pub winning_pitcher_id: Option<PlayerId>,
    pub losing_pitcher_id: Option<PlayerId>,
    pub save_pitcher_id: Option<PlayerId>,
    pub hold_pitcher_ids: Vec<PlayerId>,
    pub blown_save_pitcher_ids: Vec<PlayerId>,
    pub quality_start_pitcher_ids: Vec<PlayerId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScore {
    batters: BTreeMap<PlayerId, BatterLine>,
    pitchers: BTreeMap<PlayerId, PitcherLine>,
}

impl BoxScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold<'a>(events: impl IntoIterator<Item = &'a GameEvent>) -> Self {
        let mut score = Self::new();
        for event in events {
            score.apply(event);
        }
        score
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::StartingPitcher { side, pitcher_id } => {
                self.pitcher_mut(*pitcher_id, *side).games_started += 1;
            }
            GameEvent::PitchingChange(change) => {
                self.pitcher_mut(change.pitcher_in, change.side);
            }
            GameEvent::PlateAppearance(pa) => self.apply_plate_appearance(pa),
        }
    }

    fn apply_plate_appearance(&mut self, pa: &PlateAppearanceEvent) {
        let batting = pa.batting_side();
        let fielding = batting.opposite();
        let result = pa.result;

        {
            let line = self.batter_mut(pa.batter_id, batting);
            line.plate_appearances += 1;
            if result.is_at_bat() {
                line.at_bats += 1;
            }
            if result.is_hit() {
                line.hits += 1;
            }
            match result {
                PlateAppearanceResult::Double => line.doubles += 1,
                PlateAppearanceResult::Triple => line.triples += 1,
                PlateAppearanceResult::Homerun => line.home_runs += 1,
                PlateAppearanceResult::Walk => line.walks += 1,
                PlateAppearanceResult::Strikeout => line.strikeouts += 1,
                PlateAppearanceResult::HitByPitch => line.hit_by_pitch += 1,
                PlateAppearanceResult::SacrificeFly => line.sacrifice_flies += 1,
                PlateAppearanceResult::DoublePlay => line.grounded_into_double_play += 1,
                _ => {}
            }
            line.rbi += u32::from(pa.rbi);
        }

        {
            let line = self.pitcher_mut(pa.pitcher_id, fielding);
            line.batters_faced += 1;
            line.pitches += u32::from(pa.pitches);
            line.outs += u32::from(pa.outs_recorded);
            if result.is_hit() {
                line.hits += 1;
            }
            match result {
                PlateAppearanceResult::Homerun => line.home_runs += 1,
                PlateAppearanceResult::Walk => line.walks += 1,
                PlateAppearanceResult::Strikeout => line.strikeouts += 1,
                PlateAppearanceResult::HitByPitch => line.hit_by_pitch += 1,
                _ => {}
            }
            if result.is_ground_out() {
                line.ground_outs += 1;
            } else if result.is_air_out() {
                line.air_outs += 1;
            }
            match pa.batted_ball_class {
                Some(BattedBallClass::GroundBall) => line.ground_balls += 1,
                Some(BattedBallClass::LineDrive) => line.line_drives += 1,
                Some(BattedBallClass::FlyBall) => line.fly_balls += 1,
                Some(BattedBallClass::Popup) => line.popups += 1,
                None => {}
            }
        }

        for run in &pa.runs {
            self.batter_mut(run.runner_id, batting).runs += 1;
            let line = self.pitcher_mut(run.responsible_pitcher_id, fielding);
            line.runs += 1;
            if run.earned {
                line.earned_runs += 1;
            }
        }

        if let Some(fielder) = pa.error_fielder_id {
            self.batter_mut(fielder, fielding).errors += 1;
        }
    }

    pub fn apply_decisions(&mut self, decisions: &PitchingDecisions) {
        let lines = &mut self.pitchers;
        bump(lines, decisions.winning_pitcher_id, |l| l.wins += 1);
        bump(lines, decisions.losing_pitcher_id, |l| l.losses += 1);
        bump(lines, decisions.save_pitcher_id, |l| l.saves += 1);
        for &id in &decisions.hold_pitcher_ids {
            bump(lines, Some(id), |l| l.holds += 1);
        }
        for &id in &decisions.blown_save_pitcher_ids {
            bump(lines, Some(id), |l| l.blown_saves += 1);
        }
        for &id in &decisions.quality_start_pitcher_ids {
            bump(lines, Some(id), |l| l.quality_starts += 1);
        }
    }

    /// 다른 박스스코어(다른 경기 또는 같은 경기의 다른 구간)를 합친다.
    pub fn merge(&mut self, other: &BoxScore) {
        for (id, line) in &other.batters {
            *self.batter_mut(*id, line.team) += line;
        }
        for (id, line) in &other.pitchers {
            *self.pitcher_mut(*id, line.team) += line;
        }
    }

    pub fn batter(&self, id: PlayerId) -> Option<&BatterLine> {
        self.batters.get(&id)
    }

    pub fn pitcher(&self, id: PlayerId) -> Option<&PitcherLine> {
        self.pitchers.get(&id)
    }

    pub fn batter_lines(&self) -> impl Iterator<Item = &BatterLine> {
        self.batters.values()
    }

    pub fn pitcher_lines(&self) -> impl Iterator<Item = &PitcherLine> {
        self.pitchers.values()
    }

    /// `order` 순서로 타자 라인을 꺼내고, 목록에 없는 라인(수비 실책만 있는 투수 등)은 뒤에 id 순으로 붙인다.
    pub fn ordered_batters(&self, order: &[PlayerId]) -> Vec<BatterLine> {
        ordered(&self.batters, order)
    }

    pub fn ordered_pitchers(&self, order: &[PlayerId]) -> Vec<PitcherLine> {
        ordered(&self.pitchers, order)
    }

    /// 득점/안타/실책 합계. 잔루는 경기 루프가 채운다.
    pub fn team_totals(&self, side: TeamSide) -> TeamTotals {
        let mut totals = TeamTotals::default();
        for line in self.batters.values() {
            if line.team == side {
                totals.runs += line.runs;
                totals.hits += line.hits;
                totals.errors += line.errors;
            }
        }
        totals
    }

    fn batter_mut(&mut self, id: PlayerId, team: TeamSide) -> &mut BatterLine {
        self.batters.entry(id).or_insert_with(|| BatterLine::new(id, team))
    }

    fn pitcher_mut(&mut self, id: PlayerId, team: TeamSide) -> &mut PitcherLine {
        self.pitchers.entry(id).or_insert_with(|| PitcherLine::new(id, team))
    }
}

fn bump(lines: &mut BTreeMap<PlayerId, PitcherLine>, id: Option<PlayerId>, f: impl FnOnce(&mut PitcherLine)) {
    if let Some(line) = id.and_then(|id| lines.get_mut(&id)) {
        f(line);
    }
}

fn ordered<L: Clone>(lines: &BTreeMap<PlayerId, L>, order: &[PlayerId]) -> Vec<L> {
    let mut out: Vec<L> = Vec::with_capacity(lines.len());
    let mut seen = Vec::with_capacity(order.len());
    for id in order {
        if seen.contains(id) {
            continue;
        }
        if let Some(line) = lines.get(id) {
            out.push(line.clone());
            seen.push(*id);
        }
    }
    out.extend(lines.iter().filter(|(id, _)| !seen.contains(id)).map(|(_, l)| l.clone()));
    out
}
