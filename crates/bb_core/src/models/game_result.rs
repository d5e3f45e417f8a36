//! Final game result and box-score lines

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use super::events::{AtBatLog, PitchingChange, TeamSide};
use super::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningLine {
    pub inning: u8,
    pub away_runs: u32,
    /// 말 공격이 없었으면 None (라인스코어의 "X")
    pub home_runs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatterLine {
    pub player_id: PlayerId,
    pub team: TeamSide,
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub runs: u32,
    pub rbi: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub hit_by_pitch: u32,
    pub sacrifice_flies: u32,
    pub grounded_into_double_play: u32,
    /// 수비 실책
    pub errors: u32,
}

impl BatterLine {
    pub fn new(player_id: PlayerId, team: TeamSide) -> Self {
        Self {
            player_id,
            team,
            plate_appearances: 0,
            at_bats: 0,
            hits: 0,
            doubles: 0,
            triples: 0,
            home_runs: 0,
            runs: 0,
            rbi: 0,
            walks: 0,
            strikeouts: 0,
            hit_by_pitch: 0,
            sacrifice_flies: 0,
            grounded_into_double_play: 0,
            errors: 0,
        }
    }

    pub fn batting_average(&self) -> f64 {
        if self.at_bats == 0 {
            0.0
        } else {
            self.hits as f64 / self.at_bats as f64
        }
    }
}

impl AddAssign<&BatterLine> for BatterLine {
    fn add_assign(&mut self, rhs: &BatterLine) {
        self.plate_appearances += rhs.plate_appearances;
        self.at_bats += rhs.at_bats;
        self.hits += rhs.hits;
        self.doubles += rhs.doubles;
        self.triples += rhs.triples;
        self.home_runs += rhs.home_runs;
        self.runs += rhs.runs;
        self.rbi += rhs.rbi;
        self.walks += rhs.walks;
        self.strikeouts += rhs.strikeouts;
        self.hit_by_pitch += rhs.hit_by_pitch;
        self.sacrifice_flies += rhs.sacrifice_flies;
        self.grounded_into_double_play += rhs.grounded_into_double_play;
        self.errors += rhs.errors;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitcherLine {
    pub player_id: PlayerId,
    pub team: TeamSide,
    /// 잡은 아웃 수 (이닝 = outs / 3)
    pub outs: u32,
    pub batters_faced: u32,
    pub pitches: u32,
    pub hits: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub hit_by_pitch: u32,
    pub home_runs: u32,
    pub ground_outs: u32,
    pub air_outs: u32,
    pub ground_balls: u32,
    pub line_drives: u32,
    pub fly_balls: u32,
    pub popups: u32,
    pub games_started: u32,
    pub wins: u32,
    pub losses: u32,
    pub saves: u32,
    pub holds: u32,
    pub blown_saves: u32,
    pub quality_starts: u32,
}

impl PitcherLine {
    pub fn new(player_id: PlayerId, team: TeamSide) -> Self {
        Self {
            player_id,
            team,
            outs: 0,
            batters_faced: 0,
            pitches: 0,
            hits: 0,
            runs: 0,
            earned_runs: 0,
            walks: 0,
            strikeouts: 0,
            hit_by_pitch: 0,
            home_runs: 0,
            ground_outs: 0,
            air_outs: 0,
            ground_balls: 0,
            line_drives: 0,
            fly_balls: 0,
            popups: 0,
            games_started: 0,
            wins: 0,
            losses: 0,
            saves: 0,
            holds: 0,
            blown_saves: 0,
            quality_starts: 0,
        }
    }

    /// Conventional "6.1" / "6.2" innings-pitched notation.
    pub fn innings_pitched(&self) -> String {
        format!("{}.{}", self.outs / 3, self.outs % 3)
    }
}

impl AddAssign<&PitcherLine> for PitcherLine {
    fn add_assign(&mut self, rhs: &PitcherLine) {
        self.outs += rhs.outs;
        self.batters_faced += rhs.batters_faced;
        self.pitches += rhs.pitches;
        self.hits += rhs.hits;
        self.runs += rhs.runs;
        self.earned_runs += rhs.earned_runs;
        self.walks += rhs.walks;
        self.strikeouts += rhs.strikeouts;
        self.hit_by_pitch += rhs.hit_by_pitch;
        self.home_runs += rhs.home_runs;
        self.ground_outs += rhs.ground_outs;
        self.air_outs += rhs.air_outs;
        self.ground_balls += rhs.ground_balls;
        self.line_drives += rhs.line_drives;
        self.fly_balls += rhs.fly_balls;
        self.popups += rhs.popups;
        self.games_started += rhs.games_started;
        self.wins += rhs.wins;
        self.losses += rhs.losses;
        self.saves += rhs.saves;
        self.holds += rhs.holds;
        self.blown_saves += rhs.blown_saves;
        self.quality_starts += rhs.quality_starts;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamTotals {
    pub runs: u32,
    pub hits: u32,
    pub errors: u32,
    pub left_on_base: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub home_score: u32,
    pub away_score: u32,
    /// 정규 이닝 수 (기본 9)
    #[serde(default = "default_scheduled_innings")]
    pub scheduled_innings: u8,
    pub innings: Vec<InningLine>,
    /// 원정팀 → 홈팀, 타순 순서
    pub player_stats: Vec<BatterLine>,
    /// 원정팀 → 홈팀, 등판 순서
    pub pitcher_stats: Vec<PitcherLine>,
    /// `collect_at_bat_logs`가 꺼져 있으면 None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_bat_logs: Option<Vec<AtBatLog>>,
    pub winning_pitcher_id: Option<PlayerId>,
    pub losing_pitcher_id: Option<PlayerId>,
    pub save_pitcher_id: Option<PlayerId>,
    pub hold_pitcher_ids: Vec<PlayerId>,
    pub home_totals: TeamTotals,
    pub away_totals: TeamTotals,
    pub pitching_changes: Vec<PitchingChange>,
    pub is_tie: bool,
    pub walk_off: bool,
    pub total_plate_appearances: u32,
}

fn default_scheduled_innings() -> u8 {
    9
}

impl GameResult {
    pub fn winner(&self) -> Option<TeamSide> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn batter(&self, id: PlayerId) -> Option<&BatterLine> {
        self.player_stats.iter().find(|l| l.player_id == id)
    }

    pub fn pitcher(&self, id: PlayerId) -> Option<&PitcherLine> {
        self.pitcher_stats.iter().find(|l| l.player_id == id)
    }

    /// 해당 팀 투수진이 잡은 아웃 합계
    pub fn outs_recorded_by(&self, side: TeamSide) -> u32 {
        self.pitcher_stats.iter().filter(|l| l.team == side).map(|l| l.outs).sum()
    }

    pub fn totals(&self, side: TeamSide) -> &TeamTotals {
        match side {
            TeamSide::Home => &self.home_totals,
            TeamSide::Away => &self.away_totals,
        }
    }

    pub fn innings_played(&self) -> u8 {
        self.innings.len() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innings_pitched_notation() {
        let mut line = PitcherLine::new(PlayerId(1), TeamSide::Home);
        line.outs = 20;
        assert_eq!(line.innings_pitched(), "6.2");
        line.outs = 27;
        assert_eq!(line.innings_pitched(), "9.0");
    }

    #[test]
    fn test_batter_line_add_assign() {
        let mut a = BatterLine::new(PlayerId(1), TeamSide::Away);
        a.at_bats = 4;
        a.hits = 1;
        let mut b = BatterLine::new(PlayerId(1), TeamSide::Away);
        b.at_bats = 3;
        b.hits = 2;
        b.home_runs = 1;
        a += &b;
        assert_eq!(a.at_bats, 7);
        assert_eq!(a.hits, 3);
        assert_eq!(a.home_runs, 1);
        assert!((a.batting_average() - 3.0 / 7.0).abs() < 1e-12);
    }
}
