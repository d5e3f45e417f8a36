//! Game state owned by the running game loop

use crate::models::events::{Half, TeamSide};
use crate::models::player::PlayerId;

/// 베이스 위의 주자
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseRunner {
    pub runner_id: PlayerId,
    /// 이 주자를 내보낸 투수 (실점 책임)
    pub responsible_pitcher_id: PlayerId,
    pub speed: u8,
    /// 실책으로 출루 → 득점 시 비자책
    pub reached_on_error: bool,
}

/// 1루, 2루, 3루
pub type Bases = [Option<BaseRunner>; 3];

pub fn runners_on(bases: &Bases) -> u8 {
    bases.iter().filter(|b| b.is_some()).count() as u8
}

pub fn occupancy(bases: &Bases) -> [bool; 3] {
    [bases[0].is_some(), bases[1].is_some(), bases[2].is_some()]
}

/// 한 투수의 이번 경기 등판 기록
#[derive(Debug, Clone, PartialEq)]
pub struct Outing {
    pub pitcher_id: PlayerId,
    pub is_starter: bool,
    pub pitches: u32,
    pub outs: u32,
    pub runs_allowed: u32,
    pub earned_runs: u32,
    pub runs_this_inning: u32,
    /// 피로가 시작되는 투구수 (교체 기준이기도 하다)
    pub pitch_limit: f64,
    pub max_innings: u8,
    /// 등판 시점 (수비팀 기준) 점수차
    pub entry_lead: i32,
    pub entry_runners: u8,
    /// 등판 중 최소 리드
    pub min_lead: i32,
    pub entry_inning: u8,
}

impl Outing {
    pub fn new(pitcher_id: PlayerId, is_starter: bool, pitch_limit: f64, max_innings: u8, lead: i32, runners: u8, inning: u8) -> Self {
        Self {
            pitcher_id,
            is_starter,
            pitches: 0,
            outs: 0,
            runs_allowed: 0,
            earned_runs: 0,
            runs_this_inning: 0,
            pitch_limit,
            max_innings,
            entry_lead: lead,
            entry_runners: runners,
            min_lead: lead,
            entry_inning: inning,
        }
    }

    /// 세이브 상황에서 등판했는지: 리드 중이고 (리드 ≤ save_lead_max 또는 동점 주자가 대기 타석 안)
    pub fn entered_in_save_situation(&self, save_lead_max: i32) -> bool {
        is_save_situation(self.entry_lead, self.entry_runners, save_lead_max)
    }

    pub fn lost_lead(&self) -> bool {
        self.min_lead <= 0
    }
}

pub fn is_save_situation(lead: i32, runners: u8, save_lead_max: i32) -> bool {
    lead >= 1 && (lead <= save_lead_max || lead <= i32::from(runners) + 2)
}

/// 한 팀의 경기 중 상태
#[derive(Debug, Clone)]
pub struct SideState {
    pub score: u32,
    /// 다음 타자의 타순 인덱스 (0~8)
    pub batting_index: usize,
    /// 등판 순서대로. 마지막이 현재 투수.
    pub outings: Vec<Outing>,
    pub left_on_base: u32,
}

impl SideState {
    pub fn new(starter: Outing) -> Self {
        Self { score: 0, batting_index: 0, outings: vec![starter], left_on_base: 0 }
    }

    pub fn current(&self) -> &Outing {
        // outings는 선발로 시작하고 비워지지 않는다
        &self.outings[self.outings.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Outing {
        let last = self.outings.len() - 1;
        &mut self.outings[last]
    }

    pub fn outing_mut(&mut self, id: PlayerId) -> Option<&mut Outing> {
        self.outings.iter_mut().find(|o| o.pitcher_id == id)
    }

    pub fn has_used(&self, id: PlayerId) -> bool {
        self.outings.iter().any(|o| o.pitcher_id == id)
    }
}

/// Mutable state of one game in progress
#[derive(Debug, Clone)]
pub struct GameState {
    pub inning: u8,
    pub half: Half,
    pub outs: u8,
    pub bases: Bases,
    /// `TeamSide::index()` 순서 (홈, 원정)
    pub sides: [SideState; 2],
}

impl GameState {
    pub fn new(home_starter: Outing, away_starter: Outing) -> Self {
        Self {
            inning: 1,
            half: Half::Top,
            outs: 0,
            bases: [None; 3],
            sides: [SideState::new(home_starter), SideState::new(away_starter)],
        }
    }

    pub fn side(&self, side: TeamSide) -> &SideState {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: TeamSide) -> &mut SideState {
        &mut self.sides[side.index()]
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        self.side(side).score
    }

    /// `side` 기준 점수차
    pub fn lead(&self, side: TeamSide) -> i32 {
        self.score(side) as i32 - self.score(side.opposite()) as i32
    }

    pub fn batting_side(&self) -> TeamSide {
        self.half.batting_side()
    }

    pub fn fielding_side(&self) -> TeamSide {
        self.half.fielding_side()
    }

    pub fn start_half(&mut self, inning: u8, half: Half) {
        self.inning = inning;
        self.half = half;
        self.outs = 0;
        self.bases = [None; 3];
        let fielding = self.fielding_side();
        self.side_mut(fielding).current_mut().runs_this_inning = 0;
    }
}
