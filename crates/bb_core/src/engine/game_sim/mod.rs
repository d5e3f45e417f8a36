//! Half-Inning / Game Loop
//!
//! 두 팀의 경기 한 판을 처음부터 끝까지 진행한다.
//!
//! ```text
//! simulate_game_with(home, away, options, config, ledger, rng)
//!   ├─ Team::validate() ×2, EngineConfig::validate()   ← 실패는 여기서만
//!   └─ GameEngine::run
//!        for inning in 1.. {
//!          top:    [교체 점검 → 타석 → 주루] × 3아웃
//!          (정규 이닝 이후 홈팀 리드 → 말 공격 생략)
//!          bottom: [교체 점검 → 타석 → 주루] × 3아웃 (끝내기 시 즉시 종료)
//!          (정규 이닝 이후 점수차 → 종료, extra_innings_limit 도달 → 무승부)
//!        }
//!        → GameEvent 스트림 → BoxScore::fold → 투수 기록 → GameResult
//! ```
//!
//! 검증을 통과한 뒤에는 어떤 경로도 에러를 돌려주거나 패닉하지 않는다.
//! 난수는 전부 호출자가 넘긴 `rng`에서 뽑는다.

mod base_running;
mod decisions;
mod pitching_change;
mod state;

#[cfg(test)]
mod tests;

pub use base_running::{resolve_play, PlayContext, PlayResolution};
pub use decisions::LeadChange;
pub use pitching_change::{pitch_limit, pull_reason, BullpenView, PullReason, Situation};
pub use state::{is_save_situation, BaseRunner, Bases, GameState, Outing, SideState};

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, trace};

use super::box_score::BoxScore;
use super::bullpen::BullpenLedger;
use super::config::EngineConfig;
use super::fielding::{FielderMap, FielderProfile};
use super::outcome::BaseOutContext;
use super::plate_appearance::{resolve_plate_appearance, Matchup};
use super::GameRng;
use crate::error::{GameError, Result};
use crate::models::events::{
    AtBatLog, GameEvent, Half, PitchingChange, PlateAppearanceEvent, PlateAppearanceResult, RunScored, TeamSide,
};
use crate::models::game_result::{GameResult, InningLine};
use crate::models::player::{PitcherAbilities, Player, PlayerId, Position};
use crate::models::team::{PitcherUsageConfig, RelieverPolicy, Team, LINEUP_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// 타석 상세 로그 수집 (기본: false)
    pub collect_at_bat_logs: bool,
    pub seed: u64,
    /// 시즌 일자. 불펜 원장의 연투 판단에 쓰인다.
    pub game_day: u32,
}

impl GameOptions {
    pub fn seeded(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    pub fn with_logs(mut self) -> Self {
        self.collect_at_bat_logs = true;
        self
    }
}

/// 경기 결과 + 이 경기 등판을 반영한 새 불펜 원장
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub result: GameResult,
    pub ledger: BullpenLedger,
}

/// 기본 설정, 빈 불펜 원장, `options.seed`로 한 경기
pub fn simulate_game(home: &Team, away: &Team, options: &GameOptions) -> Result<GameResult> {
    let mut rng = GameRng::seed_from_u64(options.seed);
    simulate_game_with(home, away, options, &EngineConfig::default(), &BullpenLedger::new(), &mut rng)
        .map(|outcome| outcome.result)
}

pub fn simulate_game_with<R: Rng + ?Sized>(
    home: &Team,
    away: &Team,
    options: &GameOptions,
    config: &EngineConfig,
    ledger: &BullpenLedger,
    rng: &mut R,
) -> Result<GameOutcome> {
    config.validate()?;
    home.validate()?;
    away.validate()?;

    let home_ids: HashSet<PlayerId> = home.players.iter().map(|p| p.id).collect();
    if let Some(p) = away.players.iter().find(|p| home_ids.contains(&p.id)) {
        return Err(GameError::DuplicatePlayer { team: away.name.clone(), id: p.id });
    }

    let engine = GameEngine::new(home, away, options, config, ledger)?;
    Ok(engine.run(rng))
}

// ============================================================================
// Roster view
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct StaffMember<'a> {
    player: &'a Player,
    abilities: &'a PitcherAbilities,
    usage: PitcherUsageConfig,
}

/// 검증된 팀을 id 조회 없이 쓸 수 있게 풀어둔 뷰
struct Roster<'a> {
    team: &'a Team,
    /// 타순. `None`은 투수 타석 (현재 투수로 해석)
    lineup: Vec<(Option<&'a Player>, Position)>,
    /// 0 = 선발, 이후 불펜 순서
    staff: Vec<StaffMember<'a>>,
}

impl<'a> Roster<'a> {
    fn new(team: &'a Team) -> Result<Self> {
        let mut lineup = Vec::with_capacity(LINEUP_SIZE);
        for slot in &team.lineup {
            if slot.position == Position::Pitcher {
                lineup.push((None, Position::Pitcher));
                continue;
            }
            let player = team
                .player(slot.player_id)
                .ok_or_else(|| GameError::UnknownPlayer { team: team.name.clone(), id: slot.player_id })?;
            lineup.push((Some(player), slot.position));
        }

        let mut staff = Vec::with_capacity(1 + team.reliever_ids.len());
        for id in std::iter::once(team.starting_pitcher_id).chain(team.reliever_ids.iter().copied()) {
            let player = team.player(id).ok_or_else(|| GameError::UnknownPlayer { team: team.name.clone(), id })?;
            let abilities = player.pitching.as_ref().ok_or_else(|| GameError::NoEligiblePitcher {
                team: team.name.clone(),
                reason: format!("{id} has no pitching abilities"),
            })?;
            staff.push(StaffMember { player, abilities, usage: team.usage_for(id) });
        }

        Ok(Self { team, lineup, staff })
    }
}

// ============================================================================
// Engine
// ============================================================================

struct GameEngine<'a> {
    cfg: &'a EngineConfig,
    options: &'a GameOptions,
    ledger: &'a BullpenLedger,
    /// `TeamSide::index()` 순서 (홈, 원정)
    rosters: [Roster<'a>; 2],
    /// 현재 투수의 `Roster::staff` 인덱스
    current_staff: [usize; 2],
    state: GameState,
    events: Vec<GameEvent>,
    logs: Option<Vec<AtBatLog>>,
    innings: Vec<InningLine>,
    lead_changes: Vec<LeadChange>,
    pitching_changes: Vec<PitchingChange>,
    walk_off: bool,
    plate_appearances: u32,
}

impl<'a> GameEngine<'a> {
    fn new(
        home: &'a Team,
        away: &'a Team,
        options: &'a GameOptions,
        cfg: &'a EngineConfig,
        ledger: &'a BullpenLedger,
    ) -> Result<Self> {
        let rosters = [Roster::new(home)?, Roster::new(away)?];
        let starter = |roster: &Roster<'a>| {
            let member = roster.staff[0];
            Outing::new(
                member.player.id,
                true,
                pitch_limit(cfg, member.abilities, &member.usage),
                member.usage.max_innings,
                0,
                0,
                1,
            )
        };
        let state = GameState::new(starter(&rosters[0]), starter(&rosters[1]));

        Ok(Self {
            cfg,
            options,
            ledger,
            rosters,
            current_staff: [0, 0],
            state,
            events: Vec::with_capacity(96),
            logs: options.collect_at_bat_logs.then(|| Vec::with_capacity(80)),
            innings: Vec::with_capacity(cfg.rules.innings as usize),
            lead_changes: Vec::new(),
            pitching_changes: Vec::new(),
            walk_off: false,
            plate_appearances: 0,
        })
    }

    fn roster(&self, side: TeamSide) -> &Roster<'a> {
        &self.rosters[side.index()]
    }

    fn pitcher(&self, side: TeamSide) -> StaffMember<'a> {
        self.roster(side).staff[self.current_staff[side.index()]]
    }

    fn batter_at(&self, side: TeamSide, slot: usize) -> &'a Player {
        match self.roster(side).lineup[slot % LINEUP_SIZE] {
            (Some(player), _) => player,
            (None, _) => self.pitcher(side).player,
        }
    }

    /// 현재 수비 배치 (1번 = 마운드의 투수)
    fn fielder_map(&self, side: TeamSide) -> FielderMap {
        let mut map = FielderMap::default();
        let pitcher = self.pitcher(side).player;
        map.set(Position::Pitcher, FielderProfile::new(pitcher.batting.speed, &pitcher.fielding));
        for (player, position) in &self.roster(side).lineup {
            if let Some(p) = player {
                map.set(*position, FielderProfile::new(p.batting.speed, &p.fielding));
            }
        }
        map
    }

    fn fielder_id(&self, side: TeamSide, position_id: u8) -> Option<PlayerId> {
        if position_id == 1 {
            return Some(self.pitcher(side).player.id);
        }
        self.roster(side)
            .lineup
            .iter()
            .find(|(_, pos)| pos.position_id() == Some(position_id))
            .and_then(|(player, _)| player.map(|p| p.id))
    }

    fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> GameOutcome {
        for side in [TeamSide::Away, TeamSide::Home] {
            let pitcher_id = self.pitcher(side).player.id;
            self.events.push(GameEvent::StartingPitcher { side, pitcher_id });
        }

        let scheduled = self.cfg.rules.innings;
        let mut inning: u8 = 1;
        let is_tie = loop {
            self.innings.push(InningLine { inning, away_runs: 0, home_runs: None });
            self.play_half(inning, Half::Top, rng);

            if inning >= scheduled && self.state.lead(TeamSide::Home) > 0 {
                break false;
            }

            if let Some(line) = self.innings.last_mut() {
                line.home_runs = Some(0);
            }
            self.play_half(inning, Half::Bottom, rng);

            if self.walk_off || (inning >= scheduled && self.state.lead(TeamSide::Home) != 0) {
                break false;
            }
            let limit_reached = self.cfg.rules.extra_innings_limit.is_some_and(|limit| inning >= limit);
            if limit_reached || inning == u8::MAX {
                break true;
            }
            inning += 1;
        };

        self.finish(is_tie)
    }

    fn play_half<R: Rng + ?Sized>(&mut self, inning: u8, half: Half, rng: &mut R) {
        self.state.start_half(inning, half);
        let batting = half.batting_side();
        let runs_before = self.state.score(batting);

        self.maybe_change_pitcher(true);
        while self.state.outs < 3 {
            self.plate_appearance(rng);
            if half == Half::Bottom && inning >= self.cfg.rules.innings && self.state.lead(TeamSide::Home) > 0 {
                self.walk_off = true;
                break;
            }
            if self.state.outs < 3 {
                self.maybe_change_pitcher(false);
            }
        }

        if self.state.outs >= 3 {
            let left = u32::from(state::runners_on(&self.state.bases));
            self.state.side_mut(batting).left_on_base += left;
        }

        debug!(
            inning,
            half = ?half,
            runs = self.state.score(batting) - runs_before,
            away = self.state.score(TeamSide::Away),
            home = self.state.score(TeamSide::Home),
            "half-inning complete"
        );
    }

    fn maybe_change_pitcher(&mut self, at_half_start: bool) {
        let fielding = self.state.fielding_side();
        let lead = self.state.lead(fielding);
        let situation = Situation::classify(self.cfg, lead, self.state.inning);
        let used: Vec<PlayerId> = self.state.side(fielding).outings.iter().map(|o| o.pitcher_id).collect();
        let view = BullpenView {
            team: self.roster(fielding).team,
            ledger: self.ledger,
            game_day: self.options.game_day,
            used: &used,
        };

        let current = self.pitcher(fielding);
        let save_opportunity = at_half_start
            && situation == Situation::Save
            && current.usage.reliever_policy() != Some(RelieverPolicy::Closer)
            && view.closer_available(self.cfg);
        let reason = if save_opportunity {
            Some(PullReason::SaveOpportunity)
        } else {
            pull_reason(self.cfg, self.state.side(fielding).current())
        };
        let Some(reason) = reason else {
            return;
        };
        let Some(next_id) = view.select(self.cfg, situation, reason) else {
            return;
        };
        let Some(staff_index) = self.roster(fielding).staff.iter().position(|m| m.player.id == next_id) else {
            return;
        };

        let member = self.roster(fielding).staff[staff_index];
        let outing = Outing::new(
            next_id,
            false,
            pitch_limit(self.cfg, member.abilities, &member.usage),
            member.usage.max_innings,
            lead,
            state::runners_on(&self.state.bases),
            self.state.inning,
        );
        self.current_staff[fielding.index()] = staff_index;
        self.state.side_mut(fielding).outings.push(outing);

        let change = PitchingChange {
            inning: self.state.inning,
            half: self.state.half,
            side: fielding,
            outs: self.state.outs,
            pitcher_out: current.player.id,
            pitcher_in: next_id,
            lead,
        };
        debug!(
            inning = change.inning,
            side = ?fielding,
            pitcher_out = %change.pitcher_out,
            pitcher_in = %change.pitcher_in,
            reason = ?reason,
            situation = ?situation,
            "pitching change"
        );
        self.pitching_changes.push(change);
        self.events.push(GameEvent::PitchingChange(change));
    }

    fn plate_appearance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let batting = self.state.batting_side();
        let fielding = batting.opposite();
        let slot = self.state.side(batting).batting_index;
        let batter = self.batter_at(batting, slot);
        let pitcher = self.pitcher(fielding);
        let outs_before = self.state.outs;
        let bases_before = state::occupancy(&self.state.bases);

        let pa = {
            let outing = self.state.side(fielding).current();
            let matchup = Matchup {
                batter: &batter.batting,
                bats: batter.bats,
                pitcher: pitcher.abilities,
                pitches_thrown: outing.pitches,
                pitch_limit: outing.pitch_limit,
            };
            let fielders = self.fielder_map(fielding);
            let ctx = BaseOutContext::new(outs_before, bases_before);
            resolve_plate_appearance(self.cfg, &matchup, &fielders, ctx, rng)
        };

        let batter_runner = BaseRunner {
            runner_id: batter.id,
            responsible_pitcher_id: pitcher.player.id,
            speed: batter.batting.speed,
            reached_on_error: false,
        };
        let distance = pa.ball_in_play.as_ref().map_or(0.0, |b| b.landing.distance);
        let play = resolve_play(
            &self.cfg.base_running,
            &self.state.bases,
            pa.result,
            batter_runner,
            PlayContext { outs_before, distance },
            rng,
        );

        // 득점 처리 (책임 투수, 자책 여부, 리드 변화)
        let mut runs = Vec::with_capacity(play.runs.len());
        for runner in &play.runs {
            let earned = !runner.reached_on_error && pa.result != PlateAppearanceResult::Error;
            runs.push(RunScored {
                runner_id: runner.runner_id,
                responsible_pitcher_id: runner.responsible_pitcher_id,
                earned,
            });
            self.state.side_mut(batting).score += 1;
            if let Some(charged) = self.state.side_mut(fielding).outing_mut(runner.responsible_pitcher_id) {
                charged.runs_allowed += 1;
                charged.runs_this_inning += 1;
                if earned {
                    charged.earned_runs += 1;
                }
            }
            if self.state.lead(batting) == 1 {
                self.lead_changes.push(LeadChange {
                    side: batting,
                    pitcher_of_record: self.pitcher(batting).player.id,
                    go_ahead_responsible: runner.responsible_pitcher_id,
                });
            }
        }
        if let Some(line) = self.innings.last_mut() {
            let scored = runs.len() as u32;
            match batting {
                TeamSide::Away => line.away_runs += scored,
                TeamSide::Home => line.home_runs = Some(line.home_runs.unwrap_or(0) + scored),
            }
        }

        let lead_after = self.state.lead(fielding);
        {
            let outing = self.state.side_mut(fielding).current_mut();
            outing.pitches += u32::from(pa.pitch_count());
            outing.outs += u32::from(play.outs_recorded);
            outing.min_lead = outing.min_lead.min(lead_after);
        }
        self.state.outs += play.outs_recorded;
        self.state.bases = play.bases;
        self.state.side_mut(batting).batting_index = (slot + 1) % LINEUP_SIZE;
        self.plate_appearances += 1;

        let error_fielder_id = match (&pa.ball_in_play, pa.result) {
            (Some(bip), PlateAppearanceResult::Error) => {
                bip.fielder_position.and_then(|pos| self.fielder_id(fielding, pos))
            }
            _ => None,
        };

        trace!(
            inning = self.state.inning,
            half = ?self.state.half,
            batter = %batter.id,
            pitcher = %pitcher.player.id,
            result = %pa.result,
            pitches = pa.pitches.len(),
            runs = runs.len(),
            outs = self.state.outs,
            "plate appearance"
        );

        if let Some(logs) = self.logs.as_mut() {
            logs.push(AtBatLog {
                inning: self.state.inning,
                half: self.state.half,
                batter_id: batter.id,
                pitcher_id: pitcher.player.id,
                outs_before,
                bases_before,
                pitches: pa.pitches.clone(),
                result: pa.result,
                batted_ball: pa.ball_in_play.as_ref().map(|b| b.batted_ball),
                landing: pa.ball_in_play.as_ref().map(|b| b.landing),
                fielder_position: pa.ball_in_play.as_ref().and_then(|b| b.fielder_position),
                bounce_penalty: pa.ball_in_play.as_ref().map_or(0.0, |b| b.bounce_penalty()),
                runs_scored: runs.len() as u8,
                rbi: play.rbi,
            });
        }

        self.events.push(GameEvent::PlateAppearance(PlateAppearanceEvent {
            inning: self.state.inning,
            half: self.state.half,
            batter_id: batter.id,
            pitcher_id: pitcher.player.id,
            result: pa.result,
            batted_ball_class: pa.ball_in_play.as_ref().map(|b| b.batted_ball.class),
            pitches: pa.pitch_count(),
            outs_recorded: play.outs_recorded,
            rbi: play.rbi,
            runs,
            error_fielder_id,
        }));
    }

    fn finish(self, is_tie: bool) -> GameOutcome {
        let home_score = self.state.score(TeamSide::Home);
        let away_score = self.state.score(TeamSide::Away);
        let winner = if is_tie {
            None
        } else {
            match home_score.cmp(&away_score) {
                std::cmp::Ordering::Greater => Some(TeamSide::Home),
                std::cmp::Ordering::Less => Some(TeamSide::Away),
                std::cmp::Ordering::Equal => None,
            }
        };

        let decisions = decisions::decide(self.cfg, &self.state, &self.lead_changes, winner);
        let mut box_score = BoxScore::fold(&self.events);
        box_score.apply_decisions(&decisions);

        let mut batter_order = Vec::with_capacity(2 * LINEUP_SIZE);
        let mut pitcher_order = Vec::new();
        for side in [TeamSide::Away, TeamSide::Home] {
            let outings = &self.state.side(side).outings;
            for (player, _) in &self.roster(side).lineup {
                match player {
                    Some(p) => batter_order.push(p.id),
                    None => batter_order.extend(outings.iter().map(|o| o.pitcher_id)),
                }
            }
            pitcher_order.extend(outings.iter().map(|o| o.pitcher_id));
        }

        let mut home_totals = box_score.team_totals(TeamSide::Home);
        home_totals.left_on_base = self.state.side(TeamSide::Home).left_on_base;
        let mut away_totals = box_score.team_totals(TeamSide::Away);
        away_totals.left_on_base = self.state.side(TeamSide::Away).left_on_base;

        let appearances: Vec<(PlayerId, u32)> = self
            .state
            .sides
            .iter()
            .flat_map(|s| s.outings.iter().map(|o| (o.pitcher_id, o.pitches)))
            .collect();
        let ledger = self.ledger.record_game(self.options.game_day, &appearances);

        let result = GameResult {
            home_score,
            away_score,
            scheduled_innings: self.cfg.rules.innings,
            innings: self.innings,
            player_stats: box_score.ordered_batters(&batter_order),
            pitcher_stats: box_score.ordered_pitchers(&pitcher_order),
            at_bat_logs: self.logs,
            winning_pitcher_id: decisions.winning_pitcher_id,
            losing_pitcher_id: decisions.losing_pitcher_id,
            save_pitcher_id: decisions.save_pitcher_id,
            hold_pitcher_ids: decisions.hold_pitcher_ids,
            home_totals,
            away_totals,
            pitching_changes: self.pitching_changes,
            is_tie,
            walk_off: self.walk_off,
            total_plate_appearances: self.plate_appearances,
        };

        info!(
            home = %self.rosters[0].team.name,
            away = %self.rosters[1].team.name,
            home_score,
            away_score,
            innings = result.innings.len(),
            walk_off = result.walk_off,
            tie = result.is_tie,
            "game finished"
        );

        #[cfg(feature = "strict_invariants")]
        if let Err(violation) = crate::calibration::check_invariants(&result) {
            panic!("game invariant violated: {violation}");
        }

        GameOutcome { result, ledger }
    }
}
