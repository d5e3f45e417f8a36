//! Parallel batch runner
//!
//! 같은 두 팀으로 N경기를 rayon으로 병렬 실행하고 리그 지표로 접는다.
//! 경기마다 `(base_seed, game_index)`에서 시드를 뽑으므로 스레드 스케줄과 무관하게
//! 같은 입력은 같은 보고서를 만든다.

// DefaultHasher는 Rust 버전마다 바뀔 수 있어 FxHasher 사용
use fxhash::FxHasher;
use tracing::{debug, info};
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::anchor_table::{AnchorTable, CalibrationWarning};
use super::invariants::{check_invariants, InvariantViolation};
use super::stat_snapshot::{FielderDistribution, StatSnapshot};
use crate::engine::bullpen::BullpenLedger;
use crate::engine::config::EngineConfig;
use crate::engine::game_sim::{simulate_game_with, GameOptions};
use crate::engine::GameRng;
use crate::error::Result;
use crate::models::events::TeamSide;
use crate::models::game_result::GameResult;
use crate::models::team::Team;

/// 경기별 시드. 같은 `(base_seed, index)` → 같은 값.
pub fn game_seed(base_seed: u64, index: u64) -> u64 {
    let mut hasher = FxHasher::default();
    base_seed.hash(&mut hasher);
    index.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub snapshot: StatSnapshot,
    /// `collect_at_bat_logs`가 켜진 경우에만 채워진다
    pub fielders: FielderDistribution,
    pub warnings: Vec<CalibrationWarning>,
    /// (게임 인덱스, 위반) 목록
    pub invariant_violations: Vec<(u64, InvariantViolation)>,
    pub home_wins: u64,
    pub away_wins: u64,
    pub ties: u64,
}

impl BatchReport {
    fn fold(results: &[(u64, GameResult)], anchors: &AnchorTable) -> Self {
        let mut snapshot = StatSnapshot::new();
        let mut fielders = FielderDistribution::default();
        let mut invariant_violations = Vec::new();
        let (mut home_wins, mut away_wins, mut ties) = (0, 0, 0);

        for (index, result) in results {
            snapshot.record(result);
            fielders.record(result);
            if let Err(violation) = check_invariants(result) {
                invariant_violations.push((*index, violation));
            }
            match result.winner() {
                Some(TeamSide::Home) => home_wins += 1,
                Some(TeamSide::Away) => away_wins += 1,
                None => ties += 1,
            }
        }

        let warnings = anchors.check(&snapshot);
        Self { snapshot, fielders, warnings, invariant_violations, home_wins, away_wins, ties }
    }
}

pub struct BatchRunner {
    pub config: EngineConfig,
    pub anchors: AnchorTable,
    /// 타석 로그 수집 (야수 분포용) (기본: false)
    pub collect_at_bat_logs: bool,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl BatchRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, anchors: AnchorTable::default(), collect_at_bat_logs: false }
    }

    pub fn with_logs(mut self) -> Self {
        self.collect_at_bat_logs = true;
        self
    }

    /// 경기 결과 전체 (게임 인덱스 순서)
    pub fn run_games(&self, home: &Team, away: &Team, games: u64, base_seed: u64) -> Result<Vec<GameResult>> {
        Ok(self.simulate(home, away, games, base_seed)?.into_iter().map(|(_, r)| r).collect())
    }

    pub fn run(&self, home: &Team, away: &Team, games: u64, base_seed: u64) -> Result<BatchReport> {
        let results = self.simulate(home, away, games, base_seed)?;
        let report = BatchReport::fold(&results, &self.anchors);
        info!(
            games = report.snapshot.games,
            avg = report.snapshot.batting_average(),
            hr_per_game = report.snapshot.home_runs_per_game(),
            go_ao = report.snapshot.ground_out_air_out_ratio(),
            runs_per_game = report.snapshot.runs_per_game(),
            warnings = report.warnings.len(),
            invariant_violations = report.invariant_violations.len(),
            "batch complete"
        );
        Ok(report)
    }

    fn simulate(&self, home: &Team, away: &Team, games: u64, base_seed: u64) -> Result<Vec<(u64, GameResult)>> {
        // 팀/설정 오류는 첫 경기에서 한 번만 드러나도록 미리 검사
        self.config.validate()?;
        home.validate()?;
        away.validate()?;

        let ledger = BullpenLedger::new();
        (0..games)
            .into_par_iter()
            .map(|index| {
                let seed = game_seed(base_seed, index);
                let options = GameOptions { collect_at_bat_logs: self.collect_at_bat_logs, seed, game_day: 0 };
                let mut rng = GameRng::seed_from_u64(seed);
                let outcome = simulate_game_with(home, away, &options, &self.config, &ledger, &mut rng)?;
                debug!(index, seed, away = outcome.result.away_score, home = outcome.result.home_score, "batch game");
                Ok((index, outcome.result))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::average_team;

    #[test]
    fn test_game_seeds_are_stable_and_distinct() {
        assert_eq!(game_seed(42, 7), game_seed(42, 7));
        let seeds: std::collections::HashSet<u64> = (0..1000).map(|i| game_seed(42, i)).collect();
        assert_eq!(seeds.len(), 1000);
        assert_ne!(game_seed(1, 0), game_seed(2, 0));
    }

    #[test]
    fn test_batch_is_deterministic_regardless_of_threads() {
        let home = average_team("Home", 100);
        let away = average_team("Away", 200);
        let runner = BatchRunner::default();
        let a = runner.run(&home, &away, 24, 7).unwrap();
        let b = runner.run(&home, &away, 24, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.snapshot.games, 24);
        assert_eq!(a.home_wins + a.away_wins + a.ties, 24);
        assert!(a.invariant_violations.is_empty());
        // 표본이 min_games보다 적으면 경고 없음
        assert!(a.warnings.is_empty());
    }

    #[test]
    fn test_run_games_matches_report() {
        let home = average_team("Home", 100);
        let away = average_team("Away", 200);
        let runner = BatchRunner::default().with_logs();
        let games = runner.run_games(&home, &away, 8, 3).unwrap();
        let report = runner.run(&home, &away, 8, 3).unwrap();
        assert_eq!(StatSnapshot::from_results(&games), report.snapshot);
        assert_eq!(report.fielders.games_with_logs, 8);
    }

    #[test]
    fn test_invalid_team_fails_fast() {
        let home = average_team("Home", 100);
        let mut away = average_team("Away", 200);
        away.lineup.clear();
        let err = BatchRunner::default().run(&home, &away, 10, 0).unwrap_err();
        assert!(err.is_precondition());
    }
}
