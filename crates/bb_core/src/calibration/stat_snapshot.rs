//! Aggregate Statistics Snapshot
//!
//! 여러 경기 결과를 리그 단위 지표(타율, 경기당 홈런, GO/AO, K%, BB%)로 접는다.
//! `merge`는 결합법칙을 만족하므로 병렬 배치 결과를 어떤 순서로 합쳐도 같다.

use serde::{Deserialize, Serialize};

use crate::models::game_result::GameResult;

/// League-level counting stats over a set of games
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub games: u64,
    pub plate_appearances: u64,
    pub at_bats: u64,
    pub hits: u64,
    pub home_runs: u64,
    pub walks: u64,
    pub strikeouts: u64,
    pub ground_outs: u64,
    pub air_outs: u64,
    pub runs: u64,
}

impl StatSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results(results: &[GameResult]) -> Self {
        let mut snapshot = Self::new();
        for result in results {
            snapshot.record(result);
        }
        snapshot
    }

    pub fn from_result(result: &GameResult) -> Self {
        let mut snapshot = Self::new();
        snapshot.record(result);
        snapshot
    }

    pub fn record(&mut self, result: &GameResult) {
        self.games += 1;
        self.runs += u64::from(result.home_score + result.away_score);

        for line in &result.player_stats {
            self.plate_appearances += u64::from(line.plate_appearances);
            self.at_bats += u64::from(line.at_bats);
            self.hits += u64::from(line.hits);
            self.home_runs += u64::from(line.home_runs);
            self.walks += u64::from(line.walks);
            self.strikeouts += u64::from(line.strikeouts);
        }
        // 땅볼/뜬공 아웃은 투수 기록에만 남는다
        for line in &result.pitcher_stats {
            self.ground_outs += u64::from(line.ground_outs);
            self.air_outs += u64::from(line.air_outs);
        }
    }

    pub fn merge(&mut self, other: &StatSnapshot) {
        self.games += other.games;
        self.plate_appearances += other.plate_appearances;
        self.at_bats += other.at_bats;
        self.hits += other.hits;
        self.home_runs += other.home_runs;
        self.walks += other.walks;
        self.strikeouts += other.strikeouts;
        self.ground_outs += other.ground_outs;
        self.air_outs += other.air_outs;
        self.runs += other.runs;
    }

    // ========================================================================
    // Derived rates (표본이 없으면 0)
    // ========================================================================

    pub fn batting_average(&self) -> f64 {
        ratio(self.hits, self.at_bats)
    }

    pub fn home_runs_per_game(&self) -> f64 {
        ratio(self.home_runs, self.games)
    }

    pub fn ground_out_air_out_ratio(&self) -> f64 {
        ratio(self.ground_outs, self.air_outs)
    }

    pub fn strikeout_rate(&self) -> f64 {
        ratio(self.strikeouts, self.plate_appearances)
    }

    pub fn walk_rate(&self) -> f64 {
        ratio(self.walks, self.plate_appearances)
    }

    pub fn runs_per_game(&self) -> f64 {
        ratio(self.runs, self.games)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// 처리 야수 분포 (타석 로그 기반)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FielderDistribution {
    /// 인덱스 0 = 투수(1) … 8 = 우익수(9)
    pub by_position: [u64; 9],
    /// 외야수가 바운드 페널티를 받고 회수한 땅볼 수
    pub bounce_penalized_ground_balls: u64,
    /// 로그가 없는 경기는 건너뛴다
    pub games_with_logs: u64,
}

impl FielderDistribution {
    pub fn from_results(results: &[GameResult]) -> Self {
        let mut dist = Self::default();
        for result in results {
            dist.record(result);
        }
        dist
    }

    pub fn record(&mut self, result: &GameResult) {
        let Some(logs) = result.at_bat_logs.as_ref() else {
            return;
        };
        self.games_with_logs += 1;
        for log in logs {
            if let Some(pos) = log.fielder_position.filter(|p| (1..=9).contains(p)) {
                self.by_position[usize::from(pos) - 1] += 1;
            }
            if log.bounce_penalty > 0.0 {
                self.bounce_penalized_ground_balls += 1;
            }
        }
    }

    pub fn merge(&mut self, other: &FielderDistribution) {
        for (a, b) in self.by_position.iter_mut().zip(other.by_position.iter()) {
            *a += b;
        }
        self.bounce_penalized_ground_balls += other.bounce_penalized_ground_balls;
        self.games_with_logs += other.games_with_logs;
    }

    pub fn total(&self) -> u64 {
        self.by_position.iter().sum()
    }

    /// 수비 번호별 점유율 [0, 1]
    pub fn shares(&self) -> [f64; 9] {
        let total = self.total();
        self.by_position.map(|n| ratio(n, total))
    }
}
