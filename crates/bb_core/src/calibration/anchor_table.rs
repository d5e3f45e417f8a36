//! Anchor Table - Target League Statistics
//!
//! 평균 능력치 팀끼리의 경기가 맞춰야 하는 리그 지표 범위.
//! 범위 밖은 경기 자체가 틀린 것이 아니므로 soft warning으로만 보고한다.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use super::stat_snapshot::StatSnapshot;

/// Inclusive target band for one statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    pub min: f64,
    pub max: f64,
}

impl TargetRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_in_range(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// 범위 밖으로 벗어난 거리 (안이면 0)
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStat {
    BattingAverage,
    HomeRunsPerGame,
    GroundOutAirOut,
    StrikeoutRate,
    WalkRate,
}

impl AnchorStat {
    pub const ALL: [AnchorStat; 5] = [
        AnchorStat::BattingAverage,
        AnchorStat::HomeRunsPerGame,
        AnchorStat::GroundOutAirOut,
        AnchorStat::StrikeoutRate,
        AnchorStat::WalkRate,
    ];

    pub fn value(self, snapshot: &StatSnapshot) -> f64 {
        match self {
            AnchorStat::BattingAverage => snapshot.batting_average(),
            AnchorStat::HomeRunsPerGame => snapshot.home_runs_per_game(),
            AnchorStat::GroundOutAirOut => snapshot.ground_out_air_out_ratio(),
            AnchorStat::StrikeoutRate => snapshot.strikeout_rate(),
            AnchorStat::WalkRate => snapshot.walk_rate(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnchorStat::BattingAverage => "AVG",
            AnchorStat::HomeRunsPerGame => "HR/G",
            AnchorStat::GroundOutAirOut => "GO/AO",
            AnchorStat::StrikeoutRate => "K%",
            AnchorStat::WalkRate => "BB%",
        }
    }
}

impl fmt::Display for AnchorStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Soft calibration miss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationWarning {
    pub stat: AnchorStat,
    pub value: f64,
    pub target: TargetRange,
}

impl fmt::Display for CalibrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:.3} outside [{:.3}, {:.3}]", self.stat, self.value, self.target.min, self.target.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorTable {
    pub version: u32,
    /// 최소 표본 (이보다 적으면 check를 건너뛴다) (기본: 100)
    pub min_games: u64,
    pub batting_average: TargetRange,
    pub home_runs_per_game: TargetRange,
    pub ground_out_air_out: TargetRange,
    pub strikeout_rate: TargetRange,
    pub walk_rate: TargetRange,
}

impl Default for AnchorTable {
    fn default() -> Self {
        Self {
            version: 1,
            min_games: 100,
            batting_average: TargetRange::new(0.24, 0.30),
            home_runs_per_game: TargetRange::new(0.8, 2.5),
            ground_out_air_out: TargetRange::new(0.7, 1.4),
            strikeout_rate: TargetRange::new(0.12, 0.30),
            walk_rate: TargetRange::new(0.05, 0.13),
        }
    }
}

impl AnchorTable {
    pub fn target(&self, stat: AnchorStat) -> TargetRange {
        match stat {
            AnchorStat::BattingAverage => self.batting_average,
            AnchorStat::HomeRunsPerGame => self.home_runs_per_game,
            AnchorStat::GroundOutAirOut => self.ground_out_air_out,
            AnchorStat::StrikeoutRate => self.strikeout_rate,
            AnchorStat::WalkRate => self.walk_rate,
        }
    }

    /// 범위를 벗어난 지표마다 경고 하나. 표본이 `min_games`보다 작으면 빈 목록.
    pub fn check(&self, snapshot: &StatSnapshot) -> Vec<CalibrationWarning> {
        if snapshot.games < self.min_games {
            return Vec::new();
        }
        let mut warnings = Vec::new();
        for stat in AnchorStat::ALL {
            let value = stat.value(snapshot);
            let target = self.target(stat);
            if !target.is_in_range(value) {
                warn!(stat = %stat, value, min = target.min, max = target.max, games = snapshot.games, "calibration target missed");
                warnings.push(CalibrationWarning { stat, value, target });
            }
        }
        warnings
    }
}
