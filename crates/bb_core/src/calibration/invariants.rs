//! Hard post-game invariants
//!
//! 결과만 보고 확인할 수 있는 회계 규칙. 하나라도 깨지면 엔진 버그다.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::events::TeamSide;
use crate::models::game_result::GameResult;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvariantViolation {
    #[error("{side:?} pitchers recorded {found} outs, expected {expected}")]
    OutsMismatch { side: TeamSide, expected: String, found: u32 },

    #[error("line score {side:?} runs {line} != final score {score}")]
    LineScoreMismatch { side: TeamSide, line: u32, score: u32 },

    #[error("box score {side:?} runs {boxed} != final score {score}")]
    BoxScoreMismatch { side: TeamSide, boxed: u32, score: u32 },

    #[error("{logs} at-bat logs for {plate_appearances} plate appearances")]
    LogCountMismatch { logs: usize, plate_appearances: u32 },

    #[error("game ended after {played} innings, scheduled {scheduled}")]
    TooShort { played: u8, scheduled: u8 },

    #[error("decided game reported as tie or tie with unequal score ({home}-{away}, tie={is_tie})")]
    TieMismatch { home: u32, away: u32, is_tie: bool },
}

pub fn check_invariants(result: &GameResult) -> Result<(), InvariantViolation> {
    let played = result.innings_played();
    if played < result.scheduled_innings {
        return Err(InvariantViolation::TooShort { played, scheduled: result.scheduled_innings });
    }
    if result.is_tie != (result.home_score == result.away_score) {
        return Err(InvariantViolation::TieMismatch {
            home: result.home_score,
            away: result.away_score,
            is_tie: result.is_tie,
        });
    }

    // 홈 투수진: 매 초 공격 3아웃
    let n = u32::from(played);
    let home_outs = result.outs_recorded_by(TeamSide::Home);
    if home_outs != 3 * n {
        return Err(InvariantViolation::OutsMismatch {
            side: TeamSide::Home,
            expected: (3 * n).to_string(),
            found: home_outs,
        });
    }

    // 원정 투수진: 마지막 말 공격 생략이면 0, 끝내기면 0~2, 아니면 3
    let away_outs = result.outs_recorded_by(TeamSide::Away);
    let skipped_last = result.innings.last().is_some_and(|l| l.home_runs.is_none());
    let base = 3 * n.saturating_sub(1);
    let (ok, expected) = if skipped_last {
        (away_outs == base, base.to_string())
    } else if result.walk_off {
        ((base..base + 3).contains(&away_outs), format!("{base}..={}", base + 2))
    } else {
        (away_outs == base + 3, (base + 3).to_string())
    };
    if !ok {
        return Err(InvariantViolation::OutsMismatch { side: TeamSide::Away, expected, found: away_outs });
    }

    let away_line: u32 = result.innings.iter().map(|l| l.away_runs).sum();
    let home_line: u32 = result.innings.iter().filter_map(|l| l.home_runs).sum();
    for (side, line, score) in [
        (TeamSide::Away, away_line, result.away_score),
        (TeamSide::Home, home_line, result.home_score),
    ] {
        if line != score {
            return Err(InvariantViolation::LineScoreMismatch { side, line, score });
        }
    }

    for side in [TeamSide::Away, TeamSide::Home] {
        let boxed: u32 = result.player_stats.iter().filter(|l| l.team == side).map(|l| l.runs).sum();
        let score = match side {
            TeamSide::Home => result.home_score,
            TeamSide::Away => result.away_score,
        };
        if boxed != score {
            return Err(InvariantViolation::BoxScoreMismatch { side, boxed, score });
        }
    }

    if let Some(logs) = &result.at_bat_logs {
        if logs.len() as u64 != u64::from(result.total_plate_appearances) {
            return Err(InvariantViolation::LogCountMismatch {
                logs: logs.len(),
                plate_appearances: result.total_plate_appearances,
            });
        }
    }

    Ok(())
}
