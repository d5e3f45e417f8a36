//! Error types for the simulation engine
//!
//! 경기 시작 전 사전조건(로스터/라인업/투수)과 설정/입출력 오류를 구분한다.
//! 경기 도중에는 오류가 발생하지 않으며, 사후 검증 실패는
//! `calibration::invariants::InvariantViolation`으로 따로 보고한다.

use thiserror::Error;

use crate::models::{PlayerId, Position};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("team '{team}': roster is empty")]
    EmptyRoster { team: String },

    #[error("team '{team}': lineup must have {expected} batters, found {found}")]
    InvalidLineupSize { team: String, expected: usize, found: usize },

    #[error("team '{team}': unknown player id {id}")]
    UnknownPlayer { team: String, id: PlayerId },

    #[error("team '{team}': player id {id} appears more than once")]
    DuplicatePlayer { team: String, id: PlayerId },

    #[error("team '{team}': position {position} must be covered exactly once in the lineup")]
    PositionCoverage { team: String, position: Position },

    #[error("team '{team}': no eligible pitcher ({reason})")]
    NoEligiblePitcher { team: String, reason: String },

    #[error("team '{team}': reliever {id} is not usable ({reason})")]
    InvalidReliever { team: String, id: PlayerId, reason: String },

    #[error("player {id}: {field} = {value} is out of range")]
    RatingOutOfRange { id: PlayerId, field: &'static str, value: u32 },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported schema version {found} (expected {expected})")]
    SchemaVersion { found: u8, expected: u8 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// 경기 입력(팀 데이터) 문제인지 여부. 호출자는 이 경우 재시도하지 않는다.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GameError::EmptyRoster { .. }
                | GameError::InvalidLineupSize { .. }
                | GameError::UnknownPlayer { .. }
                | GameError::DuplicatePlayer { .. }
                | GameError::PositionCoverage { .. }
                | GameError::NoEligiblePitcher { .. }
                | GameError::InvalidReliever { .. }
                | GameError::RatingOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
