//! # Engine Configuration Module
//!
//! 모든 튜닝 상수를 중앙에서 관리하는 설정 시스템.
//!
//! ## 목적
//! - 보정(calibration) 상수를 코드 밖에서 조정
//! - 리그 환경 프리셋 (Realistic, Live-ball, Dead-ball)
//! - YAML/JSON으로 부분 덮어쓰기 (누락 필드는 기본값)
//!
//! ## 사용법
//! ```rust
//! use bb_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let live = EngineConfig::live_ball();
//! let custom = EngineConfig::from_yaml_str("rules:\n  innings: 7\n").unwrap();
//! assert_eq!(custom.rules.innings, 7);
//! ```
//!
//! ## Environment Variables
//!
//! - `BB_CONFIG_PROFILE`: 프리셋 선택 (realistic, live_ball, dead_ball)

mod batted_ball_config;
mod bullpen_config;
mod fielding_config;
mod flight_config;
mod outcome_config;
mod pitching_config;
mod rules_config;

pub use batted_ball_config::BattedBallConfig;
pub use bullpen_config::BullpenConfig;
pub use fielding_config::FieldingConfig;
pub use flight_config::FlightConfig;
pub use outcome_config::OutcomeConfig;
pub use pitching_config::PitchingConfig;
pub use rules_config::{BaseRunningConfig, GameRulesConfig};

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{GameError, Result};

pub const PROFILE_ENV_VAR: &str = "BB_CONFIG_PROFILE";

/// 엔진 전체 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// 타구 생성/분류
    pub batted_ball: BattedBallConfig,
    /// 비거리/낙구/펜스
    pub flight: FlightConfig,
    /// 수비 판정
    pub fielding: FieldingConfig,
    /// 결과 분류 (홈런/장타/병살/희생플라이)
    pub outcome: OutcomeConfig,
    /// 투구 단위 확률
    pub pitching: PitchingConfig,
    /// 투수 교체/불펜 관리
    pub bullpen: BullpenConfig,
    /// 주루
    pub base_running: BaseRunningConfig,
    /// 경기 규칙
    pub rules: GameRulesConfig,
}

impl EngineConfig {
    /// 현실적인 시뮬레이션 (기본)
    pub fn realistic() -> Self {
        Self::default()
    }

    /// 반발력 높은 공 (홈런 증가)
    pub fn live_ball() -> Self {
        let mut cfg = Self::default();
        cfg.flight.drag_coefficient = 0.08;
        cfg.batted_ball.exit_velocity_base = 134.0;
        cfg
    }

    /// 저반발 공 (홈런 감소, 투고타저)
    pub fn dead_ball() -> Self {
        let mut cfg = Self::default();
        cfg.flight.drag_coefficient = 0.10;
        cfg.batted_ball.exit_velocity_base = 130.0;
        cfg
    }

    /// 프리셋 이름으로 생성. 알 수 없는 이름은 None.
    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "realistic" | "default" => Some(Self::realistic()),
            "live_ball" | "live" => Some(Self::live_ball()),
            "dead_ball" | "dead" => Some(Self::dead_ball()),
            _ => None,
        }
    }

    /// `BB_CONFIG_PROFILE` 환경 변수의 프리셋, 없거나 모르는 값이면 기본값
    pub fn from_env_or_default() -> Self {
        match env::var(PROFILE_ENV_VAR) {
            Ok(name) => Self::from_profile(&name).unwrap_or_else(|| {
                tracing::warn!(profile = %name, "unknown config profile, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// 비유한 값, 뒤집힌 범위, [0,1] 밖의 확률을 거부한다.
    pub fn validate(&self) -> Result<()> {
        self.batted_ball
            .validate()
            .and_then(|_| self.flight.validate())
            .and_then(|_| self.fielding.validate())
            .and_then(|_| self.outcome.validate())
            .and_then(|_| self.pitching.validate())
            .and_then(|_| self.bullpen.validate())
            .and_then(|_| self.base_running.validate())
            .and_then(|_| self.rules.validate())
            .map_err(GameError::InvalidConfig)
    }
}

// ========== Tests ==========
