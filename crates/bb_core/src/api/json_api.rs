use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::engine::bullpen::BullpenLedger;
use crate::engine::config::EngineConfig;
use crate::engine::game_sim::{simulate_game_with, GameOptions};
use crate::engine::GameRng;
use crate::error::{GameError, Result};
use crate::models::game_result::GameResult;
use crate::models::team::Team;

pub const SCHEMA_VERSION: u8 = 1;

/// 호스트(시즌 레이어)가 보내는 경기 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub home_team: Team,
    pub away_team: Team,
    #[serde(default)]
    pub collect_at_bat_logs: bool,
    #[serde(default)]
    pub game_day: u32,
    /// 없으면 빈 원장 (모든 불펜 투수 가용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullpen_ledger: Option<BullpenLedger>,
    /// 없으면 기본 설정. 일부 필드만 넣어도 된다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
}

impl GameRequest {
    pub fn new(seed: u64, home_team: Team, away_team: Team) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            seed,
            home_team,
            away_team,
            collect_at_bat_logs: false,
            game_day: 0,
            bullpen_ledger: None,
            config: None,
        }
    }

    pub fn options(&self) -> GameOptions {
        GameOptions { collect_at_bat_logs: self.collect_at_bat_logs, seed: self.seed, game_day: self.game_day }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub schema_version: u8,
    pub result: GameResult,
    /// 이 경기 등판을 반영한 원장. 다음 경기 요청에 그대로 넘긴다.
    pub bullpen_ledger: BullpenLedger,
}

/// 구조체 요청 → 응답
pub fn simulate_game_request(request: &GameRequest) -> Result<GameResponse> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(GameError::SchemaVersion { found: request.schema_version, expected: SCHEMA_VERSION });
    }

    let default_config;
    let config = match &request.config {
        Some(cfg) => cfg,
        None => {
            default_config = EngineConfig::default();
            &default_config
        }
    };
    let empty_ledger;
    let ledger = match &request.bullpen_ledger {
        Some(ledger) => ledger,
        None => {
            empty_ledger = BullpenLedger::new();
            &empty_ledger
        }
    };

    let mut rng = GameRng::seed_from_u64(request.seed);
    let outcome =
        simulate_game_with(&request.home_team, &request.away_team, &request.options(), config, ledger, &mut rng)?;

    Ok(GameResponse { schema_version: SCHEMA_VERSION, result: outcome.result, bullpen_ledger: outcome.ledger })
}

/// JSON 요청 → JSON 응답. 호스트 엔진용 진입점.
pub fn simulate_game_json(request_json: &str) -> Result<String> {
    let request: GameRequest = serde_json::from_str(request_json).map_err(|e| {
        error!(error = %e, "invalid game request JSON");
        GameError::from(e)
    })?;
    debug!(
        seed = request.seed,
        home = %request.home_team.name,
        away = %request.away_team.name,
        "simulate_game_json"
    );

    let response = simulate_game_request(&request)?;
    Ok(serde_json::to_string(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::game_sim::simulate_game;
    use crate::models::fixtures::average_team;
    use crate::models::player::PlayerId;

    fn request(seed: u64) -> GameRequest {
        GameRequest::new(seed, average_team("Home", 100), average_team("Away", 200))
    }

    #[test]
    fn test_json_round_trip_matches_direct_call() {
        let req = request(17);
        let json = serde_json::to_string(&req).unwrap();
        let response: GameResponse = serde_json::from_str(&simulate_game_json(&json).unwrap()).unwrap();

        let direct = simulate_game(&req.home_team, &req.away_team, &GameOptions::seeded(17)).unwrap();
        assert_eq!(response.schema_version, SCHEMA_VERSION);
        assert_eq!(response.result, direct);
        assert_eq!(response.bullpen_ledger.len(), direct.pitcher_stats.len());
    }

    #[test]
    fn test_wrong_schema_version_is_rejected() {
        let mut req = request(1);
        req.schema_version = 9;
        let err = simulate_game_request(&req).unwrap_err();
        assert!(matches!(err, GameError::SchemaVersion { found: 9, expected: 1 }));
    }

    #[test]
    fn test_malformed_json_is_a_json_error() {
        let err = simulate_game_json("{\"schema_version\": 1").unwrap_err();
        assert!(matches!(err, GameError::Json(_)));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_partial_config_and_ledger_are_honored() {
        let mut value = serde_json::to_value(request(4)).unwrap();
        value["config"] = serde_json::json!({ "rules": { "innings": 7 } });
        value["game_day"] = serde_json::json!(12);
        let response: GameResponse =
            serde_json::from_str(&simulate_game_json(&value.to_string()).unwrap()).unwrap();
        assert_eq!(response.result.scheduled_innings, 7);
        let starter = response.bullpen_ledger.usage(PlayerId(110)).unwrap();
        assert_eq!(starter.last_day, 12);
    }
}
