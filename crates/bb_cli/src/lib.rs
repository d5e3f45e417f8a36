//! bb_cli library
//!
//! 파일 입력(팀 JSON, 설정 YAML/JSON) → bb_core 호출 → 직렬화 가능한 결과.
//! `main.rs`는 인자 파싱과 출력만 담당한다.

use anyhow::{Context, Result};
use bb_core::calibration::{batted_ball_profile_with, BatchReport, BatchRunner};
use bb_core::models::fixtures::average_team;
use bb_core::models::{BatSide, BatterAbilities, PitcherAbilities};
use bb_core::{simulate_game_with, BullpenLedger, EngineConfig, GameOptions, GameResult, GameRng, Team};
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// 팀 JSON 파일 읽기 + 사전 검증
pub fn load_team(path: &Path) -> Result<Team> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read team file: {}", path.display()))?;
    let team: Team =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse team JSON: {}", path.display()))?;
    team.validate().with_context(|| format!("Invalid team: {}", path.display()))?;
    Ok(team)
}

/// `.json`이면 JSON, 그 외는 YAML로 읽는다.
/// 경로가 없으면 프리셋 이름, 그것도 없으면 `BB_CONFIG_PROFILE` (기본: realistic).
pub fn load_config(path: Option<&Path>, profile: Option<&str>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return match profile {
            Some(name) => EngineConfig::from_profile(name).with_context(|| format!("Unknown config profile: {name}")),
            None => Ok(EngineConfig::from_env_or_default()),
        };
    };
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        let text =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;
        EngineConfig::from_json_str(&text)
    } else {
        EngineConfig::from_yaml_file(path)
    };
    config.with_context(|| format!("Failed to load config: {}", path.display()))
}

pub fn simulate(home: &Team, away: &Team, seed: u64, logs: bool, config: &EngineConfig) -> Result<GameResult> {
    let options = GameOptions { collect_at_bat_logs: logs, seed, game_day: 0 };
    let mut rng = GameRng::seed_from_u64(seed);
    let outcome = simulate_game_with(home, away, &options, config, &BullpenLedger::new(), &mut rng)
        .context("Simulation rejected the input teams")?;
    Ok(outcome.result)
}

/// 평균 팀끼리 `games`경기
pub fn calibrate(games: u64, seed: u64, config: EngineConfig) -> Result<BatchReport> {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);
    BatchRunner::new(config).with_logs().run(&home, &away, games, seed).context("Calibration batch failed")
}

#[derive(Debug, Clone, Serialize)]
pub struct BattedBallSummary {
    pub samples: u64,
    pub ground_ball_pct: f64,
    pub line_drive_pct: f64,
    pub fly_ball_pct: f64,
    pub popup_pct: f64,
}

pub fn batted_balls(samples: u64, seed: u64, config: &EngineConfig) -> BattedBallSummary {
    let mut rng = GameRng::seed_from_u64(seed);
    let profile = batted_ball_profile_with(
        &config.batted_ball,
        &BatterAbilities::default(),
        BatSide::Right,
        &PitcherAbilities::default(),
        samples,
        &mut rng,
    );
    let [gb, ld, fb, pu] = profile.percentages();
    BattedBallSummary { samples, ground_ball_pct: gb, line_drive_pct: ld, fly_ball_pct: fb, popup_pct: pu }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn team_file(team: &Team) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(serde_json::to_string(team)?.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_simulate_from_files() -> Result<()> {
        let home = team_file(&average_team("Home", 100))?;
        let away = team_file(&average_team("Away", 200))?;

        let home = load_team(home.path())?;
        let away = load_team(away.path())?;
        let result = simulate(&home, &away, 5, true, &EngineConfig::default())?;

        assert!(result.innings.len() >= 9);
        assert_eq!(result.at_bat_logs.as_ref().map(Vec::len), Some(result.total_plate_appearances as usize));
        Ok(())
    }

    #[test]
    fn test_invalid_team_file_reports_path() -> Result<()> {
        let mut team = average_team("Broken", 100);
        team.lineup.truncate(3);
        let file = team_file(&team)?;
        let err = load_team(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid team"));
        Ok(())
    }

    #[test]
    fn test_load_yaml_and_json_config() -> Result<()> {
        let mut yaml = Builder::new().suffix(".yaml").tempfile()?;
        yaml.write_all(b"rules:\n  innings: 7\n")?;
        assert_eq!(load_config(Some(yaml.path()), None)?.rules.innings, 7);

        let mut json = Builder::new().suffix(".json").tempfile()?;
        json.write_all(br#"{"rules": {"innings": 5}}"#)?;
        assert_eq!(load_config(Some(json.path()), Some("dead_ball"))?.rules.innings, 5);

        assert_eq!(load_config(None, Some("live"))?, EngineConfig::live_ball());
        assert!(load_config(None, Some("moon_ball")).is_err());
        Ok(())
    }

    #[test]
    fn test_batted_ball_summary_sums_to_100() {
        let s = batted_balls(1000, 1, &EngineConfig::default());
        let total = s.ground_ball_pct + s.line_drive_pct + s.fly_ball_pct + s.popup_pct;
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_calibration_batch() -> Result<()> {
        let report = calibrate(10, 3, EngineConfig::default())?;
        assert_eq!(report.snapshot.games, 10);
        assert!(report.invariant_violations.is_empty());
        Ok(())
    }
}
