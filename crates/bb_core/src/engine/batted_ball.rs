//! Batted Ball Generator
//!
//! 타자/투수 매치업 → 타구 물리 파라미터 (방향, 발사각, 타구속도) + 분류.
//!
//! - 방향: 타석(좌/우/스위치)별 평균 + 파워에 따른 당겨치기, σ=18°, [0, 90]
//! - 발사각: 파워↑ 탄도↑ 높아지고 컨택↑ 낮아짐, 싱커/슈트는 최대 5° 낮춤
//! - 타구속도: 파워/컨택 + 투수 변화구 위력 페널티
//! - 분류: (발사각, 타구속도)의 순수 함수

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::BattedBallConfig;
use super::probability::{rating_delta, sample_normal};
use crate::models::player::{BatSide, BatterAbilities, Pitch, PitcherAbilities, PITCH_LEVEL_MAX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattedBallClass {
    GroundBall,
    LineDrive,
    FlyBall,
    Popup,
}

impl BattedBallClass {
    pub const ALL: [BattedBallClass; 4] = [
        BattedBallClass::GroundBall,
        BattedBallClass::LineDrive,
        BattedBallClass::FlyBall,
        BattedBallClass::Popup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BattedBallClass::GroundBall => "ground_ball",
            BattedBallClass::LineDrive => "line_drive",
            BattedBallClass::FlyBall => "fly_ball",
            BattedBallClass::Popup => "popup",
        }
    }
}

impl fmt::Display for BattedBallClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattedBall {
    /// 0° = 좌측 파울라인, 90° = 우측 파울라인
    pub direction: f64,
    /// 도, [-15, 70]
    pub launch_angle: f64,
    /// km/h, [80, 170]
    pub exit_velocity: f64,
    pub class: BattedBallClass,
}

/// 변화구 위력 = min(100, Σ level² / 245 × 130). 변화구가 없으면 30.
pub fn calc_breaking_power(pitches: &[Pitch]) -> f64 {
    calc_breaking_power_with(&BattedBallConfig::default(), pitches)
}

pub fn calc_breaking_power_with(cfg: &BattedBallConfig, pitches: &[Pitch]) -> f64 {
    if pitches.is_empty() {
        return cfg.breaking_default;
    }
    let sum_sq: f64 = pitches
        .iter()
        .map(|p| {
            let level = f64::from(p.level.min(PITCH_LEVEL_MAX));
            level * level
        })
        .sum();
    (sum_sq / cfg.breaking_divisor * cfg.breaking_scale).min(cfg.breaking_cap)
}

/// 싱커/슈트 최고 레벨 / 7 × 최대 보너스 (발사각 감소량)
pub fn sinker_bonus(cfg: &BattedBallConfig, pitches: &[Pitch]) -> f64 {
    let best = pitches
        .iter()
        .filter(|p| p.pitch_type.lowers_launch_angle())
        .map(|p| p.level.min(PITCH_LEVEL_MAX))
        .max()
        .unwrap_or(0);
    f64::from(best) / f64::from(PITCH_LEVEL_MAX) * cfg.sinker_bonus_max
}

/// 타구 분류 (기본 임계값)
///
/// - 38° 이상이면서 55° 이상이거나 135km/h 미만 → 팝업
/// - 10° 미만 → 땅볼
/// - 10~20° → 라인드라이브 (15° 미만 & 100km/h 미만은 땅볼)
/// - 그 외 → 뜬공
pub fn classify_batted_ball_type(angle: f64, velocity: f64) -> BattedBallClass {
    classify_with(&BattedBallConfig::default(), angle, velocity)
}

pub fn classify_with(cfg: &BattedBallConfig, angle: f64, velocity: f64) -> BattedBallClass {
    if angle >= cfg.popup_angle && (angle >= cfg.popup_always_angle || velocity < cfg.popup_velocity_max) {
        return BattedBallClass::Popup;
    }
    if angle < cfg.ground_ball_max_angle {
        return BattedBallClass::GroundBall;
    }
    if angle < cfg.line_drive_max_angle {
        if angle < cfg.weak_liner_angle && velocity < cfg.weak_liner_velocity {
            return BattedBallClass::GroundBall;
        }
        return BattedBallClass::LineDrive;
    }
    BattedBallClass::FlyBall
}

/// 기본 설정으로 타구 생성
pub fn generate_batted_ball<R: Rng + ?Sized>(
    batter: &BatterAbilities,
    bats: BatSide,
    pitcher: &PitcherAbilities,
    rng: &mut R,
) -> BattedBall {
    generate_batted_ball_with(&BattedBallConfig::default(), batter, bats, pitcher, rng)
}

pub fn generate_batted_ball_with<R: Rng + ?Sized>(
    cfg: &BattedBallConfig,
    batter: &BatterAbilities,
    bats: BatSide,
    pitcher: &PitcherAbilities,
    rng: &mut R,
) -> BattedBall {
    let power = rating_delta(batter.power);
    let contact = rating_delta(batter.contact);

    // 방향: 우타자는 좌측(0°)으로, 좌타자는 우측(90°)으로 당긴다.
    // 스위치 타자는 양쪽 타석을 쓰므로 당겨치기가 상쇄되어 파워와 무관하게 중앙.
    let pull_shift = power * cfg.pull_shift_per_power;
    let direction_mean = match bats {
        BatSide::Switch => cfg.direction_mean_switch,
        BatSide::Right => cfg.direction_mean_right - pull_shift,
        BatSide::Left => cfg.direction_mean_left + pull_shift,
    };
    let direction = sample_normal(rng, direction_mean, cfg.direction_sigma, 0.0, 90.0);

    let trajectory = f64::from(batter.trajectory.clamp(1, 4)) - 2.0;
    let angle_mean = cfg.launch_angle_base + power * cfg.launch_power_coef
        - contact * cfg.launch_contact_coef
        + trajectory * cfg.launch_trajectory_coef
        - sinker_bonus(cfg, &pitcher.pitches);
    let launch_angle = sample_normal(
        rng,
        angle_mean,
        cfg.launch_angle_sigma,
        cfg.launch_angle_min,
        cfg.launch_angle_max,
    );

    let breaking_penalty =
        (calc_breaking_power_with(cfg, &pitcher.pitches) - 50.0) * cfg.breaking_penalty_coef;
    let velocity_mean = cfg.exit_velocity_base
        + power * cfg.exit_velocity_power_coef
        + contact * cfg.exit_velocity_contact_coef
        - breaking_penalty;
    let exit_velocity = sample_normal(
        rng,
        velocity_mean,
        cfg.exit_velocity_sigma,
        cfg.exit_velocity_min,
        cfg.exit_velocity_max,
    );

    BattedBall {
        direction,
        launch_angle,
        exit_velocity,
        class: classify_with(cfg, launch_angle, exit_velocity),
    }
}

/// 타구 분류 누적기 (진단/보정용)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattedBallProfile {
    pub ground_balls: u64,
    pub line_drives: u64,
    pub fly_balls: u64,
    pub popups: u64,
}

impl BattedBallProfile {
    pub fn record(&mut self, class: BattedBallClass) {
        match class {
            BattedBallClass::GroundBall => self.ground_balls += 1,
            BattedBallClass::LineDrive => self.line_drives += 1,
            BattedBallClass::FlyBall => self.fly_balls += 1,
            BattedBallClass::Popup => self.popups += 1,
        }
    }

    pub fn merge(&mut self, other: &BattedBallProfile) {
        self.ground_balls += other.ground_balls;
        self.line_drives += other.line_drives;
        self.fly_balls += other.fly_balls;
        self.popups += other.popups;
    }

    pub fn total(&self) -> u64 {
        self.ground_balls + self.line_drives + self.fly_balls + self.popups
    }

    pub fn count(&self, class: BattedBallClass) -> u64 {
        match class {
            BattedBallClass::GroundBall => self.ground_balls,
            BattedBallClass::LineDrive => self.line_drives,
            BattedBallClass::FlyBall => self.fly_balls,
            BattedBallClass::Popup => self.popups,
        }
    }

    /// [gb, ld, fb, pu] 퍼센트. 표본이 없으면 모두 0.
    pub fn percentages(&self) -> [f64; 4] {
        let total = self.total();
        if total == 0 {
            return [0.0; 4];
        }
        BattedBallClass::ALL.map(|c| self.count(c) as f64 * 100.0 / total as f64)
    }
}
