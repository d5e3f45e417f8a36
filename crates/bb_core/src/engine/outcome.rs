//! Outcome Classifier
//!
//! 인플레이 타구 하나를 정확히 하나의 타석 결과로 분류한다.
//! 판정은 `OUTCOME_RULES` 순서대로 평가하고 처음 매칭된 규칙이 결과를 결정한다.
//!
//! | 순서 | 규칙 | 조건 |
//! |------|------|------|
//! | 1 | HomeRun | 뜬공, (비거리 × 캐리) / 펜스 ≥ 1.05 (0.95~1.05는 확률) |
//! | 2 | Uncatchable | 도달 가능한 야수 없음 또는 펜스 이상 → 안타 종류 결정 |
//! | 3 | FieldingError | 처리 야수의 포구 실책 |
//! | 4 | InfieldHit | 땅볼 송구 vs 타자 주력 경주 |
//! | 5 | DoublePlay | 땅볼, 1루 주자, 2아웃 미만 (실패 시 야수선택 가능) |
//! | 6 | SacrificeFly | 뜬공/라인드라이브, 3루 주자, 2아웃 미만, 60 m 이상 |
//! | 7 | RoutineOut | 타구 종류별 아웃 |

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::batted_ball::{generate_batted_ball_with, BattedBall, BattedBallClass};
use super::config::EngineConfig;
use super::fielding::{evaluate_fielders_with, FieldingResult, FielderMap};
use super::flight::{calc_ball_landing_with, fence_distance_with, ground_ball_landing_with, Landing};
use super::physics_constants::field::CENTER_DIRECTION_DEG;
use super::probability::{clamp_range, rating_delta, roll, sample_normal};
use crate::models::events::PlateAppearanceResult;
use crate::models::player::{BatSide, BatterAbilities, PitcherAbilities};

/// 타석 시작 시점의 아웃/주자 상황
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseOutContext {
    pub outs: u8,
    /// 1루, 2루, 3루
    pub runners: [bool; 3],
}

impl BaseOutContext {
    pub fn new(outs: u8, runners: [bool; 3]) -> Self {
        Self { outs, runners }
    }

    #[inline]
    pub fn runner_on_first(&self) -> bool {
        self.runners[0]
    }

    #[inline]
    pub fn runner_on_third(&self) -> bool {
        self.runners[2]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeRule {
    HomeRun,
    Uncatchable,
    FieldingError,
    InfieldHit,
    DoublePlay,
    SacrificeFly,
    RoutineOut,
}

/// 판정 순서. 순서 자체가 동률 해소 규칙이다.
pub const OUTCOME_RULES: [OutcomeRule; 7] = [
    OutcomeRule::HomeRun,
    OutcomeRule::Uncatchable,
    OutcomeRule::FieldingError,
    OutcomeRule::InfieldHit,
    OutcomeRule::DoublePlay,
    OutcomeRule::SacrificeFly,
    OutcomeRule::RoutineOut,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallInPlayResolution {
    pub outcome: PlateAppearanceResult,
    pub rule: OutcomeRule,
    pub batted_ball: BattedBall,
    pub landing: Landing,
    pub fielding: FieldingResult,
    /// 처리(아웃/실책) 또는 회수(안타)한 야수의 수비 번호
    pub fielder_position: Option<u8>,
    /// (비거리 × 캐리) / 펜스. 땅볼은 0.
    pub hr_ratio: f64,
}

impl BallInPlayResolution {
    pub fn bounce_penalty(&self) -> f64 {
        self.fielder_position
            .and_then(|id| self.fielding.evaluations.iter().find(|e| e.position_id == id))
            .map(|e| e.bounce_penalty)
            .unwrap_or(0.0)
    }
}

struct RuleInput<'a> {
    cfg: &'a EngineConfig,
    ball: &'a BattedBall,
    landing: &'a Landing,
    fielding: &'a FieldingResult,
    batter: &'a BatterAbilities,
    fielders: &'a FielderMap,
    ctx: BaseOutContext,
    fence: f64,
    hr_ratio: f64,
}

impl RuleInput<'_> {
    /// 모든 규칙이 쓰는 땅볼 판정
    fn is_ground_ball(&self) -> bool {
        self.landing.is_ground_ball
    }

    fn beyond_fence(&self) -> bool {
        !self.is_ground_ball() && self.landing.distance >= self.fence
    }
}

impl OutcomeRule {
    fn apply<R: Rng + ?Sized>(self, input: &RuleInput<'_>, rng: &mut R) -> Option<PlateAppearanceResult> {
        let out = &input.cfg.outcome;
        match self {
            OutcomeRule::HomeRun => {
                if input.ball.class != BattedBallClass::FlyBall {
                    return None;
                }
                let chance = home_run_chance(input.cfg, input.hr_ratio, input.batter.power);
                if chance >= 1.0 || (chance > 0.0 && roll(rng, chance)) {
                    Some(PlateAppearanceResult::Homerun)
                } else {
                    None
                }
            }
            OutcomeRule::Uncatchable => {
                if !input.fielding.is_uncatchable() && !input.beyond_fence() {
                    return None;
                }
                let hit = hit_type(input, rng);
                if input.beyond_fence() && hit == PlateAppearanceResult::Single {
                    Some(PlateAppearanceResult::Double)
                } else {
                    Some(hit)
                }
            }
            OutcomeRule::FieldingError => {
                let primary = input.fielding.primary()?;
                let catching = input.fielders.get(primary.position_id)?.catching;
                let fielding_cfg = &input.cfg.fielding;
                let base = if input.is_ground_ball() {
                    fielding_cfg.ground_error_rate
                } else {
                    fielding_cfg.air_error_rate
                };
                let p = base
                    * (fielding_cfg.error_catching_base
                        - fielding_cfg.error_per_catching * f64::from(catching));
                roll(rng, p).then_some(PlateAppearanceResult::Error)
            }
            OutcomeRule::InfieldHit => {
                if !input.is_ground_ball() {
                    return None;
                }
                let primary = input.fielding.primary()?;
                let arm = input.fielders.get(primary.position_id)?.arm;
                let f = &input.cfg.fielding;
                let fielder_time = primary.possession_time()
                    + f.transfer_time
                    + primary.intercept.distance_to(&f.first_base) / f.throw_speed(arm);
                let runner_time = f.runner_start_delay + f.base_path / f.runner_speed(input.batter.speed);
                let noise = sample_normal(rng, 0.0, f.race_noise_sigma, -1.0, 1.0);
                (runner_time + noise < fielder_time).then_some(PlateAppearanceResult::InfieldHit)
            }
            OutcomeRule::DoublePlay => {
                if !input.is_ground_ball()
                    || !input.ctx.runner_on_first()
                    || input.ctx.outs >= 2
                {
                    return None;
                }
                let primary = input.fielding.primary()?;
                let fielding = input.fielders.get(primary.position_id)?.fielding;
                let p = clamp_range(
                    out.double_play_base + out.double_play_fielding_coef * rating_delta(fielding)
                        - out.double_play_speed_coef * rating_delta(input.batter.speed),
                    out.double_play_min,
                    out.double_play_max,
                );
                if roll(rng, p) {
                    Some(PlateAppearanceResult::DoublePlay)
                } else if roll(rng, out.fielders_choice_chance) {
                    Some(PlateAppearanceResult::FieldersChoice)
                } else {
                    None
                }
            }
            OutcomeRule::SacrificeFly => {
                let eligible = matches!(input.ball.class, BattedBallClass::FlyBall | BattedBallClass::LineDrive)
                    && input.ctx.runner_on_third()
                    && input.ctx.outs < 2
                    && input.landing.distance >= out.sacrifice_fly_min_distance;
                eligible.then_some(PlateAppearanceResult::SacrificeFly)
            }
            OutcomeRule::RoutineOut => Some(match input.ball.class {
                _ if input.is_ground_ball() => PlateAppearanceResult::Groundout,
                BattedBallClass::GroundBall | BattedBallClass::LineDrive => PlateAppearanceResult::Lineout,
                BattedBallClass::FlyBall => PlateAppearanceResult::Flyout,
                BattedBallClass::Popup => PlateAppearanceResult::Popout,
            }),
        }
    }
}

/// 홈런 비율 = (비거리 × 탄도 캐리) / 펜스 거리. 땅볼은 0.
pub fn home_run_ratio(cfg: &EngineConfig, landing: &Landing, trajectory: u8) -> f64 {
    if landing.is_ground_ball {
        return 0.0;
    }
    let fence = fence_distance_with(&cfg.flight, landing.direction);
    landing.distance * cfg.outcome.carry_factor(trajectory) / fence
}

/// 비율 ≥ 1.05 → 1.0, [0.95, 1.05) → clamp(0.01, 0.90, (r−0.95)/0.10 + (power−50)·0.002), 그 외 0
pub fn home_run_chance(cfg: &EngineConfig, ratio: f64, power: u8) -> f64 {
    let out = &cfg.outcome;
    if ratio >= out.home_run_certain_ratio {
        return 1.0;
    }
    if ratio < out.home_run_band_floor {
        return 0.0;
    }
    let width = out.home_run_certain_ratio - out.home_run_band_floor;
    clamp_range(
        (ratio - out.home_run_band_floor) / width + rating_delta(power) * out.home_run_power_coef,
        out.home_run_chance_min,
        out.home_run_chance_max,
    )
}

fn hit_type<R: Rng + ?Sized>(input: &RuleInput<'_>, rng: &mut R) -> PlateAppearanceResult {
    let out = &input.cfg.outcome;
    let landing = input.landing;

    if input.is_ground_ball() {
        let down_the_line = landing.direction < out.line_angle || landing.direction > 90.0 - out.line_angle;
        if down_the_line
            && landing.distance >= out.line_double_min_distance
            && roll(rng, out.line_double_chance)
        {
            return PlateAppearanceResult::Double;
        }
        return PlateAppearanceResult::Single;
    }

    let r = landing.distance / input.fence;
    let speed = rating_delta(input.batter.speed);

    if r >= out.extra_base_ratio {
        let offset = (landing.direction - CENTER_DIRECTION_DEG).abs();
        let in_gap = (out.gap_min_offset..=out.gap_max_offset).contains(&offset) || r >= out.off_wall_ratio;
        let p3 = if in_gap {
            clamp_range(
                out.triple_base + speed * out.triple_speed_coef + (r - out.triple_ratio_pivot) * out.triple_ratio_coef,
                out.triple_chance_min,
                out.triple_chance_max,
            )
        } else {
            0.0
        };
        return if roll(rng, p3) {
            PlateAppearanceResult::Triple
        } else {
            PlateAppearanceResult::Double
        };
    }

    if r >= out.double_ratio {
        let ramp = (r - out.double_ratio) / (out.extra_base_ratio - out.double_ratio);
        let p2 = clamp_range(ramp * out.double_chance + speed * out.double_speed_coef, 0.0, 0.95);
        return if roll(rng, p2) {
            PlateAppearanceResult::Double
        } else {
            PlateAppearanceResult::Single
        };
    }

    PlateAppearanceResult::Single
}

/// 이미 생성된 타구/낙구/수비 판정으로 결과 분류
pub fn classify_outcome<R: Rng + ?Sized>(
    cfg: &EngineConfig,
    ball: BattedBall,
    landing: Landing,
    fielding: FieldingResult,
    batter: &BatterAbilities,
    fielders: &FielderMap,
    ctx: BaseOutContext,
    rng: &mut R,
) -> BallInPlayResolution {
    let fence = fence_distance_with(&cfg.flight, landing.direction);
    let hr_ratio = home_run_ratio(cfg, &landing, batter.trajectory);

    let input = RuleInput {
        cfg,
        ball: &ball,
        landing: &landing,
        fielding: &fielding,
        batter,
        fielders,
        ctx,
        fence,
        hr_ratio,
    };

    let mut decided = (PlateAppearanceResult::Groundout, OutcomeRule::RoutineOut);
    for rule in OUTCOME_RULES {
        if let Some(outcome) = rule.apply(&input, rng) {
            decided = (outcome, rule);
            break;
        }
    }
    let (outcome, rule) = decided;

    let fielder_position = match rule {
        OutcomeRule::HomeRun => None,
        OutcomeRule::Uncatchable => fielding.fastest_retriever().map(|e| e.position_id),
        _ => fielding.primary().map(|e| e.position_id),
    };

    BallInPlayResolution { outcome, rule, batted_ball: ball, landing, fielding, fielder_position, hr_ratio }
}

/// 타구의 낙구. 땅볼로 분류된 공은 발사각과 무관하게 구르는 타구로 계산한다.
pub fn batted_ball_landing(cfg: &EngineConfig, ball: &BattedBall) -> Landing {
    if ball.class == BattedBallClass::GroundBall {
        ground_ball_landing_with(&cfg.flight, ball.direction, ball.launch_angle, ball.exit_velocity)
    } else {
        calc_ball_landing_with(&cfg.flight, ball.direction, ball.launch_angle, ball.exit_velocity)
    }
}

/// 타구 생성 → 낙구 → 수비 판정 → 결과 분류 전체 파이프라인
pub fn resolve_ball_in_play<R: Rng + ?Sized>(
    cfg: &EngineConfig,
    batter: &BatterAbilities,
    bats: BatSide,
    pitcher: &PitcherAbilities,
    fielders: &FielderMap,
    ctx: BaseOutContext,
    rng: &mut R,
) -> BallInPlayResolution {
    let ball = generate_batted_ball_with(&cfg.batted_ball, batter, bats, pitcher, rng);
    let landing = batted_ball_landing(cfg, &ball);
    let fielding = evaluate_fielders_with(&cfg.fielding, &landing, ball.class, fielders);
    classify_outcome(cfg, ball, landing, fielding, batter, fielders, ctx, rng)
}
