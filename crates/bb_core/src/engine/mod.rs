//! Simulation engine
//!
//! 타석 하나의 파이프라인과 그것을 돌리는 경기 루프.
//!
//! ```text
//! plate_appearance ── 투구 단위 (볼/스트라이크/파울/인플레이)
//!   └─ outcome ─────── 타구 1개 → 결과 1개
//!        ├─ batted_ball  발사각/타구속도/방향
//!        ├─ flight       비거리/체공시간/낙구 지점/펜스
//!        └─ fielding     야수별 도달 시간 → 처리 야수
//! game_sim ─────────── 이닝/교체/주루/승패 기록
//! box_score ────────── GameEvent fold
//! ```

pub mod batted_ball;
pub mod box_score;
pub mod bullpen; // 시즌 단위 연투 원장
pub mod config;
pub mod fielding;
pub mod flight;
pub mod game_sim;
pub mod outcome;
pub mod physics_constants;
pub mod plate_appearance;
pub mod probability;

use rand_chacha::ChaCha8Rng;

/// 엔진 표준 RNG. 같은 시드 → 같은 경기.
pub type GameRng = ChaCha8Rng;

pub use batted_ball::{BattedBall, BattedBallClass, BattedBallProfile};
pub use box_score::{BoxScore, PitchingDecisions};
pub use bullpen::{ArmUsage, BullpenLedger};
pub use config::EngineConfig;
pub use fielding::{FieldingResult, FielderMap, FielderProfile};
pub use flight::{FieldPoint, Landing};
pub use game_sim::{simulate_game, simulate_game_with, GameOptions, GameOutcome};
pub use outcome::{BallInPlayResolution, BaseOutContext, OutcomeRule};
pub use plate_appearance::{resolve_plate_appearance, Count, Matchup, PlateAppearanceOutcome};
