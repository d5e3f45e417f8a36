//! Statistical calibration and diagnostics
//!
//! This module provides:
//! - StatSnapshot (league-level rates over many games)
//! - FielderDistribution (who fields the ball, from at-bat logs)
//! - AnchorTable (target ranges, soft warnings)
//! - check_invariants (hard per-game accounting rules)
//! - BatchRunner (rayon-parallel batches with stable per-game seeds)

pub mod anchor_table;
pub mod batch_runner;
pub mod invariants;
pub mod stat_snapshot;

pub use anchor_table::{AnchorStat, AnchorTable, CalibrationWarning, TargetRange};
pub use batch_runner::{game_seed, BatchReport, BatchRunner};
pub use invariants::{check_invariants, InvariantViolation};
pub use stat_snapshot::{FielderDistribution, StatSnapshot};

use rand::Rng;

use crate::engine::batted_ball::{generate_batted_ball_with, BattedBallProfile};
use crate::engine::config::BattedBallConfig;
use crate::models::player::{BatSide, BatterAbilities, PitcherAbilities};

/// 타자/투수 한 쌍으로 타구를 `samples`개 만들어 분류 분포를 돌려준다.
pub fn batted_ball_profile<R: Rng + ?Sized>(
    batter: &BatterAbilities,
    pitcher: &PitcherAbilities,
    samples: u64,
    rng: &mut R,
) -> BattedBallProfile {
    batted_ball_profile_with(&BattedBallConfig::default(), batter, BatSide::Right, pitcher, samples, rng)
}

pub fn batted_ball_profile_with<R: Rng + ?Sized>(
    cfg: &BattedBallConfig,
    batter: &BatterAbilities,
    bats: BatSide,
    pitcher: &PitcherAbilities,
    samples: u64,
    rng: &mut R,
) -> BattedBallProfile {
    let mut profile = BattedBallProfile::default();
    for _ in 0..samples {
        profile.record(generate_batted_ball_with(cfg, batter, bats, pitcher, rng).class);
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameRng;
    use rand::SeedableRng;

    #[test]
    fn test_profile_counts_every_sample() {
        let mut rng = GameRng::seed_from_u64(11);
        let profile =
            batted_ball_profile(&BatterAbilities::default(), &PitcherAbilities::default(), 2000, &mut rng);
        assert_eq!(profile.total(), 2000);
        let pct: f64 = profile.percentages().iter().sum();
        assert!((pct - 100.0).abs() < 1e-9);
        // 평균 타자는 네 종류를 모두 만든다
        assert!(profile.ground_balls > 0 && profile.line_drives > 0 && profile.fly_balls > 0 && profile.popups > 0);
    }

    #[test]
    fn test_higher_trajectory_lifts_the_ball() {
        let low = BatterAbilities { trajectory: 1, ..BatterAbilities::default() };
        let high = BatterAbilities { trajectory: 4, ..BatterAbilities::default() };
        let pitcher = PitcherAbilities::default();
        let low_p = batted_ball_profile(&low, &pitcher, 4000, &mut GameRng::seed_from_u64(1));
        let high_p = batted_ball_profile(&high, &pitcher, 4000, &mut GameRng::seed_from_u64(1));
        assert!(high_p.ground_balls < low_p.ground_balls);
    }
}
