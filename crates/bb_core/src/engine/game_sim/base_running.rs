//! Base running: 타석 결과 → 주자 진루, 득점, 아웃
//!
//! 순수 함수. 현재 베이스 상태와 결과를 받아 새 베이스 상태를 돌려준다.
//! 이닝을 끝내는 아웃이 나온 플레이의 득점은 인정하지 않는다.

use rand::Rng;

use super::state::{BaseRunner, Bases};
use crate::engine::config::BaseRunningConfig;
use crate::engine::probability::{clamp_probability, rating_delta, roll};
use crate::models::events::PlateAppearanceResult;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayResolution {
    pub bases: Bases,
    /// 홈을 밟은 주자 (순서대로)
    pub runs: Vec<BaseRunner>,
    pub outs_recorded: u8,
    pub rbi: u8,
}

/// 진루 판단에 필요한 타구 정보
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayContext {
    pub outs_before: u8,
    /// 뜬공 비거리 (m). 인플레이가 아니면 0.
    pub distance: f64,
}

fn advance_chance(cfg: &BaseRunningConfig, base: f64, runner: &BaseRunner, outs_before: u8) -> f64 {
    let two_out = if outs_before == 2 { cfg.two_out_bonus } else { 0.0 };
    clamp_probability(base + cfg.speed_coef * rating_delta(runner.speed) + two_out)
}

/// 앞에서부터 강제 진루. 타자가 1루를 차지할 때 밀려나는 주자만 한 베이스씩.
fn force_advance(bases: &mut Bases, runs: &mut Vec<BaseRunner>) {
    if bases[0].is_none() {
        return;
    }
    if bases[1].is_some() {
        if let Some(r3) = bases[2].take() {
            runs.push(r3);
        }
        bases[2] = bases[1].take();
    }
    bases[1] = bases[0].take();
}

/// 포스 상태인 가장 앞선 주자의 베이스 인덱스
fn lead_forced_runner(bases: &Bases) -> Option<usize> {
    let mut lead = None;
    for (i, base) in bases.iter().enumerate() {
        if base.is_some() {
            lead = Some(i);
        } else {
            break;
        }
    }
    lead
}

pub fn resolve_play<R: Rng + ?Sized>(
    cfg: &BaseRunningConfig,
    bases: &Bases,
    result: PlateAppearanceResult,
    batter: BaseRunner,
    ctx: PlayContext,
    rng: &mut R,
) -> PlayResolution {
    use PlateAppearanceResult as P;

    let mut next = *bases;
    let mut runs = Vec::new();
    let mut outs: u8 = 0;

    match result {
        P::Walk | P::HitByPitch | P::InfieldHit => {
            force_advance(&mut next, &mut runs);
            next[0] = Some(batter);
        }
        P::Single => {
            runs.extend(next[2].take());
            if let Some(r2) = next[1].take() {
                if roll(rng, advance_chance(cfg, cfg.score_from_second_on_single, &r2, ctx.outs_before)) {
                    runs.push(r2);
                } else {
                    next[2] = Some(r2);
                }
            }
            if let Some(r1) = next[0].take() {
                let to_third = next[2].is_none()
                    && roll(rng, advance_chance(cfg, cfg.first_to_third_on_single, &r1, ctx.outs_before));
                if to_third {
                    next[2] = Some(r1);
                } else {
                    next[1] = Some(r1);
                }
            }
            next[0] = Some(batter);
        }
        P::Double => {
            runs.extend(next[2].take());
            runs.extend(next[1].take());
            if let Some(r1) = next[0].take() {
                if roll(rng, advance_chance(cfg, cfg.score_from_first_on_double, &r1, ctx.outs_before)) {
                    runs.push(r1);
                } else {
                    next[2] = Some(r1);
                }
            }
            next[1] = Some(batter);
        }
        P::Triple => {
            for base in next.iter_mut().rev() {
                runs.extend(base.take());
            }
            next[2] = Some(batter);
        }
        P::Homerun => {
            for base in next.iter_mut().rev() {
                runs.extend(base.take());
            }
            runs.push(batter);
        }
        P::Error => {
            runs.extend(next[2].take());
            next[2] = next[1].take();
            next[1] = next[0].take();
            next[0] = Some(BaseRunner { reached_on_error: true, ..batter });
        }
        P::Strikeout | P::Popout => outs = 1,
        P::Flyout | P::Lineout => {
            outs = 1;
            if ctx.outs_before < 2 && ctx.distance >= cfg.tag_up_to_third_distance && next[2].is_none() {
                next[2] = next[1].take();
            }
        }
        P::SacrificeFly => {
            outs = 1;
            runs.extend(next[2].take());
            if ctx.distance >= cfg.tag_up_to_third_distance {
                next[2] = next[1].take();
            }
        }
        P::Groundout => {
            outs = 1;
            if ctx.outs_before < 2 {
                let forced_home = next.iter().all(|b| b.is_some());
                if let Some(r3) = next[2].take() {
                    if forced_home || roll(rng, cfg.score_from_third_on_groundout) {
                        runs.push(r3);
                    } else {
                        next[2] = Some(r3);
                    }
                }
                if next[2].is_none() {
                    next[2] = next[1].take();
                }
                if next[1].is_none() {
                    next[1] = next[0].take();
                }
            }
        }
        P::DoublePlay | P::FieldersChoice => {
            let batter_out = result == P::DoublePlay;
            outs = if batter_out { 2 } else { 1 };
            if let Some(lead) = lead_forced_runner(&next) {
                next[lead] = None;
                // 선행 주자 뒤의 포스 주자는 한 베이스씩
                for i in (0..lead).rev() {
                    next[i + 1] = next[i].take();
                }
            }
            if !batter_out {
                next[0] = Some(batter);
            }
        }
    }

    let outs_recorded = outs.min(3 - ctx.outs_before.min(3));
    if ctx.outs_before + outs_recorded >= 3 {
        runs.clear();
    }

    let rbi = match result {
        P::Error | P::DoublePlay => 0,
        _ => runs.len() as u8,
    };

    PlayResolution { bases: next, runs, outs_recorded, rbi }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::player::PlayerId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn runner(id: u32) -> BaseRunner {
        BaseRunner { runner_id: PlayerId(id), responsible_pitcher_id: PlayerId(99), speed: 50, reached_on_error: false }
    }

    fn play(bases: Bases, result: PlateAppearanceResult, outs: u8, distance: f64, seed: u64) -> PlayResolution {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        resolve_play(
            &BaseRunningConfig::default(),
            &bases,
            result,
            runner(9),
            PlayContext { outs_before: outs, distance },
            &mut rng,
        )
    }

    fn ids(bases: &Bases) -> [Option<u32>; 3] {
        [bases[0].map(|r| r.runner_id.0), bases[1].map(|r| r.runner_id.0), bases[2].map(|r| r.runner_id.0)]
    }

    #[test]
    fn test_walk_forces_only_trailing_runners() {
        let res = play([Some(runner(1)), None, Some(runner(3))], PlateAppearanceResult::Walk, 0, 0.0, 1);
        assert_eq!(ids(&res.bases), [Some(9), Some(1), Some(3)]);
        assert!(res.runs.is_empty());

        let loaded = [Some(runner(1)), Some(runner(2)), Some(runner(3))];
        let res = play(loaded, PlateAppearanceResult::Walk, 1, 0.0, 1);
        assert_eq!(res.runs.len(), 1);
        assert_eq!(res.runs[0].runner_id, PlayerId(3));
        assert_eq!(res.rbi, 1);
    }

    #[test]
    fn test_home_run_clears_bases() {
        let res = play([Some(runner(1)), Some(runner(2)), Some(runner(3))], PlateAppearanceResult::Homerun, 2, 120.0, 1);
        assert_eq!(res.runs.len(), 4);
        assert_eq!(res.rbi, 4);
        assert_eq!(ids(&res.bases), [None, None, None]);
        assert_eq!(res.outs_recorded, 0);
    }

    #[test]
    fn test_double_play_removes_batter_and_lead_runner() {
        let res = play([Some(runner(1)), None, None], PlateAppearanceResult::DoublePlay, 0, 0.0, 1);
        assert_eq!(res.outs_recorded, 2);
        assert_eq!(ids(&res.bases), [None, None, None]);

        let res = play([Some(runner(1)), Some(runner(2)), None], PlateAppearanceResult::DoublePlay, 0, 0.0, 1);
        assert_eq!(ids(&res.bases), [None, Some(1), None]);

        // 3루 주자는 포스가 아니므로 그대로
        let res = play([Some(runner(1)), None, Some(runner(3))], PlateAppearanceResult::DoublePlay, 0, 0.0, 1);
        assert_eq!(ids(&res.bases), [None, None, Some(3)]);
        assert_eq!(res.rbi, 0);
    }

    #[test]
    fn test_fielders_choice_keeps_batter() {
        let res = play([Some(runner(1)), Some(runner(2)), None], PlateAppearanceResult::FieldersChoice, 1, 0.0, 1);
        assert_eq!(res.outs_recorded, 1);
        assert_eq!(ids(&res.bases), [Some(9), Some(1), None]);
    }

    #[test]
    fn test_third_out_cancels_runs() {
        let res = play([Some(runner(1)), Some(runner(2)), Some(runner(3))], PlateAppearanceResult::Groundout, 2, 0.0, 1);
        assert_eq!(res.outs_recorded, 1);
        assert!(res.runs.is_empty());
        assert_eq!(res.rbi, 0);

        let res = play([Some(runner(1)), None, Some(runner(3))], PlateAppearanceResult::DoublePlay, 1, 0.0, 1);
        assert_eq!(res.outs_recorded, 2);
        assert!(res.runs.is_empty());
    }

    #[test]
    fn test_sacrifice_fly_scores_runner_from_third() {
        let res = play([None, Some(runner(2)), Some(runner(3))], PlateAppearanceResult::SacrificeFly, 1, 90.0, 1);
        assert_eq!(res.runs.len(), 1);
        assert_eq!(res.rbi, 1);
        assert_eq!(ids(&res.bases), [None, None, Some(2)]);

        let res = play([None, Some(runner(2)), Some(runner(3))], PlateAppearanceResult::SacrificeFly, 0, 70.0, 1);
        assert_eq!(ids(&res.bases), [None, Some(2), None]);
    }

    #[test]
    fn test_error_advances_everyone_and_marks_batter() {
        let res = play([Some(runner(1)), None, Some(runner(3))], PlateAppearanceResult::Error, 0, 0.0, 1);
        assert_eq!(res.runs.len(), 1);
        assert_eq!(res.rbi, 0);
        assert_eq!(ids(&res.bases), [Some(9), Some(1), None]);
        assert!(res.bases[0].unwrap().reached_on_error);
    }

    #[test]
    fn test_forced_runner_scores_on_groundout_with_bases_loaded() {
        let res = play([Some(runner(1)), Some(runner(2)), Some(runner(3))], PlateAppearanceResult::Groundout, 0, 0.0, 1);
        assert_eq!(res.runs.len(), 1);
        assert_eq!(ids(&res.bases), [None, Some(1), Some(2)]);
    }

    #[test]
    fn test_single_scores_from_third_and_places_batter() {
        for seed in 0..30 {
            let res = play([Some(runner(1)), Some(runner(2)), Some(runner(3))], PlateAppearanceResult::Single, 0, 40.0, seed);
            assert!(res.runs.len() >= 1);
            assert_eq!(res.bases[0].map(|r| r.runner_id), Some(PlayerId(9)));
            let on_base = res.bases.iter().filter(|b| b.is_some()).count();
            // 주자 보존: 4명 = 득점 + 베이스
            assert_eq!(res.runs.len() + on_base, 4);
        }
    }
}
