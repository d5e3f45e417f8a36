//! Probability utilities shared by every stochastic stage
//!
//! All functions are pure - they take ratings/probabilities as input.
//! 모든 확률/비율은 여기서 clamp한다.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// [0, 1]로 자르고 NaN은 0으로 취급
#[inline]
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// [lo, hi]로 자른 뒤 [0, 1]로 한 번 더 자른다.
#[inline]
pub fn clamp_range(p: f64, lo: f64, hi: f64) -> f64 {
    if p.is_nan() {
        return clamp_probability(lo);
    }
    clamp_probability(p.clamp(lo, hi))
}

/// 능력치를 f64로, 1~100 범위 보장
#[inline]
pub fn clamp_rating(rating: u8) -> f64 {
    f64::from(rating.clamp(1, 100))
}

/// 능력치 50 기준 편차
#[inline]
pub fn rating_delta(rating: u8) -> f64 {
    clamp_rating(rating) - 50.0
}

/// 확률 p로 true
#[inline]
pub fn roll<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.gen::<f64>() < clamp_probability(p)
}

/// N(mean, sigma) 샘플을 [min, max]로 clamp.
/// sigma가 0이거나 잘못된 값이면 mean을 그대로 clamp한다.
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, sigma: f64, min: f64, max: f64) -> f64 {
    let value = match Normal::new(mean, sigma) {
        Ok(dist) if sigma > 0.0 => dist.sample(rng),
        _ => mean,
    };
    if value.is_nan() {
        return mean.clamp(min, max);
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_clamp_probability_handles_nan() {
        assert_eq!(clamp_probability(f64::NAN), 0.0);
        assert_eq!(clamp_probability(1.7), 1.0);
        assert_eq!(clamp_probability(-0.2), 0.0);
        assert_eq!(clamp_range(0.95, 0.05, 0.9), 0.9);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(!roll(&mut rng, 0.0));
            assert!(roll(&mut rng, 1.0));
        }
    }

    #[test]
    fn test_sample_normal_zero_sigma() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(sample_normal(&mut rng, 12.0, 0.0, -15.0, 70.0), 12.0);
        assert_eq!(sample_normal(&mut rng, 120.0, 0.0, -15.0, 70.0), 70.0);
    }

    #[test]
    fn test_sample_normal_mean_is_close() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| sample_normal(&mut rng, 45.0, 18.0, -1000.0, 1000.0)).sum();
        let mean = sum / n as f64;
        assert!((mean - 45.0).abs() < 0.5, "mean {mean}");
    }

    proptest! {
        #[test]
        fn prop_sample_normal_within_bounds(seed in any::<u64>(), mean in -50.0f64..150.0, sigma in 0.0f64..40.0) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let v = sample_normal(&mut rng, mean, sigma, 0.0, 90.0);
            prop_assert!((0.0..=90.0).contains(&v));
        }

        #[test]
        fn prop_clamp_range_is_probability(p in -10.0f64..10.0, lo in 0.0f64..0.5, hi in 0.5f64..1.0) {
            let c = clamp_range(p, lo, hi);
            prop_assert!(c >= lo && c <= hi);
        }
    }
}
