//! Distance & Landing Calculator
//!
//! 타구 파라미터 → 비거리, 체공시간, 낙구 좌표, 펜스 거리. 전부 순수 함수.
//!
//! 뜬공 비거리는 공기저항 보정 사거리 모델:
//! `R = v²·sin(2θ)/g / (1 + k·T)`, `T = 2·v·sinθ/g`.
//! 체공시간이 길수록 감속이 커지므로 최대 비거리 각도는 45°보다 낮다.
//!
//! 땅볼(발사각 < 10°)은 초기 지면 속도 `v·cosθ·0.85`, 등감속 5 m/s²로
//! 굴러가며 거리는 55 m로 제한된다.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::config::FlightConfig;
use super::physics_constants::field::{CENTER_DIRECTION_DEG, FOUL_LINE_LEFT_DEG, FOUL_LINE_RIGHT_DEG};
use super::physics_constants::units::kmh_to_mps;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f64,
    pub y: f64,
}

impl FieldPoint {
    pub const HOME_PLATE: FieldPoint = FieldPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 방향각(0° = 좌측 파울라인)과 홈으로부터의 거리로 좌표 계산
    pub fn from_polar(direction: f64, distance: f64) -> Self {
        let rad = (direction - CENTER_DIRECTION_DEG).to_radians();
        Self { x: distance * rad.sin(), y: distance * rad.cos() }
    }

    #[inline]
    pub fn distance_to(&self, other: &FieldPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[inline]
    pub fn distance_from_home(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub position: FieldPoint,
    /// m
    pub distance: f64,
    /// 뜬공은 체공시간, 땅볼은 정지 지점(또는 상한 거리)까지 걸리는 시간
    pub flight_time: f64,
    pub is_ground_ball: bool,
    pub direction: f64,
    /// 땅볼 초기 지면 속도 m/s (뜬공은 0)
    #[serde(default)]
    pub ground_speed: f64,
    /// 땅볼 감속도 m/s² (뜬공은 0)
    #[serde(default)]
    pub ground_deceleration: f64,
}

impl Landing {
    /// 땅볼이 경로상 `distance` 지점에 도달하는 시간.
    /// 멈추기 전에 도달하지 못하면 정지 시간을 돌려준다. 뜬공은 체공시간.
    pub fn ground_ball_time_to(&self, distance: f64) -> f64 {
        if !self.is_ground_ball {
            return self.flight_time;
        }
        roll_time(self.ground_speed, self.ground_deceleration, distance)
    }

    /// 경로상 `distance` 지점 좌표
    pub fn point_along_path(&self, distance: f64) -> FieldPoint {
        FieldPoint::from_polar(self.direction, distance)
    }
}

/// 등감속 구름: s = v·t − ½·a·t² 의 해. 도달 불가면 정지 시간.
#[inline]
fn roll_time(speed: f64, decel: f64, distance: f64) -> f64 {
    if speed <= 0.0 || decel <= 0.0 {
        return 0.0;
    }
    let disc = speed * speed - 2.0 * decel * distance;
    if disc < 0.0 {
        speed / decel
    } else {
        (speed - disc.sqrt()) / decel
    }
}

/// 공기저항 보정 비거리 (기본 설정). 발사각 ≤ 0이면 0.
pub fn estimate_distance(velocity: f64, angle: f64) -> f64 {
    estimate_distance_with(&FlightConfig::default(), velocity, angle)
}

pub fn estimate_distance_with(cfg: &FlightConfig, velocity: f64, angle: f64) -> f64 {
    if angle <= 0.0 || velocity <= 0.0 {
        return 0.0;
    }
    let v = kmh_to_mps(velocity);
    let theta = angle.to_radians();
    let vacuum_range = v * v * (2.0 * theta).sin() / cfg.gravity;
    let hang = flight_time_with(cfg, velocity, angle);
    (vacuum_range / (1.0 + cfg.drag_coefficient * hang)).max(0.0)
}

/// 체공시간 T = 2·v·sinθ/g
pub fn flight_time(velocity: f64, angle: f64) -> f64 {
    flight_time_with(&FlightConfig::default(), velocity, angle)
}

pub fn flight_time_with(cfg: &FlightConfig, velocity: f64, angle: f64) -> f64 {
    if angle <= 0.0 || velocity <= 0.0 {
        return 0.0;
    }
    2.0 * kmh_to_mps(velocity) * angle.to_radians().sin() / cfg.gravity
}

/// 펜스 거리: 파울라인 100 m, 중앙(45°) 122 m, 45° 대칭
pub fn get_fence_distance(direction: f64) -> f64 {
    fence_distance_with(&FlightConfig::default(), direction)
}

pub fn fence_distance_with(cfg: &FlightConfig, direction: f64) -> f64 {
    let d = direction.clamp(FOUL_LINE_LEFT_DEG, FOUL_LINE_RIGHT_DEG);
    cfg.fence_line_distance + cfg.fence_center_gain * (d / FOUL_LINE_RIGHT_DEG * PI).sin()
}

/// 낙구 계산 (기본 설정)
pub fn calc_ball_landing(direction: f64, angle: f64, velocity: f64) -> Landing {
    calc_ball_landing_with(&FlightConfig::default(), direction, angle, velocity)
}

pub fn calc_ball_landing_with(cfg: &FlightConfig, direction: f64, angle: f64, velocity: f64) -> Landing {
    if angle < cfg.ground_ball_max_angle {
        return ground_ball_landing_with(cfg, direction, angle, velocity);
    }

    let direction = direction.clamp(FOUL_LINE_LEFT_DEG, FOUL_LINE_RIGHT_DEG);
    let distance = estimate_distance_with(cfg, velocity, angle);
    Landing {
        position: FieldPoint::from_polar(direction, distance),
        distance,
        flight_time: flight_time_with(cfg, velocity, angle),
        is_ground_ball: false,
        direction,
        ground_speed: 0.0,
        ground_deceleration: 0.0,
    }
}

/// 발사각과 무관하게 구르는 타구로 낙구 계산.
/// 10~15° 저속 타구처럼 땅볼로 분류된 공에 쓴다.
pub fn ground_ball_landing_with(cfg: &FlightConfig, direction: f64, angle: f64, velocity: f64) -> Landing {
    let direction = direction.clamp(FOUL_LINE_LEFT_DEG, FOUL_LINE_RIGHT_DEG);
    let ground_speed =
        kmh_to_mps(velocity.max(0.0)) * angle.to_radians().cos().max(0.0) * cfg.ground_speed_retention;
    let stop_distance = ground_speed * ground_speed / (2.0 * cfg.ground_deceleration);
    let distance = stop_distance.min(cfg.ground_ball_max_distance);
    Landing {
        position: FieldPoint::from_polar(direction, distance),
        distance,
        flight_time: roll_time(ground_speed, cfg.ground_deceleration, distance),
        is_ground_ball: true,
        direction,
        ground_speed,
        ground_deceleration: cfg.ground_deceleration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fence_geometry() {
        assert!((get_fence_distance(0.0) - 100.0).abs() < 1e-9);
        assert!((get_fence_distance(90.0) - 100.0).abs() < 1e-9);
        assert!((get_fence_distance(45.0) - 122.0).abs() < 1e-9);
        assert_eq!(get_fence_distance(0.0), get_fence_distance(90.0));
    }

    #[test]
    fn test_non_positive_angle_has_no_carry() {
        assert_eq!(estimate_distance(150.0, 0.0), 0.0);
        assert_eq!(estimate_distance(150.0, -10.0), 0.0);
        assert_eq!(flight_time(150.0, -3.0), 0.0);
    }

    #[test]
    fn test_optimal_angle_below_vacuum_ideal() {
        let best = (1..90)
            .map(|a| (a, estimate_distance(160.0, f64::from(a))))
            .fold((0, 0.0), |acc, x| if x.1 > acc.1 { x } else { acc });
        assert!((30..=50).contains(&best.0), "best angle {}", best.0);
        assert!(best.0 < 45);
    }

    #[test]
    fn test_hard_fly_ball_reaches_the_seats() {
        // 165km/h, 28° → 홈런 비거리
        let d = estimate_distance(165.0, 28.0);
        assert!(d > 110.0 && d < 140.0, "distance {d}");
    }

    #[test]
    fn test_coordinates_follow_direction_convention() {
        let left = FieldPoint::from_polar(0.0, 100.0);
        let center = FieldPoint::from_polar(45.0, 100.0);
        let right = FieldPoint::from_polar(90.0, 100.0);
        assert!(left.x < 0.0 && right.x > 0.0);
        assert!(center.x.abs() < 1e-9 && (center.y - 100.0).abs() < 1e-9);
        assert!((left.distance_from_home() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ground_ball_landing() {
        let slow = calc_ball_landing(45.0, 2.0, 90.0);
        assert!(slow.is_ground_ball);
        assert!(slow.distance < 55.0);
        assert!((slow.ground_ball_time_to(slow.distance) - slow.flight_time).abs() < 1e-9);

        let rocket = calc_ball_landing(45.0, 5.0, 170.0);
        assert_eq!(rocket.distance, 55.0);
        // 경로상 가까운 지점일수록 빨리 도달
        assert!(rocket.ground_ball_time_to(20.0) < rocket.ground_ball_time_to(40.0));
    }

    #[test]
    fn test_forced_ground_landing_rolls() {
        let cfg = FlightConfig::default();
        // 12°, 92km/h: 발사각만 보면 뜬공이지만 구르는 타구
        let l = ground_ball_landing_with(&cfg, 40.0, 12.0, 92.0);
        assert!(l.is_ground_ball);
        assert!(l.distance > 30.0 && l.distance <= 55.0, "distance {}", l.distance);
        assert!((l.ground_ball_time_to(l.distance) - l.flight_time).abs() < 1e-9);
        assert_eq!(calc_ball_landing(40.0, 2.0, 92.0), ground_ball_landing_with(&cfg, 40.0, 2.0, 92.0));
    }

    #[test]
    fn test_air_landing() {
        let l = calc_ball_landing(30.0, 30.0, 150.0);
        assert!(!l.is_ground_ball);
        assert!((l.distance - estimate_distance(150.0, 30.0)).abs() < 1e-9);
        assert!((l.position.distance_from_home() - l.distance).abs() < 1e-9);
        assert_eq!(l.ground_ball_time_to(10.0), l.flight_time);
    }

    proptest! {
        #[test]
        fn prop_distance_strictly_increasing_in_velocity(
            angle in 1.0f64..70.0, v in 80.0f64..169.0, dv in 0.5f64..20.0,
        ) {
            prop_assert!(estimate_distance(v + dv, angle) > estimate_distance(v, angle));
        }

        #[test]
        fn prop_zero_for_non_positive_angle(v in 0.1f64..200.0, angle in -90.0f64..=0.0) {
            prop_assert_eq!(estimate_distance(v, angle), 0.0);
        }

        #[test]
        fn prop_fence_symmetric_and_bounded(d in 0.0f64..=90.0) {
            let f = get_fence_distance(d);
            prop_assert!((f - get_fence_distance(90.0 - d)).abs() < 1e-9);
            prop_assert!(f >= 100.0 - 1e-9 && f <= get_fence_distance(45.0) + 1e-9);
        }

        #[test]
        fn prop_ground_balls_never_exceed_cap(dir in 0.0f64..=90.0, angle in -15.0f64..9.99, v in 0.0f64..400.0) {
            let l = calc_ball_landing(dir, angle, v);
            prop_assert!(l.is_ground_ball);
            prop_assert!(l.distance <= 55.0);
            prop_assert!(l.flight_time >= 0.0);
        }
    }
}
