//! Fielding Resolver
//!
//! 낙구 지점 + 9명의 수비수 → 도달 가능 여부, 주 처리자(primary), 보조(backup).
//!
//! ## 뜬공
//! 시작 위치 → 낙구 지점 직선 거리 / 이동 속도 + 반응 시간 = `time_to_reach`.
//! `time_to_reach <= flight_time`이면 도달 가능.
//!
//! ## 땅볼
//! 내야수는 타구 경로를 따라 (자기 수비 깊이 + 3 m)까지 1 m 간격으로 차단 지점을 찾는다.
//! 외야수는 정지 지점에서 공을 회수하며 바운드 페널티를 받고, 절대 primary가 되지 않는다.
//!
//! primary = 도달 가능하고 여유(margin)가 양수인 야수 중 여유가 가장 작은 야수.
//! 땅볼 포구 여유(`ground_slack`) 덕분에 음수 여유로 도달한 야수만 있을 때는
//! 그중 가장 덜 늦은 야수가 처리한다.

use serde::{Deserialize, Serialize};

use super::batted_ball::BattedBallClass;
use super::config::FieldingConfig;
use super::flight::{FieldPoint, Landing};
use crate::models::player::{FielderAbilities, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FielderRole {
    Primary,
    Backup,
}

/// 수비 판정에 필요한 야수 능력치 (주력은 타자 능력치에서)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FielderProfile {
    pub speed: u8,
    pub fielding: u8,
    pub arm: u8,
    pub catching: u8,
}

impl FielderProfile {
    pub fn new(speed: u8, abilities: &FielderAbilities) -> Self {
        Self {
            speed,
            fielding: abilities.fielding,
            arm: abilities.arm,
            catching: abilities.catching,
        }
    }
}

impl Default for FielderProfile {
    fn default() -> Self {
        Self { speed: 50, fielding: 50, arm: 50, catching: 50 }
    }
}

/// 수비 번호 1~9 → 야수 프로필
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FielderMap {
    fielders: [FielderProfile; 9],
}

impl FielderMap {
    pub fn new(fielders: [FielderProfile; 9]) -> Self {
        Self { fielders }
    }

    /// 수비 번호(1~9)로 조회. 범위 밖이면 None.
    pub fn get(&self, position_id: u8) -> Option<&FielderProfile> {
        self.fielders.get(usize::from(position_id).checked_sub(1)?)
    }

    pub fn set(&mut self, position: Position, profile: FielderProfile) {
        if let Some(id) = position.position_id() {
            self.fielders[usize::from(id) - 1] = profile;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &FielderProfile)> {
        self.fielders.iter().enumerate().map(|(i, f)| (i as u8 + 1, f))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FielderEvaluation {
    pub position_id: u8,
    pub can_reach: bool,
    pub time_to_reach: f64,
    pub ball_arrival_time: f64,
    pub role: FielderRole,
    /// 땅볼 회수 페널티 (외야수만)
    pub bounce_penalty: f64,
    /// 포구(또는 회수) 지점
    pub intercept: FieldPoint,
}

impl FielderEvaluation {
    /// 여유 시간 (양수일수록 여유)
    #[inline]
    pub fn margin(&self) -> f64 {
        self.ball_arrival_time - self.time_to_reach
    }

    /// 공을 손에 쥐는 시각
    #[inline]
    pub fn possession_time(&self) -> f64 {
        self.time_to_reach.max(self.ball_arrival_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldingResult {
    /// 수비 번호 순서 (9개)
    pub evaluations: Vec<FielderEvaluation>,
    /// `evaluations` 인덱스
    pub primary: Option<usize>,
}

impl FieldingResult {
    pub fn primary(&self) -> Option<&FielderEvaluation> {
        self.primary.and_then(|i| self.evaluations.get(i))
    }

    pub fn is_uncatchable(&self) -> bool {
        self.primary.is_none()
    }

    /// 가장 먼저 공을 쥐는 야수 (안타 처리 시 회수자)
    pub fn fastest_retriever(&self) -> Option<&FielderEvaluation> {
        self.evaluations
            .iter()
            .min_by(|a, b| a.possession_time().total_cmp(&b.possession_time()))
    }

    /// 공 회수 시각 (페널티 포함)
    pub fn retrieval_time(&self) -> f64 {
        self.fastest_retriever().map(|e| e.possession_time()).unwrap_or(0.0)
    }
}

/// 기본 설정으로 수비 판정
pub fn evaluate_fielders(landing: &Landing, ball_type: BattedBallClass, fielders: &FielderMap) -> FieldingResult {
    evaluate_fielders_with(&FieldingConfig::default(), landing, ball_type, fielders)
}

pub fn evaluate_fielders_with(
    cfg: &FieldingConfig,
    landing: &Landing,
    ball_type: BattedBallClass,
    fielders: &FielderMap,
) -> FieldingResult {
    let evaluations: Vec<FielderEvaluation> = fielders
        .iter()
        .map(|(position_id, profile)| {
            let start = cfg.start_positions[usize::from(position_id) - 1];
            if landing.is_ground_ball {
                evaluate_ground_ball(cfg, landing, position_id, start, profile)
            } else {
                evaluate_air_ball(cfg, landing, ball_type, position_id, start, profile)
            }
        })
        .collect();

    let primary = select_primary(&evaluations);

    let mut result = FieldingResult { evaluations, primary };
    if let Some(i) = primary {
        result.evaluations[i].role = FielderRole::Primary;
    }
    result
}

fn select_primary(evaluations: &[FielderEvaluation]) -> Option<usize> {
    let reachable = || evaluations.iter().enumerate().filter(|(_, e)| e.can_reach);
    reachable()
        .filter(|(_, e)| e.margin() > 0.0)
        .min_by(|(_, a), (_, b)| a.margin().total_cmp(&b.margin()))
        .or_else(|| reachable().max_by(|(_, a), (_, b)| a.margin().total_cmp(&b.margin())))
        .map(|(i, _)| i)
}

fn evaluate_air_ball(
    cfg: &FieldingConfig,
    landing: &Landing,
    ball_type: BattedBallClass,
    position_id: u8,
    start: FieldPoint,
    profile: &FielderProfile,
) -> FielderEvaluation {
    let reaction = match ball_type {
        BattedBallClass::Popup => cfg.popup_reaction,
        _ => cfg.air_reaction,
    };
    let speed = cfg.fielder_speed(profile.speed, profile.fielding);
    let time_to_reach = reaction + start.distance_to(&landing.position) / speed;
    FielderEvaluation {
        position_id,
        can_reach: time_to_reach <= landing.flight_time,
        time_to_reach,
        ball_arrival_time: landing.flight_time,
        role: FielderRole::Backup,
        bounce_penalty: 0.0,
        intercept: landing.position,
    }
}

fn evaluate_ground_ball(
    cfg: &FieldingConfig,
    landing: &Landing,
    position_id: u8,
    start: FieldPoint,
    profile: &FielderProfile,
) -> FielderEvaluation {
    let speed = cfg.fielder_speed(profile.speed, profile.fielding);
    let is_infielder = Position::from_position_id(position_id).is_some_and(Position::is_infield);

    if !is_infielder {
        // 내야를 빠져나간 공을 정지 지점에서 회수
        let time_to_reach = cfg.outfield_ground_reaction
            + start.distance_to(&landing.position) / speed
            + cfg.bounce_penalty;
        return FielderEvaluation {
            position_id,
            can_reach: false,
            time_to_reach,
            ball_arrival_time: landing.flight_time,
            role: FielderRole::Backup,
            bounce_penalty: cfg.bounce_penalty,
            intercept: landing.position,
        };
    }

    let reaction = if position_id <= 2 {
        cfg.battery_ground_reaction
    } else {
        cfg.infield_ground_reaction
    };
    let lateral_speed = speed * cfg.ground_lateral_factor;
    let reach_limit = landing.distance.min(start.distance_from_home() + cfg.infield_depth_allowance);

    let mut s = cfg.intercept_start;
    while s <= reach_limit + 1e-9 {
        let point = landing.point_along_path(s);
        let time_to_reach = reaction + start.distance_to(&point) / lateral_speed;
        let ball_time = landing.ground_ball_time_to(s);
        if time_to_reach <= ball_time + cfg.ground_slack {
            return FielderEvaluation {
                position_id,
                can_reach: true,
                time_to_reach,
                ball_arrival_time: ball_time,
                role: FielderRole::Backup,
                bounce_penalty: 0.0,
                intercept: point,
            };
        }
        s += cfg.intercept_step;
    }

    FielderEvaluation {
        position_id,
        can_reach: false,
        time_to_reach: reaction + start.distance_to(&landing.position) / speed,
        ball_arrival_time: landing.flight_time,
        role: FielderRole::Backup,
        bounce_penalty: 0.0,
        intercept: landing.position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::flight::calc_ball_landing;

    fn average() -> FielderMap {
        FielderMap::default()
    }

    #[test]
    fn test_routine_fly_to_center_is_caught_by_center_fielder() {
        // 45°, 35° 발사, 140km/h → 중견수 정면 뜬공
        let landing = calc_ball_landing(45.0, 35.0, 140.0);
        let result = evaluate_fielders(&landing, BattedBallClass::FlyBall, &average());
        let primary = result.primary().expect("catchable");
        assert_eq!(primary.position_id, 8);
        assert_eq!(primary.role, FielderRole::Primary);
        assert_eq!(result.evaluations.len(), 9);
        assert_eq!(
            result.evaluations.iter().filter(|e| e.role == FielderRole::Primary).count(),
            1
        );
    }

    #[test]
    fn test_primary_has_smallest_margin_among_reachable() {
        let landing = calc_ball_landing(50.0, 70.0, 110.0); // 내야 팝업
        let result = evaluate_fielders(&landing, BattedBallClass::Popup, &average());
        let primary = result.primary().expect("popup is catchable");
        assert!(primary.margin() > 0.0);
        for e in result.evaluations.iter().filter(|e| e.can_reach && e.margin() > 0.0) {
            assert!(primary.margin() <= e.margin() + 1e-12);
        }
    }

    fn evaluation(position_id: u8, can_reach: bool, margin: f64) -> FielderEvaluation {
        FielderEvaluation {
            position_id,
            can_reach,
            time_to_reach: 2.0,
            ball_arrival_time: 2.0 + margin,
            role: FielderRole::Backup,
            bounce_penalty: 0.0,
            intercept: FieldPoint::HOME_PLATE,
        }
    }

    #[test]
    fn test_late_fielder_inside_slack_loses_to_positive_margin() {
        let evaluations = [
            evaluation(1, true, -0.10),
            evaluation(5, true, 0.30),
            evaluation(6, true, 0.05),
            evaluation(8, false, -2.0),
        ];
        assert_eq!(select_primary(&evaluations), Some(2));

        // 양수 여유가 없으면 가장 덜 늦은 야수
        let late = [evaluation(4, true, -0.12), evaluation(6, true, -0.03), evaluation(9, false, 0.5)];
        assert_eq!(select_primary(&late), Some(1));
        assert_eq!(select_primary(&[evaluation(3, false, 1.0)]), None);
    }

    #[test]
    fn test_grounder_primary_prefers_positive_margin() {
        for dir in (0..=90).step_by(5) {
            for angle in [-10.0, -5.0, 0.0, 4.0, 9.0] {
                for v in (90..=170).step_by(10) {
                    let landing = calc_ball_landing(f64::from(dir), angle, f64::from(v));
                    let result = evaluate_fielders(&landing, BattedBallClass::GroundBall, &average());
                    let best_positive = result
                        .evaluations
                        .iter()
                        .filter(|e| e.can_reach && e.margin() > 0.0)
                        .map(FielderEvaluation::margin)
                        .fold(f64::INFINITY, f64::min);
                    if best_positive.is_finite() {
                        let primary = result.primary().expect("a fielder reaches the ball");
                        assert_eq!(primary.margin(), best_positive, "dir {dir} angle {angle} v {v}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_gapper_is_uncatchable() {
        // 좌중간 깊은 라인드라이브
        let landing = calc_ball_landing(30.0, 18.0, 165.0);
        let result = evaluate_fielders(&landing, BattedBallClass::LineDrive, &average());
        assert!(result.is_uncatchable());
        assert!(result.retrieval_time() > landing.flight_time);
    }

    #[test]
    fn test_routine_grounder_to_shortstop() {
        let landing = calc_ball_landing(30.0, 2.0, 110.0);
        assert!(landing.is_ground_ball);
        let result = evaluate_fielders(&landing, BattedBallClass::GroundBall, &average());
        let primary = result.primary().expect("fieldable");
        assert!(matches!(primary.position_id, 4 | 5 | 6), "fielder {}", primary.position_id);
    }

    #[test]
    fn test_outfielders_never_primary_on_grounders() {
        for dir in [0.0, 15.0, 30.0, 45.0, 60.0, 75.0, 90.0] {
            for v in [90.0, 130.0, 170.0] {
                let landing = calc_ball_landing(dir, 0.0, v);
                let result = evaluate_fielders(&landing, BattedBallClass::GroundBall, &average());
                for e in result.evaluations.iter().filter(|e| e.position_id >= 7) {
                    assert!(!e.can_reach);
                    assert_eq!(e.role, FielderRole::Backup);
                    assert!(e.bounce_penalty > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_faster_fielder_reaches_sooner() {
        let landing = calc_ball_landing(45.0, 30.0, 150.0);
        let slow = evaluate_fielders(&landing, BattedBallClass::FlyBall, &average());
        let mut map = average();
        map.set(Position::CenterField, FielderProfile { speed: 95, fielding: 90, arm: 50, catching: 50 });
        let fast = evaluate_fielders(&landing, BattedBallClass::FlyBall, &map);
        assert!(fast.evaluations[7].time_to_reach < slow.evaluations[7].time_to_reach);
    }

    #[test]
    fn test_fielder_map_lookup() {
        let map = average();
        assert!(map.get(0).is_none());
        assert!(map.get(10).is_none());
        assert_eq!(map.get(9), Some(&FielderProfile::default()));
        assert_eq!(map.iter().count(), 9);
    }
}
