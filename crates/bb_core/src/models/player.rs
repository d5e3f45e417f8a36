//! Player attribute model
//!
//! 능력치는 로스터 소유이며 엔진은 읽기만 한다.
//! 모든 일반 능력치는 1~100, 탄도(trajectory)는 1~4, 구종 레벨은 1~7.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GameError, Result};

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 100;
pub const TRAJECTORY_MAX: u8 = 4;
pub const PITCH_LEVEL_MAX: u8 = 7;
pub const VELOCITY_MIN_KMH: u16 = 120;
pub const VELOCITY_MAX_KMH: u16 = 170;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatSide {
    #[default]
    Right,
    Left,
    Switch,
}

/// Defensive position. Numbering follows the scorer's convention (P=1 ... RF=9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Pitcher,
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    Shortstop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
}

impl Position {
    /// The nine fielding positions in scorer order.
    pub const DEFENSIVE: [Position; 9] = [
        Position::Pitcher,
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::Shortstop,
        Position::LeftField,
        Position::CenterField,
        Position::RightField,
    ];

    /// Scorer number 1..=9. The designated hitter does not field.
    pub fn position_id(self) -> Option<u8> {
        match self {
            Position::DesignatedHitter => None,
            other => Some(other as u8 + 1),
        }
    }

    pub fn from_position_id(id: u8) -> Option<Position> {
        Position::DEFENSIVE.get(usize::from(id).checked_sub(1)?).copied()
    }

    /// Pitcher and catcher count as infielders for ground-ball purposes.
    pub fn is_infield(self) -> bool {
        matches!(
            self,
            Position::Pitcher
                | Position::Catcher
                | Position::FirstBase
                | Position::SecondBase
                | Position::ThirdBase
                | Position::Shortstop
        )
    }

    pub fn is_outfield(self) -> bool {
        matches!(self, Position::LeftField | Position::CenterField | Position::RightField)
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Position::Pitcher => "P",
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::Shortstop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatterAbilities {
    pub contact: u8,
    pub power: u8,
    /// 탄도 1~4 (높을수록 발사각이 높다)
    pub trajectory: u8,
    pub speed: u8,
    pub eye: u8,
}

impl Default for BatterAbilities {
    fn default() -> Self {
        Self { contact: 50, power: 50, trajectory: 2, speed: 50, eye: 50 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FielderAbilities {
    pub fielding: u8,
    pub arm: u8,
    pub catching: u8,
}

impl Default for FielderAbilities {
    fn default() -> Self {
        Self { fielding: 50, arm: 50, catching: 50 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchType {
    Slider,
    Curve,
    Fork,
    Changeup,
    Sinker,
    Shoot,
    Cutter,
    Splitter,
    Knuckle,
}

impl PitchType {
    /// 싱커/슈트 계열은 발사각을 낮춘다.
    pub fn lowers_launch_angle(self) -> bool {
        matches!(self, PitchType::Sinker | PitchType::Shoot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub pitch_type: PitchType,
    /// 1~7
    pub level: u8,
}

impl Pitch {
    pub fn new(pitch_type: PitchType, level: u8) -> Self {
        Self { pitch_type, level }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitcherAbilities {
    /// km/h
    pub velocity: u16,
    pub control: u8,
    pub stamina: u8,
    pub pitches: Vec<Pitch>,
}

impl Default for PitcherAbilities {
    fn default() -> Self {
        Self {
            velocity: 145,
            control: 50,
            stamina: 50,
            pitches: vec![
                Pitch::new(PitchType::Slider, 5),
                Pitch::new(PitchType::Curve, 5),
                Pitch::new(PitchType::Fork, 5),
                Pitch::new(PitchType::Changeup, 4),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub bats: BatSide,
    #[serde(default)]
    pub batting: BatterAbilities,
    #[serde(default)]
    pub fielding: FielderAbilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitching: Option<PitcherAbilities>,
}

impl Player {
    pub fn is_pitcher(&self) -> bool {
        self.pitching.is_some()
    }

    /// 모든 능력치가 허용 범위 안인지 확인한다.
    pub fn validate(&self) -> Result<()> {
        let b = &self.batting;
        check_rating(self.id, "contact", b.contact)?;
        check_rating(self.id, "power", b.power)?;
        check_rating(self.id, "speed", b.speed)?;
        check_rating(self.id, "eye", b.eye)?;
        check_range(self.id, "trajectory", u32::from(b.trajectory), 1, u32::from(TRAJECTORY_MAX))?;

        let f = &self.fielding;
        check_rating(self.id, "fielding", f.fielding)?;
        check_rating(self.id, "arm", f.arm)?;
        check_rating(self.id, "catching", f.catching)?;

        if let Some(p) = &self.pitching {
            check_range(
                self.id,
                "velocity",
                u32::from(p.velocity),
                u32::from(VELOCITY_MIN_KMH),
                u32::from(VELOCITY_MAX_KMH),
            )?;
            check_rating(self.id, "control", p.control)?;
            check_rating(self.id, "stamina", p.stamina)?;
            for pitch in &p.pitches {
                check_range(self.id, "pitch level", u32::from(pitch.level), 1, u32::from(PITCH_LEVEL_MAX))?;
            }
        }
        Ok(())
    }
}

fn check_rating(id: PlayerId, field: &'static str, value: u8) -> Result<()> {
    check_range(id, field, u32::from(value), u32::from(RATING_MIN), u32::from(RATING_MAX))
}

fn check_range(id: PlayerId, field: &'static str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GameError::RatingOutOfRange { id, field, value })
    }
}
