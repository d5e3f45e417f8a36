//! Game events and plate-appearance results
//!
//! `GameEvent` 스트림은 박스스코어 집계의 유일한 입력이다.
//! `AtBatLog`는 옵션으로 수집되는 상세 로그(투구 단위 + 타구 물리)이다.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::PlayerId;
use crate::engine::batted_ball::{BattedBall, BattedBallClass};
use crate::engine::flight::Landing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opposite(self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn batting_side(self) -> TeamSide {
        match self {
            Half::Top => TeamSide::Away,
            Half::Bottom => TeamSide::Home,
        }
    }

    pub fn fielding_side(self) -> TeamSide {
        self.batting_side().opposite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchResult {
    Ball,
    CalledStrike,
    SwingingStrike,
    Foul,
    /// 2스트라이크 파울팁 포구 (삼진)
    FoulTip,
    InPlay,
    HitByPitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchRecord {
    pub result: PitchResult,
    /// 투구 후 카운트
    pub balls: u8,
    pub strikes: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateAppearanceResult {
    Single,
    Double,
    Triple,
    Homerun,
    InfieldHit,
    Error,
    Strikeout,
    Walk,
    HitByPitch,
    Groundout,
    Flyout,
    Lineout,
    Popout,
    DoublePlay,
    SacrificeFly,
    FieldersChoice,
}

impl PlateAppearanceResult {
    pub const ALL: [PlateAppearanceResult; 16] = [
        PlateAppearanceResult::Single,
        PlateAppearanceResult::Double,
        PlateAppearanceResult::Triple,
        PlateAppearanceResult::Homerun,
        PlateAppearanceResult::InfieldHit,
        PlateAppearanceResult::Error,
        PlateAppearanceResult::Strikeout,
        PlateAppearanceResult::Walk,
        PlateAppearanceResult::HitByPitch,
        PlateAppearanceResult::Groundout,
        PlateAppearanceResult::Flyout,
        PlateAppearanceResult::Lineout,
        PlateAppearanceResult::Popout,
        PlateAppearanceResult::DoublePlay,
        PlateAppearanceResult::SacrificeFly,
        PlateAppearanceResult::FieldersChoice,
    ];

    pub fn is_hit(self) -> bool {
        matches!(
            self,
            Self::Single | Self::Double | Self::Triple | Self::Homerun | Self::InfieldHit
        )
    }

    pub fn total_bases(self) -> u8 {
        match self {
            Self::Single | Self::InfieldHit => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Homerun => 4,
            _ => 0,
        }
    }

    /// 타수 포함 여부 (볼넷/사구/희생플라이 제외)
    pub fn is_at_bat(self) -> bool {
        !matches!(self, Self::Walk | Self::HitByPitch | Self::SacrificeFly)
    }

    pub fn is_ground_out(self) -> bool {
        matches!(self, Self::Groundout | Self::DoublePlay | Self::FieldersChoice)
    }

    pub fn is_air_out(self) -> bool {
        matches!(self, Self::Flyout | Self::Lineout | Self::Popout | Self::SacrificeFly)
    }

    /// 타자 주자가 아웃되는지 (야수선택/실책은 출루)
    pub fn batter_is_out(self) -> bool {
        matches!(
            self,
            Self::Strikeout
                | Self::Groundout
                | Self::Flyout
                | Self::Lineout
                | Self::Popout
                | Self::DoublePlay
                | Self::SacrificeFly
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Homerun => "homerun",
            Self::InfieldHit => "infield_hit",
            Self::Error => "error",
            Self::Strikeout => "strikeout",
            Self::Walk => "walk",
            Self::HitByPitch => "hit_by_pitch",
            Self::Groundout => "groundout",
            Self::Flyout => "flyout",
            Self::Lineout => "lineout",
            Self::Popout => "popout",
            Self::DoublePlay => "double_play",
            Self::SacrificeFly => "sacrifice_fly",
            Self::FieldersChoice => "fielders_choice",
        }
    }
}

impl fmt::Display for PlateAppearanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run crossing the plate, charged to the pitcher who put the runner on base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScored {
    pub runner_id: PlayerId,
    pub responsible_pitcher_id: PlayerId,
    pub earned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateAppearanceEvent {
    pub inning: u8,
    pub half: Half,
    pub batter_id: PlayerId,
    pub pitcher_id: PlayerId,
    pub result: PlateAppearanceResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batted_ball_class: Option<BattedBallClass>,
    pub pitches: u16,
    /// 이 플레이에서 기록된 아웃 수 (병살 2)
    pub outs_recorded: u8,
    pub rbi: u8,
    pub runs: Vec<RunScored>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_fielder_id: Option<PlayerId>,
}

impl PlateAppearanceEvent {
    pub fn batting_side(&self) -> TeamSide {
        self.half.batting_side()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchingChange {
    pub inning: u8,
    pub half: Half,
    /// 투수를 교체한 (수비) 팀
    pub side: TeamSide,
    pub outs: u8,
    pub pitcher_out: PlayerId,
    pub pitcher_in: PlayerId,
    /// 교체 시점 수비팀 기준 점수차
    pub lead: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    StartingPitcher { side: TeamSide, pitcher_id: PlayerId },
    PlateAppearance(PlateAppearanceEvent),
    PitchingChange(PitchingChange),
}

/// Per-plate-appearance detail, collected only when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtBatLog {
    pub inning: u8,
    pub half: Half,
    pub batter_id: PlayerId,
    pub pitcher_id: PlayerId,
    pub outs_before: u8,
    /// 1루, 2루, 3루 주자 유무 (타석 시작 시점)
    pub bases_before: [bool; 3],
    pub pitches: Vec<PitchRecord>,
    pub result: PlateAppearanceResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batted_ball: Option<BattedBall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing: Option<Landing>,
    /// 처리(또는 회수)한 야수의 수비 번호 1~9
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder_position: Option<u8>,
    /// 외야수가 땅볼을 회수하며 받은 바운드 페널티 (초)
    #[serde(default)]
    pub bounce_penalty: f64,
    pub runs_scored: u8,
    pub rbi: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_categories_are_disjoint() {
        for r in PlateAppearanceResult::ALL {
            assert!(!(r.is_ground_out() && r.is_air_out()), "{r}");
            if r.is_hit() {
                assert!(r.total_bases() > 0);
                assert!(!r.batter_is_out());
            }
        }
        assert!(!PlateAppearanceResult::SacrificeFly.is_at_bat());
        assert!(PlateAppearanceResult::Error.is_at_bat());
        assert!(!PlateAppearanceResult::FieldersChoice.batter_is_out());
    }

    #[test]
    fn test_half_sides() {
        assert_eq!(Half::Top.batting_side(), TeamSide::Away);
        assert_eq!(Half::Top.fielding_side(), TeamSide::Home);
        assert_eq!(Half::Bottom.batting_side(), TeamSide::Home);
        assert_eq!(TeamSide::Home.opposite().index(), 1);
    }

    #[test]
    fn test_result_names_match_serde() {
        for r in PlateAppearanceResult::ALL {
            let json = serde_json::to_string(&r).unwrap();
            assert_eq!(json, format!("\"{}\"", r.as_str()));
        }
    }
}
