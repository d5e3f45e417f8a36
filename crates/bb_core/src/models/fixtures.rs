//! Ready-made rosters for tests, benches and calibration runs
//!
//! `average_team`은 모든 능력치 50의 기준 팀이다. 보정(calibration) 목표치는
//! 이 팀끼리의 경기를 기준으로 맞춰져 있다.

use std::collections::BTreeMap;

use super::player::{
    BatSide, BatterAbilities, FielderAbilities, PitcherAbilities, Player, PlayerId, Position,
};
use super::team::{LineupSlot, PitcherUsageConfig, RelieverPolicy, StarterPolicy, Team};

/// 타순 순서의 수비 위치 (지명타자 사용)
const BATTING_ORDER: [Position; 9] = [
    Position::CenterField,
    Position::SecondBase,
    Position::RightField,
    Position::FirstBase,
    Position::DesignatedHitter,
    Position::ThirdBase,
    Position::LeftField,
    Position::Catcher,
    Position::Shortstop,
];

const BULLPEN: [RelieverPolicy; 5] = [
    RelieverPolicy::Closer,
    RelieverPolicy::CloseGame,
    RelieverPolicy::CloseGame,
    RelieverPolicy::BehindOk,
    RelieverPolicy::MopUp,
];

/// All-50 team with a five-man bullpen. Ids are `id_base + 1 ..= id_base + 15`.
pub fn average_team(name: &str, id_base: u32) -> Team {
    uniform_team(name, id_base, BatterAbilities::default(), PitcherAbilities::default())
}

/// Same shape as [`average_team`] but without relievers, so the starter pitches the whole game.
pub fn average_team_without_bullpen(name: &str, id_base: u32) -> Team {
    let mut team = average_team(name, id_base);
    let relievers = std::mem::take(&mut team.reliever_ids);
    team.players.retain(|p| !relievers.contains(&p.id));
    team.pitcher_usage.retain(|id, _| !relievers.contains(id));
    team
}

/// 지명타자 없이 선발 투수가 5번 타순에 들어가는 팀. 투수 타석은 현재 투수가 친다.
pub fn average_team_without_dh(name: &str, id_base: u32) -> Team {
    let mut team = average_team(name, id_base);
    let dh_index = BATTING_ORDER.iter().position(|&p| p == Position::DesignatedHitter).unwrap_or(4);
    let dh_id = team.lineup[dh_index].player_id;
    team.lineup[dh_index] = LineupSlot { player_id: team.starting_pitcher_id, position: Position::Pitcher };
    team.players.retain(|p| p.id != dh_id);
    team
}

/// Every hitter shares `batting`, every pitcher shares `pitching`.
pub fn uniform_team(
    name: &str,
    id_base: u32,
    batting: BatterAbilities,
    pitching: PitcherAbilities,
) -> Team {
    let mut players = Vec::with_capacity(15);
    let mut lineup = Vec::with_capacity(9);

    for (i, &position) in BATTING_ORDER.iter().enumerate() {
        let id = PlayerId(id_base + i as u32 + 1);
        players.push(Player {
            id,
            name: format!("{} {}", name, position.abbreviation()),
            position,
            bats: if i % 3 == 1 { BatSide::Left } else { BatSide::Right },
            batting,
            fielding: FielderAbilities::default(),
            pitching: None,
        });
        lineup.push(LineupSlot { player_id: id, position });
    }

    let starter_id = PlayerId(id_base + 10);
    players.push(pitcher(starter_id, format!("{} SP", name), pitching.clone()));

    let mut pitcher_usage = BTreeMap::new();
    pitcher_usage.insert(starter_id, PitcherUsageConfig::starter(StarterPolicy::Standard));

    let mut reliever_ids = Vec::with_capacity(BULLPEN.len());
    for (i, policy) in BULLPEN.iter().enumerate() {
        let id = PlayerId(id_base + 11 + i as u32);
        players.push(pitcher(id, format!("{} RP{}", name, i + 1), pitching.clone()));
        pitcher_usage.insert(id, PitcherUsageConfig::reliever(*policy));
        reliever_ids.push(id);
    }

    Team {
        name: name.to_string(),
        players,
        lineup,
        starting_pitcher_id: starter_id,
        reliever_ids,
        pitcher_usage,
    }
}

fn pitcher(id: PlayerId, name: String, pitching: PitcherAbilities) -> Player {
    Player {
        id,
        name,
        position: Position::Pitcher,
        bats: BatSide::Right,
        batting: BatterAbilities { contact: 20, power: 15, speed: 30, eye: 20, trajectory: 1 },
        fielding: FielderAbilities::default(),
        pitching: Some(pitching),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_do_not_overlap_between_bases() {
        let home = average_team("Home", 100);
        let away = average_team("Away", 200);
        for p in &home.players {
            assert!(away.player(p.id).is_none());
        }
        assert_eq!(home.players.len(), 15);
    }

    #[test]
    fn test_without_bullpen_is_valid() {
        let team = average_team_without_bullpen("Solo", 300);
        assert!(team.validate().is_ok());
        assert!(team.reliever_ids.is_empty());
        assert_eq!(team.players.len(), 10);
        assert_eq!(team.pitcher_usage.len(), 1);
    }

    #[test]
    fn test_without_dh_puts_starter_in_lineup() {
        let team = average_team_without_dh("NoDh", 400);
        assert!(team.validate().is_ok());
        assert!(!team.uses_designated_hitter());
        assert_eq!(team.lineup[4].player_id, PlayerId(410));
        assert_eq!(team.lineup[4].position, Position::Pitcher);
        assert!(team.player(PlayerId(405)).is_none());
        assert_eq!(team.players.len(), 14);
    }
}
