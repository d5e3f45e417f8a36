//! Pitching decisions: 승/패, 세이브, 홀드, 블론세이브, 퀄리티 스타트

use super::state::{GameState, Outing};
use crate::engine::box_score::PitchingDecisions;
use crate::engine::config::EngineConfig;
use crate::models::events::TeamSide;
use crate::models::player::PlayerId;

/// 한 팀이 리드를 잡은 순간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadChange {
    pub side: TeamSide,
    /// 리드를 잡은 팀의 책임 투수 (그 시점 마지막으로 등판한 투수)
    pub pitcher_of_record: PlayerId,
    /// 결승점 주자를 내보낸 상대 투수
    pub go_ahead_responsible: PlayerId,
}

pub fn decide(cfg: &EngineConfig, state: &GameState, lead_changes: &[LeadChange], winner: Option<TeamSide>) -> PitchingDecisions {
    let save_lead_max = cfg.rules.save_lead_max;
    let mut decisions = PitchingDecisions::default();

    if let Some(side) = winner {
        if let Some(change) = lead_changes.iter().rev().find(|c| c.side == side) {
            decisions.winning_pitcher_id = Some(credit_win(cfg, &state.side(side).outings, change.pitcher_of_record));
            decisions.losing_pitcher_id = Some(change.go_ahead_responsible);
        }

        let outings = &state.side(side).outings;
        if let Some(finisher) = outings.last() {
            if !finisher.is_starter
                && Some(finisher.pitcher_id) != decisions.winning_pitcher_id
                && earns_save(finisher, save_lead_max)
            {
                decisions.save_pitcher_id = Some(finisher.pitcher_id);
            }
        }
    }

    for side in [TeamSide::Away, TeamSide::Home] {
        let outings = &state.side(side).outings;
        let finisher = outings.last().map(|o| o.pitcher_id);
        for outing in outings {
            if outing.is_starter {
                let b = &cfg.bullpen;
                if outing.outs >= b.quality_start_outs && outing.earned_runs <= b.quality_start_max_earned_runs {
                    decisions.quality_start_pitcher_ids.push(outing.pitcher_id);
                }
                continue;
            }
            if !outing.entered_in_save_situation(save_lead_max) {
                continue;
            }
            if outing.lost_lead() {
                decisions.blown_save_pitcher_ids.push(outing.pitcher_id);
            } else if outing.outs >= 1
                && Some(outing.pitcher_id) != finisher
                && Some(outing.pitcher_id) != decisions.winning_pitcher_id
            {
                decisions.hold_pitcher_ids.push(outing.pitcher_id);
            }
        }
    }

    decisions
}

/// 선발이 최소 아웃을 못 채웠으면 가장 많은 아웃을 잡은 불펜 투수에게 승리를 넘긴다.
fn credit_win(cfg: &EngineConfig, outings: &[Outing], pitcher_of_record: PlayerId) -> PlayerId {
    let Some(starter) = outings.iter().find(|o| o.is_starter) else {
        return pitcher_of_record;
    };
    if starter.pitcher_id != pitcher_of_record || starter.outs >= cfg.bullpen.starter_win_min_outs {
        return pitcher_of_record;
    }
    outings
        .iter()
        .filter(|o| !o.is_starter)
        .fold(None::<&Outing>, |best, o| match best {
            Some(b) if b.outs >= o.outs => Some(b),
            _ => Some(o),
        })
        .map(|o| o.pitcher_id)
        .unwrap_or(pitcher_of_record)
}

fn earns_save(outing: &Outing, save_lead_max: i32) -> bool {
    if outing.entry_lead < 1 || outing.lost_lead() {
        return false;
    }
    (outing.entry_lead <= save_lead_max && outing.outs >= 3)
        || (outing.entry_lead <= i32::from(outing.entry_runners) + 2 && outing.outs >= 1)
        || outing.outs >= 9
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outing(id: u32, starter: bool, outs: u32, entry_lead: i32, min_lead: i32) -> Outing {
        let mut o = Outing::new(PlayerId(id), starter, 100.0, 9, entry_lead, 0, 1);
        o.outs = outs;
        o.min_lead = min_lead;
        o
    }

    fn state(home: Vec<Outing>, away: Vec<Outing>) -> GameState {
        let mut s = GameState::new(home[0].clone(), away[0].clone());
        s.side_mut(TeamSide::Home).outings = home;
        s.side_mut(TeamSide::Away).outings = away;
        s
    }

    #[test]
    fn test_save_and_win() {
        let cfg = EngineConfig::default();
        let home = vec![outing(10, true, 21, 0, -1), outing(11, false, 3, 2, 1), outing(12, false, 3, 2, 1)];
        let away = vec![outing(20, true, 24, 0, -2)];
        let s = state(home, away);
        let changes = [LeadChange { side: TeamSide::Home, pitcher_of_record: PlayerId(10), go_ahead_responsible: PlayerId(20) }];

        let d = decide(&cfg, &s, &changes, Some(TeamSide::Home));
        assert_eq!(d.winning_pitcher_id, Some(PlayerId(10)));
        assert_eq!(d.losing_pitcher_id, Some(PlayerId(20)));
        assert_eq!(d.save_pitcher_id, Some(PlayerId(12)));
        assert_eq!(d.hold_pitcher_ids, vec![PlayerId(11)]);
        assert!(d.quality_start_pitcher_ids.contains(&PlayerId(10)));
    }

    #[test]
    fn test_short_starter_cedes_win() {
        let cfg = EngineConfig::default();
        let home = vec![outing(10, true, 12, 0, 0), outing(11, false, 9, 1, 1), outing(12, false, 6, 4, 4)];
        let away = vec![outing(20, true, 24, 0, -1)];
        let s = state(home, away);
        let changes = [LeadChange { side: TeamSide::Home, pitcher_of_record: PlayerId(10), go_ahead_responsible: PlayerId(20) }];

        let d = decide(&cfg, &s, &changes, Some(TeamSide::Home));
        assert_eq!(d.winning_pitcher_id, Some(PlayerId(11)));
        assert!(!d.quality_start_pitcher_ids.contains(&PlayerId(10)));
        // 승리 투수는 홀드를 받지 않는다
        assert!(d.hold_pitcher_ids.is_empty());
    }

    #[test]
    fn test_blown_save_recorded() {
        let cfg = EngineConfig::default();
        let home = vec![outing(10, true, 24, 0, 0), outing(11, false, 2, 1, -1)];
        let away = vec![outing(20, true, 21, 0, -1), outing(21, false, 3, 0, 0)];
        let s = state(home, away);
        let changes = [
            LeadChange { side: TeamSide::Home, pitcher_of_record: PlayerId(10), go_ahead_responsible: PlayerId(20) },
            LeadChange { side: TeamSide::Away, pitcher_of_record: PlayerId(21), go_ahead_responsible: PlayerId(11) },
        ];
        let d = decide(&cfg, &s, &changes, Some(TeamSide::Away));
        assert_eq!(d.blown_save_pitcher_ids, vec![PlayerId(11)]);
        assert_eq!(d.winning_pitcher_id, Some(PlayerId(21)));
        assert_eq!(d.losing_pitcher_id, Some(PlayerId(11)));
        assert_eq!(d.save_pitcher_id, None);
    }

    #[test]
    fn test_tie_has_no_decisions() {
        let cfg = EngineConfig::default();
        let s = state(vec![outing(10, true, 30, 0, 0)], vec![outing(20, true, 30, 0, 0)]);
        let d = decide(&cfg, &s, &[], None);
        assert_eq!(d.winning_pitcher_id, None);
        assert_eq!(d.losing_pitcher_id, None);
        assert_eq!(d.save_pitcher_id, None);
    }
}
