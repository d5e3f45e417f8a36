use super::*;
use crate::calibration::check_invariants;
use crate::models::fixtures::{average_team, average_team_without_bullpen, average_team_without_dh};
use crate::models::game_result::GameResult;

fn play(seed: u64) -> GameResult {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);
    simulate_game(&home, &away, &GameOptions::seeded(seed)).expect("valid teams")
}

fn play_with(config: &EngineConfig, seed: u64) -> GameOutcome {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);
    let mut rng = GameRng::seed_from_u64(seed);
    simulate_game_with(&home, &away, &GameOptions::seeded(seed), config, &BullpenLedger::new(), &mut rng)
        .expect("valid teams")
}

// ============================================================================
// Determinism / options
// ============================================================================

#[test]
fn test_same_seed_same_game() {
    for seed in [1, 7, 42] {
        assert_eq!(play(seed), play(seed));
    }
}

#[test]
fn test_different_seeds_differ() {
    let games: Vec<GameResult> = (0..10).map(play).collect();
    assert!(games.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn test_at_bat_logs_are_optional_and_complete() {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);

    let plain = simulate_game(&home, &away, &GameOptions::seeded(9)).unwrap();
    assert!(plain.at_bat_logs.is_none());

    let mut logged = simulate_game(&home, &away, &GameOptions::seeded(9).with_logs()).unwrap();
    let logs = logged.at_bat_logs.take().expect("logs requested");
    assert_eq!(logs.len() as u32, logged.total_plate_appearances);
    // 로그 수집은 난수 소비에 영향을 주지 않는다
    assert_eq!(logged, plain);

    for log in &logs {
        assert!(!log.pitches.is_empty());
        assert!(log.outs_before < 3);
        assert_eq!(log.batted_ball.is_some(), log.landing.is_some());
    }
}

// ============================================================================
// Whole-game accounting
// ============================================================================

#[test]
fn test_line_score_and_box_score_agree_with_final_score() {
    for seed in 0..60 {
        let g = play(seed);
        let away_line: u32 = g.innings.iter().map(|l| l.away_runs).sum();
        let home_line: u32 = g.innings.iter().filter_map(|l| l.home_runs).sum();
        assert_eq!(away_line, g.away_score, "seed {seed}");
        assert_eq!(home_line, g.home_score, "seed {seed}");
        assert_eq!(g.away_totals.runs, g.away_score, "seed {seed}");
        assert_eq!(g.home_totals.runs, g.home_score, "seed {seed}");

        let pitcher_runs = |side| g.pitcher_stats.iter().filter(|l| l.team == side).map(|l| l.runs).sum::<u32>();
        assert_eq!(pitcher_runs(TeamSide::Home), g.away_score, "seed {seed}");
        assert_eq!(pitcher_runs(TeamSide::Away), g.home_score, "seed {seed}");

        let pa: u32 = g.player_stats.iter().map(|l| l.plate_appearances).sum();
        let bf: u32 = g.pitcher_stats.iter().map(|l| l.batters_faced).sum();
        assert_eq!(pa, g.total_plate_appearances);
        assert_eq!(bf, g.total_plate_appearances);
    }
}

#[test]
fn test_outs_match_innings_played() {
    for seed in 0..60 {
        let g = play(seed);
        let n = u32::from(g.innings_played());
        assert!(n >= 9);
        // 원정 공격(초)은 항상 3아웃으로 끝난다
        assert_eq!(g.outs_recorded_by(TeamSide::Home), 3 * n, "seed {seed}");

        let away_outs = g.outs_recorded_by(TeamSide::Away);
        let last = g.innings.last().unwrap();
        match last.home_runs {
            None => assert_eq!(away_outs, 3 * (n - 1), "seed {seed}"),
            Some(_) if g.walk_off => assert!(away_outs >= 3 * (n - 1) && away_outs < 3 * n, "seed {seed}"),
            Some(_) => assert_eq!(away_outs, 3 * n, "seed {seed}"),
        }
    }
}

#[test]
fn test_game_always_has_a_winner_without_tie_limit() {
    for seed in 0..60 {
        let g = play(seed);
        assert!(!g.is_tie);
        assert_ne!(g.home_score, g.away_score, "seed {seed}");
        if g.walk_off {
            assert!(g.home_score > g.away_score);
            assert!(g.innings.last().unwrap().home_runs.is_some());
        }
        if g.innings.last().unwrap().home_runs.is_none() {
            assert!(g.home_score > g.away_score);
        }
    }
}

#[test]
fn test_pitching_decisions_are_consistent() {
    for seed in 0..60 {
        let g = play(seed);
        let winner = g.winner().unwrap();
        let w = g.winning_pitcher_id.expect("winner has a winning pitcher");
        let l = g.losing_pitcher_id.expect("loser has a losing pitcher");
        assert_eq!(g.pitcher(w).unwrap().team, winner, "seed {seed}");
        assert_eq!(g.pitcher(l).unwrap().team, winner.opposite(), "seed {seed}");
        assert_eq!(g.pitcher(w).unwrap().wins, 1);
        assert_eq!(g.pitcher(l).unwrap().losses, 1);
        if let Some(s) = g.save_pitcher_id {
            assert_ne!(s, w);
            assert_eq!(g.pitcher(s).unwrap().team, winner);
        }
        assert!(!g.hold_pitcher_ids.contains(&w));

        let starts: u32 = g.pitcher_stats.iter().map(|p| p.games_started).sum();
        assert_eq!(starts, 2);
    }
}

#[test]
fn test_pitching_changes_use_each_reliever_once() {
    for seed in 0..40 {
        let g = play(seed);
        let mut seen = std::collections::HashSet::new();
        for change in &g.pitching_changes {
            assert!(seen.insert(change.pitcher_in), "seed {seed}: {} re-entered", change.pitcher_in);
            assert_ne!(change.pitcher_in, PlayerId(110));
            assert_ne!(change.pitcher_in, PlayerId(210));
        }
        assert_eq!(g.pitcher_stats.len(), 2 + g.pitching_changes.len());
    }
}

// ============================================================================
// Rosters / rules
// ============================================================================

#[test]
fn test_starter_without_bullpen_finishes_game() {
    let home = average_team_without_bullpen("Home", 100);
    let away = average_team("Away", 200);
    for seed in 0..20 {
        let g = simulate_game(&home, &away, &GameOptions::seeded(seed)).unwrap();
        let home_pitchers: Vec<_> = g.pitcher_stats.iter().filter(|p| p.team == TeamSide::Home).collect();
        assert_eq!(home_pitchers.len(), 1);
        assert_eq!(home_pitchers[0].player_id, PlayerId(110));
        assert!(g.pitching_changes.iter().all(|c| c.side == TeamSide::Away));
    }
}

#[test]
fn test_pitcher_slot_bats_current_pitcher_without_dh() {
    let home = average_team_without_dh("Home", 100);
    let away = average_team("Away", 200);
    let mut reliever_batted = false;
    for seed in 0..30 {
        let g = simulate_game(&home, &away, &GameOptions::seeded(seed)).unwrap();
        check_invariants(&g).unwrap_or_else(|v| panic!("seed {seed}: {v}"));

        let starter = g.batter(PlayerId(110)).expect("starter bats in the 5 hole");
        assert!(starter.plate_appearances > 0);
        assert_eq!(starter.team, TeamSide::Home);
        assert!(g.batter(PlayerId(105)).is_none(), "seed {seed}: benched DH batted");

        for line in g.player_stats.iter().filter(|l| l.team == TeamSide::Home) {
            let id = line.player_id.0;
            if (110..=115).contains(&id) {
                let pitched = g.pitcher_stats.iter().any(|p| p.player_id == line.player_id && p.team == TeamSide::Home);
                assert!(pitched, "seed {seed}: {} batted without pitching", line.player_id);
                reliever_batted |= id > 110;
            }
        }
        let pa: u32 = g.player_stats.iter().map(|l| l.plate_appearances).sum();
        assert_eq!(pa, g.total_plate_appearances, "seed {seed}");
    }
    assert!(reliever_batted, "no reliever ever came up in the pitcher slot");
}

#[test]
fn test_closer_takes_over_at_start_of_save_half() {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);
    let options = GameOptions::seeded(1);
    let cfg = EngineConfig::default();
    let ledger = BullpenLedger::new();
    let mut engine = GameEngine::new(&home, &away, &options, &cfg, &ledger).unwrap();

    engine.state.start_half(9, Half::Top);
    engine.state.side_mut(TeamSide::Home).score = 3;
    engine.state.side_mut(TeamSide::Away).score = 1;

    // 이닝 도중에는 세이브 상황이라도 멀쩡한 선발을 바꾸지 않는다
    engine.maybe_change_pitcher(false);
    assert!(engine.pitching_changes.is_empty());
    assert_eq!(engine.pitcher(TeamSide::Home).player.id, PlayerId(110));

    engine.maybe_change_pitcher(true);
    assert_eq!(engine.pitcher(TeamSide::Home).player.id, PlayerId(111));
    assert_eq!(engine.pitching_changes.len(), 1);
    let change = engine.pitching_changes[0];
    assert_eq!(change.side, TeamSide::Home);
    assert_eq!(change.half, Half::Top);
    assert_eq!(change.outs, 0);
    assert_eq!(change.lead, 2);
    assert_eq!(change.pitcher_out, PlayerId(110));
    assert_eq!(change.pitcher_in, PlayerId(111));

    // 마무리가 이미 던지고 있으면 다시 바꾸지 않는다
    engine.maybe_change_pitcher(true);
    assert_eq!(engine.pitching_changes.len(), 1);
}

#[test]
fn test_no_closer_change_outside_save_situation() {
    let home = average_team("Home", 100);
    let away = average_team("Away", 200);
    let options = GameOptions::seeded(1);
    let cfg = EngineConfig::default();
    let ledger = BullpenLedger::new();

    for (inning, home_score) in [(9, 6), (8, 3), (9, 1)] {
        let mut engine = GameEngine::new(&home, &away, &options, &cfg, &ledger).unwrap();
        engine.state.start_half(inning, Half::Top);
        engine.state.side_mut(TeamSide::Home).score = home_score;
        engine.state.side_mut(TeamSide::Away).score = 1;
        engine.maybe_change_pitcher(true);
        assert!(engine.pitching_changes.is_empty(), "inning {inning}, {home_score}-1");
    }
}

#[test]
fn test_extra_innings_limit_allows_ties() {
    let mut config = EngineConfig::default();
    config.rules.extra_innings_limit = Some(10);

    let mut ties = 0;
    for seed in 0..200 {
        let g = play_with(&config, seed).result;
        assert!(g.innings_played() <= 10, "seed {seed}");
        if g.is_tie {
            ties += 1;
            assert_eq!(g.home_score, g.away_score);
            assert_eq!(g.innings_played(), 10);
            assert!(g.winning_pitcher_id.is_none() && g.losing_pitcher_id.is_none());
        }
    }
    assert!(ties > 0);
}

#[test]
fn test_short_game_rules() {
    let mut config = EngineConfig::default();
    config.rules.innings = 7;
    for seed in 0..20 {
        let g = play_with(&config, seed).result;
        assert_eq!(g.scheduled_innings, 7);
        assert!(g.innings_played() >= 7);
    }
}

#[test]
fn test_ledger_records_every_pitcher() {
    let outcome = play_with(&EngineConfig::default(), 3);
    assert_eq!(outcome.ledger.len(), outcome.result.pitcher_stats.len());
    for line in &outcome.result.pitcher_stats {
        let usage = outcome.ledger.usage(line.player_id).unwrap();
        assert_eq!(usage.last_pitches, line.pitches);
        assert_eq!(usage.consecutive_days, 1);
    }
}

#[test]
fn test_invalid_inputs_are_rejected_before_play() {
    let home = average_team("Home", 100);

    let mut short = average_team("Away", 200);
    short.lineup.pop();
    let err = simulate_game(&home, &short, &GameOptions::default()).unwrap_err();
    assert!(err.is_precondition());

    let clash = average_team("Clash", 100);
    let err = simulate_game(&home, &clash, &GameOptions::default()).unwrap_err();
    assert!(matches!(err, GameError::DuplicatePlayer { .. }));

    let mut config = EngineConfig::default();
    config.rules.innings = 0;
    let mut rng = GameRng::seed_from_u64(0);
    let err = simulate_game_with(&home, &average_team("Away", 200), &GameOptions::default(), &config, &BullpenLedger::new(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

// ============================================================================
// League-level sanity
// ============================================================================

struct Aggregate {
    at_bats: u32,
    hits: u32,
    home_runs: u32,
    ground_outs: u32,
    air_outs: u32,
    games: u32,
}

fn aggregate(games: u64) -> Aggregate {
    let home = average_team_without_bullpen("Home", 100);
    let away = average_team_without_bullpen("Away", 200);
    let mut agg = Aggregate { at_bats: 0, hits: 0, home_runs: 0, ground_outs: 0, air_outs: 0, games: 0 };
    for seed in 0..games {
        let g = simulate_game(&home, &away, &GameOptions::seeded(seed)).unwrap();
        for b in &g.player_stats {
            agg.at_bats += b.at_bats;
            agg.hits += b.hits;
            agg.home_runs += b.home_runs;
        }
        for p in &g.pitcher_stats {
            agg.ground_outs += p.ground_outs;
            agg.air_outs += p.air_outs;
        }
        agg.games += 1;
    }
    agg
}

#[test]
fn test_average_teams_produce_plausible_league_line() {
    let agg = aggregate(300);
    let avg = f64::from(agg.hits) / f64::from(agg.at_bats);
    let hr_per_game = f64::from(agg.home_runs) / f64::from(agg.games);
    let go_ao = f64::from(agg.ground_outs) / f64::from(agg.air_outs);

    assert!((0.22..=0.32).contains(&avg), "AVG {avg:.3}");
    assert!((0.6..=2.8).contains(&hr_per_game), "HR/G {hr_per_game:.2}");
    assert!((0.6..=1.5).contains(&go_ao), "GO/AO {go_ao:.2}");
}

#[test]
#[ignore = "10k games; run with --ignored"]
fn test_average_teams_hit_calibration_targets() {
    let agg = aggregate(10_000);
    let avg = f64::from(agg.hits) / f64::from(agg.at_bats);
    let hr_per_game = f64::from(agg.home_runs) / f64::from(agg.games);
    let go_ao = f64::from(agg.ground_outs) / f64::from(agg.air_outs);

    assert!((0.24..=0.30).contains(&avg), "AVG {avg:.3}");
    assert!((0.8..=2.5).contains(&hr_per_game), "HR/G {hr_per_game:.2}");
    assert!((0.7..=1.4).contains(&go_ao), "GO/AO {go_ao:.2}");
}
