//! bb_cli
//!
//! 팀 JSON 두 개로 한 경기 시뮬레이션, 평균 팀 배치 캘리브레이션,
//! 타구 분류 분포 확인

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "bb_cli")]
#[command(about = "Simulate and calibrate baseball games", long_about = None)]
struct Cli {
    /// Engine config file (.yaml or .json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Config preset when no file is given (realistic, live_ball, dead_ball)
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Simulate one game and print the result JSON
    Simulate {
        /// Home team JSON file
        #[arg(long)]
        home: PathBuf,

        /// Away team JSON file
        #[arg(long)]
        away: PathBuf,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Include pitch-by-pitch at-bat logs
        #[arg(long, default_value = "false")]
        logs: bool,

        /// Pretty-print JSON
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Run average-vs-average games and compare against the anchor table
    Calibrate {
        #[arg(long, default_value_t = 1000)]
        games: u64,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Print the batted-ball class distribution for an average matchup
    BattedBalls {
        #[arg(long, default_value_t = 10_000)]
        samples: u64,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = bb_cli::load_config(cli.config.as_deref(), cli.profile.as_deref())?;

    match cli.command {
        Commands::Simulate { home, away, seed, logs, pretty } => {
            let home = bb_cli::load_team(&home)?;
            let away = bb_cli::load_team(&away)?;
            let result = bb_cli::simulate(&home, &away, seed, logs, &config)?;
            let json =
                if pretty { serde_json::to_string_pretty(&result)? } else { serde_json::to_string(&result)? };
            println!("{json}");
        }

        Commands::Calibrate { games, seed } => {
            println!("⚾ Running {games} games (seed {seed})...");
            let report = bb_cli::calibrate(games, seed, config)?;
            print_report(&report);
        }

        Commands::BattedBalls { samples, seed } => {
            let summary = bb_cli::batted_balls(samples, seed, &config);
            println!("⚾ Batted balls ({} samples)", summary.samples);
            println!("   Ground ball: {:5.1}%", summary.ground_ball_pct);
            println!("   Line drive:  {:5.1}%", summary.line_drive_pct);
            println!("   Fly ball:    {:5.1}%", summary.fly_ball_pct);
            println!("   Popup:       {:5.1}%", summary.popup_pct);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(report: &bb_core::calibration::BatchReport) {
    let s = &report.snapshot;
    println!("\n📊 League line");
    println!("   Games:     {}", s.games);
    println!("   AVG:       {:.3}", s.batting_average());
    println!("   HR/G:      {:.2}", s.home_runs_per_game());
    println!("   GO/AO:     {:.2}", s.ground_out_air_out_ratio());
    println!("   K%:        {:.1}%", s.strikeout_rate() * 100.0);
    println!("   BB%:       {:.1}%", s.walk_rate() * 100.0);
    println!("   R/G:       {:.2}", s.runs_per_game());
    println!("   W-L-T:     {}-{}-{} (home)", report.home_wins, report.away_wins, report.ties);

    let shares = report.fielders.shares();
    if report.fielders.total() > 0 {
        println!("\n🧤 Primary fielder share (P C 1B 2B 3B SS LF CF RF)");
        let line: Vec<String> = shares.iter().map(|p| format!("{:.1}", p * 100.0)).collect();
        println!("   {}", line.join(" "));
    }

    if report.warnings.is_empty() {
        println!("\n✅ All anchors in range");
    } else {
        println!("\n⚠️  {} anchor(s) out of range", report.warnings.len());
        for w in &report.warnings {
            println!("   {w}");
        }
    }

    for (index, violation) in &report.invariant_violations {
        println!("❌ game #{index}: {violation}");
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("bb_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
