use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};

use goalcast::config::EngineConfig;
use goalcast::engine::{FixturePrediction, PredictionEngine};
use goalcast::form::FormSummary;

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = take_flag(&mut args, "--json");

    if args.len() < 2 {
        print_usage();
        bail!("missing arguments");
    }

    let data = PathBuf::from(&args[0]);
    let config = EngineConfig::from_env();
    let engine = PredictionEngine::open(&data, config)
        .with_context(|| format!("load match log {}", data.display()))?;

    match args[1].as_str() {
        "teams" => {
            let teams = engine.teams();
            if json {
                println!("{}", serde_json::to_string_pretty(&teams)?);
            } else {
                for team in teams {
                    println!("{team}");
                }
            }
        }
        "form" => {
            let Some(team) = args.get(2) else {
                print_usage();
                bail!("form needs a team name");
            };
            let window = args.get(3).map(|w| w.parse::<usize>()).transpose()?;
            let form = engine.form(team, window);
            if json {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                print_form(&form);
            }
        }
        "predict" => {
            let (Some(home), Some(away)) = (args.get(2), args.get(3)) else {
                print_usage();
                bail!("predict needs a home and an away team");
            };
            let prediction = engine.predict(home, away)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                print_prediction(&prediction);
            }
        }
        other => {
            print_usage();
            bail!("unknown command: {other}");
        }
    }

    Ok(())
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn print_usage() {
    eprintln!("usage: goalcast <matches-file> <command> [--json]");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  teams                      list every team in the log");
    eprintln!("  form <team> [window]       recent-form summary");
    eprintln!("  predict <home> <away>      full fixture prediction");
}

fn print_form(form: &FormSummary) {
    println!("{} ({})", form.team, form.period);
    println!(
        "W{} D{} L{}  scored {}  conceded {}",
        form.wins, form.draws, form.losses, form.goals_scored, form.goals_conceded
    );
    for entry in &form.match_history {
        println!(
            "  {}  {:?} vs {}  {}  {:?}",
            entry.date, entry.venue, entry.opponent, entry.score, entry.outcome
        );
    }
}

fn print_prediction(p: &FixturePrediction) {
    println!("{} vs {}", p.home_team, p.away_team);
    println!("expected goals: {:.2} / {:.2}", p.lambda_home, p.lambda_away);
    println!(
        "home win {:.1}%  draw {:.1}%  away win {:.1}%",
        p.probabilities.home_win * 100.0,
        p.probabilities.draw * 100.0,
        p.probabilities.away_win * 100.0
    );
    println!("most likely score: {}", p.most_likely_score);
    println!(
        "over 1.5 {:.1}%  over 2.5 {:.1}%  btts {:.1}%",
        p.goal_markets.over_1_5 * 100.0,
        p.goal_markets.over_2_5 * 100.0,
        p.goal_markets.both_teams_score * 100.0
    );
    println!("confidence: {:.1}", p.confidence);
    if let Some(venue) = &p.venue_analysis {
        println!(
            "venue record: {} {:.2} scored / {:.2} conceded at home ({} played), {} {:.2} / {:.2} away ({} played)",
            venue.home.team,
            venue.home.avg_goals_scored,
            venue.home.avg_goals_conceded,
            venue.home.matches_played,
            venue.away.team,
            venue.away.avg_goals_scored,
            venue.away.avg_goals_conceded,
            venue.away.matches_played
        );
    }
}
