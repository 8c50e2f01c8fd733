use std::fmt;

use serde::Serialize;

use crate::config::EngineConfig;

/// Scoreline grid cutoff: goal counts in `[0, MAX_GOALS)` per side.
/// Mass at or beyond the cutoff is dropped, not redistributed, so grid
/// totals slightly undershoot the true infinite-support distribution.
pub const MAX_GOALS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.home, self.away)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct GoalMarkets {
    pub over_1_5: f64,
    pub over_2_5: f64,
    pub both_teams_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeDistribution {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub most_likely_score: Scoreline,
    pub markets: GoalMarkets,
    /// Display heuristic (max outcome share scaled up by a fixed
    /// offset), not a calibrated confidence interval.
    pub confidence: f64,
}

/// Direct Poisson pmf, `λ^k e^{-λ} / k!`. Negative rates clamp to zero.
pub fn poisson_pmf(k: u32, lambda: f64) -> f64 {
    let lambda = lambda.max(0.0);
    lambda.powi(k as i32) * (-lambda).exp() / factorial(k)
}

fn factorial(k: u32) -> f64 {
    (1..=k).map(f64::from).product()
}

/// Enumerates the bounded scoreline grid for a rate pair and aggregates
/// it into outcome, scoreline, and goal-market probabilities.
///
/// The win/draw/loss masses are normalized by their own sum; the goal
/// markets by the full grid total. Legacy behavior, preserved for
/// numeric compatibility with the prior model.
pub fn distribute(lambda_home: f64, lambda_away: f64, config: &EngineConfig) -> OutcomeDistribution {
    let mut home_win = 0.0;
    let mut draw = 0.0;
    let mut away_win = 0.0;
    let mut grid_total = 0.0;
    let mut over_1_5 = 0.0;
    let mut over_2_5 = 0.0;
    let mut both_score = 0.0;

    let mut best = Scoreline { home: 0, away: 0 };
    let mut best_p = 0.0;

    for i in 0..MAX_GOALS {
        let p_home_goals = poisson_pmf(i, lambda_home);
        for j in 0..MAX_GOALS {
            let p = p_home_goals * poisson_pmf(j, lambda_away);
            grid_total += p;

            if i > j {
                home_win += p;
            } else if i == j {
                draw += p;
            } else {
                away_win += p;
            }

            if i + j >= 2 {
                over_1_5 += p;
            }
            if i + j >= 3 {
                over_2_5 += p;
            }
            if i >= 1 && j >= 1 {
                both_score += p;
            }

            // Strict comparison: the first maximum in scan order wins ties.
            if p > best_p {
                best_p = p;
                best = Scoreline { home: i, away: j };
            }
        }
    }

    let outcome_total = home_win + draw + away_win;
    if outcome_total > 0.0 {
        home_win /= outcome_total;
        draw /= outcome_total;
        away_win /= outcome_total;
    }

    let markets = if grid_total > 0.0 {
        GoalMarkets {
            over_1_5: over_1_5 / grid_total,
            over_2_5: over_2_5 / grid_total,
            both_teams_score: both_score / grid_total,
        }
    } else {
        GoalMarkets {
            over_1_5: 0.0,
            over_2_5: 0.0,
            both_teams_score: 0.0,
        }
    };

    let confidence =
        home_win.max(draw).max(away_win) * 100.0 + config.confidence_display_offset;

    OutcomeDistribution {
        home_win,
        draw,
        away_win,
        most_likely_score: best,
        markets,
        confidence,
    }
}
