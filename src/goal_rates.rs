use serde::Serialize;

use crate::config::EngineConfig;
use crate::form::FormSummary;

/// The two Poisson rate parameters for a fixture, with the strength
/// ratios that produced them.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GoalRates {
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub home_attack: f64,
    pub home_defense: f64,
    pub away_attack: f64,
    pub away_defense: f64,
}

/// Scoring rate relative to a league baseline. Degrades to
/// league-average (1.0) instead of dividing by a non-positive baseline.
pub fn attack_strength(goals_scored_per_match: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        goals_scored_per_match / baseline
    } else {
        1.0
    }
}

/// Conceding rate relative to a league baseline, same degradation rule.
pub fn defense_weakness(goals_conceded_per_match: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        goals_conceded_per_match / baseline
    } else {
        1.0
    }
}

/// Expected goals for each side from the two recent-form summaries.
///
/// A side with an empty lookback window takes league-average ratios
/// (1.0) for both attack and defense. That is a deliberate
/// bias-to-average for unknown or newly promoted teams, not an error
/// path: predictions stay usable on sparse data.
///
/// Defense ratios divide by the baseline of the opposing side's scoring
/// context: a home defense is measured against away-goal rates and vice
/// versa.
pub fn expected_goals(
    home_form: &FormSummary,
    away_form: &FormSummary,
    config: &EngineConfig,
) -> GoalRates {
    let (home_attack, home_defense) = if home_form.has_data() {
        (
            attack_strength(home_form.avg_goals_scored(), config.home_goal_baseline),
            defense_weakness(home_form.avg_goals_conceded(), config.away_goal_baseline),
        )
    } else {
        (1.0, 1.0)
    };

    let (away_attack, away_defense) = if away_form.has_data() {
        (
            attack_strength(away_form.avg_goals_scored(), config.away_goal_baseline),
            defense_weakness(away_form.avg_goals_conceded(), config.home_goal_baseline),
        )
    } else {
        (1.0, 1.0)
    };

    GoalRates {
        lambda_home: home_attack * away_defense * config.home_goal_baseline,
        lambda_away: away_attack * home_defense * config.away_goal_baseline,
        home_attack,
        home_defense,
        away_attack,
        away_defense,
    }
}
