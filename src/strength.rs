use serde::Serialize;

use crate::error::PredictorError;
use crate::match_log::{Match, Venue, normalize_team_name};
use crate::repository::MatchSet;

/// Scoring averages restricted to one venue role. Only built from a
/// non-empty subset; an empty one is a `NoData` error, not a zeroed
/// profile, because these averages feed rate computation directly and a
/// silent zero would corrupt it.
#[derive(Debug, Clone, Serialize)]
pub struct StrengthProfile {
    pub team: String,
    pub matches_played: usize,
    pub avg_goals_scored: f64,
    pub avg_goals_conceded: f64,
}

/// A team's scoring record in its home matches only.
pub fn home_strength(set: &MatchSet, team: &str) -> Result<StrengthProfile, PredictorError> {
    let team = normalize_team_name(team);
    let matches = set.matches_where_home(&team);
    profile(team, Venue::Home, &matches)
}

/// A team's scoring record in its away matches only.
pub fn away_strength(set: &MatchSet, team: &str) -> Result<StrengthProfile, PredictorError> {
    let team = normalize_team_name(team);
    let matches = set.matches_where_away(&team);
    profile(team, Venue::Away, &matches)
}

fn profile(
    team: String,
    venue: Venue,
    matches: &[&Match],
) -> Result<StrengthProfile, PredictorError> {
    if matches.is_empty() {
        return Err(PredictorError::NoData { team, venue });
    }

    let n = matches.len() as f64;
    let (scored, conceded) = matches.iter().fold((0u32, 0u32), |(gs, gc), m| match venue {
        Venue::Home => (gs + m.home_goals, gc + m.away_goals),
        Venue::Away => (gs + m.away_goals, gc + m.home_goals),
    });

    Ok(StrengthProfile {
        team,
        matches_played: matches.len(),
        avg_goals_scored: f64::from(scored) / n,
        avg_goals_conceded: f64::from(conceded) / n,
    })
}

/// Side-by-side venue performance for a fixture, with the rate pair the
/// venue averages imply. Informational: the outcome grid uses the
/// form-based rates, not these.
#[derive(Debug, Clone, Serialize)]
pub struct VenueAnalysis {
    pub home: StrengthProfile,
    pub away: StrengthProfile,
    pub lambda_home: f64,
    pub lambda_away: f64,
}

pub fn venue_analysis(
    set: &MatchSet,
    home_team: &str,
    away_team: &str,
) -> Result<VenueAnalysis, PredictorError> {
    let home = home_strength(set, home_team)?;
    let away = away_strength(set, away_team)?;
    let lambda_home = home.avg_goals_scored * away.avg_goals_conceded;
    let lambda_away = away.avg_goals_scored * home.avg_goals_conceded;
    Ok(VenueAnalysis {
        home,
        away,
        lambda_home,
        lambda_away,
    })
}
