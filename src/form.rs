use std::cmp::Ordering;

use serde::Serialize;

use crate::match_log::{Match, Venue, normalize_team_name};
use crate::repository::MatchSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

/// One line of a team's recent history, from that team's perspective.
#[derive(Debug, Clone, Serialize)]
pub struct FormEntry {
    pub date: String,
    pub opponent: String,
    pub venue: Venue,
    /// Always rendered home-away, regardless of the queried team's side.
    pub score: String,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormSummary {
    pub team: String,
    pub window_requested: usize,
    pub window_actual: usize,
    /// `"Last N matches"`, or `"No data"` for teams absent from the log.
    pub period: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_conceded: u32,
    /// Most recent first.
    pub match_history: Vec<FormEntry>,
}

impl FormSummary {
    pub fn has_data(&self) -> bool {
        self.window_actual > 0
    }

    pub fn avg_goals_scored(&self) -> f64 {
        if self.window_actual == 0 {
            0.0
        } else {
            f64::from(self.goals_scored) / self.window_actual as f64
        }
    }

    pub fn avg_goals_conceded(&self) -> f64 {
        if self.window_actual == 0 {
            0.0
        } else {
            f64::from(self.goals_conceded) / self.window_actual as f64
        }
    }

    fn no_data(team: String, window_requested: usize) -> Self {
        Self {
            team,
            window_requested,
            window_actual: 0,
            period: "No data".to_string(),
            wins: 0,
            draws: 0,
            losses: 0,
            goals_scored: 0,
            goals_conceded: 0,
            match_history: Vec::new(),
        }
    }
}

/// Summarizes a team's last `window` matches. Unknown teams get a
/// zeroed summary rather than an error so a sparse log cannot take the
/// prediction pipeline down.
pub fn team_form(set: &MatchSet, team: &str, window: usize) -> FormSummary {
    let team = normalize_team_name(team);
    let mut played = set.matches_involving(&team);
    if played.is_empty() {
        return FormSummary::no_data(team, window);
    }

    // Most recent first; matches without a parseable date sink to the
    // end, matching how the source feed orders unknowns.
    played.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    played.truncate(window);

    let mut summary = FormSummary {
        team: team.clone(),
        window_requested: window,
        window_actual: played.len(),
        period: format!("Last {} matches", played.len()),
        wins: 0,
        draws: 0,
        losses: 0,
        goals_scored: 0,
        goals_conceded: 0,
        match_history: Vec::with_capacity(played.len()),
    };

    for m in played {
        let venue = if m.home_team == team {
            Venue::Home
        } else {
            Venue::Away
        };
        let (goals_for, goals_against) = match venue {
            Venue::Home => (m.home_goals, m.away_goals),
            Venue::Away => (m.away_goals, m.home_goals),
        };

        summary.goals_scored += goals_for;
        summary.goals_conceded += goals_against;

        let outcome = if goals_for > goals_against {
            summary.wins += 1;
            MatchOutcome::Win
        } else if goals_for < goals_against {
            summary.losses += 1;
            MatchOutcome::Loss
        } else {
            summary.draws += 1;
            MatchOutcome::Draw
        };

        summary.match_history.push(FormEntry {
            date: history_date(m),
            opponent: match venue {
                Venue::Home => m.away_team.clone(),
                Venue::Away => m.home_team.clone(),
            },
            venue,
            score: format!("{}-{}", m.home_goals, m.away_goals),
            outcome,
        });
    }

    summary
}

// Best effort: parsed date, else the date portion of an ISO-like
// string, else a literal marker. Must never fail.
fn history_date(m: &Match) -> String {
    if let Some(date) = m.date {
        return date.format("%Y-%m-%d").to_string();
    }
    let raw = m.date_raw.trim();
    if raw.is_empty() {
        return "Unknown".to_string();
    }
    raw.split('T').next().unwrap_or(raw).trim().to_string()
}
