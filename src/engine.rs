use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::PredictorError;
use crate::form::{FormSummary, team_form};
use crate::goal_rates::expected_goals;
use crate::match_log::normalize_team_name;
use crate::outcome::{GoalMarkets, Scoreline, distribute};
use crate::repository::{MatchRepository, MatchSet};
use crate::strength::{VenueAnalysis, venue_analysis};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

/// The full result for one fixture. Ephemeral: built per request, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct FixturePrediction {
    pub home_team: String,
    pub away_team: String,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub probabilities: OutcomeProbabilities,
    pub most_likely_score: Scoreline,
    pub goal_markets: GoalMarkets,
    pub confidence: f64,
    pub home_form: FormSummary,
    pub away_form: FormSummary,
    /// `None` when either side has no history in its venue role; the
    /// prediction itself still stands on the fallback rates.
    pub venue_analysis: Option<VenueAnalysis>,
}

/// Composes the repository, form, strength, rate, and outcome stages.
/// Every `predict` call is pure with respect to the current snapshot:
/// repeated calls between reloads return bit-identical results.
pub struct PredictionEngine {
    repo: MatchRepository,
    config: EngineConfig,
}

impl PredictionEngine {
    pub fn open(source: impl Into<PathBuf>, config: EngineConfig) -> Result<Self, PredictorError> {
        Ok(Self {
            repo: MatchRepository::open(source)?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn teams(&self) -> Vec<String> {
        self.repo.teams()
    }

    /// The current snapshot; callers keep a consistent view across a
    /// concurrent refresh.
    pub fn matches(&self) -> Arc<MatchSet> {
        self.repo.snapshot()
    }

    /// Recent-form summary with the caller's window, or the configured
    /// default when `window` is `None`.
    pub fn form(&self, team: &str, window: Option<usize>) -> FormSummary {
        let set = self.repo.snapshot();
        team_form(&set, team, window.unwrap_or(self.config.form_window))
    }

    pub fn predict(
        &self,
        home_team: &str,
        away_team: &str,
    ) -> Result<FixturePrediction, PredictorError> {
        let home = normalize_team_name(home_team);
        let away = normalize_team_name(away_team);
        if home.is_empty() || away.is_empty() {
            return Err(PredictorError::Prediction(
                "both team names are required".to_string(),
            ));
        }

        // One snapshot for the whole request.
        let set = self.repo.snapshot();

        let home_form = team_form(&set, &home, self.config.rate_lookback);
        let away_form = team_form(&set, &away, self.config.rate_lookback);

        let rates = expected_goals(&home_form, &away_form, &self.config);
        let dist = distribute(rates.lambda_home, rates.lambda_away, &self.config);

        // Venue analysis is informational; a side with no venue history
        // drops the block instead of failing the prediction.
        let venue = match venue_analysis(&set, &home, &away) {
            Ok(analysis) => Some(analysis),
            Err(PredictorError::NoData { .. }) => None,
            Err(err) => return Err(err),
        };

        Ok(FixturePrediction {
            home_team: home,
            away_team: away,
            lambda_home: rates.lambda_home,
            lambda_away: rates.lambda_away,
            probabilities: OutcomeProbabilities {
                home_win: dist.home_win,
                draw: dist.draw,
                away_win: dist.away_win,
            },
            most_likely_score: dist.most_likely_score,
            goal_markets: dist.markets,
            confidence: dist.confidence,
            home_form,
            away_form,
            venue_analysis: venue,
        })
    }

    /// Reloads the match log. On failure the previous snapshot keeps
    /// serving; on success returns the new match count.
    pub fn refresh(&self) -> Result<usize, PredictorError> {
        self.repo.reload()
    }
}
