use serde::Serialize;

// Long-run league scoring rates. These are fixed priors, not values
// fitted from the loaded dataset: a single season of one team's matches
// is too sparse to estimate a baseline reliably.
const HOME_GOAL_BASELINE: f64 = 1.5;
const AWAY_GOAL_BASELINE: f64 = 1.1;

const FORM_WINDOW: usize = 5;
const RATE_LOOKBACK: usize = 10;

// Additive display boost applied to the confidence scalar. Not a
// calibrated probability; callers must not treat it as one.
const CONFIDENCE_DISPLAY_OFFSET: f64 = 15.0;

#[derive(Debug, Clone, Serialize)]
pub struct EngineConfig {
    pub home_goal_baseline: f64,
    pub away_goal_baseline: f64,
    /// Default window for standalone form queries.
    pub form_window: usize,
    /// Recency window feeding the goal-rate model.
    pub rate_lookback: usize,
    pub confidence_display_offset: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            home_goal_baseline: HOME_GOAL_BASELINE,
            away_goal_baseline: AWAY_GOAL_BASELINE,
            form_window: FORM_WINDOW,
            rate_lookback: RATE_LOOKBACK,
            confidence_display_offset: CONFIDENCE_DISPLAY_OFFSET,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `GOALCAST_*` environment variables where
    /// set and parseable.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = env_f64("GOALCAST_HOME_BASELINE") {
            cfg.home_goal_baseline = v;
        }
        if let Some(v) = env_f64("GOALCAST_AWAY_BASELINE") {
            cfg.away_goal_baseline = v;
        }
        if let Some(v) = env_usize("GOALCAST_FORM_WINDOW") {
            cfg.form_window = v.max(1);
        }
        if let Some(v) = env_usize("GOALCAST_RATE_LOOKBACK") {
            cfg.rate_lookback = v.max(1);
        }
        if let Some(v) = env_f64("GOALCAST_CONFIDENCE_OFFSET") {
            cfg.confidence_display_offset = v;
        }
        cfg
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
