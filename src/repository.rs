use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::PredictorError;
use crate::match_log::{Match, load_matches, normalize_team_name};

/// Immutable snapshot of the match log. Built once per load; queries
/// against a snapshot stay consistent across concurrent reloads.
#[derive(Debug, Default)]
pub struct MatchSet {
    matches: Vec<Match>,
}

impl MatchSet {
    /// Orders the log chronologically (unparseable dates last, file
    /// order preserved among ties).
    pub fn new(mut matches: Vec<Match>) -> Self {
        matches.sort_by(|a, b| match (a.date, b.date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Self { matches }
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches_involving(&self, team: &str) -> Vec<&Match> {
        let team = normalize_team_name(team);
        self.matches
            .iter()
            .filter(|m| m.home_team == team || m.away_team == team)
            .collect()
    }

    pub fn matches_where_home(&self, team: &str) -> Vec<&Match> {
        let team = normalize_team_name(team);
        self.matches.iter().filter(|m| m.home_team == team).collect()
    }

    pub fn matches_where_away(&self, team: &str) -> Vec<&Match> {
        let team = normalize_team_name(team);
        self.matches.iter().filter(|m| m.away_team == team).collect()
    }

    /// Every name seen on either side, sorted and deduplicated.
    pub fn teams(&self) -> Vec<String> {
        let mut names: Vec<&str> = self
            .matches
            .iter()
            .flat_map(|m| [m.home_team.as_str(), m.away_team.as_str()])
            .collect();
        names.sort_unstable();
        names.dedup();
        names.into_iter().map(|s| s.to_string()).collect()
    }
}

/// Owns the published snapshot and the path it was loaded from.
pub struct MatchRepository {
    source: PathBuf,
    snapshot: RwLock<Arc<MatchSet>>,
}

impl MatchRepository {
    pub fn open(source: impl Into<PathBuf>) -> Result<Self, PredictorError> {
        let source = source.into();
        let set = MatchSet::new(load_matches(&source)?);
        Ok(Self {
            source,
            snapshot: RwLock::new(Arc::new(set)),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn snapshot(&self) -> Arc<MatchSet> {
        self.snapshot.read().clone()
    }

    /// Re-reads the source and swaps the published snapshot in one
    /// store. The new set is parsed completely before the swap, so a
    /// broken file leaves the previous snapshot serving queries.
    pub fn reload(&self) -> Result<usize, PredictorError> {
        let set = MatchSet::new(load_matches(&self.source)?);
        let count = set.len();
        *self.snapshot.write() = Arc::new(set);
        Ok(count)
    }

    pub fn teams(&self) -> Vec<String> {
        self.snapshot().teams()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixture(home: &str, away: &str, hg: u32, ag: u32, date: &str) -> Match {
        Match {
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_goals: hg,
            away_goals: ag,
            date: crate::match_log::parse_match_date(date),
            date_raw: date.to_string(),
            season: None,
            matchday: None,
        }
    }

    #[test]
    fn set_orders_chronologically_with_unknown_dates_last() {
        let set = MatchSet::new(vec![
            fixture("A", "B", 1, 0, "2023-02-01"),
            fixture("C", "D", 0, 0, "sometime"),
            fixture("A", "C", 2, 2, "2023-01-01"),
        ]);
        let dates: Vec<Option<NaiveDate>> = set.matches().iter().map(|m| m.date).collect();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2023, 2, 1));
        assert_eq!(dates[2], None);
    }

    #[test]
    fn views_split_by_venue_role() {
        let set = MatchSet::new(vec![
            fixture("A", "B", 1, 0, "2023-01-01"),
            fixture("B", "A", 2, 1, "2023-01-08"),
            fixture("B", "C", 0, 3, "2023-01-15"),
        ]);
        assert_eq!(set.matches_involving("A").len(), 2);
        assert_eq!(set.matches_where_home("A").len(), 1);
        assert_eq!(set.matches_where_away("A").len(), 1);
        assert_eq!(set.matches_where_home("B").len(), 2);
        // Lookup normalizes the queried name the same way the loader does.
        assert_eq!(set.matches_involving("  A\n").len(), 2);
    }

    #[test]
    fn teams_are_sorted_and_unique() {
        let set = MatchSet::new(vec![
            fixture("B", "A", 1, 0, "2023-01-01"),
            fixture("A", "C", 1, 0, "2023-01-02"),
        ]);
        assert_eq!(set.teams(), vec!["A", "B", "C"]);
    }
}
