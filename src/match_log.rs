use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;

use crate::error::PredictorError;

/// One finished fixture from the historical log.
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    /// Best-effort parsed date; `None` when the raw text is not one of
    /// the known formats.
    pub date: Option<NaiveDate>,
    pub date_raw: String,
    pub season: Option<String>,
    pub matchday: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Venue {
    Home,
    Away,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Home => write!(f, "home"),
            Venue::Away => write!(f, "away"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    HomeTeam,
    AwayTeam,
    HomeGoals,
    AwayGoals,
    Date,
    Season,
    Matchday,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::HomeTeam => "home team",
            Field::AwayTeam => "away team",
            Field::HomeGoals => "home score",
            Field::AwayGoals => "away score",
            Field::Date => "date",
            Field::Season => "season",
            Field::Matchday => "matchday",
        }
    }
}

// Every historical naming convention the feeds have used for the same
// semantic column. Fixed table, never inferred from the data.
const FIELD_ALIASES: &[(Field, &[&str])] = &[
    (Field::HomeTeam, &["homeTeam", "HomeTeam", "home_team"]),
    (Field::AwayTeam, &["awayTeam", "AwayTeam", "away_team"]),
    (
        Field::HomeGoals,
        &["homeScore", "home_score", "HomeGoals", "FTHG"],
    ),
    (
        Field::AwayGoals,
        &["awayScore", "away_score", "AwayGoals", "FTAG"],
    ),
    (Field::Date, &["date", "Date"]),
    (Field::Season, &["season", "Season"]),
    (Field::Matchday, &["matchday", "Matchday", "round", "Round"]),
];

static ALIAS_INDEX: Lazy<HashMap<&'static str, Field>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (field, aliases) in FIELD_ALIASES {
        for alias in *aliases {
            index.insert(*alias, *field);
        }
    }
    index
});

fn canonical_field(name: &str) -> Option<Field> {
    ALIAS_INDEX.get(name.trim()).copied()
}

/// Collapses interior whitespace runs (including stray newlines from
/// scraped sources) to single spaces and strips the ends.
pub fn normalize_team_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lenient date parsing: ISO dates, ISO datetimes (date portion only),
/// and day-first slashed forms. Anything else is `None`, never an error.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let head = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(head, fmt) {
            return Some(date);
        }
    }
    None
}

/// Loads the match log from a `.json` (array of records) or `.csv`
/// (header row) file. Any other extension is an unsupported shape.
pub fn load_matches(path: &Path) -> Result<Vec<Match>, PredictorError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("json") => {
            let raw = fs::read_to_string(path)?;
            parse_matches_json(&raw)
        }
        Some("csv") => {
            let raw = fs::read_to_string(path)?;
            parse_matches_csv(&raw)
        }
        _ => Err(PredictorError::DataFormat(format!(
            "unsupported data format: {} (expected .json or .csv)",
            path.display()
        ))),
    }
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<Match>, PredictorError> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|err| PredictorError::DataFormat(format!("invalid json: {err}")))?;
    let Some(records) = value.as_array() else {
        return Err(PredictorError::DataFormat(
            "expected a top-level json array of match records".to_string(),
        ));
    };

    let mut out = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        out.push(parse_json_record(record, idx)?);
    }
    Ok(out)
}

// Alias resolution is per-record: mixed-era logs carry both key
// spellings in the same file.
fn json_field<'a>(
    obj: &'a serde_json::Map<String, Value>,
    field: Field,
) -> Option<&'a Value> {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .and_then(|(_, aliases)| aliases.iter().find_map(|alias| obj.get(*alias)))
}

fn parse_json_record(value: &Value, idx: usize) -> Result<Match, PredictorError> {
    let Some(obj) = value.as_object() else {
        return Err(record_error(idx, "expected a json object"));
    };

    let team = |f: Field| -> Result<String, PredictorError> {
        let raw = json_field(obj, f)
            .and_then(|v| v.as_str())
            .ok_or_else(|| record_error(idx, &format!("missing {}", f.label())))?;
        let name = normalize_team_name(raw);
        if name.is_empty() {
            return Err(record_error(idx, &format!("empty {}", f.label())));
        }
        Ok(name)
    };

    let score = |f: Field| -> Result<u32, PredictorError> {
        let cell = json_field(obj, f)
            .ok_or_else(|| record_error(idx, &format!("missing {}", f.label())))?;
        score_from_value(cell).ok_or_else(|| record_error(idx, &format!("invalid {}", f.label())))
    };

    let date_raw = json_field(obj, Field::Date)
        .and_then(|v| v.as_str())
        .ok_or_else(|| record_error(idx, "missing date"))?
        .trim()
        .to_string();

    Ok(Match {
        home_team: team(Field::HomeTeam)?,
        away_team: team(Field::AwayTeam)?,
        home_goals: score(Field::HomeGoals)?,
        away_goals: score(Field::AwayGoals)?,
        date: parse_match_date(&date_raw),
        date_raw,
        season: json_field(obj, Field::Season)
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        matchday: json_field(obj, Field::Matchday).and_then(matchday_from_value),
    })
}

pub fn parse_matches_csv(raw: &str) -> Result<Vec<Match>, PredictorError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| PredictorError::DataFormat(format!("invalid csv header: {err}")))?
        .clone();

    let mut columns: HashMap<Field, usize> = HashMap::new();
    for (col, name) in headers.iter().enumerate() {
        if let Some(field) = canonical_field(name) {
            columns.entry(field).or_insert(col);
        }
    }
    for required in [
        Field::HomeTeam,
        Field::AwayTeam,
        Field::HomeGoals,
        Field::AwayGoals,
        Field::Date,
    ] {
        if !columns.contains_key(&required) {
            return Err(PredictorError::DataFormat(format!(
                "missing required csv column: {}",
                required.label()
            )));
        }
    }

    let mut out = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row =
            row.map_err(|err| record_error(idx, &format!("unreadable csv row: {err}")))?;
        out.push(parse_csv_row(&row, &columns, idx)?);
    }
    Ok(out)
}

fn parse_csv_row(
    row: &csv::StringRecord,
    columns: &HashMap<Field, usize>,
    idx: usize,
) -> Result<Match, PredictorError> {
    let cell = |field: Field| columns.get(&field).and_then(|col| row.get(*col));

    let team = |f: Field| -> Result<String, PredictorError> {
        let name = normalize_team_name(cell(f).unwrap_or(""));
        if name.is_empty() {
            return Err(record_error(idx, &format!("empty {}", f.label())));
        }
        Ok(name)
    };

    let score = |f: Field| -> Result<u32, PredictorError> {
        cell(f)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .ok_or_else(|| record_error(idx, &format!("invalid {}", f.label())))
    };

    let date_raw = cell(Field::Date).unwrap_or("").trim().to_string();
    if date_raw.is_empty() {
        return Err(record_error(idx, "missing date"));
    }

    Ok(Match {
        home_team: team(Field::HomeTeam)?,
        away_team: team(Field::AwayTeam)?,
        home_goals: score(Field::HomeGoals)?,
        away_goals: score(Field::AwayGoals)?,
        date: parse_match_date(&date_raw),
        date_raw,
        season: cell(Field::Season)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        matchday: cell(Field::Matchday).and_then(|s| s.trim().parse::<u32>().ok()),
    })
}

fn score_from_value(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value.as_str()?.trim().parse::<u32>().ok()
}

fn matchday_from_value(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value.as_str()?.trim().parse::<u32>().ok()
}

fn record_error(idx: usize, message: &str) -> PredictorError {
    PredictorError::DataFormat(format!("match record {idx}: {message}"))
}
