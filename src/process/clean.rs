use crate::error::CleanError;
use crate::process::age::parse_age_band;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::path::Path;
use tracing::{debug, warn};

/// Output schema of the cleaned table.
pub const CLEANED_HEADER: [&str; 6] =
    ["AgeGroup", "Sex", "Height", "Weight", "BMI", "BMI_category"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Normalize a source label. Exact labels only: substring matching would
    /// classify "female" as male.
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "men" => Some(Sex::Male),
            "f" | "female" | "women" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// One kept row. Source values are preserved verbatim; BMI and its category
/// are the only derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRow {
    pub age_group: String,
    pub sex: Sex,
    pub height: String,
    pub weight: String,
    pub bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
}

/// Result of one cleaning pass: kept rows in source order plus the count of
/// rows dropped by the age/sex filters or malformed records.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub rows: Vec<CleanedRow>,
    pub dropped: usize,
}

/// Column aliases the source table is known to use, lowercase.
const AGE_ALIASES: &[&str] = &["age group", "agegroup", "age"];
const SEX_ALIASES: &[&str] = &["sex", "gender"];

pub(crate) fn is_known_column(name: &str) -> bool {
    let n = name.trim().trim_matches('"').to_ascii_lowercase();
    AGE_ALIASES.contains(&n.as_str())
        || SEX_ALIASES.contains(&n.as_str())
        || n.contains("height")
        || n.contains("weight")
        || n.contains("bmi")
}

#[derive(Debug)]
struct ColumnMap {
    age: usize,
    sex: usize,
    height: Option<usize>,
    weight: Option<usize>,
    bmi: Option<usize>,
}

/// Fuzzy, case-insensitive header detection, first match wins per concern.
fn detect_columns(headers: &StringRecord) -> Result<ColumnMap, CleanError> {
    let mut age = None;
    let mut sex = None;
    let mut height = None;
    let mut weight = None;
    let mut bmi = None;

    for (i, name) in headers.iter().enumerate() {
        let n = name.trim().to_ascii_lowercase();
        if age.is_none() && (n.contains("age group") || n == "agegroup" || n == "age") {
            age = Some(i);
        }
        if sex.is_none() && SEX_ALIASES.iter().any(|a| n.contains(a)) {
            sex = Some(i);
        }
        if bmi.is_none() && n.contains("bmi") {
            bmi = Some(i);
        }
        if height.is_none() && n.contains("height") {
            height = Some(i);
        }
        if weight.is_none() && n.contains("weight") {
            weight = Some(i);
        }
    }

    match (age, sex) {
        (Some(age), Some(sex)) => Ok(ColumnMap {
            age,
            sex,
            height,
            weight,
            bmi,
        }),
        _ => Err(CleanError::MissingColumns {
            age_found: age.is_some(),
            sex_found: sex.is_some(),
        }),
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().replace(',', "").parse().ok()?;
    v.is_finite().then_some(v)
}

/// Height column may be metres or centimetres; anything above 3 is taken as
/// centimetres.
fn height_metres(raw: &str) -> Option<f64> {
    let h = parse_number(raw)?;
    let h = if h > 3.0 { h / 100.0 } else { h };
    (h > 0.0).then_some(h)
}

/// Clean one raw CSV text into the fixed output schema.
///
/// Rows whose age group does not overlap `[min_age, max_age]`, or whose sex
/// does not normalize to Male/Female, are dropped and counted. BMI is taken
/// from a BMI column when the source has one, otherwise derived from height
/// and weight; missing or non-numeric BMI inputs leave the field empty but
/// keep the row. Deterministic and order-preserving.
pub fn clean(csv_text: &str, min_age: u32, max_age: u32) -> Result<CleanOutcome, CleanError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader.headers()?.clone();
    let cols = detect_columns(&headers)?;
    debug!(?cols, "detected columns");

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "skipping malformed record");
                dropped += 1;
                continue;
            }
        };

        let age_group = record.get(cols.age).unwrap_or("").to_string();
        let keep_age = parse_age_band(&age_group)
            .map(|band| band.overlaps(min_age, max_age))
            .unwrap_or(false);
        let sex = record.get(cols.sex).and_then(Sex::parse);

        let (Some(sex), true) = (sex, keep_age) else {
            dropped += 1;
            continue;
        };

        let height = cols
            .height
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .to_string();
        let weight = cols
            .weight
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .to_string();

        let bmi = cols
            .bmi
            .and_then(|i| record.get(i))
            .and_then(parse_number)
            .or_else(|| {
                let h = height_metres(&height)?;
                let w = parse_number(&weight)?;
                Some(w / (h * h))
            });
        let bmi_category = bmi.map(BmiCategory::from_bmi);

        rows.push(CleanedRow {
            age_group,
            sex,
            height,
            weight,
            bmi,
            bmi_category,
        });
    }

    debug!(kept = rows.len(), dropped, "cleaning pass complete");
    Ok(CleanOutcome { rows, dropped })
}

/// Write the cleaned rows to `path` with the fixed header, BMI to two
/// decimal places, empty fields where BMI could not be derived.
pub fn write_cleaned(path: impl AsRef<Path>, rows: &[CleanedRow]) -> Result<(), CleanError> {
    let mut writer = WriterBuilder::new().from_path(path.as_ref())?;
    writer.write_record(CLEANED_HEADER)?;
    for row in rows {
        let bmi = row.bmi.map(|b| format!("{:.2}", b)).unwrap_or_default();
        writer.write_record([
            row.age_group.as_str(),
            row.sex.as_str(),
            row.height.as_str(),
            row.weight.as_str(),
            bmi.as_str(),
            row.bmi_category.map(|c| c.as_str()).unwrap_or(""),
        ])?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
