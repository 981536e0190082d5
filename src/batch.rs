use crate::iban::{Iban, Validation};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::create_dir_all;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IbanRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub iban: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckRow {
    pub id: Option<String>,
    pub input: String,
    pub valid: bool,
    pub iban: Option<String>,
    pub formatted: Option<String>,
    pub country: Option<String>,
    pub error_kind: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckIssue {
    pub row: usize,
    pub input: String,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub duplicate_ibans: usize,
    pub issues: Vec<CheckIssue>,
    pub rows: Vec<CheckRow>,
}

impl CheckReport {
    pub fn invalid_count(&self) -> usize {
        self.issues.len()
    }

    /// Issue counts per error kind, most frequent first.
    pub fn kind_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for issue in &self.issues {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        let mut items: Vec<(&'static str, usize)> = counts.into_iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items
    }
}

pub fn check_csv(path: &Path, validation: Validation) -> Result<CheckReport, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: IbanRecord = result.map_err(|err| err.to_string())?;
        records.push(record);
    }
    log::debug!("read {} record(s) from {}", records.len(), path.display());
    Ok(check_records(&records, validation))
}

pub fn check_records(records: &[IbanRecord], validation: Validation) -> CheckReport {
    let mut issues = Vec::new();
    let mut rows = Vec::with_capacity(records.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicate_ibans = 0usize;

    for (idx, record) in records.iter().enumerate() {
        match Iban::parse_with(&record.iban, validation) {
            Ok(iban) => {
                if !seen.insert(iban.canonical().to_string()) {
                    duplicate_ibans += 1;
                }
                rows.push(CheckRow {
                    id: record.id.clone(),
                    input: record.iban.clone(),
                    valid: true,
                    iban: Some(iban.canonical().to_string()),
                    formatted: Some(iban.formatted()),
                    country: Some(iban.country_code().to_string()),
                    error_kind: None,
                    message: None,
                });
            }
            Err(err) => {
                issues.push(CheckIssue {
                    row: idx + 1,
                    input: record.iban.clone(),
                    kind: err.kind(),
                    message: err.to_string(),
                });
                rows.push(CheckRow {
                    id: record.id.clone(),
                    input: record.iban.clone(),
                    valid: false,
                    iban: None,
                    formatted: None,
                    country: None,
                    error_kind: Some(err.kind().to_string()),
                    message: Some(err.to_string()),
                });
            }
        }
    }

    CheckReport {
        total_records: records.len(),
        valid_records: records.len() - issues.len(),
        duplicate_ibans,
        issues,
        rows,
    }
}

pub fn write_check_csv(output: &Path, rows: &[CheckRow]) -> Result<(), String> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|err| err.to_string())?;
        }
    }
    let mut writer = csv::Writer::from_path(output).map_err(|err| err.to_string())?;
    for row in rows {
        writer.serialize(row).map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())
}
