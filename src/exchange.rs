use crate::model::ClassRoster;
use anyhow::Context;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read import file: {0}")]
    Read(#[from] std::io::Error),

    #[error("import file is not a valid class list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("import file contains no classes")]
    Empty,

    #[error("duplicate class name: {0}")]
    DuplicateClass(String),

    #[error("duplicate student id {id} in class {class_name}")]
    DuplicateStudent { class_name: String, id: String },
}

/// Compact form used for the workspace blob.
pub fn encode_rosters(rosters: &[ClassRoster]) -> anyhow::Result<String> {
    serde_json::to_string(rosters).context("failed to serialize rosters")
}

pub fn decode_rosters(text: &str) -> Result<Vec<ClassRoster>, ImportError> {
    let rosters: Vec<ClassRoster> = serde_json::from_str(text)?;
    validate_rosters(&rosters)?;
    Ok(rosters)
}

pub fn validate_rosters(rosters: &[ClassRoster]) -> Result<(), ImportError> {
    if rosters.is_empty() {
        return Err(ImportError::Empty);
    }
    let mut class_names = HashSet::new();
    for roster in rosters {
        if !class_names.insert(roster.class_name.as_str()) {
            return Err(ImportError::DuplicateClass(roster.class_name.clone()));
        }
        let mut ids = HashSet::new();
        for s in &roster.students {
            if !ids.insert(s.id.as_str()) {
                return Err(ImportError::DuplicateStudent {
                    class_name: roster.class_name.clone(),
                    id: s.id.clone(),
                });
            }
        }
    }
    Ok(())
}

pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.txt", prefix, date.format("%Y-%m-%d"))
}

/// Writes the pretty-printed roster list into `dir` and returns the path.
pub fn export_to_dir(
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
    rosters: &[ClassRoster],
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.to_string_lossy()))?;
    let out_path = dir.join(export_file_name(prefix, date));
    let text = serde_json::to_string_pretty(rosters).context("failed to serialize rosters")?;
    std::fs::write(&out_path, text).with_context(|| {
        format!(
            "failed to write export file {}",
            out_path.to_string_lossy()
        )
    })?;
    Ok(out_path)
}

pub fn read_import_file(path: &Path) -> Result<Vec<ClassRoster>, ImportError> {
    let text = std::fs::read_to_string(path)?;
    decode_rosters(&text)
}
