//! JSON export of duplicate groups.

use super::GroupReport;
use crate::core::comparator::DuplicateGroup;
use crate::error::ReportError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Export groups as a pretty-printed JSON array of [`GroupReport`]s
pub fn export_json<W: Write>(
    groups: &[DuplicateGroup],
    baselines: &[String],
    mut writer: W,
) -> Result<(), ReportError> {
    let reports: Vec<GroupReport> = groups
        .iter()
        .map(|group| GroupReport::new(group, baselines))
        .collect();

    serde_json::to_writer_pretty(&mut writer, &reports)
        .map_err(|e| ReportError::Serialization(e.to_string()))?;
    writeln!(writer).map_err(|e| ReportError::Serialization(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| ReportError::Serialization(e.to_string()))
}

/// Export groups as JSON to `path`, replacing any existing file
pub fn export_json_file(
    path: &Path,
    groups: &[DuplicateGroup],
    baselines: &[String],
) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    export_json(groups, baselines, BufWriter::new(file))?;

    info!("Exported {} duplicate groups to {}", groups.len(), path.display());
    Ok(())
}
