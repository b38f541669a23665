use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Csv,
    Markdown,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(SnapshotFormat::Csv),
            "md" | "markdown" => Some(SnapshotFormat::Markdown),
            _ => None,
        }
    }
}

/// Parse a completion flag as written by spreadsheets and exports.
pub(crate) fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Some(false),
        "1" | "true" | "yes" | "y" | "x" => Some(true),
        _ => None,
    }
}
