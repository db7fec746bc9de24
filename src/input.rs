use crate::ir::RadarEntry;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid radar entries: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntriesFile {
    List(Vec<RadarEntry>),
    Wrapped {
        #[serde(alias = "skills")]
        entries: Vec<RadarEntry>,
    },
}

/// Parses either a bare array of entries or `{"entries": [...]}` / `{"skills": [...]}`.
pub fn load_entries(json: &str) -> Result<Vec<RadarEntry>, InputError> {
    let entries = match serde_json::from_str::<EntriesFile>(json)? {
        EntriesFile::List(entries) | EntriesFile::Wrapped { entries } => entries,
    };
    tracing::debug!(count = entries.len(), "loaded radar entries");
    Ok(entries)
}

pub fn read_entries_file(path: &Path) -> Result<Vec<RadarEntry>, InputError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_entries(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_bare_array() {
        let entries =
            load_entries(r#"[{"label":"Solidity Auditing","value":90,"category":"Security"}]"#)
                .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, 90.0);
    }

    #[test]
    fn loads_wrapped_skill_list() {
        let entries = load_entries(
            r#"{"skills":[{"name":"API Penetration Testing","level":88,"category":"Security"},{"name":"Foundry/Hardhat","level":92}]}"#,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].category, "");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(load_entries("[{\"label\":1}]"), Err(InputError::Json(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_entries_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
