//! The backend's stored-file library as shown in the "Saved Files" list.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFile {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
}

/// Case-insensitive substring search on file names.
pub fn filter<'a>(files: &'a [SavedFile], search: &str) -> Vec<&'a SavedFile> {
    let needle = search.trim().to_lowercase();
    files
        .iter()
        .filter(|f| needle.is_empty() || f.filename.to_lowercase().contains(&needle))
        .collect()
}

/// The name to send for a rename, or `None` when the edit should just be
/// dropped (blank or unchanged).
pub fn validate_rename(file: &SavedFile, new_name: &str) -> Option<String> {
    let name = new_name.trim();
    if name.is_empty() || name == file.filename {
        None
    } else {
        Some(name.to_string())
    }
}

pub fn apply_rename(files: &mut [SavedFile], id: &str, name: &str) -> bool {
    match files.iter_mut().find(|f| f.id == id) {
        Some(f) => {
            f.filename = name.to_string();
            true
        }
        None => false,
    }
}

/// Show a fresh upload right away, before the next list refresh.
pub fn push_uploaded(files: &mut Vec<SavedFile>, id: &str, filename: &str) {
    if files.iter().any(|f| f.id == id) {
        return;
    }
    files.push(SavedFile { id: id.to_string(), filename: filename.to_string() });
}

pub fn remove(files: &mut Vec<SavedFile>, id: &str) -> Option<SavedFile> {
    let pos = files.iter().position(|f| f.id == id)?;
    Some(files.remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<SavedFile> {
        vec![
            SavedFile { id: "1".into(), filename: "LTE_Band7.cfile".into() },
            SavedFile { id: "2".into(), filename: "wifi_ch6.cfile".into() },
            SavedFile { id: "3".into(), filename: "lte_uplink.csv".into() },
        ]
    }

    #[test]
    fn test_filter_case_insensitive() {
        let all = files();
        let hits: Vec<_> = filter(&all, "LtE").iter().map(|f| f.id.as_str()).collect();
        assert_eq!(hits, vec!["1", "3"]);
        assert_eq!(filter(&all, "").len(), 3);
        assert!(filter(&all, "zigbee").is_empty());
    }

    #[test]
    fn test_validate_rename_skips_noop() {
        let f = &files()[0];
        assert_eq!(validate_rename(f, "   "), None);
        assert_eq!(validate_rename(f, "LTE_Band7.cfile"), None);
        assert_eq!(validate_rename(f, " band7 "), Some("band7".to_string()));
    }

    #[test]
    fn test_apply_rename_and_remove() {
        let mut all = files();
        assert!(apply_rename(&mut all, "2", "wifi.cfile"));
        assert_eq!(all[1].filename, "wifi.cfile");
        assert!(!apply_rename(&mut all, "9", "x"));
        assert_eq!(remove(&mut all, "1").unwrap().filename, "LTE_Band7.cfile");
        assert!(remove(&mut all, "1").is_none());
    }

    #[test]
    fn test_push_uploaded_once() {
        let mut all = files();
        push_uploaded(&mut all, "4", "new.cfile");
        push_uploaded(&mut all, "4", "new.cfile");
        assert_eq!(all.len(), 4);
    }
}
