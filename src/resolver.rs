use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Logical key to filesystem path mapping. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    paths: BTreeMap<String, PathBuf>,
}

impl PathTable {
    pub fn new(paths: &BTreeMap<String, String>) -> Self {
        let paths = paths
            .iter()
            .map(|(key, value)| (key.clone(), PathBuf::from(value.trim())))
            .collect();
        Self { paths }
    }

    /// Configured path for `key`; empty values count as not configured.
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.paths
            .get(key)
            .map(PathBuf::as_path)
            .filter(|path| !path.as_os_str().is_empty())
    }

    /// Configured path or an empty one. Only for building descriptors that
    /// are gated on `key` anyway.
    pub fn lookup(&self, key: &str) -> PathBuf {
        self.get(key).map(Path::to_path_buf).unwrap_or_default()
    }

    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some_and(Path::exists)
    }

    /// True iff every key is configured and its path exists right now.
    pub fn all_exist<I, S>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().all(|key| self.exists(key.as_ref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }
}

/// Human name for a path key, as shown in the found-entries table.
pub fn display_name(key: &str) -> String {
    match key {
        "unreal" => "Unreal".to_string(),
        "unreal_project_file" => "Unreal File".to_string(),
        "sln_file" => "SLN File".to_string(),
        "vscode" => "VSCode".to_string(),
        "unreal_project" => "Unreal Project".to_string(),
        "visual_studio" => "Visual Studio".to_string(),
        other => other
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn table(entries: &[(&str, &Path)]) -> PathTable {
        let raw = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.display().to_string()))
            .collect();
        PathTable::new(&raw)
    }

    #[test]
    fn all_exist_requires_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present");
        fs::create_dir(&present).unwrap();
        let absent = dir.path().join("absent");
        let table = table(&[("a", present.as_path()), ("b", absent.as_path())]);

        assert!(table.all_exist(["a"]));
        assert!(!table.all_exist(["b"]));
        assert!(!table.all_exist(["a", "b"]));
    }

    #[test]
    fn unknown_key_is_treated_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let table = table(&[("a", dir.path())]);

        assert!(!table.all_exist(["a", "nope"]));
        assert!(!table.exists("nope"));
    }

    #[test]
    fn empty_key_set_is_vacuously_true() {
        let table = PathTable::default();
        assert!(table.all_exist(Vec::<String>::new()));
    }

    #[test]
    fn empty_value_is_not_configured() {
        let mut raw = BTreeMap::new();
        raw.insert("unreal_project".to_string(), "  ".to_string());
        let table = PathTable::new(&raw);

        assert!(table.get("unreal_project").is_none());
        assert_eq!(table.lookup("unreal_project"), PathBuf::new());
        assert!(!table.all_exist(["unreal_project"]));
    }

    #[test]
    fn reflects_filesystem_at_call_time() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("later");
        let table = table(&[("later", folder.as_path())]);

        assert!(!table.all_exist(["later"]));
        fs::create_dir(&folder).unwrap();
        assert!(table.all_exist(["later"]));
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name("sln_file"), "SLN File");
        assert_eq!(display_name("engine_source_dir"), "Engine Source Dir");
    }
}
