use crate::error::{LensError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "jiralens.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".jiralens/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/jiralens/config.toml";

/// Per-call configuration: the default project key. Read-only once
/// loaded; every operation receives it as a value, never as shared
/// state. Board labels travel in the snapshot itself, so they have no
/// place here.
#[derive(Debug, Clone, Deserialize)]
pub struct LensConfig {
    pub project: ProjectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub key: String,
    pub name: Option<String>,
}

pub fn load_config(root: &Path) -> Result<Option<LensConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<LensConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: LensConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| LensError::ConfigParse(e.to_string()))?;
    Ok(Some(cfg))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| LensError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_returns_none_when_repo_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert!(cfg.is_none());
    }

    #[test]
    fn load_config_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[project]
key = "GLOBAL"
name = "Global default"
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[project]
key = "PROJ"
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".jiralens")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[project]
name = "Local override"
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .expect("merged config should exist");

        assert_eq!(cfg.project.key, "PROJ");
        assert_eq!(cfg.project.name.as_deref(), Some("Local override"));
    }

    #[test]
    fn unparsable_config_is_a_hard_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "project = [broken")
            .expect("config should write");
        let err = load_config_with_global(root.path(), None).expect_err("load should fail");
        assert!(matches!(err, LensError::ConfigParse(_)));
    }
}
