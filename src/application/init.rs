//! Initialize workspace use case

use crate::domain::Catalog;
use crate::error::Result;
use crate::infrastructure::{Config, FileSystemRepository, WorkspaceRepository};
use std::fs;
use std::path::Path;

/// Initialize a new prodlog workspace at the specified path.
///
/// Also writes an empty `lists.json` next to `.prodlog/` unless one exists,
/// so the configured list source resolves from the start.
pub fn init(path: &Path, api_base: Option<String>) -> Result<Config> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = FileSystemRepository::new(path.to_path_buf());
    repo.initialize()?;

    let config = Config::new(api_base);
    repo.save_config(&config)?;

    let lists_path = path.join(&config.lists);
    if !lists_path.exists() {
        let template = serde_json::to_string_pretty(&Catalog::default())?;
        fs::write(&lists_path, template)?;
    }

    tracing::info!(root = %path.display(), api_base = %config.api_base, "workspace initialized");
    println!("Initialized prodlog workspace at {}", path.display());
    println!("Sink: {}", config.api_base);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_config_and_lists_template() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("floor");

        let config = init(&root, Some("http://sink:8080".to_string())).unwrap();
        assert_eq!(config.api_base, "http://sink:8080");
        assert!(root.join(".prodlog/config.toml").exists());
        assert!(root.join(".prodlog/drafts").is_dir());

        let lists: Catalog =
            serde_json::from_str(&fs::read_to_string(root.join("lists.json")).unwrap()).unwrap();
        assert!(lists.is_empty());
    }

    #[test]
    fn test_init_keeps_existing_lists() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lists.json"), r#"{"operators": ["Asha"]}"#).unwrap();

        init(temp.path(), None).unwrap();
        let contents = fs::read_to_string(temp.path().join("lists.json")).unwrap();
        assert!(contents.contains("Asha"));
    }

    #[test]
    fn test_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        init(temp.path(), None).unwrap();
        assert!(init(temp.path(), None).is_err());
    }
}
