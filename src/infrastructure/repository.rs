//! File system repository for the `.prodlog` workspace and its JSON records

use crate::error::{ProdlogError, Result};
use crate::infrastructure::Config;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const WORKSPACE_DIR: &str = ".prodlog";

/// Abstract repository for workspace operations
pub trait WorkspaceRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Load configuration from .prodlog/config.toml
    fn load_config(&self) -> Result<Config>;

    /// Save configuration to .prodlog/config.toml
    fn save_config(&self, config: &Config) -> Result<()>;

    /// Check if .prodlog directory exists
    fn is_initialized(&self) -> bool;

    /// Create .prodlog directory structure
    fn initialize(&self) -> Result<()>;
}

/// File system implementation of WorkspaceRepository
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover workspace root by walking up from current directory.
    /// PRODLOG_ROOT takes precedence when set.
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("PRODLOG_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_workspace_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            } else {
                return Err(ProdlogError::Config(format!(
                    "PRODLOG_ROOT is set to '{}' but no .prodlog directory found. \
                    Run 'prodlog init' in that directory or unset PRODLOG_ROOT.",
                    path.display()
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover workspace root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_workspace_dir(&current) {
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(ProdlogError::NotProdlogDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_workspace_dir(path: &Path) -> bool {
        path.join(WORKSPACE_DIR).is_dir()
    }

    /// Absolute path of a record relative to `.prodlog/`
    pub fn record_path(&self, relative: &str) -> PathBuf {
        self.root.join(WORKSPACE_DIR).join(relative)
    }
}

impl WorkspaceRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_workspace_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let workspace = self.root.join(WORKSPACE_DIR);

        if workspace.exists() {
            return Err(ProdlogError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&workspace)?;
        fs::create_dir(workspace.join("drafts"))?;
        fs::create_dir(workspace.join("cache"))?;
        Ok(())
    }
}

// Record operations (not part of trait - filesystem-specific)
impl FileSystemRepository {
    /// Read a JSON record. Missing, unreadable or corrupt records read as `None`.
    pub fn read_record<T: DeserializeOwned>(&self, relative: &str) -> Option<T> {
        match self.load_record(relative) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(record = relative, error = %e, "ignoring unreadable record");
                None
            }
        }
    }

    /// Read a JSON record, telling "absent" (`Ok(None)`) apart from
    /// "present but unreadable" (`Err`).
    pub fn load_record<T: DeserializeOwned>(&self, relative: &str) -> Result<Option<T>> {
        let path = self.record_path(relative);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ProdlogError::Io(e)),
        };

        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Write a JSON record durably: temp file in the same directory, fsync, rename.
    ///
    /// On Windows, `rename` does not overwrite existing files, so the destination is removed first.
    pub fn write_record<T: Serialize + ?Sized>(&self, relative: &str, value: &T) -> Result<()> {
        let path = self.record_path(relative);
        let contents = serde_json::to_vec_pretty(value)?;

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_name = format!(
            "{}.prodlog-tmp-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("record.json"),
            std::process::id()
        );
        let tmp_path = path.with_file_name(tmp_name);

        let mut file = File::create(&tmp_path)?;
        file.write_all(&contents)?;
        file.sync_all()?;
        drop(file);

        if cfg!(windows) && path.exists() {
            fs::remove_file(&path)?;
        }

        fs::rename(&tmp_path, &path)?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "record written");
        Ok(())
    }

    /// Remove a record; removing a missing record is not an error.
    pub fn remove_record(&self, relative: &str) -> Result<()> {
        let path = self.record_path(relative);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "record removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProdlogError::Io(e)),
        }
    }

    /// Stems of the `.json` records directly inside `dir`, sorted by name
    pub fn list_records(&self, dir: &str) -> Vec<String> {
        let base = self.record_path(dir);
        if !base.is_dir() {
            return Vec::new();
        }

        let mut stems: Vec<String> = WalkDir::new(&base)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?;
                name.strip_suffix(".json").map(str::to_string)
            })
            .collect();

        stems.sort();
        stems
    }
}
