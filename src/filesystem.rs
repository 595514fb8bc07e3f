//! File-system collaborator used by the builder and every generator.
//!
//! Paths are relative to a project root. [`DiskFilesystem`] works on a real
//! directory; [`MemoryFilesystem`] keeps everything in a map, for tests.

use crate::error::{BlueprintError, Result};
use crate::stubs;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// The narrow file-system contract the pipeline depends on
pub trait Filesystem {
    fn exists(&self, path: &str) -> bool;

    fn get(&self, path: &str) -> Result<String>;

    /// Write a file, creating parent directories as needed
    fn put(&mut self, path: &str, contents: &str) -> Result<()>;

    /// Append to a file, creating it when missing
    fn append(&mut self, path: &str, contents: &str) -> Result<()>;

    fn make_directory(&mut self, path: &str) -> Result<()>;

    /// Delete files; missing files are ignored
    fn delete(&mut self, paths: &[String]) -> Result<()>;

    /// Names of the files directly inside a directory, sorted
    fn files(&self, dir: &str) -> Vec<String>;

    /// Template text for a stub name; published overrides win over built-ins
    fn stub(&mut self, name: &str) -> Result<String>;
}

/// Files under a project directory
#[derive(Debug)]
pub struct DiskFilesystem {
    root: PathBuf,
    stubs_path: String,
    stub_cache: HashMap<String, String>,
}

impl DiskFilesystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stubs_path: "stubs".to_string(),
            stub_cache: HashMap::new(),
        }
    }

    /// Look for published stubs in `stubs_path` (relative to the root)
    pub fn with_stubs_path(mut self, stubs_path: impl Into<String>) -> Self {
        self.stubs_path = stubs_path.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Filesystem for DiskFilesystem {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn get(&self, path: &str) -> Result<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|e| BlueprintError::io(full, e))
    }

    fn put(&mut self, path: &str, contents: &str) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| BlueprintError::io(parent, e))?;
        }
        fs::write(&full, contents).map_err(|e| BlueprintError::io(full, e))
    }

    fn append(&mut self, path: &str, contents: &str) -> Result<()> {
        use std::io::Write;

        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| BlueprintError::io(parent, e))?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full)
            .map_err(|e| BlueprintError::io(&full, e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| BlueprintError::io(full, e))
    }

    fn make_directory(&mut self, path: &str) -> Result<()> {
        let full = self.resolve(path);
        fs::create_dir_all(&full).map_err(|e| BlueprintError::io(full, e))
    }

    fn delete(&mut self, paths: &[String]) -> Result<()> {
        for path in paths {
            let full = self.resolve(path);
            match fs::remove_file(&full) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(BlueprintError::io(full, e)),
            }
        }
        Ok(())
    }

    fn files(&self, dir: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.resolve(dir))
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.path().is_file())
                    .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    fn stub(&mut self, name: &str) -> Result<String> {
        if let Some(cached) = self.stub_cache.get(name) {
            return Ok(cached.clone());
        }

        let published = self.root.join(&self.stubs_path).join(name);
        let contents = if published.is_file() {
            tracing::debug!(stub = name, path = %published.display(), "using published stub");
            fs::read_to_string(&published).map_err(|e| BlueprintError::io(&published, e))?
        } else {
            stubs::builtin(name)
                .ok_or_else(|| BlueprintError::StubNotFound(name.to_string()))?
                .to_string()
        };

        self.stub_cache.insert(name.to_string(), contents.clone());
        Ok(contents)
    }
}

/// In-memory file system
#[derive(Debug, Default, Clone)]
pub struct MemoryFilesystem {
    files: BTreeMap<String, String>,
    directories: Vec<String>,
    stub_overrides: HashMap<String, String>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.to_string());
        self
    }

    /// Replace a built-in stub
    pub fn with_stub(mut self, name: &str, contents: &str) -> Self {
        self.stub_overrides.insert(name.to_string(), contents.to_string());
        self
    }

    /// Every stored path, sorted
    pub fn paths(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path) || self.directories.iter().any(|d| d == path)
    }

    fn get(&self, path: &str) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            BlueprintError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            )
        })
    }

    fn put(&mut self, path: &str, contents: &str) -> Result<()> {
        self.files.insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn append(&mut self, path: &str, contents: &str) -> Result<()> {
        self.files
            .entry(path.to_string())
            .or_default()
            .push_str(contents);
        Ok(())
    }

    fn make_directory(&mut self, path: &str) -> Result<()> {
        if !self.directories.iter().any(|d| d == path) {
            self.directories.push(path.to_string());
        }
        Ok(())
    }

    fn delete(&mut self, paths: &[String]) -> Result<()> {
        for path in paths {
            self.files.remove(path);
        }
        Ok(())
    }

    fn files(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.files
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .filter(|name| !name.contains('/'))
            .map(str::to_string)
            .collect()
    }

    fn stub(&mut self, name: &str) -> Result<String> {
        if let Some(contents) = self.stub_overrides.get(name) {
            return Ok(contents.clone());
        }
        stubs::builtin(name)
            .map(str::to_string)
            .ok_or_else(|| BlueprintError::StubNotFound(name.to_string()))
    }
}
