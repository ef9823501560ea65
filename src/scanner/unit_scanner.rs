use crate::config::{LayoutConfig, UnitsConfig};
use crate::error::{AssetSplitError, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// One game directory and the files it is expected to hold.
#[derive(Debug, Clone)]
pub struct Unit {
    pub name: String,
    pub path: PathBuf,
    pub document: PathBuf,
    pub recovery_copy: PathBuf,
    pub stylesheet: PathBuf,
    pub script: PathBuf,
}

impl Unit {
    pub fn new<P: Into<PathBuf>>(path: P, layout: &LayoutConfig) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            name,
            document: path.join(&layout.document),
            recovery_copy: path.join(layout.backup_name()),
            stylesheet: path.join(&layout.stylesheet),
            script: path.join(&layout.script),
            path,
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }
}

pub struct UnitScanner {
    layout: LayoutConfig,
    names: Vec<String>,
    skip_hidden: bool,
}

impl UnitScanner {
    pub fn new(layout: &LayoutConfig, units: &UnitsConfig) -> Self {
        Self {
            layout: layout.clone(),
            names: units.names.clone(),
            skip_hidden: units.skip_hidden,
        }
    }

    /// Resolve the units under `root`.
    ///
    /// An explicit name list is returned as-is, in order, including names whose
    /// directory is missing so the caller can report them. Otherwise every direct
    /// sub-directory is returned, sorted by name.
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> Result<Vec<Unit>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(AssetSplitError::MissingDirectory {
                path: root_path.display().to_string(),
            });
        }

        if !self.names.is_empty() {
            return Ok(self
                .names
                .iter()
                .map(|name| Unit::new(root_path.join(name), &self.layout))
                .collect());
        }

        self.discover(root_path)
    }

    fn discover(&self, root_path: &Path) -> Result<Vec<Unit>> {
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.should_include(e));

        let mut units = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| AssetSplitError::Read {
                path: err
                    .path()
                    .unwrap_or(root_path)
                    .display()
                    .to_string(),
                source: err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            })?;

            if entry.file_type().is_dir() {
                units.push(Unit::new(entry.into_path(), &self.layout));
            }
        }

        Ok(units)
    }

    fn should_include(&self, entry: &DirEntry) -> bool {
        if !self.skip_hidden {
            return true;
        }

        !entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
    }
}
