use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::types::{IfaceError, Result};

/// Header discovery over a directory tree or a single file
pub struct FileScanner {
    root: PathBuf,
    extensions: HashSet<String>,
    exclude_dirs: HashSet<String>,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
    max_files: Option<usize>,
    respect_gitignore: bool,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::from_config(root, &AnalysisConfig::default())
    }

    /// Scanner using the extensions, exclusions and caps of `config`.
    ///
    /// Invalid glob patterns are dropped with a warning; `Config::validate`
    /// rejects them earlier on the normal path.
    pub fn from_config<P: AsRef<Path>>(root: P, config: &AnalysisConfig) -> Self {
        let exclude = config
            .exclude
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(pattern, error = %e, "Ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();

        Self {
            root: root.as_ref().to_path_buf(),
            extensions: config
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            exclude_dirs: config.exclude_dirs.iter().cloned().collect(),
            exclude,
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            respect_gitignore: config.respect_gitignore,
        }
    }

    pub fn with_max_files(mut self, max: Option<usize>) -> Self {
        self.max_files = max;
        self
    }

    /// Header files under the root, sorted by relative path and capped at `max_files`
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.exists() {
            return Err(IfaceError::InputNotFound(self.root.clone()));
        }

        let mut files = if self.root.is_file() {
            self.scan_single_file()?
        } else {
            self.walk()
        };

        files.sort_by(|a, b| a.display_path.cmp(&b.display_path));

        if let Some(max) = self.max_files
            && files.len() > max
        {
            debug!(found = files.len(), max, "Applying max_files cap");
            files.truncate(max);
        }

        Ok(files)
    }

    fn scan_single_file(&self) -> Result<Vec<ScannedFile>> {
        let metadata = self.root.metadata()?;
        let display_path = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.to_string_lossy().to_string());

        Ok(vec![ScannedFile {
            path: self.root.clone(),
            display_path,
            size: metadata.len(),
        }])
    }

    fn walk(&self) -> Vec<ScannedFile> {
        let exclude_dirs = self.exclude_dirs.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(is_dir
                    && entry.depth() > 0
                    && exclude_dirs.contains(&*entry.file_name().to_string_lossy()))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            if !self.check_extension(path) {
                continue;
            }

            let display_path = self.relative_display(path);
            if self.should_exclude(&display_path) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) if metadata.len() > self.max_file_size => {
                    debug!(file = %display_path, size = metadata.len(), "Skipping oversized file");
                }
                Ok(metadata) => files.push(ScannedFile {
                    path: path.to_path_buf(),
                    display_path,
                    size: metadata.len(),
                }),
                Err(e) => warn!(file = %display_path, error = %e, "Cannot stat file"),
            }
        }

        files
    }

    fn relative_display(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn should_exclude(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(relative))
    }

    fn check_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated
    pub display_path: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn paths(files: &[ScannedFile]) -> Vec<&str> {
        files.iter().map(|f| f.display_path.as_str()).collect()
    }

    #[test]
    fn test_finds_headers_sorted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/z.hpp", "");
        touch(temp.path(), "include/a.h", "");
        touch(temp.path(), "include/b.hh", "");
        touch(temp.path(), "src/main.cpp", "");
        touch(temp.path(), "README.md", "");

        let files = FileScanner::new(temp.path()).scan().unwrap();
        assert_eq!(paths(&files), vec!["include/a.h", "include/b.hh", "src/z.hpp"]);
    }

    #[test]
    fn test_default_excluded_dirs_pruned() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "build/gen.h", "");
        touch(temp.path(), "cmake-build/x.h", "");
        touch(temp.path(), "lib/.git/hooks.h", "");
        touch(temp.path(), "lib/keep.h", "");

        let files = FileScanner::new(temp.path()).scan().unwrap();
        assert_eq!(paths(&files), vec!["lib/keep.h"]);
    }

    #[test]
    fn test_additional_excludes_and_globs() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "third_party/dep.h", "");
        touch(temp.path(), "gen/auto_types.h", "");
        touch(temp.path(), "core/api.h", "");

        let mut config = AnalysisConfig {
            exclude: vec!["gen/auto_*.h".to_string()],
            ..AnalysisConfig::default()
        };
        config.exclude_dirs.push("third_party".to_string());
        let files = FileScanner::from_config(temp.path(), &config).scan().unwrap();
        assert_eq!(paths(&files), vec!["core/api.h"]);
    }

    #[test]
    fn test_max_files_and_size_cap() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.h", "");
        touch(temp.path(), "b.h", "");
        touch(temp.path(), "c.h", "");
        touch(temp.path(), "big.h", &"x".repeat(64));

        let config = AnalysisConfig {
            max_file_size: 32,
            ..AnalysisConfig::default()
        };
        let files = FileScanner::from_config(temp.path(), &config)
            .with_max_files(Some(2))
            .scan()
            .unwrap();
        assert_eq!(paths(&files), vec!["a.h", "b.h"]);
    }

    #[test]
    fn test_single_file_root() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "only.hpp", "class A {};");

        let files = FileScanner::new(temp.path().join("only.hpp")).scan().unwrap();
        assert_eq!(paths(&files), vec!["only.hpp"]);
        assert_eq!(files[0].size, 11);
    }

    #[test]
    fn test_missing_root() {
        let err = FileScanner::new("/definitely/not/here").scan();
        assert!(matches!(err, Err(IfaceError::InputNotFound(_))));
    }
}
