use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use log::{debug, info, warn, error};
use walkdir::WalkDir;

use crate::errors::EditorError;
use crate::utils::{format_modified, is_hidden, is_markdown, normalize_path};

/// Service for handling file system operations under the served root
#[derive(Clone)]
pub struct FileService {
    root_dir: PathBuf,
}

impl FileService {
    /// Create a new file service. `root_dir` is expected to be canonical.
    pub fn new(root_dir: PathBuf) -> Self {
        debug!("Creating FileService with root directory: {:?}", root_dir);
        Self { root_dir }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// List every Markdown file under the root, skipping hidden files and
    /// anything inside a hidden directory. Paths are relative, `/`-separated
    /// and sorted.
    pub fn list_markdown_files(&self) -> Result<Vec<String>, EditorError> {
        let walker = WalkDir::new(&self.root_dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !is_hidden(&entry.file_name().to_string_lossy())
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let file_type = entry.file_type();
            if !(file_type.is_file() || file_type.is_symlink()) || !is_markdown(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root_dir) else {
                continue;
            };
            let rel = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            // Links are listed only when they point at a file inside the root
            if file_type.is_symlink() && !self.resolve(&rel).map(|p| p.is_file()).unwrap_or(false) {
                debug!("Skipping link leaving the root or dangling: {}", rel);
                continue;
            }
            debug!("Found markdown file: {}", rel);
            files.push(rel);
        }

        files.sort();
        info!("Listed {} markdown files under {:?}", files.len(), self.root_dir);
        Ok(files)
    }

    /// Resolve a request path to an absolute path inside the root.
    ///
    /// Parent-directory, absolute and drive components are rejected before the
    /// filesystem is touched. The parent directory (and the target itself when
    /// it already exists) is then canonicalized and must stay under the root,
    /// so symlinks cannot lead outside it either.
    pub fn resolve(&self, rel: &str) -> Result<PathBuf, EditorError> {
        let normalized = normalize_path(rel);
        if normalized.is_empty() {
            return Err(EditorError::InvalidPath(rel.to_string()));
        }

        let relative = Path::new(&normalized);
        for comp in relative.components() {
            match comp {
                Component::Normal(_) | Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    warn!("Rejected path outside root: '{}'", rel);
                    return Err(EditorError::AccessDenied(rel.to_string()));
                }
            }
        }
        let candidate = self.root_dir.join(relative);
        let file_name = candidate
            .file_name()
            .ok_or_else(|| EditorError::InvalidPath(rel.to_string()))?
            .to_owned();
        let parent = candidate
            .parent()
            .ok_or_else(|| EditorError::InvalidPath(rel.to_string()))?;

        let canonical_parent = parent.canonicalize().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => EditorError::NotFound(rel.to_string()),
            _ => EditorError::Io(e),
        })?;
        if !canonical_parent.starts_with(&self.root_dir) {
            warn!("Rejected path escaping root through a link: '{}'", rel);
            return Err(EditorError::AccessDenied(rel.to_string()));
        }

        let resolved = canonical_parent.join(file_name);
        if resolved.symlink_metadata().is_ok() {
            let target = resolved.canonicalize().map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => EditorError::NotFound(rel.to_string()),
                _ => EditorError::Io(e),
            })?;
            if !target.starts_with(&self.root_dir) {
                warn!("Rejected link pointing outside root: '{}'", rel);
                return Err(EditorError::AccessDenied(rel.to_string()));
            }
            return Ok(target);
        }
        Ok(resolved)
    }

    /// Read a Markdown file
    pub fn read_markdown(&self, rel: &str) -> Result<String, EditorError> {
        let path = self.resolve_markdown(rel)?;
        if !path.is_file() {
            warn!("Markdown file does not exist: {:?}", path);
            return Err(EditorError::NotFound(rel.to_string()));
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            error!("Failed to read file {:?}: {}", path, e);
            EditorError::Io(e)
        })?;
        info!("Read file '{}', {} bytes", rel, content.len());
        Ok(content)
    }

    /// Write `content` to a Markdown file, creating it if needed. Nothing is
    /// written unless the path resolves inside the root.
    pub fn write_markdown(&self, rel: &str, content: &str) -> Result<(), EditorError> {
        let path = self.resolve_markdown(rel)?;
        if path.is_dir() {
            return Err(EditorError::InvalidPath(rel.to_string()));
        }

        fs::write(&path, content.as_bytes()).map_err(|e| {
            error!("Failed to write file {:?}: {}", path, e);
            EditorError::Io(e)
        })?;
        info!("Saved file '{}', {} bytes", rel, content.len());
        Ok(())
    }

    /// Modification time of a file as RFC 3339, if available
    pub fn last_modified(&self, rel: &str) -> Option<String> {
        let path = self.resolve(rel).ok()?;
        let mtime = fs::metadata(path).and_then(|m| m.modified()).ok()?;
        format_modified(mtime)
    }

    /// Read a non-hidden file under the root, e.g. an image a document links to
    pub fn read_asset(&self, rel: &str) -> Result<(PathBuf, Vec<u8>), EditorError> {
        let normalized = normalize_path(rel);
        if normalized.split('/').any(is_hidden) {
            warn!("Refusing to serve hidden path: '{}'", rel);
            return Err(EditorError::NotFound(rel.to_string()));
        }

        let path = self.resolve(&normalized)?;
        if !path.is_file() {
            return Err(EditorError::NotFound(rel.to_string()));
        }
        let bytes = fs::read(&path)?;
        debug!("Serving asset '{}', {} bytes", rel, bytes.len());
        Ok((path, bytes))
    }

    fn resolve_markdown(&self, rel: &str) -> Result<PathBuf, EditorError> {
        if !is_markdown(Path::new(rel)) {
            warn!("Rejected non-markdown path: '{}'", rel);
            return Err(EditorError::InvalidPath(rel.to_string()));
        }
        self.resolve(rel)
    }
}
