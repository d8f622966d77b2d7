// file: src/maven/utils.rs
// version: 1.0.0
// guid: 6d2a8f30-94c1-4b7e-8a05-c3f17e92d4b1

//! File system and download helpers used by the Maven steps

use crate::error::{MavenError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// File system and network operations the Maven steps depend on
#[async_trait]
pub trait MavenUtils: Send {
    /// Whether a regular file exists at `path`
    fn file_exists(&self, path: &str) -> Result<bool>;

    /// Download `url` into `target`
    async fn download_file(&mut self, url: &str, target: &str) -> Result<()>;

    /// Write `content` to `path`, creating parent directories
    fn write_file(&mut self, path: &str, content: &str) -> Result<()>;

    /// All `pom.xml` files below the working directory, root included
    fn glob_pom_files(&self) -> Result<Vec<String>>;

    /// Current working directory
    fn getwd(&self) -> Result<String>;

    /// Change the working directory
    fn chdir(&mut self, dir: &str) -> Result<()>;
}

/// [`MavenUtils`] backed by the real file system and HTTP
pub struct SystemMavenUtils {
    client: reqwest::Client,
}

impl SystemMavenUtils {
    /// Create new system utilities
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for SystemMavenUtils {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MavenUtils for SystemMavenUtils {
    fn file_exists(&self, path: &str) -> Result<bool> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn download_file(&mut self, url: &str, target: &str) -> Result<()> {
        debug!("Downloading: {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(MavenError::network(format!(
                "Download failed with status: {}",
                response.status()
            )));
        }

        if let Some(parent) = Path::new(target).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(target, bytes).await?;

        info!("Downloaded {} to {}", url, target);
        Ok(())
    }

    fn write_file(&mut self, path: &str, content: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        debug!("Wrote {}", path);
        Ok(())
    }

    fn glob_pom_files(&self) -> Result<Vec<String>> {
        find_files_named(Path::new("."), "pom.xml")
    }

    fn getwd(&self) -> Result<String> {
        Ok(std::env::current_dir()?.to_string_lossy().into_owned())
    }

    fn chdir(&mut self, dir: &str) -> Result<()> {
        std::env::set_current_dir(dir)
            .map_err(|e| MavenError::Io(e).context(format!("failed to change directory to '{}'", dir)))
    }
}

/// Recursively find files called `name` below `root`.
///
/// Paths are returned relative to `root` with `/` separators, sorted so the
/// root file comes first followed by the modules in lexical order.
pub fn find_files_named(root: &Path, name: &str) -> Result<Vec<String>> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| MavenError::Io(e.into()))?;
        if !entry.file_type().is_file() || entry.file_name() != name {
            continue;
        }
        let relative: PathBuf = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path())
            .to_path_buf();
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        found.push(parts.join("/"));
    }

    found.sort_by(|a, b| {
        let depth = |s: &str| s.matches('/').count().min(1);
        depth(a).cmp(&depth(b)).then_with(|| a.cmp(b))
    });
    Ok(found)
}

/// Parent directory of a slash separated path, `.` for bare file names
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}
