// ============================
// backend-lib/src/storage.rs
// ============================
//! File store abstraction with a flat-file implementation.
//!
//! Entry ids are paths relative to the store root, `/`-separated. Ids coming
//! from clients are untrusted and are resolved component by component; any
//! id that could leave the root is refused.
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use batcloud_common::{EntryKind, FileEntry};
use chrono::{DateTime, Utc};
use tokio::{
    fs as tokio_fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::warn;

use crate::error::AppError;

/// Collaborator that holds the user's files
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List the direct children of `parent` (the root when `None`),
    /// folders first, then by name.
    async fn list(&self, parent: Option<&str>) -> Result<Vec<FileEntry>, AppError>;

    /// Store a new file under `parent`.
    ///
    /// A name already in use gets a numbered suffix instead of being replaced.
    async fn upload(
        &self,
        parent: Option<&str>,
        name: &str,
        contents: &[u8],
    ) -> Result<FileEntry, AppError>;

    /// Delete a file, or a folder with everything in it.
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Create a folder under `parent`.
    async fn create_folder(&self, parent: Option<&str>, name: &str) -> Result<FileEntry, AppError>;
}

/// Write `contents` into the freshly created file at `path`.
///
/// A failed write removes the file again so no truncated entry is listed.
async fn fill_new_file<W>(mut file: W, path: &Path, contents: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = file.write_all(contents).await;
    if written.is_ok() {
        written = file.flush().await;
    }

    if let Err(e) = written {
        drop(file);
        if let Err(cleanup) = tokio_fs::remove_file(path).await {
            warn!(path = %path.display(), error = %cleanup, "failed to remove partial upload");
        }
        return Err(e);
    }
    Ok(())
}

/// Flat-file implementation of the `FileStore` trait
#[derive(Clone, Debug)]
pub struct FlatFileStore {
    root: PathBuf,
}

impl FlatFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Map a client id onto a path below the root.
    fn resolve(&self, id: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(id);
        let mut path = self.root.clone();
        let mut depth = 0;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                },
                Component::CurDir => {},
                _ => return Err(AppError::InvalidInput(format!("invalid id `{id}`"))),
            }
        }
        if depth == 0 {
            return Err(AppError::InvalidInput(format!("invalid id `{id}`")));
        }
        Ok(path)
    }

    /// Resolve an optional parent folder, `None` or empty meaning the root.
    async fn resolve_folder(&self, parent: Option<&str>) -> Result<PathBuf, AppError> {
        let path = match parent.filter(|p| !p.is_empty()) {
            None => return Ok(self.root.clone()),
            Some(parent) => self.resolve(parent)?,
        };
        match tokio_fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(path),
            Ok(_) => Err(AppError::InvalidInput("parent is not a folder".to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("folder `{}`", parent.unwrap_or_default())))
            },
            Err(e) => Err(e.into()),
        }
    }

    fn id_of(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    async fn entry(&self, path: &Path) -> Result<FileEntry, AppError> {
        let meta = tokio_fs::metadata(path).await?;
        let kind = if meta.is_dir() { EntryKind::Folder } else { EntryKind::File };
        Ok(FileEntry {
            id: self.id_of(path),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            kind,
            size: if meta.is_dir() { 0 } else { meta.len() },
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            download_url: None,
            thumbnail_url: None,
        })
    }
}

/// Reduce a client-supplied name to a single safe path segment.
///
/// Browsers may send a full path as the upload file name; only the last
/// segment is kept.
pub fn sanitize_name(raw: &str) -> Result<String, AppError> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return Err(AppError::InvalidInput(format!("invalid name `{raw}`")));
    }
    Ok(name.to_string())
}

/// `report.pdf` -> `report (1).pdf`
fn numbered(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{name} ({n})"),
    }
}

/// Upper bound on numbered-suffix attempts for a clashing name
const MAX_NAME_ATTEMPTS: usize = 1000;

#[async_trait]
impl FileStore for FlatFileStore {
    async fn list(&self, parent: Option<&str>) -> Result<Vec<FileEntry>, AppError> {
        let folder = self.resolve_folder(parent).await?;
        let mut reader = tokio_fs::read_dir(&folder).await?;
        let mut entries = Vec::new();
        while let Some(dir_entry) = reader.next_entry().await? {
            entries.push(self.entry(&dir_entry.path()).await?);
        }
        entries.sort_by(|a, b| {
            b.is_folder()
                .cmp(&a.is_folder())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(entries)
    }

    async fn upload(
        &self,
        parent: Option<&str>,
        name: &str,
        contents: &[u8],
    ) -> Result<FileEntry, AppError> {
        let folder = self.resolve_folder(parent).await?;
        let name = sanitize_name(name)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 { name.clone() } else { numbered(&name, attempt) };
            let path = folder.join(&candidate);
            let file = match tokio_fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            fill_new_file(file, &path, contents).await?;
            return self.entry(&path).await;
        }
        Err(AppError::InvalidInput(format!("too many files named `{name}`")))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let path = self.resolve(id)?;
        let meta = match tokio_fs::symlink_metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("entry `{id}`")));
            },
            Err(e) => return Err(e.into()),
        };
        if meta.is_dir() {
            tokio_fs::remove_dir_all(&path).await?;
        } else {
            tokio_fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn create_folder(&self, parent: Option<&str>, name: &str) -> Result<FileEntry, AppError> {
        let folder = self.resolve_folder(parent).await?;
        let name = sanitize_name(name)?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 { name.clone() } else { format!("{name} ({attempt})") };
            let path = folder.join(&candidate);
            match tokio_fs::create_dir(&path).await {
                Ok(()) => return self.entry(&path).await,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::InvalidInput(format!("too many folders named `{name}`")))
    }
}
