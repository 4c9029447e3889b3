use std::fmt;
use std::io;
use std::path::PathBuf;

/// A problem that stops the whole build. Pages already written stay on disk.
#[derive(Debug)]
pub enum BuildError {
    CreateDir { path: PathBuf, source: io::Error },
    ReadDir { path: PathBuf, source: io::Error },
    ReadSource { path: PathBuf, source: io::Error },
    ReadTemplates { path: PathBuf, source: io::Error },
    WriteFile { path: PathBuf, source: io::Error },
    /// A subdirectory's `index.toml` is missing or has no `title`.
    MissingIndexTitle(PathBuf),
    MalformedSidecar {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::CreateDir { path, source } => {
                write!(f, "cannot create directory '{}': {}", path.display(), source)
            }
            BuildError::ReadDir { path, source } => {
                write!(f, "cannot list directory '{}': {}", path.display(), source)
            }
            BuildError::ReadSource { path, source } => {
                write!(f, "cannot read '{}': {}", path.display(), source)
            }
            BuildError::ReadTemplates { path, source } => {
                write!(f, "cannot read templates from '{}': {}", path.display(), source)
            }
            BuildError::WriteFile { path, source } => {
                write!(f, "unable to write to '{}': {}", path.display(), source)
            }
            BuildError::MissingIndexTitle(dir) => write!(
                f,
                "directory '{}' has no index title (set `title` in its index.toml)",
                dir.display()
            ),
            BuildError::MalformedSidecar { path, source } => {
                write!(f, "malformed index metadata '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::CreateDir { source, .. }
            | BuildError::ReadDir { source, .. }
            | BuildError::ReadSource { source, .. }
            | BuildError::ReadTemplates { source, .. }
            | BuildError::WriteFile { source, .. } => Some(source),
            BuildError::MalformedSidecar { source, .. } => Some(source),
            BuildError::MissingIndexTitle(_) => None,
        }
    }
}
