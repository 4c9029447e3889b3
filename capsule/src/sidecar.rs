use std::path::Path;

use serde::Deserialize;

use crate::error::BuildError;

/// Name of the per-directory metadata file.
pub const SIDECAR_FILE: &str = "index.toml";

/// Index settings for one source directory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexMeta {
    /// Heading of the generated index page.
    pub title: Option<String>,
    /// Line shown under the heading.
    pub description: Option<String>,
    /// File or directory names left out of the listing. Source files match
    /// with or without their `.zwc` extension.
    pub exclude: Vec<String>,
}

impl IndexMeta {
    /// Read `index.toml` from `dir`. A missing file is `Ok(None)`; a file that
    /// does not parse is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>, BuildError> {
        let path = dir.join(SIDECAR_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&path).map_err(|source| BuildError::ReadSource {
                path: path.clone(),
                source,
            })?;

        let meta = toml::from_str(&content)
            .map_err(|source| BuildError::MalformedSidecar { path, source })?;
        Ok(Some(meta))
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        let stem = name.strip_suffix(".zwc").unwrap_or(name);
        self.exclude.iter().any(|e| e == name || e == stem)
    }
}
