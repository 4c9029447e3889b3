//! Template discovery: `NN_name.html` files in the template directory.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use zwc::{Template, TemplateStore};

use crate::error::BuildError;

static TEMPLATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0*([0-9]+)_").expect("template name pattern is valid"));

/// Template id encoded in a file name (`050_code.html` -> 50).
pub fn template_id(file_name: &str) -> Option<u32> {
    let caps = TEMPLATE_NAME.captures(file_name)?;
    caps[1].parse().ok()
}

/// Load every template in `dir`. Files that do not follow the naming
/// convention are ignored.
pub fn load_templates(dir: &Path) -> Result<TemplateStore, BuildError> {
    let read_err = |source| BuildError::ReadTemplates {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(read_err)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    let mut store = TemplateStore::new();
    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_html = path.extension().is_some_and(|ext| ext == "html");
        let id = match template_id(name) {
            Some(id) if is_html && path.is_file() => id,
            _ => {
                log::debug!("ignoring template {}", path.display());
                continue;
            }
        };

        let source = std::fs::read_to_string(&path).map_err(|source| {
            BuildError::ReadTemplates {
                path: path.clone(),
                source,
            }
        })?;
        if let Some(previous) = store.insert(Template::parse(id, name, &source)) {
            log::warn!(
                "template {} replaces {} (both have number {})",
                name,
                previous.name,
                id
            );
        }
    }

    log::info!("loaded {} templates from {}", store.len(), dir.display());
    Ok(store)
}
