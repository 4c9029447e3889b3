//! Source text of generated directory indexes.

/// File name of the generated index source in each input directory.
pub const INDEX_SOURCE: &str = "index.zwc";

/// Heading used for the root index when its sidecar sets none.
pub const DEFAULT_INDEX_TITLE: &str = "Index";

#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub href: String,
    pub title: String,
}

/// Build the markup for an index page: a heading, an optional description,
/// and one link line per entry ordered case-insensitively by title.
pub fn index_source(title: &str, description: Option<&str>, mut entries: Vec<IndexEntry>) -> String {
    entries.sort_by_cached_key(|entry| entry.title.to_lowercase());

    let mut source = format!("# {}\n", title);
    if let Some(description) = description {
        source.push_str(description);
        source.push_str("\n\n");
    }
    for entry in &entries {
        source.push_str(&format!("=> {} {}\n", entry.href, entry.title));
    }
    source
}
