//! Recursive site build: compile every source file, then generate and compile
//! each directory's index.

use std::path::{Path, PathBuf};

use zwc::{TemplateStore, Warning};

use crate::error::BuildError;
use crate::index::{DEFAULT_INDEX_TITLE, INDEX_SOURCE, IndexEntry, index_source};
use crate::sidecar::IndexMeta;
use crate::templates::load_templates;

/// Extension of markup source files.
pub const SOURCE_EXTENSION: &str = "zwc";

/// Where the build reads from and writes to.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub templates: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            input: PathBuf::from("rawpages"),
            output: PathBuf::from("genpages"),
            templates: PathBuf::from("templates"),
        }
    }
}

/// One compiled page. `text` is the markup it was compiled from, kept so
/// warnings can be shown against it.
#[derive(Debug, Clone)]
pub struct BuiltPage {
    pub source: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub text: String,
    pub warnings: Vec<Warning>,
}

/// Every page written by a build, in build order. A page's position is the
/// `source_id` its warnings carry.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub pages: Vec<BuiltPage>,
}

impl BuildReport {
    pub fn warning_count(&self) -> usize {
        self.pages.iter().map(|p| p.warnings.len()).sum()
    }
}

/// Load templates from `config.templates` and build the site.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport, BuildError> {
    let store = load_templates(&config.templates)?;
    build_with_templates(config, &store)
}

/// Build the site with an already loaded template store.
pub fn build_with_templates(
    config: &SiteConfig,
    store: &TemplateStore,
) -> Result<BuildReport, BuildError> {
    let mut builder = SiteBuilder {
        config,
        store,
        report: BuildReport::default(),
    };
    builder.build_dir(Path::new(""))?;
    log::info!("done, {} pages written", builder.report.pages.len());
    Ok(builder.report)
}

struct SiteBuilder<'a> {
    config: &'a SiteConfig,
    store: &'a TemplateStore,
    report: BuildReport,
}

impl SiteBuilder<'_> {
    /// Build one directory (relative to the input root) and return the title
    /// its index page was given.
    fn build_dir(&mut self, rel: &Path) -> Result<String, BuildError> {
        let in_dir = self.config.input.join(rel);
        let out_dir = self.config.output.join(rel);
        create_output_dir(&out_dir)?;

        let meta = IndexMeta::load_from_dir(&in_dir)?.unwrap_or_else(|| {
            log::info!("no index metadata in {}, using defaults", in_dir.display());
            IndexMeta::default()
        });
        let title = match (&meta.title, rel.as_os_str().is_empty()) {
            (Some(title), _) => title.clone(),
            (None, true) => DEFAULT_INDEX_TITLE.to_string(),
            (None, false) => return Err(BuildError::MissingIndexTitle(in_dir)),
        };

        let index_path = in_dir.join(INDEX_SOURCE);
        if std::fs::remove_file(&index_path).is_err() {
            log::info!("no previous {} file detected", index_path.display());
        }

        let mut entries = Vec::new();
        for path in sorted_entries(&in_dir)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with('.') || name == INDEX_SOURCE {
                continue;
            }

            if path.is_dir() {
                let sub_title = self.build_dir(&rel.join(name))?;
                if !meta.is_excluded(name) {
                    entries.push(IndexEntry {
                        href: format!("{}/index.html", name),
                        title: sub_title,
                    });
                }
            } else if path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
                let (stem, page_title) = self.compile_file(&path, &out_dir)?;
                if !meta.is_excluded(name) {
                    entries.push(IndexEntry {
                        href: format!("{}.html", stem),
                        title: page_title,
                    });
                }
            }
        }

        let source = index_source(&title, meta.description.as_deref(), entries);
        write_file(&index_path, &source)?;
        self.compile_file(&index_path, &out_dir)?;

        Ok(title)
    }

    /// Compile one source file into `out_dir`, returning its stem and title.
    fn compile_file(&mut self, path: &Path, out_dir: &Path) -> Result<(String, String), BuildError> {
        log::info!("reading {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| BuildError::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source_id = self.report.pages.len();
        let (page, warnings) = zwc::compile_page(&text, &stem, self.store, source_id);

        let output = out_dir.join(format!("{}.html", stem));
        write_file(&output, &page.html)?;
        log::info!("wrote {}", output.display());

        let title = page.title;
        self.report.pages.push(BuiltPage {
            source: path.to_path_buf(),
            output,
            title: title.clone(),
            text,
            warnings,
        });
        Ok((stem, title))
    }
}

fn create_output_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| BuildError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    log::info!("created output directory {}", dir.display());
    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let entries = std::fs::read_dir(dir).map_err(|source| BuildError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();
    Ok(paths)
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    std::fs::write(path, contents).map_err(|source| BuildError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
