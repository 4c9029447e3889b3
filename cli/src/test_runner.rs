use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use zwc::compiler::{CONTAINER_CLOSE, CONTAINER_OPEN};
use zwc::{Compiler, Template, TemplateStore, Warning};

const FIXTURE_SUFFIX: &str = ".test.zwc";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning must point at this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    /// Human-readable fixture description.
    #[serde(default)]
    pub description: Option<String>,

    /// Template bodies keyed by template number.
    #[serde(default)]
    pub templates: BTreeMap<String, String>,

    /// Expected compiled body without the content container (trimmed comparison).
    #[serde(default)]
    pub expect_body: Option<String>,

    /// Substrings the compiled body must contain.
    #[serde(default)]
    pub expect_contains: Vec<String>,

    /// Expected page title.
    #[serde(default)]
    pub expect_title: Option<String>,

    /// Expected warnings. If present (even empty), count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

impl FixtureConfig {
    fn template_store(&self) -> Result<TemplateStore, String> {
        self.templates
            .iter()
            .map(|(key, body)| {
                let id: u32 = key
                    .parse()
                    .map_err(|_| format!("template key '{}' is not a number", key))?;
                Ok(Template::parse(id, format!("fixture template {}", id), body))
            })
            .collect()
    }
}

/// Split a `.test.zwc` file into its TOML front matter and markup source.
fn parse_fixture(content: &str) -> Result<(FixtureConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- front matter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- front matter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: FixtureConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum Outcome {
    Pass,
    Fail(String),
}

pub struct FixtureResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: Outcome,
}

impl FixtureResult {
    fn label(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.trim_end_matches(FIXTURE_SUFFIX).to_string())
                .unwrap_or_else(|| "?".to_string())
        })
    }
}

fn run_fixture(path: &Path) -> FixtureResult {
    let (description, outcome) = match check_fixture(path) {
        Ok((description, None)) => (description, Outcome::Pass),
        Ok((description, Some(reason))) => (description, Outcome::Fail(reason)),
        Err(reason) => (None, Outcome::Fail(reason)),
    };
    FixtureResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

/// Compile one fixture and compare against its expectations. The inner
/// `Option` holds the first mismatch found.
fn check_fixture(path: &Path) -> Result<(Option<String>, Option<String>), String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read file: {}", e))?;
    let (config, source) =
        parse_fixture(&content).map_err(|e| format!("front matter error: {}", e))?;
    let store = config.template_store()?;

    let compiled = Compiler::new(&store, zwc::standard_syntax()).compile(source);
    let body = compiled
        .html
        .strip_prefix(CONTAINER_OPEN)
        .and_then(|h| h.strip_suffix(CONTAINER_CLOSE))
        .unwrap_or(&compiled.html);

    let mismatch = check_body(&config, body)
        .or_else(|| check_title(&config, path, source))
        .or_else(|| {
            config
                .expect_warnings
                .as_ref()
                .and_then(|expected| check_warnings(source, &compiled.warnings, expected))
        });

    Ok((config.description, mismatch))
}

fn check_body(config: &FixtureConfig, body: &str) -> Option<String> {
    if let Some(expected) = &config.expect_body {
        if body.trim() != expected.trim() {
            return Some(format!(
                "body mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected.trim(),
                body.trim()
            ));
        }
    }

    config
        .expect_contains
        .iter()
        .find(|needle| !body.contains(needle.as_str()))
        .map(|needle| format!("body does not contain {:?}\n  actual: {:?}", needle, body))
}

fn check_title(config: &FixtureConfig, path: &Path, source: &str) -> Option<String> {
    let expected = config.expect_title.as_ref()?;
    let actual = zwc::page::extract_title(source).unwrap_or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.trim_end_matches(FIXTURE_SUFFIX).to_string())
            .unwrap_or_default()
    });
    (&actual != expected).then(|| format!("expected title {:?}, got {:?}", expected, actual))
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(
    source: &str,
    warnings: &[Warning],
    expected: &[ExpectedWarning],
) -> Option<String> {
    if warnings.len() != expected.len() {
        let actual: Vec<String> = warnings.iter().map(|w| format!("  - {}", w)).collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            warnings.len(),
            if actual.is_empty() {
                "    (none)".to_string()
            } else {
                actual.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected).enumerate() {
        let msg = actual.to_string();
        if !msg.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, msg
            ));
        }

        let Some(expected_line) = expected.line else {
            continue;
        };
        match &actual.span {
            Some(span) => {
                let actual_line = byte_offset_to_line(source, span.start);
                if actual_line != expected_line {
                    return Some(format!(
                        "warning[{}]: expected on line {}, but it is on line {}",
                        i, expected_line, actual_line
                    ));
                }
            }
            None => {
                return Some(format!(
                    "warning[{}]: expected on line {}, but warning has no span",
                    i, expected_line
                ));
            }
        }
    }

    None
}

/// Discover fixtures grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_fixtures(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_fixtures(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect_fixtures(&path, root, out);
            continue;
        }
        let is_fixture = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(FIXTURE_SUFFIX));
        if is_fixture {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given fixture path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        eprintln!("  {} ({} fixtures)", category_label(cat), files.len());
    }
}

fn paint(text: &str, code: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

/// Run every fixture under `path` (or a single file). If `categories` is
/// non-empty, only those categories run. Returns the process exit code.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let selected: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
            return 1;
        }
        select_categories(all, categories)
    };

    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<FixtureResult> = Vec::new();

    for (category, files) in &selected {
        eprintln!();
        eprintln!("{}", paint(category_label(category), "1", no_color));

        for file in files {
            let result = run_fixture(file);
            match result.outcome {
                Outcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), result.label());
                }
                Outcome::Fail(_) => {
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let Outcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            paint("ok", "32", no_color),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}

fn select_categories(
    all: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> Vec<(String, Vec<PathBuf>)> {
    if requested.is_empty() {
        return all.into_iter().collect();
    }

    for req in requested {
        let req = req.trim_matches('/');
        let found = all
            .keys()
            .any(|cat| cat == req || cat.starts_with(&format!("{}/", req)));
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    all.into_iter()
        .filter(|(cat, _)| {
            requested.iter().any(|req| {
                let req = req.trim_matches('/');
                cat == req || cat.starts_with(&format!("{}/", req))
            })
        })
        .collect()
}
