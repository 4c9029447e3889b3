use std::ops::RangeInclusive;

use crate::diagnostic::{Warning, WarningKind};
use crate::template::TemplateStore;

/// Template id ranges the assembler knows about.
pub const DOCUMENT_START: u32 = 0;
pub const HEAD: RangeInclusive<u32> = 1..=9;
pub const TITLE: u32 = 8;
pub const BODY_START: RangeInclusive<u32> = 20..=29;
pub const CONTENT: RangeInclusive<u32> = 50..=79;
pub const TRAILER: RangeInclusive<u32> = 80..=89;
pub const DOCUMENT_END: u32 = 99;

/// A finished page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub html: String,
}

/// Title of a document: the text of its first `# ` line.
pub fn extract_title(source: &str) -> Option<String> {
    source
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim_end().to_string())
}

/// Interleave boilerplate templates with the compiled body, in ascending id
/// order. The body is inserted once, at the first content-range template.
pub fn assemble(store: &TemplateStore, title: &str, body: &str) -> (String, Vec<Warning>) {
    let mut page = String::new();
    let mut warnings = Vec::new();
    let mut head_closed = false;
    let mut body_written = false;

    for template in store.iter() {
        match template.id {
            DOCUMENT_START => {
                page.push_str(template.text());
                page.push_str("\n<head>\n");
            }
            TITLE => {
                let rendered = template.render(&[title], None);
                page.push_str(&rendered.text);
                warnings.extend(
                    rendered
                        .issues
                        .into_iter()
                        .map(|issue| Warning::new(issue.into_warning(template.id))),
                );
            }
            id if HEAD.contains(&id) => page.push_str(template.text()),
            id if BODY_START.contains(&id) => {
                if !head_closed {
                    head_closed = true;
                    page.push_str("\n</head>\n<body>\n");
                }
                page.push_str(template.text());
            }
            id if CONTENT.contains(&id) => {
                if !body_written {
                    body_written = true;
                    page.push_str(body);
                }
            }
            id if TRAILER.contains(&id) => page.push_str(template.text()),
            DOCUMENT_END => {
                page.push_str("\n</body>\n");
                page.push_str(template.text());
            }
            id => warnings.push(Warning::new(WarningKind::UnusedTemplate(id))),
        }
    }

    (page, warnings)
}
