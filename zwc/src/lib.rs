pub mod compiler;
pub mod diagnostic;
pub mod escape;
pub mod highlight;
pub mod page;
pub mod syntax;
pub mod template;

use std::sync::LazyLock;

pub use compiler::{Compiled, Compiler};
pub use diagnostic::{Warning, WarningKind};
pub use page::Page;
pub use syntax::{Mode, SyntaxRule, SyntaxTable};
pub use template::{Template, TemplateStore};

static STANDARD_SYNTAX: LazyLock<SyntaxTable> = LazyLock::new(SyntaxTable::standard);

/// The marker table for the full markup grammar.
pub fn standard_syntax() -> &'static SyntaxTable {
    &STANDARD_SYNTAX
}

/// Compile a document body with the standard grammar.
pub fn compile_document(source: &str, store: &TemplateStore) -> Compiled {
    Compiler::new(store, standard_syntax()).compile(source)
}

/// Compile a document into a full page.
///
/// `fallback_title` is used when the document has no `# ` heading. Warnings
/// from the body carry `source_id`; page-level warnings have no span.
pub fn compile_page(
    source: &str,
    fallback_title: &str,
    store: &TemplateStore,
    source_id: usize,
) -> (Page, Vec<Warning>) {
    let title = page::extract_title(source).unwrap_or_else(|| fallback_title.to_string());

    let body = Compiler::new(store, standard_syntax())
        .with_source_id(source_id)
        .compile(source);
    let (html, page_warnings) = page::assemble(store, &title, &body.html);

    let mut warnings = body.warnings;
    warnings.extend(page_warnings);
    (Page { title, html }, warnings)
}
