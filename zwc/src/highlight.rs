//! Syntax highlighting for fenced code blocks.

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, append_highlighted_html_for_styled_line};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::diagnostic::WarningKind;
use crate::escape::encode_html;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

static THEME: LazyLock<Theme> = LazyLock::new(|| {
    let mut themes = ThemeSet::load_defaults();
    themes
        .themes
        .remove("InspiredGitHub")
        .unwrap_or_default()
});

/// Language argument that explicitly asks for no highlighting.
pub const NO_LANGUAGE: &str = "none";

/// Unstyled rendering of a code block.
pub fn preformatted(code: &str) -> String {
    format!("<pre>\n{}</pre>\n", encode_html(code))
}

/// Highlight a whole code block. `args` are the fields from the opening
/// fence line; the first one names the language.
///
/// No language (or `none`) gives the unstyled block. An unknown language is
/// an error the caller reports before falling back to [`preformatted`].
pub fn highlight_block(code: &str, args: &[String]) -> Result<String, WarningKind> {
    let lang = match args.first().map(String::as_str) {
        None | Some(NO_LANGUAGE) => return Ok(preformatted(code)),
        Some(lang) => lang,
    };

    let syntax = SYNTAXES
        .find_syntax_by_token(lang)
        .ok_or_else(|| WarningKind::UnknownLanguage(lang.to_string()))?;

    let mut out = String::from("<pre class=\"code\">");
    let mut highlighter = HighlightLines::new(syntax, &THEME);
    for line in LinesWithEndings::from(code) {
        let regions = highlighter
            .highlight_line(line, &SYNTAXES)
            .map_err(|err| WarningKind::HighlightFailed(err.to_string()))?;
        append_highlighted_html_for_styled_line(&regions[..], IncludeBackground::No, &mut out)
            .map_err(|err| WarningKind::HighlightFailed(err.to_string()))?;
    }
    out.push_str("</pre>\n");
    Ok(out)
}
