use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

use crate::template::SlotKind;

/// A recoverable problem found while compiling. Compilation always continues
/// past these; the offending piece contributes no output.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// A marker rule refers to a template id the store does not hold.
    UnknownTemplate(u32),
    /// A slot asked for an argument the line did not supply.
    MissingArgument {
        template: u32,
        slot: SlotKind,
        index: usize,
    },
    /// A `%%` / `%%=` slot appeared before any argument was consumed.
    NoPreviousArgument { template: u32, slot: SlotKind },
    /// A code block named a language the highlighter does not know.
    UnknownLanguage(String),
    /// The highlighter failed part way through a block.
    HighlightFailed(String),
    /// The page assembler found a template id outside every known range.
    UnusedTemplate(u32),
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnknownTemplate(id) => write!(f, "template {} is not loaded", id),
            WarningKind::MissingArgument {
                template,
                slot,
                index,
            } => write!(
                f,
                "template {} has unsatisfied {} parameter (argument {})",
                template, slot, index
            ),
            WarningKind::NoPreviousArgument { template, slot } => write!(
                f,
                "template {} has {} as its first parameter",
                template, slot
            ),
            WarningKind::UnknownLanguage(lang) => {
                write!(f, "unknown highlight language '{}', block left unstyled", lang)
            }
            WarningKind::HighlightFailed(reason) => {
                write!(f, "highlighting failed ({}), block left unstyled", reason)
            }
            WarningKind::UnusedTemplate(id) => write!(f, "template number {} is unused", id),
        }
    }
}

/// A warning enriched with the source line it came from, when there is one.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    /// Byte span of the offending source line.
    pub span: Option<Range<usize>>,
    pub source_id: usize,
}

impl Warning {
    /// A warning with no source location (template store or page level).
    pub fn new(kind: WarningKind) -> Self {
        Warning {
            kind,
            span: None,
            source_id: 0,
        }
    }

    pub fn at(kind: WarningKind, span: Range<usize>, source_id: usize) -> Self {
        Warning {
            kind,
            span: Some(span),
            source_id,
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::new(Severity::Warning).with_message(self.kind.to_string());
        match &self.span {
            Some(span) => {
                diagnostic.with_labels(vec![Label::primary(self.source_id, span.clone())])
            }
            None => diagnostic,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}
