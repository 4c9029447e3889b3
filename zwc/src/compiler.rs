//! Line scanner that turns markup into an HTML fragment.
//!
//! Each line is either *marked* (its first field is a marker in the
//! [`SyntaxTable`]) and rendered through that marker's template, or literal
//! text emitted according to the current [`Mode`]. Modes wrap their span in
//! open/close tags; sticky modes (code, raw HTML) stay open across literal
//! lines until the same marker appears again.

use std::ops::Range;

use crate::diagnostic::{Warning, WarningKind};
use crate::escape::encode_html;
use crate::syntax::{BlockProcessor, Mode, SyntaxRule, SyntaxTable};
use crate::template::TemplateStore;

pub const CONTAINER_OPEN: &str = "\n<div id=\"content\" class=\"container\">";
pub const CONTAINER_CLOSE: &str = "</div>\n";

/// A compiled fragment and the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub html: String,
    pub warnings: Vec<Warning>,
}

/// Compiles documents against a template store and marker table. Holds no
/// per-document state; every call to [`Compiler::compile`] starts in plain
/// mode.
pub struct Compiler<'a> {
    store: &'a TemplateStore,
    table: &'a SyntaxTable,
    source_id: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(store: &'a TemplateStore, table: &'a SyntaxTable) -> Self {
        Compiler {
            store,
            table,
            source_id: 0,
        }
    }

    /// Source id stamped on warnings, for codespan-reporting.
    pub fn with_source_id(mut self, source_id: usize) -> Self {
        self.source_id = source_id;
        self
    }

    pub fn compile(&self, source: &str) -> Compiled {
        let mut state = BlockState::new(self);
        for (span, line) in source_lines(source) {
            state.process_line(line, span);
        }
        state.finish()
    }
}

struct BlockState<'a> {
    store: &'a TemplateStore,
    table: &'a SyntaxTable,
    source_id: usize,
    mode: Mode,
    out: String,
    /// Raw text of the open block, only used by modes with a processor.
    block: String,
    /// Fields of the line that opened the block.
    block_args: Vec<String>,
    block_span: Option<Range<usize>>,
    warnings: Vec<Warning>,
}

impl<'a> BlockState<'a> {
    fn new(compiler: &Compiler<'a>) -> Self {
        BlockState {
            store: compiler.store,
            table: compiler.table,
            source_id: compiler.source_id,
            mode: Mode::Plain,
            out: String::new(),
            block: String::new(),
            block_args: Vec::new(),
            block_span: None,
            warnings: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str, span: Range<usize>) {
        let table = self.table;
        match table.lookup(line) {
            Some(rule) => self.marked_line(rule, line, span),
            None => self.literal_line(line),
        }
    }

    fn marked_line(&mut self, rule: &SyntaxRule, line: &str, span: Range<usize>) {
        let active = self.mode.spec();
        let mut opened = false;

        if !active.sticky || rule.mode == self.mode {
            if rule.mode != self.mode {
                self.out.push_str(active.close);
                self.mode = rule.mode;
                self.out.push_str(self.mode.spec().open);
                opened = true;
            } else if active.sticky {
                // Second marker of a sticky mode closes the block.
                self.out.push_str(active.close);
                if let Some(processor) = active.processor {
                    self.run_processor(processor);
                }
                self.mode = Mode::Plain;
            }
        }

        let fields = rule.fields(strip_marker(line, rule.marker));
        let store = self.store;
        match store.get(rule.template) {
            Some(template) => {
                let rendered = template.render(&fields[..], rule.transform);
                self.out.push_str(&rendered.text);
                for issue in rendered.issues {
                    self.warn(issue.into_warning(template.id), span.clone());
                }
            }
            None => self.warn(WarningKind::UnknownTemplate(rule.template), span.clone()),
        }

        if rule.trailing_newline {
            self.out.push('\n');
        }

        if opened && self.mode.spec().processor.is_some() {
            self.block_args = fields;
            self.block_span = Some(span);
        }
    }

    fn literal_line(&mut self, line: &str) {
        let active = self.mode.spec();
        if !active.sticky {
            self.out.push_str(active.close);
            self.mode = Mode::Plain;
        }

        let spec = self.mode.spec();
        let mut text = if spec.strip_whitespace {
            line.trim_start().to_string()
        } else {
            line.to_string()
        };
        text.push('\n');

        if spec.processor.is_some() {
            // Processors own escaping; keep the raw text.
            self.block.push_str(&text);
        } else if spec.escape_html {
            self.out.push_str(&encode_html(&text));
        } else {
            self.out.push_str(&text);
        }
    }

    fn run_processor(&mut self, processor: BlockProcessor) {
        let block = std::mem::take(&mut self.block);
        let args = std::mem::take(&mut self.block_args);
        let span = self.block_span.take();

        match (processor.process)(&block, &args) {
            Ok(html) => self.out.push_str(&html),
            Err(kind) => {
                match span {
                    Some(span) => self.warn(kind, span),
                    None => self.warnings.push(Warning::new(kind)),
                }
                self.out.push_str(&(processor.fallback)(&block));
            }
        }
    }

    fn warn(&mut self, kind: WarningKind, span: Range<usize>) {
        self.warnings.push(Warning::at(kind, span, self.source_id));
    }

    fn finish(mut self) -> Compiled {
        if self.mode != Mode::Plain {
            let spec = self.mode.spec();
            // An unterminated block is never handed to its processor.
            if spec.processor.is_some() {
                self.out.push_str(&encode_html(&self.block));
            }
            self.out.push_str(spec.close);
        }

        Compiled {
            html: format!("{}{}{}", CONTAINER_OPEN, self.out, CONTAINER_CLOSE),
            warnings: self.warnings,
        }
    }
}

/// Text after the marker token. Leading whitespace before the marker is
/// dropped; the marker is known to be the line's first field.
fn strip_marker<'l>(line: &'l str, marker: &str) -> &'l str {
    let line = line.trim_start();
    line.strip_prefix(marker).unwrap_or(line)
}

/// Lines without their terminators, paired with their byte spans.
pub fn source_lines(source: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
    let mut offset = 0;
    source.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        (start..start + line.len(), line)
    })
}
