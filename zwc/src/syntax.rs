//! The marker dispatch table and the block modes markers switch between.

use std::collections::HashMap;

use crate::diagnostic::WarningKind;
use crate::highlight;
use crate::template::ArgTransform;

/// Template ids used by the standard marker table.
pub mod ids {
    pub const CODE: u32 = 50;
    pub const HEADING_1: u32 = 51;
    pub const HEADING_2: u32 = 52;
    pub const HEADING_3: u32 = 53;
    pub const LINK: u32 = 54;
    pub const LIST_ITEM: u32 = 55;
    pub const BLOCKQUOTE: u32 = 56;
    pub const IMAGE: u32 = 57;
    pub const THUMBNAIL: u32 = 58;
    pub const EXTERNAL_LINK: u32 = 59;
    pub const RAW_HTML: u32 = 60;
    pub const CENTERED: u32 = 61;
    pub const AUDIO: u32 = 62;
}

/// The structural context the compiler is in. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Plain,
    Code,
    Html,
    List,
}

/// Post-processing for a whole block, run once its closing marker is seen.
#[derive(Clone, Copy)]
pub struct BlockProcessor {
    /// Receives the raw block text and the fields of the opening line.
    pub process: fn(&str, &[String]) -> Result<String, WarningKind>,
    /// Used in place of `process` output when it reports a problem.
    pub fallback: fn(&str) -> String,
}

impl std::fmt::Debug for BlockProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BlockProcessor")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModeSpec {
    pub open: &'static str,
    pub close: &'static str,
    pub strip_whitespace: bool,
    /// Sticky modes survive unmarked lines and are only left by a second
    /// marker of the same mode.
    pub sticky: bool,
    pub escape_html: bool,
    pub processor: Option<BlockProcessor>,
}

const PLAIN_MODE: ModeSpec = ModeSpec {
    open: "",
    close: "",
    strip_whitespace: true,
    sticky: false,
    escape_html: true,
    processor: None,
};

const CODE_MODE: ModeSpec = ModeSpec {
    // The processor emits the <pre> wrapper itself.
    open: "",
    close: "",
    strip_whitespace: false,
    sticky: true,
    escape_html: true,
    processor: Some(BlockProcessor {
        process: highlight::highlight_block,
        fallback: highlight::preformatted,
    }),
};

const HTML_MODE: ModeSpec = ModeSpec {
    open: "",
    close: "",
    strip_whitespace: false,
    sticky: true,
    escape_html: false,
    processor: None,
};

const LIST_MODE: ModeSpec = ModeSpec {
    open: "<ul>",
    close: "</ul>",
    strip_whitespace: true,
    sticky: false,
    escape_html: true,
    processor: None,
};

impl Mode {
    pub fn spec(self) -> &'static ModeSpec {
        match self {
            Mode::Plain => &PLAIN_MODE,
            Mode::Code => &CODE_MODE,
            Mode::Html => &HTML_MODE,
            Mode::List => &LIST_MODE,
        }
    }
}

/// One entry of the dispatch table.
#[derive(Debug, Clone)]
pub struct SyntaxRule {
    pub marker: &'static str,
    pub template: u32,
    /// How many times the rest of the line is split on whitespace. Zero keeps
    /// it as a single field.
    pub max_splits: usize,
    pub mode: Mode,
    pub trailing_newline: bool,
    pub transform: Option<ArgTransform>,
}

impl SyntaxRule {
    pub const fn new(marker: &'static str, template: u32, mode: Mode) -> Self {
        SyntaxRule {
            marker,
            template,
            max_splits: 0,
            mode,
            trailing_newline: false,
            transform: None,
        }
    }

    pub const fn splits(mut self, max_splits: usize) -> Self {
        self.max_splits = max_splits;
        self
    }

    pub const fn newline(mut self) -> Self {
        self.trailing_newline = true;
        self
    }

    pub const fn transform(mut self, transform: ArgTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Split the text following the marker into at most `max_splits + 1`
    /// fields.
    pub fn fields(&self, rest: &str) -> Vec<String> {
        split_fields(rest, self.max_splits)
    }
}

/// Marker dispatch keyed by exact first-field equality.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTable {
    rules: HashMap<&'static str, SyntaxRule>,
}

impl SyntaxTable {
    pub fn new() -> Self {
        SyntaxTable::default()
    }

    /// The full markup grammar.
    pub fn standard() -> Self {
        [
            SyntaxRule::new("```", ids::CODE, Mode::Code),
            SyntaxRule::new("#", ids::HEADING_1, Mode::Plain).newline(),
            SyntaxRule::new("##", ids::HEADING_2, Mode::Plain).newline(),
            SyntaxRule::new("###", ids::HEADING_3, Mode::Plain).newline(),
            SyntaxRule::new("=>", ids::LINK, Mode::Plain).splits(1).newline(),
            SyntaxRule::new("=>>", ids::EXTERNAL_LINK, Mode::Plain)
                .splits(1)
                .newline(),
            SyntaxRule::new("*", ids::LIST_ITEM, Mode::List).newline(),
            SyntaxRule::new(">", ids::BLOCKQUOTE, Mode::Plain).newline(),
            SyntaxRule::new("!", ids::IMAGE, Mode::Plain).splits(1).newline(),
            SyntaxRule::new("!!", ids::THUMBNAIL, Mode::Plain)
                .splits(1)
                .newline()
                .transform(thumbnail_path),
            SyntaxRule::new("<@>", ids::RAW_HTML, Mode::Html),
            SyntaxRule::new("$", ids::CENTERED, Mode::Plain).newline(),
            SyntaxRule::new("!a", ids::AUDIO, Mode::Plain).splits(1).newline(),
        ]
        .into_iter()
        .collect()
    }

    /// Add a rule, replacing any rule with the same marker.
    pub fn insert(&mut self, rule: SyntaxRule) -> Option<SyntaxRule> {
        self.rules.insert(rule.marker, rule)
    }

    /// The rule whose marker equals the line's first whitespace-delimited
    /// field, if any.
    pub fn lookup(&self, line: &str) -> Option<&SyntaxRule> {
        line.split_whitespace()
            .next()
            .and_then(|field| self.rules.get(field))
    }
}

impl FromIterator<SyntaxRule> for SyntaxTable {
    fn from_iter<I: IntoIterator<Item = SyntaxRule>>(iter: I) -> Self {
        let mut table = SyntaxTable::new();
        for rule in iter {
            table.insert(rule);
        }
        table
    }
}

/// Path of the scaled-down copy of an image: `s_` prefixed to the file name.
pub fn thumbnail_path(link: &str) -> String {
    match link.rfind('/') {
        Some(slash) => format!("{}s_{}", &link[..=slash], &link[slash + 1..]),
        None => format!("s_{}", link),
    }
}

/// Whitespace split with a split limit. Leading whitespace is ignored, the
/// last field keeps its interior whitespace, and an empty input has no
/// fields.
pub fn split_fields(text: &str, max_splits: usize) -> Vec<String> {
    let mut fields = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        if fields.len() == max_splits {
            fields.push(rest.trim_end().to_string());
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(rest[..end].to_string());
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest.to_string());
                break;
            }
        }
    }

    fields
}
