use std::borrow::Cow;

use crate::diagnostic::WarningKind;
use crate::escape::{encode_html, encode_url};
use crate::template::{SlotKind, Template, TemplateLine};

/// Per-rule rewrite applied to the value a `%%` / `%%=` slot re-uses.
pub type ArgTransform = fn(&str) -> String;

/// Why a slot produced no text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderIssue {
    MissingArgument { slot: SlotKind, index: usize },
    NoPreviousArgument(SlotKind),
}

impl RenderIssue {
    pub fn into_warning(self, template: u32) -> WarningKind {
        match self {
            RenderIssue::MissingArgument { slot, index } => WarningKind::MissingArgument {
                template,
                slot,
                index,
            },
            RenderIssue::NoPreviousArgument(slot) => {
                WarningKind::NoPreviousArgument { template, slot }
            }
        }
    }
}

/// Output of expanding a template. Slots that failed contribute nothing to
/// `text` and are listed in `issues` in template order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub text: String,
    pub issues: Vec<RenderIssue>,
}

impl Template {
    /// Expand the template against positional arguments.
    pub fn render<S: AsRef<str>>(&self, args: &[S], transform: Option<ArgTransform>) -> Rendered {
        let mut rendered = Rendered::default();
        let mut cursor = 0;

        for line in &self.lines {
            match line {
                TemplateLine::Literal(text) => rendered.text.push_str(text),
                TemplateLine::Slot(slot) => {
                    match fill_slot(*slot, args, &mut cursor, transform) {
                        Ok(value) => rendered.text.push_str(&value),
                        Err(issue) => rendered.issues.push(issue),
                    }
                }
            }
        }

        rendered
    }
}

/// Resolve one slot. `%` and `%=` advance the cursor even when the argument
/// is missing; the `%%` forms never move it.
fn fill_slot<S: AsRef<str>>(
    slot: SlotKind,
    args: &[S],
    cursor: &mut usize,
    transform: Option<ArgTransform>,
) -> Result<String, RenderIssue> {
    let index = if slot.consumes() {
        let index = *cursor;
        *cursor += 1;
        index
    } else {
        cursor
            .checked_sub(1)
            .ok_or(RenderIssue::NoPreviousArgument(slot))?
    };

    let arg: &str = args
        .get(index)
        .ok_or(RenderIssue::MissingArgument { slot, index })?
        .as_ref();

    let value: Cow<'_, str> = match (slot.consumes(), transform) {
        (false, Some(transform)) => Cow::Owned(transform(arg)),
        _ => Cow::Borrowed(arg),
    };

    Ok(match slot {
        SlotKind::Html | SlotKind::PreviousHtml => encode_html(&value),
        SlotKind::Url | SlotKind::PreviousUrl => encode_url(&value),
    })
}
