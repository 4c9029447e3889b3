use zwc::compiler::{CONTAINER_CLOSE, CONTAINER_OPEN};
use zwc::template::SlotKind;
use zwc::{Template, TemplateStore, WarningKind, compile_document};

fn store(entries: &[(u32, &str)]) -> TemplateStore {
    entries
        .iter()
        .map(|(id, body)| Template::parse(*id, format!("{}_test.html", id), body))
        .collect()
}

fn site_templates() -> TemplateStore {
    store(&[
        (50, ""),
        (51, "<h1>\n%\n</h1>"),
        (54, "<a href=\"\n%=\n\">\n%\n</a>"),
        (55, "<li>\n%\n</li>"),
        (57, "<img src=\"\n%=\n\" alt=\"\n%\n\">"),
        (58, "<a href=\"\n%=\n\"><img src=\"\n%%=\n\" alt=\"\n%\n\"></a>"),
        (60, ""),
    ])
}

fn wrapped(inner: &str) -> String {
    format!("{}{}{}", CONTAINER_OPEN, inner, CONTAINER_CLOSE)
}

fn compile(source: &str) -> String {
    let compiled = compile_document(source, &site_templates());
    assert!(
        compiled.warnings.is_empty(),
        "unexpected warnings: {:?}",
        compiled.warnings
    );
    compiled.html
}

#[test]
fn unmarked_text_is_escaped_and_wrapped_once() {
    assert_eq!(
        compile("hello & <world>\n\"quoted\" \u{2014} it's"),
        wrapped("hello &amp; &lt;world&gt;\n&quot;quoted&quot; &mdash; it&#39;s\n")
    );
}

#[test]
fn plain_mode_strips_leading_whitespace() {
    assert_eq!(compile("   indented\n\tand tabbed"), wrapped("indented\nand tabbed\n"));
}

#[test]
fn heading_renders_through_template() {
    assert_eq!(compile("# Hello"), wrapped("<h1>Hello</h1>\n"));
}

#[test]
fn marker_must_be_a_whole_field() {
    assert_eq!(
        compile("#nospace\n```rust"),
        wrapped("#nospace\n```rust\n")
    );
}

#[test]
fn list_items_share_one_list() {
    assert_eq!(
        compile("* item one\n* item two\n\nafter"),
        wrapped("<ul><li>item one</li>\n<li>item two</li>\n</ul>\nafter\n")
    );
}

#[test]
fn list_closes_before_other_marker() {
    assert_eq!(
        compile("* a\n# Title"),
        wrapped("<ul><li>a</li>\n</ul><h1>Title</h1>\n")
    );
}

#[test]
fn list_left_open_is_closed_at_end() {
    assert_eq!(compile("* last"), wrapped("<ul><li>last</li>\n</ul>"));
}

#[test]
fn code_block_without_language_is_preformatted() {
    let html = compile("``` none\nlet x = 1;\n  <tag>\n```\ntail");
    assert_eq!(
        html,
        wrapped("<pre>\nlet x = 1;\n  &lt;tag&gt;\n</pre>\ntail\n")
    );
    assert_eq!(html.matches("<pre>").count(), 1);
    assert_eq!(html.matches("</pre>").count(), 1);
}

#[test]
fn code_block_preserves_blank_lines() {
    let html = compile("```\n\n\nplain text\n```");
    assert_eq!(html, wrapped("<pre>\n\n\nplain text\n</pre>\n"));
}

#[test]
fn code_block_is_highlighted_for_known_language() {
    let html = compile("``` rust\nfn main() {}\n```");
    assert!(html.contains("<pre class=\"code\">"), "got: {}", html);
    assert!(html.contains("<span"), "got: {}", html);
    assert!(html.contains("main"), "got: {}", html);
    assert_eq!(html.matches("</pre>").count(), 1);
}

#[test]
fn unknown_language_falls_back_with_warning() {
    let source = "``` nosuchlang\nx < y\n```";
    let compiled = compile_document(source, &site_templates());
    assert_eq!(compiled.html, wrapped("<pre>\nx &lt; y\n</pre>\n"));
    assert_eq!(compiled.warnings.len(), 1);
    assert_eq!(
        compiled.warnings[0].kind,
        WarningKind::UnknownLanguage("nosuchlang".to_string())
    );
    assert_eq!(compiled.warnings[0].span, Some(0..14));
}

#[test]
fn unterminated_code_block_is_not_processed() {
    assert_eq!(compile("``` rust\n<b>\n"), wrapped("&lt;b&gt;\n"));
}

#[test]
fn raw_html_block_is_not_escaped_or_stripped() {
    assert_eq!(
        compile("<@>\n<div class=\"x\">\n  kept\n<@>\n  after"),
        wrapped("<div class=\"x\">\n  kept\nafter\n")
    );
}

#[test]
fn image_encodes_source_and_escapes_alt() {
    assert_eq!(
        compile("! /img/pic.png Alt text"),
        wrapped("<img src=\"/img/pic.png\" alt=\"Alt text\">\n")
    );
    assert_eq!(
        compile("! /img/café.png Tom & Jerry"),
        wrapped("<img src=\"/img/caf%C3%A9.png\" alt=\"Tom &amp; Jerry\">\n")
    );
}

#[test]
fn thumbnail_links_full_size_image() {
    assert_eq!(
        compile("!! /img/big.png A view"),
        wrapped("<a href=\"/img/big.png\"><img src=\"/img/s_big.png\" alt=\"A view\"></a>\n")
    );
}

#[test]
fn missing_link_text_is_reported() {
    let compiled = compile_document("intro\n=> /only-href", &site_templates());
    assert_eq!(compiled.html, wrapped("intro\n<a href=\"/only-href\"></a>\n"));
    assert_eq!(
        compiled.warnings[0].kind,
        WarningKind::MissingArgument {
            template: 54,
            slot: SlotKind::Html,
            index: 1
        }
    );
    assert_eq!(compiled.warnings[0].span, Some(6..19));
}

#[test]
fn unknown_template_is_skipped() {
    let compiled = compile_document("### Sub\nbody", &site_templates());
    assert_eq!(compiled.html, wrapped("\nbody\n"));
    assert_eq!(compiled.warnings.len(), 1);
    assert_eq!(compiled.warnings[0].kind, WarningKind::UnknownTemplate(53));
}

#[test]
fn crlf_line_endings_are_normalized() {
    assert_eq!(compile("# Hi\r\nthere\r\n"), wrapped("<h1>Hi</h1>\nthere\n"));
}

#[test]
fn state_does_not_leak_between_documents() {
    let templates = site_templates();
    let _ = compile_document("``` none\nunterminated", &templates);
    let second = compile_document("<b>", &templates);
    assert_eq!(second.html, wrapped("&lt;b&gt;\n"));
}
