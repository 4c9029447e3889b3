use zwc::escape::{encode_html, encode_url};
use zwc::syntax::thumbnail_path;
use zwc::template::{RenderIssue, SlotKind, Template};

fn template(source: &str) -> Template {
    Template::parse(7, "test", source)
}

#[test]
fn html_slots_consume_arguments_in_order() {
    let t = template("<p>\n%\n|\n%\n</p>");
    let rendered = t.render(&["first", "second"], None);
    assert_eq!(rendered.text, "<p>first|second</p>");
    assert!(rendered.issues.is_empty());
}

#[test]
fn text_after_directive_is_discarded() {
    let t = template("%this text is ignored\n-\n%= so is this");
    let rendered = t.render(&["a b", "c d"], None);
    assert_eq!(rendered.text, "a b-c%20d");
}

#[test]
fn url_slot_keeps_path_separators() {
    let t = template("%=");
    let rendered = t.render(&["https://example.com/a dir/é?.png"], None);
    assert_eq!(rendered.text, "https://example.com/a%20dir/%C3%A9%3F.png");
}

#[test]
fn previous_slot_reuses_last_argument_without_advancing() {
    let t = template("%\n/\n%%\n/\n%");
    let rendered = t.render(&["a&b", "c"], None);
    assert_eq!(rendered.text, "a&amp;b/a&amp;b/c");
}

#[test]
fn previous_url_slot_applies_transform() {
    let t = template("<a href=\"\n%=\n\"><img src=\"\n%%=\n\"></a>");
    let rendered = t.render(&["/img/pic 1.png"], Some(thumbnail_path));
    assert_eq!(
        rendered.text,
        "<a href=\"/img/pic%201.png\"><img src=\"/img/s_pic%201.png\"></a>"
    );
}

#[test]
fn previous_slot_first_is_reported_not_fatal() {
    let t = template("[\n%%\n]\n[\n%%=\n]");
    let rendered = t.render(&["unused"], None);
    assert_eq!(rendered.text, "[][]");
    assert_eq!(
        rendered.issues,
        vec![
            RenderIssue::NoPreviousArgument(SlotKind::PreviousHtml),
            RenderIssue::NoPreviousArgument(SlotKind::PreviousUrl),
        ]
    );
}

#[test]
fn missing_arguments_still_advance_cursor() {
    let t = template("%\n-\n%\n-\n%=");
    let rendered = t.render(&["only"], None);
    assert_eq!(rendered.text, "only--");
    assert_eq!(
        rendered.issues,
        vec![
            RenderIssue::MissingArgument {
                slot: SlotKind::Html,
                index: 1
            },
            RenderIssue::MissingArgument {
                slot: SlotKind::Url,
                index: 2
            },
        ]
    );
}

#[test]
fn comment_lines_are_dropped() {
    let t = template("# heading template\n<h1>\n%\n</h1>");
    assert_eq!(t.text(), "<h1>\n%\n</h1>");
    assert_eq!(t.render(&["Hi"], None).text, "<h1>Hi</h1>");
}

#[test]
fn literal_lines_are_concatenated_without_separator() {
    let t = template("<ul>\n<li>one</li>\n</ul>\n");
    assert_eq!(t.render::<&str>(&[], None).text, "<ul><li>one</li></ul>");
}

#[test]
fn html_escaping_is_not_idempotent() {
    assert_eq!(encode_html("&amp;"), "&amp;amp;");
    assert_eq!(
        encode_html("<a href='x'>\"\u{2014}\"</a>"),
        "&lt;a href=&#39;x&#39;&gt;&quot;&mdash;&quot;&lt;/a&gt;"
    );
}

#[test]
fn url_encoding_uses_utf8_bytes() {
    assert_eq!(encode_url("a b/c:d~e_f.g-h"), "a%20b/c:d~e_f.g-h");
    assert_eq!(encode_url("naïve&x=1"), "na%C3%AFve%26x%3D1");
}

#[test]
fn thumbnail_path_prefixes_file_name() {
    assert_eq!(thumbnail_path("/img/pic.png"), "/img/s_pic.png");
    assert_eq!(thumbnail_path("pic.png"), "s_pic.png");
}
