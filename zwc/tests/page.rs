use zwc::page::{assemble, extract_title};
use zwc::{Template, TemplateStore, WarningKind, compile_page};

fn store(entries: &[(u32, &str)]) -> TemplateStore {
    entries
        .iter()
        .map(|(id, body)| Template::parse(*id, format!("{}_test.html", id), body))
        .collect()
}

fn boilerplate() -> TemplateStore {
    store(&[
        (0, "<!DOCTYPE html>\n<html>"),
        (1, "<meta charset=\"utf-8\">"),
        (8, "<title>\n%\n</title>"),
        (20, "<header></header>"),
        (50, ""),
        (51, "<h1>\n%\n</h1>"),
        (80, "<footer></footer>"),
        (99, "</html>"),
    ])
}

#[test]
fn title_is_first_level_one_heading() {
    assert_eq!(
        extract_title("intro\n## Sub\n# Main Title  \n# Second"),
        Some("Main Title".to_string())
    );
    assert_eq!(extract_title("## Only a sub heading"), None);
    assert_eq!(extract_title("#NoSpace"), None);
}

#[test]
fn boilerplate_is_interleaved_by_id() {
    let (html, warnings) = assemble(&boilerplate(), "A & B", "BODY");
    assert!(warnings.is_empty());
    assert_eq!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\"><title>A &amp; B</title>\
         \n</head>\n<body>\n<header></header>BODY<footer></footer>\n</body>\n</html>"
    );
}

#[test]
fn body_is_inserted_once_for_the_content_range() {
    let (html, _) = assemble(&boilerplate(), "t", "BODY");
    assert_eq!(html.matches("BODY").count(), 1);
}

#[test]
fn unknown_ranges_are_reported_and_skipped() {
    let mut templates = boilerplate();
    templates.insert(Template::parse(12, "12_include.html", "<include>"));
    templates.insert(Template::parse(42, "42_stray.html", "<stray>"));

    let (html, warnings) = assemble(&templates, "t", "BODY");
    assert!(!html.contains("<include>"));
    assert!(!html.contains("<stray>"));
    let kinds: Vec<_> = warnings.into_iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![WarningKind::UnusedTemplate(12), WarningKind::UnusedTemplate(42)]
    );
}

#[test]
fn page_title_falls_back_when_no_heading() {
    let (page, warnings) = compile_page("just text", "notes", &boilerplate(), 3);
    assert!(warnings.is_empty());
    assert_eq!(page.title, "notes");
    assert!(page.html.contains("<title>notes</title>"));
    assert!(page.html.contains("just text\n"));
}

#[test]
fn page_uses_heading_title_and_compiled_body() {
    let (page, _) = compile_page("# Welcome\nHello.", "index", &boilerplate(), 0);
    assert_eq!(page.title, "Welcome");
    assert!(page.html.contains("<title>Welcome</title>"));
    assert!(page.html.contains(
        "<header></header>\n<div id=\"content\" class=\"container\"><h1>Welcome</h1>\nHello.\n</div>\n<footer></footer>"
    ));
}

#[test]
fn body_warnings_carry_source_id() {
    let (_, warnings) = compile_page("### Missing", "x", &boilerplate(), 5);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::UnknownTemplate(53));
    assert_eq!(warnings[0].source_id, 5);
}
