//! Comprehensive tests for hq-html
//!
//! Parsing into the arena DOM and rendering back to markup.

use hq_html::{HtmlParser, NodeId, get_inner_html, get_outer_html, parse, parse_reader};

fn find_tag(doc: &hq_html::Document, tag: &str) -> Option<NodeId> {
    doc.tree()
        .descendants(doc.root())
        .find(|(id, _)| doc.tree().tag_name(*id) == Some(tag))
        .map(|(id, _)| id)
}

#[test]
fn test_parse_minimal_html() {
    let doc = parse("").unwrap();
    assert!(doc.tree().len() >= 1, "Even empty HTML should have root");
    // html5ever synthesizes html/head/body
    assert!(doc.body().is_some());
}

#[test]
fn test_parse_text_only() {
    let doc = parse("Hello World").unwrap();
    let body = doc.body().unwrap();
    let (_, text) = doc.tree().children(body).next().unwrap();
    assert_eq!(text.as_text(), Some("Hello World"));
}

#[test]
fn test_parse_nested_structure() {
    let html = r#"
        <html>
            <head>
                <title>Test Page</title>
                <meta charset="utf-8">
            </head>
            <body>
                <div id="container">
                    <h1>Welcome</h1>
                    <p class="intro">This is a test.</p>
                    <ul>
                        <li>Item 1</li>
                        <li>Item 2</li>
                        <li>Item 3</li>
                    </ul>
                </div>
            </body>
        </html>
    "#;

    let doc = parse(html).unwrap();
    assert_eq!(doc.title(), "Test Page");

    let ul = find_tag(&doc, "ul").unwrap();
    let items = doc
        .tree()
        .children(ul)
        .filter(|(id, _)| doc.tree().tag_name(*id) == Some("li"))
        .count();
    assert_eq!(items, 3);
}

#[test]
fn test_attributes_in_document_order() {
    let doc = parse(r#"<div id="main" class="container primary" data-value="123"></div>"#).unwrap();
    let div = find_tag(&doc, "div").unwrap();
    let tree = doc.tree();
    let attrs: Vec<(&str, &str)> = tree
        .attributes(div)
        .iter()
        .map(|a| (tree.attr_name(a), a.value.as_str()))
        .collect();
    assert_eq!(
        attrs,
        vec![("id", "main"), ("class", "container primary"), ("data-value", "123")]
    );
}

#[test]
fn test_parse_reader_matches_parse() {
    let html = "<ul><li>A</li><li>B</li></ul>";
    let from_str = parse(html).unwrap();
    let from_reader = parse_reader(html.as_bytes()).unwrap();
    assert_eq!(from_str.tree().len(), from_reader.tree().len());
}

#[test]
fn test_round_trip_keeps_comments() {
    let doc = parse("<header><!-- Logo --><h1>City Gallery</h1></header>").unwrap();
    let header = find_tag(&doc, "header").unwrap();

    assert_eq!(
        get_outer_html(doc.tree(), header),
        "<header><!-- Logo --><h1>City Gallery</h1></header>"
    );
    assert_eq!(
        get_inner_html(doc.tree(), header),
        "<!-- Logo --><h1>City Gallery</h1>"
    );
}

#[test]
fn test_entities_reescaped() {
    let doc = parse("<footer>Copyright &copy; a &lt; b &amp; c</footer>").unwrap();
    let footer = find_tag(&doc, "footer").unwrap();
    assert_eq!(
        get_inner_html(doc.tree(), footer),
        "Copyright \u{a9} a &lt; b &amp; c"
    );
}

#[test]
fn test_with_url() {
    let doc = HtmlParser::new()
        .parse_with_url("<p>x</p>", "https://example.com/page")
        .unwrap();
    assert_eq!(doc.url(), "https://example.com/page");
}
