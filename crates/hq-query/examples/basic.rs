//! Example: query a document from a file or a built-in page

use hq_query::{find, find_one, inner_text, load_doc, output_html, parse, select_attr};

const PAGE: &str = r#"<html lang="en"><body>
<nav><ul>
  <li><a href="/london">London</a></li>
  <li><a href="/paris">Paris</a></li>
  <li><a href="/tokyo">Tokyo</a></li>
</ul></nav>
</body></html>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let doc = match std::env::args().nth(1) {
        Some(path) => load_doc(path)?,
        None => parse(PAGE)?,
    };
    let tree = doc.tree();

    for link in find(tree, doc.root(), "//a[@href]")? {
        println!(
            "{} -> {}",
            inner_text(tree, link),
            select_attr(tree, link, "href").unwrap_or_default()
        );
    }

    if let Some(list) = find_one(tree, doc.root(), "//ul")? {
        println!("{}", output_html(tree, list, true));
    }
    Ok(())
}
