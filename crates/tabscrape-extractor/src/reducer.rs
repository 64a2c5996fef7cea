//! Reduce raw page markup to readable, line-oriented text
//!
//! The primary content region is the `<body>` element (the whole document
//! when there is none). Elements without informational text are dropped with
//! their subtree, every attribute is discarded along with the tags, and block
//! boundaries become line breaks.

use crate::error::ReduceError;
use scraper::{ElementRef, Html, Node};
use tabscrape_domain::ReducedText;

/// Elements removed together with everything inside them
pub const REMOVED_TAGS: &[&str] = &[
    "script", "style", "header", "footer", "nav", "aside", "form", "iframe", "noscript",
    "object", "embed", "link", "meta", "button", "input", "select", "textarea", "path", "svg",
    "img", "head", "template",
];

/// Elements that start and end a line of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "body", "br", "caption", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li",
    "main", "ol", "p", "pre", "section", "summary", "table", "tbody", "tfoot", "thead", "tr",
    "ul",
];

/// Elements whose content is separated from its neighbours by a space
const CELL_TAGS: &[&str] = &["td", "th"];

/// Reduces fetched markup to plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReducer;

enum Visit<N> {
    Enter(N),
    Leave(bool),
}

impl TextReducer {
    /// Create a new reducer
    pub fn new() -> Self {
        Self
    }

    /// Reduce `raw` to text
    ///
    /// Input without any `<` is treated as plain text and only has its
    /// whitespace normalized. Parsing is error-tolerant, so any markup yields
    /// some tree; the result is only an error when no text survives.
    pub fn reduce(&self, raw: &str) -> Result<ReducedText, ReduceError> {
        if raw.trim().is_empty() {
            return Err(ReduceError::EmptyInput);
        }

        let text = if raw.contains('<') {
            reduce_markup(raw)
        } else {
            let mut sink = LineSink::default();
            for line in raw.lines() {
                sink.push_text(line);
                sink.break_line();
            }
            sink.finish()
        };

        if text.is_empty() {
            Err(ReduceError::NoTextContent)
        } else {
            Ok(ReducedText::new(text))
        }
    }
}

fn reduce_markup(raw: &str) -> String {
    let document = Html::parse_document(raw);
    let root = document.root_element();
    let content = root
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .unwrap_or(root);

    let mut sink = LineSink::default();
    let mut stack = vec![Visit::Enter(*content)];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Leave(is_block) => {
                if is_block {
                    sink.break_line();
                } else {
                    sink.push_text(" ");
                }
            }
            Visit::Enter(node) => match node.value() {
                Node::Text(text) => sink.push_text(text),
                Node::Element(element) => {
                    let name = element.name();
                    if REMOVED_TAGS.contains(&name) {
                        continue;
                    }
                    let is_block = BLOCK_TAGS.contains(&name);
                    if is_block {
                        sink.break_line();
                        stack.push(Visit::Leave(true));
                    } else if CELL_TAGS.contains(&name) {
                        stack.push(Visit::Leave(false));
                    }
                    stack.extend(node.children().rev().map(Visit::Enter));
                }
                _ => {}
            },
        }
    }

    sink.finish()
}

/// Accumulates text into whitespace-normalized, non-blank lines
#[derive(Default)]
struct LineSink {
    out: String,
    line: String,
}

impl LineSink {
    fn push_text(&mut self, text: &str) {
        self.line.push_str(text);
    }

    fn break_line(&mut self) {
        let mut words = self.line.split_whitespace();
        if let Some(first) = words.next() {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.push_str(first);
            for word in words {
                self.out.push(' ');
                self.out.push_str(word);
            }
        }
        self.line.clear();
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(raw: &str) -> String {
        TextReducer::new().reduce(raw).unwrap().into_string()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(TextReducer::new().reduce(""), Err(ReduceError::EmptyInput));
        assert_eq!(TextReducer::new().reduce("  \n "), Err(ReduceError::EmptyInput));
    }

    #[test]
    fn test_plain_text_passes_through_normalized() {
        assert_eq!(reduce("  Widget   9.99 \n\n\nGadget 4.50"), "Widget 9.99\nGadget 4.50");
    }

    #[test]
    fn test_removes_non_content_elements() {
        let html = r#"<html><head><title>Shop</title><style>p{}</style></head>
            <body>
              <nav>Home | About</nav>
              <script>var x = "<p>hidden</p>";</script>
              <p>Widget costs 9.99</p>
              <form><input value="q"><button>Go</button></form>
              <footer>Copyright</footer>
            </body></html>"#;
        let text = reduce(html);
        assert_eq!(text, "Widget costs 9.99");
    }

    #[test]
    fn test_block_elements_become_lines() {
        let html = "<body><h1>Products</h1><ul><li>Widget</li><li>Gadget</li></ul><div>End</div></body>";
        assert_eq!(reduce(html), "Products\nWidget\nGadget\nEnd");
    }

    #[test]
    fn test_inline_elements_stay_on_line() {
        let html = "<p>The <b>Widget</b> costs <span>9.99</span></p>";
        assert_eq!(reduce(html), "The Widget costs 9.99");
    }

    #[test]
    fn test_table_rows_and_cells() {
        let html = "<table><tr><th>Name</th><th>Price</th></tr><tr><td>Widget</td><td>9.99</td></tr></table>";
        assert_eq!(reduce(html), "Name Price\nWidget 9.99");
    }

    #[test]
    fn test_attributes_are_dropped() {
        let html = r#"<div id="x" style="color:red" onclick="evil()" data-track="1">Visible</div>"#;
        let text = reduce(html);
        assert_eq!(text, "Visible");
        assert!(!text.contains("evil"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(reduce("<p>Fish &amp; Chips &lt;3</p>"), "Fish & Chips <3");
    }

    #[test]
    fn test_no_markup_tags_in_output() {
        let html = "<body><article><p>One</p><p>Two <em>three</em></p></article></body>";
        let text = reduce(html);
        assert!(!text.contains('<'));
        assert_eq!(text, "One\nTwo three");
    }

    #[test]
    fn test_markup_without_text() {
        let result = TextReducer::new().reduce("<body><script>x()</script><img src=a.png></body>");
        assert_eq!(result, Err(ReduceError::NoTextContent));
    }

    #[test]
    fn test_fragment_without_body_tag() {
        assert_eq!(reduce("<p>Loose paragraph</p>"), "Loose paragraph");
    }
}
