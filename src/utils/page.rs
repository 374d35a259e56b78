/// A display region addressable by id; renderers replace its content
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    id: String,
    content: String,
}

impl Element {
    pub fn new(tag: &str, id: &str) -> Self {
        Element {
            tag: tag.to_string(),
            id: id.to_string(),
            content: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw markup currently held by the region
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, markup: String) {
        self.content = markup;
    }

    fn to_html(&self) -> String {
        format!(
            "<{tag} id=\"{id}\">{content}</{tag}>",
            tag = self.tag,
            id = escape_html(&self.id),
            content = self.content
        )
    }
}

#[derive(Debug, Clone)]
enum Node {
    Markup(String),
    Region(Element),
}

/// In-memory host page made of static markup and named display regions
#[derive(Debug, Clone)]
pub struct Document {
    title: String,
    body: Vec<Node>,
}

impl Document {
    pub fn new(title: &str) -> Self {
        Document {
            title: title.to_string(),
            body: Vec::new(),
        }
    }

    /// The demo page: back link, heading and the `chart1` paragraph
    pub fn demo() -> Self {
        let mut document = Document::new("Random Goods Pricing");
        document.push_markup(
            "<div class=\"back-button\">\n  <a href=\"https://jordanschnur.com\">&larr; Back</a>\n</div>",
        );
        document.push_markup("<h1>Random Goods Pricing</h1>");
        document.push_region("p", "chart1");
        document
    }

    pub fn push_markup(&mut self, markup: &str) {
        self.body.push(Node::Markup(markup.to_string()));
    }

    pub fn push_region(&mut self, tag: &str, id: &str) {
        self.body.push(Node::Region(Element::new(tag, id)));
    }

    /// Look up a region by id
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.body.iter().find_map(|node| match node {
            Node::Region(element) if element.id == id => Some(element),
            _ => None,
        })
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.iter_mut().find_map(|node| match node {
            Node::Region(element) if element.id == id => Some(element),
            _ => None,
        })
    }

    /// Serialise the whole page
    pub fn to_html(&self) -> String {
        let mut html = String::from("<!doctype html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("  <meta charset=\"UTF-8\" />\n");
        html.push_str(&format!("  <title>{}</title>\n", escape_html(&self.title)));
        html.push_str("</head>\n<body>\n<div id=\"app\">\n");

        for node in &self.body {
            match node {
                Node::Markup(markup) => html.push_str(markup),
                Node::Region(element) => html.push_str(&element.to_html()),
            }
            html.push('\n');
        }

        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

/// Escape text for use inside HTML text or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_has_chart_region() {
        let document = Document::demo();
        assert!(document.element("chart1").is_some());
        assert!(document.element("chart2").is_none());
    }

    #[test]
    fn test_region_content_is_rendered() {
        let mut document = Document::demo();
        document
            .element_mut("chart1")
            .unwrap()
            .set_content("<svg></svg>".to_string());

        let html = document.to_html();
        assert!(html.contains("<p id=\"chart1\"><svg></svg></p>"));
        assert!(html.contains("back-button"));
    }

    #[test]
    fn test_title_is_escaped() {
        let html = Document::new("Tom & Jerry <3").to_html();
        assert!(html.contains("<title>Tom &amp; Jerry &lt;3</title>"));
    }
}
