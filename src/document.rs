use scraper::{ElementRef, Html, Selector};

/// Parsed HTML page. Only the queries the extractors need are exposed.
pub struct Document {
    html: Html,
}

#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl Document {
    pub fn parse(body: &str) -> Self {
        Document {
            html: Html::parse_document(body),
        }
    }

    pub fn find_first(&self, selector: &Selector) -> Option<Node<'_>> {
        self.html.select(selector).next().map(Node::from)
    }

    pub fn find_all(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.html.select(selector).map(Node::from).collect()
    }
}

impl<'a> Node<'a> {
    pub fn find_all(&self, selector: &Selector) -> Vec<Node<'a>> {
        self.element.select(selector).map(Node::from).collect()
    }

    /// Concatenated text of all descendant text nodes, untouched.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.element.parent().and_then(ElementRef::wrap).map(Node::from)
    }
}

impl<'a> From<ElementRef<'a>> for Node<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Node { element }
    }
}

// ── Tests ──
