use std::sync::LazyLock;

use scraper::Selector;

use crate::document::{Document, Node};

pub const SECTION_IDIOM: &str = "Enunciado:";
pub const SECTION_USAGE: &str = "Marcador de uso:";
pub const SECTION_DEFINITION: &str = "Significado:";

/// Editorial commentary appended after the usage marker.
pub const USAGE_COMMENT: &str = "Comentario al marcador de uso";

static TAB_PANEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.tabbertab").unwrap());
static SECTION_LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p > strong").unwrap());
static LISTING_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ol#lista_az > li > a").unwrap());

/// The three labelled sections of one detail page. Missing sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Entry {
    pub idiom: String,
    pub usage: String,
    pub definition: String,
}

impl Entry {
    pub fn is_empty(&self) -> bool {
        self.idiom.is_empty() && self.usage.is_empty() && self.definition.is_empty()
    }
}

/// Extract idiom, usage and definition from the first tab panel of a detail page.
pub fn parse_entry(body: &str) -> Entry {
    let doc = Document::parse(body);
    let Some(panel) = doc.find_first(&TAB_PANEL) else {
        return Entry::default();
    };

    Entry {
        idiom: section_text(panel, SECTION_IDIOM),
        usage: strip_usage_comment(&section_text(panel, SECTION_USAGE)).to_string(),
        definition: section_text(panel, SECTION_DEFINITION),
    }
}

/// Text of the paragraph whose `<strong>` label equals `label`, label removed.
///
/// When several labels match, the last one in document order wins. An absent
/// label and an empty section both come back as `""`.
pub fn section_text(panel: Node<'_>, label: &str) -> String {
    let found = panel
        .find_all(&SECTION_LABEL)
        .into_iter()
        .filter(|header| header.text().trim() == label)
        .last();

    let Some(parent) = found.and_then(|header| header.parent()) else {
        return String::new();
    };
    let text = parent.text();
    let text = text.strip_prefix(label).unwrap_or(&text);
    text.replace('\n', " ").trim().to_string()
}

/// Keep only what precedes the first commentary marker. No re-trim.
pub fn strip_usage_comment(usage: &str) -> &str {
    usage.split(USAGE_COMMENT).next().unwrap_or(usage)
}

/// Every `href` in the alphabetical listing, in document order.
pub fn parse_listing(body: &str) -> Vec<String> {
    let doc = Document::parse(body);
    doc.find_all(&LISTING_LINK)
        .into_iter()
        .filter_map(|link| link.attr("href"))
        .map(str::to_string)
        .collect()
}

// ── Tests ──
