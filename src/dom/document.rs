use scraper::{ElementRef, Html, Selector};

use crate::dom::Element;
use crate::errors::{AdaptiveError, Result};

/// A parsed HTML document. Owns every node of the parse; the [`Element`]
/// handles it returns stay valid only while the document is alive.
pub struct Document {
    html: Html,
    url: Option<String>,
}

impl Document {
    /// Parse markup into a document tree. Parsing is lenient and never fails;
    /// malformed markup is repaired by the underlying parser.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
            url: None,
        }
    }

    pub fn parse_with_url(markup: &str, url: impl Into<String>) -> Self {
        Self {
            html: Html::parse_document(markup),
            url: Some(url.into()),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn root(&self) -> Element<'_> {
        Element::new(self.html.root_element())
    }

    /// Run a CSS selector over the document, in document order.
    pub fn css(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let selector = Selector::parse(selector)
            .map_err(|e| AdaptiveError::InvalidSelector(e.to_string()))?;
        Ok(self.html.select(&selector).map(Element::new).collect())
    }

    pub fn css_first(&self, selector: &str) -> Result<Option<Element<'_>>> {
        let selector = Selector::parse(selector)
            .map_err(|e| AdaptiveError::InvalidSelector(e.to_string()))?;
        Ok(self.html.select(&selector).next().map(Element::new))
    }

    /// Every element of the tree, in document order.
    pub fn elements(&self) -> Vec<Element<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(Element::new)
            .collect()
    }

    /// Every element with the given tag name, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<Element<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == tag)
            .map(Element::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="container">
            <section class="products">
                <article class="product" id="p1">Product 1 $10.99</article>
                <article class="product" id="p2">Product 2 $5.25</article>
            </section>
        </div>
    "#;

    #[test]
    fn css_selects_in_document_order() {
        let doc = Document::parse(PAGE);
        let articles = doc.css("article.product").unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].attr("id"), Some("p1"));
        assert_eq!(articles[1].attr("id"), Some("p2"));
    }

    #[test]
    fn css_first_returns_none_when_absent() {
        let doc = Document::parse(PAGE);
        assert!(doc.css_first("nav").unwrap().is_none());
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let doc = Document::parse(PAGE);
        assert!(matches!(
            doc.css("p..x"),
            Err(AdaptiveError::InvalidSelector(_))
        ));
    }

    #[test]
    fn elements_walk_covers_whole_tree() {
        let doc = Document::parse(PAGE);
        let tags: Vec<String> = doc.elements().iter().map(|e| e.tag().to_string()).collect();
        // html/head/body come from document repair
        assert!(tags.contains(&"html".to_string()));
        assert!(tags.contains(&"section".to_string()));
        assert_eq!(tags.iter().filter(|t| *t == "article").count(), 2);
    }

    #[test]
    fn elements_by_tag_filters() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.elements_by_tag("article").len(), 2);
        assert_eq!(doc.elements_by_tag("nav").len(), 0);
    }

    #[test]
    fn url_is_carried() {
        let doc = Document::parse_with_url(PAGE, "https://example.com/items");
        assert_eq!(doc.url(), Some("https://example.com/items"));
    }
}
