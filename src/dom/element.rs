use regex::Regex;
use scraper::{ElementRef, Selector};
use std::collections::BTreeMap;

use crate::dom::clean_spaces;
use crate::errors::{AdaptiveError, Result};

/// A borrowed handle to one element of a [`Document`](crate::dom::Document).
///
/// Wraps the parser's element reference and adds the accessors the adaptive
/// core consumes (own text, depth, same-tag sibling index) plus the usual
/// text/attribute conveniences for scraping code.
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl<'a> Element<'a> {
    pub(crate) fn new(inner: ElementRef<'a>) -> Self {
        Self { inner }
    }

    pub fn tag(&self) -> &'a str {
        self.inner.value().name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// All attributes, sorted by name.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        self.inner
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn id(&self) -> Option<&'a str> {
        self.attr("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|candidate| candidate == class))
            .unwrap_or(false)
    }

    /// Concatenated text of the element and all its descendants.
    pub fn text(&self) -> String {
        self.inner.text().collect::<Vec<_>>().join(" ")
    }

    /// Like [`text`](Self::text) with whitespace runs collapsed.
    pub fn clean_text(&self) -> String {
        clean_spaces(&self.text())
    }

    /// Text directly inside this element, excluding child elements.
    pub fn own_text(&self) -> String {
        self.inner
            .children()
            .filter_map(|child| child.value().as_text().map(|t| &**t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn parent(&self) -> Option<Element<'a>> {
        self.inner.parent().and_then(ElementRef::wrap).map(Element::new)
    }

    pub fn children(&self) -> Vec<Element<'a>> {
        self.inner
            .children()
            .filter_map(ElementRef::wrap)
            .map(Element::new)
            .collect()
    }

    /// Element ancestors, nearest first.
    pub fn ancestors(&self) -> Vec<Element<'a>> {
        self.inner
            .ancestors()
            .filter_map(ElementRef::wrap)
            .map(Element::new)
            .collect()
    }

    /// Distance from the root element; the root element is at depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().len()
    }

    /// 0-based position among siblings that share this element's tag.
    /// Insertions of other tag types do not shift it.
    pub fn sibling_index(&self) -> usize {
        match self.parent() {
            Some(parent) => parent
                .children()
                .into_iter()
                .filter(|sibling| sibling.tag() == self.tag())
                .position(|sibling| sibling == *self)
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Run a CSS selector scoped to this element's subtree.
    pub fn css(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let selector = Selector::parse(selector)
            .map_err(|e| AdaptiveError::InvalidSelector(e.to_string()))?;
        Ok(self.inner.select(&selector).map(Element::new).collect())
    }

    pub fn css_first(&self, selector: &str) -> Result<Option<Element<'a>>> {
        let selector = Selector::parse(selector)
            .map_err(|e| AdaptiveError::InvalidSelector(e.to_string()))?;
        Ok(self.inner.select(&selector).next().map(Element::new))
    }

    /// Outer HTML of this element.
    pub fn html(&self) -> String {
        self.inner.html()
    }

    /// Inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.inner.inner_html()
    }

    /// All matches of `pattern` within the element's cleaned text.
    pub fn re(&self, pattern: &Regex) -> Vec<String> {
        let text = self.clean_text();
        pattern
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// First match of `pattern` within the element's cleaned text.
    pub fn re_first(&self, pattern: &Regex) -> Option<String> {
        let text = self.clean_text();
        pattern.find(&text).map(|m| m.as_str().to_string())
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        // Node ids are unique within one tree; elements of different
        // documents never compare equal in practice because handles cannot
        // outlive their document.
        self.inner.id() == other.inner.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    const PAGE: &str = r#"
        <div class="container">
            <section class="products">
                <h2>Catalog</h2>
                <article class="product sale" id="p1" data-id="1">Product 1 $10.99</article>
                <aside>ad</aside>
                <article class="product" id="p2" data-id="2">Product 2 $5.25</article>
            </section>
        </div>
    "#;

    #[test]
    fn attribute_access() {
        let doc = Document::parse(PAGE);
        let article = doc.css_first("#p1").unwrap().unwrap();
        assert_eq!(article.tag(), "article");
        assert_eq!(article.attr("data-id"), Some("1"));
        assert!(article.has_attr("class"));
        assert!(!article.has_attr("data-ts"));
        assert_eq!(article.id(), Some("p1"));

        let attrs = article.attributes();
        assert_eq!(attrs.get("class").map(String::as_str), Some("product sale"));
    }

    #[test]
    fn class_membership() {
        let doc = Document::parse(PAGE);
        let article = doc.css_first("#p1").unwrap().unwrap();
        assert!(article.has_class("product"));
        assert!(article.has_class("sale"));
        assert!(!article.has_class("products"));
    }

    #[test]
    fn own_text_excludes_children() {
        let doc = Document::parse(
            "<article id=\"a\">Price: <span>$10.99</span> today</article>",
        );
        let article = doc.css_first("#a").unwrap().unwrap();
        assert!(article.own_text().contains("Price:"));
        assert!(!article.own_text().contains("$10.99"));
        assert!(article.clean_text().contains("$10.99"));
    }

    #[test]
    fn parent_and_ancestors() {
        let doc = Document::parse(PAGE);
        let article = doc.css_first("#p1").unwrap().unwrap();
        let parent = article.parent().unwrap();
        assert_eq!(parent.tag(), "section");

        let tags: Vec<&str> = article.ancestors().iter().map(|e| e.tag()).collect();
        assert_eq!(tags, vec!["section", "div", "body", "html"]);
        assert_eq!(article.depth(), 4);

        let root = doc.root();
        assert_eq!(root.tag(), "html");
        assert_eq!(root.depth(), 0);
        assert!(root.parent().is_none());
    }

    #[test]
    fn sibling_index_counts_same_tag_only() {
        let doc = Document::parse(PAGE);
        let p1 = doc.css_first("#p1").unwrap().unwrap();
        let p2 = doc.css_first("#p2").unwrap().unwrap();
        // h2 and aside between them do not count
        assert_eq!(p1.sibling_index(), 0);
        assert_eq!(p2.sibling_index(), 1);
    }

    #[test]
    fn scoped_css() {
        let doc = Document::parse(PAGE);
        let section = doc.css_first("section").unwrap().unwrap();
        assert_eq!(section.css("article").unwrap().len(), 2);
        assert!(section.css_first(".container").unwrap().is_none());
    }

    #[test]
    fn regex_helpers() {
        let doc = Document::parse(PAGE);
        let article = doc.css_first("#p1").unwrap().unwrap();
        let price = Regex::new(r"\$\d+\.\d{2}").unwrap();
        assert_eq!(article.re_first(&price), Some("$10.99".to_string()));
        assert_eq!(doc.root().re(&price), vec!["$10.99", "$5.25"]);
    }

    #[test]
    fn element_equality_by_node() {
        let doc = Document::parse(PAGE);
        let a = doc.css_first("#p1").unwrap().unwrap();
        let b = doc.css("article").unwrap()[0];
        let c = doc.css_first("#p2").unwrap().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
