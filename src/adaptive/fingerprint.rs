use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::FingerprintConfig;
use crate::dom::{clean_spaces, Element};

/// Bump when the serialized shape changes; persisted records carry it so an
/// incompatible row reads as malformed instead of deserializing to garbage.
pub const FORMAT_VERSION: u32 = 1;

/// Detached, immutable feature summary of one element, captured at save time
/// and used later to re-identify the element in a changed tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub tag: String,
    /// Attributes present at capture, values trimmed, empty values dropped.
    pub attributes: BTreeMap<String, String>,
    /// Normalized own text, capped in length.
    pub text_signature: String,
    /// Ancestor tag names from the root element down to the parent.
    pub path_signature: Vec<String>,
    /// 0-based position among same-tag siblings.
    pub sibling_index: usize,
    /// Distance from the root element.
    pub depth: usize,
}

impl Fingerprint {
    /// Capture an element's recognizable shape. Pure and total: an element
    /// with no attributes or text yields empty fields.
    pub fn capture(element: &Element<'_>, config: &FingerprintConfig) -> Self {
        let attributes = element
            .attributes()
            .into_iter()
            .filter_map(|(k, v)| {
                let v = v.trim();
                (!v.is_empty()).then(|| (k, v.to_string()))
            })
            .collect();

        let text_signature = truncate_chars(
            &clean_spaces(&element.own_text()),
            config.max_text_signature_length,
        );

        let path_signature = {
            let mut path: Vec<String> = element
                .ancestors()
                .iter()
                .map(|a| a.tag().to_string())
                .collect();
            path.reverse();
            path
        };

        Self {
            tag: element.tag().to_string(),
            attributes,
            text_signature,
            path_signature,
            sibling_index: element.sibling_index(),
            depth: element.depth(),
        }
    }
}

/// One persisted entry of the adaptive store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveRecord {
    pub label: String,
    pub fingerprint: Fingerprint,
    pub saved_at: DateTime<Utc>,
}

impl AdaptiveRecord {
    pub fn new(label: impl Into<String>, fingerprint: Fingerprint) -> Self {
        Self {
            label: label.into(),
            fingerprint,
            saved_at: Utc::now(),
        }
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn capture_first(doc: &Document, selector: &str) -> Fingerprint {
        let element = doc.css_first(selector).unwrap().unwrap();
        Fingerprint::capture(&element, &FingerprintConfig::default())
    }

    #[test]
    fn capture_is_deterministic() {
        let doc = Document::parse(
            r#"<section><article class="product" data-id="1">Product 1  $10.99</article></section>"#,
        );
        let a = capture_first(&doc, "article");
        let b = capture_first(&doc, "article");
        assert_eq!(a, b);
    }

    #[test]
    fn capture_normalizes_text_and_attributes() {
        let doc = Document::parse(
            "<article class=\" product \" data-empty=\"  \">  Product 1 \n\t $10.99 </article>",
        );
        let fp = capture_first(&doc, "article");
        assert_eq!(fp.text_signature, "Product 1 $10.99");
        assert_eq!(fp.attributes.get("class").map(String::as_str), Some("product"));
        // whitespace-only values are dropped, not stored as empty
        assert!(!fp.attributes.contains_key("data-empty"));
    }

    #[test]
    fn capture_truncates_long_text() {
        let long = "x".repeat(500);
        let doc = Document::parse(&format!("<p>{long}</p>"));
        let fp = capture_first(&doc, "p");
        assert_eq!(fp.text_signature.chars().count(), 200);
    }

    #[test]
    fn capture_of_bare_element_yields_empty_fields() {
        let doc = Document::parse("<div></div>");
        let fp = capture_first(&doc, "div");
        assert!(fp.attributes.is_empty());
        assert!(fp.text_signature.is_empty());
    }

    #[test]
    fn path_runs_root_to_parent() {
        let doc = Document::parse(
            r#"<div><section><article id="a">x</article></section></div>"#,
        );
        let fp = capture_first(&doc, "#a");
        assert_eq!(fp.path_signature, vec!["html", "body", "div", "section"]);
        assert_eq!(fp.depth, 4);
        assert_eq!(fp.sibling_index, 0);
    }

    #[test]
    fn fingerprint_round_trips_through_json() {
        let doc = Document::parse(
            r#"<article class="product" data-id="1">Product 1 $10.99</article>"#,
        );
        let fp = capture_first(&doc, "article");
        let json = serde_json::to_string(&fp).unwrap();
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
