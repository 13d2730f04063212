pub mod document;
pub mod element;

pub use document::Document;
pub use element::Element;

/// Collapse whitespace runs to single spaces and trim the ends.
pub(crate) fn clean_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
