//! Shared HTML corpora for tests and demos: a product listing, the same
//! listing with one extra wrapper ancestor, and a heavy redesign where the
//! selection anchors (id, exact class value, ancestor chain) all changed.

use crate::dom::Document;

pub const PRODUCT_PAGE: &str = r#"
    <div class="container">
        <section class="products">
            <article class="product" id="p1">
                <h3>Product 1</h3>
                <p class="description">Description 1</p>
            </article>
            <article class="product" id="p2">
                <h3>Product 2</h3>
                <p class="description">Description 2</p>
            </article>
        </section>
    </div>
"#;

/// [`PRODUCT_PAGE`] with an extra `<section>` inserted between the root and
/// the former parent chain; everything else identical.
pub const WRAPPED_PRODUCT_PAGE: &str = r#"
    <section class="page">
        <div class="container">
            <section class="products">
                <article class="product" id="p1">
                    <h3>Product 1</h3>
                    <p class="description">Description 1</p>
                </article>
                <article class="product" id="p2">
                    <h3>Product 2</h3>
                    <p class="description">Description 2</p>
                </article>
            </section>
        </div>
    </section>
"#;

/// A redesigned [`PRODUCT_PAGE`]: ids became `data-id`, class values and the
/// ancestor chain changed, content moved into wrapper divs.
pub const REDESIGNED_PRODUCT_PAGE: &str = r#"
    <div class="new-container">
        <div class="product-wrapper">
            <section class="products">
                <article class="product new-class" data-id="p1">
                    <div class="product-info">
                        <h3>Product 1</h3>
                        <p class="new-description">Description 1</p>
                    </div>
                </article>
                <article class="product new-class" data-id="p2">
                    <div class="product-info">
                        <h3>Product 2</h3>
                        <p class="new-description">Description 2</p>
                    </div>
                </article>
            </section>
        </div>
    </div>
"#;

pub fn product_page() -> Document {
    Document::parse(PRODUCT_PAGE)
}

pub fn wrapped_product_page() -> Document {
    Document::parse(WRAPPED_PRODUCT_PAGE)
}

pub fn redesigned_product_page() -> Document {
    Document::parse(REDESIGNED_PRODUCT_PAGE)
}
