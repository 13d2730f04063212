use anyhow::Result;
use resight::testing::{PRODUCT_PAGE, REDESIGNED_PRODUCT_PAGE};
use resight::{Document, Relocator};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let relocator = Relocator::in_memory();

    info!("Selecting '#p1' on the original page and saving it as 'product'");
    let old_page = Document::parse_with_url(PRODUCT_PAGE, "https://example.com/products");
    let product = old_page
        .css_first("#p1")?
        .expect("original page contains #p1");
    relocator.save("product", &product)?;

    info!("The page was redesigned; '#p1' no longer matches anything");
    let new_page = Document::parse_with_url(REDESIGNED_PRODUCT_PAGE, "https://example.com/products");
    assert!(new_page.css_first("#p1")?.is_none());

    // the redesign changed id, class value, and ancestor chain, so accept a
    // lower confidence than the default threshold
    match relocator.relocate_with_threshold("product", &new_page, 0.35)? {
        resight::Relocation::Found { element, score } => {
            info!(
                score,
                tag = element.tag(),
                data_id = element.attr("data-id").unwrap_or("-"),
                text = %element.clean_text(),
                "relocated the saved element on the redesigned page"
            );
        }
        resight::Relocation::NotConfident { best_score } => {
            info!(?best_score, "no candidate was convincing enough");
        }
    }

    Ok(())
}
