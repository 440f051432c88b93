//! Prints the recently updated apps of a storefront backend.
//!
//! ```sh
//! STOREFRONT_API_BASE_URI=https://backend.example.com \
//! STOREFRONT_SITE_BASE_URI=https://store.example.com \
//! cargo run --example recently_updated
//! ```

use storefront_kit::{
    catalog_client::RemoteCatalogClient,
    config::StorefrontConfig,
    regen::{
        cache::RegenCache,
        page::{CollectionLoader, CollectionPage},
    },
    types::Collection,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = StorefrontConfig::from_env()?;
    let client = RemoteCatalogClient::new(config)?;

    let page = CollectionPage::builder()
        .collection(Collection::RecentlyUpdated)
        .cache(RegenCache::new(CollectionLoader(client)))
        .build();

    let props = page.props("en").await?;

    for app in props.preview() {
        println!("{:<40} {}", app.id, app.name);
    }
    println!("revalidate after {}s", props.revalidate.as_secs());

    Ok(())
}
