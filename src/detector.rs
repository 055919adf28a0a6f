//! Platform detection from markup fingerprints.

use serde::Serialize;
use tracing::debug;

use crate::page::Page;

/// Item-id meta tag emitted by Salla storefront templates.
pub const SALLA_ITEM_ID_META: &str = "product:retailer_item_id";
/// Currency meta tag; Salla always renders it with [`SALLA_CURRENCY`].
pub const SALLA_CURRENCY_META: &str = "product:price:currency";
pub const SALLA_CURRENCY: &str = "SAR";
pub const SALLA_ROOT_DOMAIN: &str = "salla.sa";

/// Hosted-commerce platforms recognised by structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Salla: product meta tags or a canonical link on `salla.sa`.
    Salla,
    /// Zid: schema-driven, recognised by a JSON-LD `Product` block.
    Zid,
    Generic,
}

/// Classifies a page. Salla is tested first, so a page carrying both
/// fingerprints is Salla.
pub fn detect(page: &Page) -> Platform {
    let platform = if is_salla(page) {
        Platform::Salla
    } else if page.structured().has_product() {
        Platform::Zid
    } else {
        Platform::Generic
    };

    debug!(domain = page.domain(), ?platform, "Detected platform");
    platform
}

fn is_salla(page: &Page) -> bool {
    page.meta(SALLA_ITEM_ID_META).is_some()
        || page
            .meta_all(SALLA_CURRENCY_META)
            .iter()
            .any(|c| c.eq_ignore_ascii_case(SALLA_CURRENCY))
        || page
            .canonical()
            .is_some_and(|href| href.to_lowercase().contains(SALLA_ROOT_DOMAIN))
}
