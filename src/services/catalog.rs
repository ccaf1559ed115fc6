//! Product catalog service
//!
//! Validation and normalization of product drafts, storefront visibility
//! rules, and cart quoting against catalog prices.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::errors::{Result, StoreError};
use crate::pricing::{CartItem, CartQuote, MAX_QUANTITY, check_unit_price, quote_cart};
use crate::storage::{Paged, Product, ProductDraft, ProductFilter, SeaOrmStorage};
use crate::utils::non_empty;

/// One requested cart line
#[derive(Debug, Clone, Deserialize)]
pub struct CartLineRequest {
    pub product_id: i32,
    pub quantity: u32,
}

pub struct CatalogService {
    storage: Arc<SeaOrmStorage>,
}

impl CatalogService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(
        &self,
        filter: &ProductFilter,
        page: u64,
        page_size: u64,
    ) -> Result<Paged<Product>> {
        self.storage.list_products(filter, page, page_size).await
    }

    pub async fn get(&self, id: i32) -> Result<Product> {
        self.storage
            .get_product(id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Product not found: {}", id)))
    }

    /// Inactive products are invisible to the storefront
    pub async fn get_active(&self, id: i32) -> Result<Product> {
        match self.storage.get_product(id).await? {
            Some(product) if product.active => Ok(product),
            _ => Err(StoreError::not_found(format!("Product not found: {}", id))),
        }
    }

    /// Insert when `id` is `None`, update otherwise
    pub async fn save(&self, id: Option<i32>, draft: ProductDraft) -> Result<Product> {
        let draft = normalize_product_draft(draft)?;
        match id {
            None => self.storage.insert_product(&draft).await,
            Some(id) => self.storage.update_product(id, &draft).await,
        }
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_product(id).await
    }

    /// Price the requested lines with the quantity tiers.
    ///
    /// Repeated product ids are merged before pricing; every product must
    /// exist and be active.
    pub async fn quote_lines(&self, lines: &[CartLineRequest]) -> Result<CartQuote> {
        let merged = merge_lines(lines)?;
        let ids: Vec<i32> = merged.iter().map(|(id, _)| *id).collect();
        let products: HashMap<i32, Product> = self
            .storage
            .find_products_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|p| p.active)
            .map(|p| (p.id, p))
            .collect();

        let mut items = Vec::with_capacity(merged.len());
        for (product_id, quantity) in merged {
            let product = products
                .get(&product_id)
                .ok_or_else(|| StoreError::not_found(format!("Product not found: {}", product_id)))?;
            items.push(CartItem {
                product_id,
                name: product.name.clone(),
                base_unit_cents: product.price_cents,
                quantity,
            });
        }

        let quote = quote_cart(&items)?;
        info!(
            "Cart quoted: {} lines, subtotal {} cents",
            quote.lines.len(),
            quote.subtotal_cents
        );
        Ok(quote)
    }
}

/// Merge lines sharing a product id, keeping first-seen order
fn merge_lines(lines: &[CartLineRequest]) -> Result<Vec<(i32, u32)>> {
    let mut merged: Vec<(i32, u32)> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|(id, _)| *id == line.product_id) {
            Some((_, quantity)) => *quantity = quantity.saturating_add(line.quantity),
            None => merged.push((line.product_id, line.quantity)),
        }
    }
    if let Some((id, quantity)) = merged.iter().find(|(_, q)| *q > MAX_QUANTITY) {
        return Err(StoreError::validation(format!(
            "Quantity {} for product {} exceeds the maximum of {}",
            quantity, id, MAX_QUANTITY
        )));
    }
    Ok(merged)
}

/// Trim text fields and reject drafts no storefront could display
pub fn normalize_product_draft(draft: ProductDraft) -> Result<ProductDraft> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(StoreError::validation("Product name cannot be empty"));
    }
    if draft.price_cents < 0 {
        return Err(StoreError::validation(format!(
            "Product price cannot be negative: {}",
            draft.price_cents
        )));
    }
    check_unit_price(draft.price_cents)?;

    let features = draft
        .features
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    Ok(ProductDraft {
        name,
        description: draft.description.trim().to_string(),
        features,
        badge: non_empty(draft.badge),
        image_url: non_empty(draft.image_url),
        ..draft
    })
}

/// Serve the configured placeholder for products without an image
pub fn with_default_image(mut product: Product, default_image_url: &str) -> Product {
    if product.image_url.is_none() && !default_image_url.is_empty() {
        product.image_url = Some(default_image_url.to_string());
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ProductCategory;
    use chrono::Utc;

    fn draft(name: &str, price_cents: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price_cents,
            description: "  Streams in 4K  ".to_string(),
            features: vec![" Alexa remote ".into(), "   ".into()],
            category: ProductCategory::Firestick,
            badge: Some("  ".into()),
            image_url: None,
            active: true,
            sort_order: 0,
        }
    }

    #[test]
    fn test_normalize_product_draft() {
        let normalized = normalize_product_draft(draft("  Fire Stick 4K ", 4999)).unwrap();
        assert_eq!(normalized.name, "Fire Stick 4K");
        assert_eq!(normalized.description, "Streams in 4K");
        assert_eq!(normalized.features, vec!["Alexa remote".to_string()]);
        assert_eq!(normalized.badge, None);
    }

    #[test]
    fn test_normalize_rejects_invalid() {
        assert!(matches!(
            normalize_product_draft(draft("   ", 100)),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            normalize_product_draft(draft("Stick", -1)),
            Err(StoreError::Validation(_))
        ));
        assert!(normalize_product_draft(draft("Free sample", 0)).is_ok());
    }

    #[test]
    fn test_normalize_caps_price() {
        let at_cap = draft("Gold Stick", crate::pricing::MAX_PRICE_CENTS);
        assert!(normalize_product_draft(at_cap).is_ok());
        assert!(matches!(
            normalize_product_draft(draft("Gold Stick", i64::MAX / 2)),
            Err(StoreError::Pricing(crate::pricing::PricingError::PriceTooLarge { .. }))
        ));
    }

    #[test]
    fn test_merge_lines() {
        let lines = vec![
            CartLineRequest { product_id: 1, quantity: 1 },
            CartLineRequest { product_id: 2, quantity: 2 },
            CartLineRequest { product_id: 1, quantity: 2 },
        ];
        assert_eq!(merge_lines(&lines).unwrap(), vec![(1, 3), (2, 2)]);

        let too_many = vec![
            CartLineRequest { product_id: 1, quantity: 3 },
            CartLineRequest { product_id: 1, quantity: 3 },
        ];
        assert!(matches!(merge_lines(&too_many), Err(StoreError::Validation(_))));
    }

    #[test]
    fn test_with_default_image() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            name: "Stick".into(),
            price_cents: 100,
            description: String::new(),
            features: vec![],
            category: ProductCategory::Firestick,
            badge: None,
            image_url: None,
            active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        };
        let with_image = with_default_image(product.clone(), "/img/default.png");
        assert_eq!(with_image.image_url.as_deref(), Some("/img/default.png"));

        let own = Product {
            image_url: Some("/img/own.png".into()),
            ..product
        };
        assert_eq!(
            with_default_image(own, "/img/default.png").image_url.as_deref(),
            Some("/img/own.png")
        );
    }
}
