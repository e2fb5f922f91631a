//! Catalog records.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL-safe identifier used in routes and catalog filters.
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    /// Struck-through price when the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Price>,
    /// Units currently in stock; quantity controls clamp against this.
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub is_active: bool,
}

impl Product {
    /// Whether the product can be added to a cart.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.is_active && self.stock > 0
    }

    /// First image, if any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// Whether the product is discounted below its compare-at price.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.compare_at_price
            .is_some_and(|compare| compare.amount > self.price.amount)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::CurrencyCode;

    fn product(stock: u32, is_active: bool) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Ceramic Mug".to_owned(),
            slug: "ceramic-mug".to_owned(),
            description: String::new(),
            price: Price::new(Decimal::new(39_900, 2), CurrencyCode::Inr),
            compare_at_price: None,
            stock,
            category: None,
            images: Vec::new(),
            is_active,
        }
    }

    #[test]
    fn test_purchasable_requires_stock_and_active() {
        assert!(product(3, true).is_purchasable());
        assert!(!product(0, true).is_purchasable());
        assert!(!product(3, false).is_purchasable());
    }

    #[test]
    fn test_on_sale_compares_amounts() {
        let mut p = product(1, true);
        assert!(!p.on_sale());
        p.compare_at_price = Some(Price::new(Decimal::new(49_900, 2), CurrencyCode::Inr));
        assert!(p.on_sale());
        p.compare_at_price = Some(Price::new(Decimal::new(29_900, 2), CurrencyCode::Inr));
        assert!(!p.on_sale());
    }
}
