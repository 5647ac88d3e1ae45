//! Catalog Product

use thiserror::Error;
use crate::domain::aggregates::{CartCandidate, WishlistEntry};
use crate::domain::value_objects::{ProductId, Vnd};

#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: String,
    pub original_price: Option<String>,
    pub image: String,
    pub rating: f64,
    pub reviews: u32,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub is_new: bool,
}

impl Product {
    pub fn unit_price(&self) -> Vnd { Vnd::parse(&self.price) }

    /// Whole-percent markdown against the original price, if there is one.
    pub fn discount_percent(&self) -> Option<u64> {
        let original = Vnd::parse(self.original_price.as_deref()?).amount();
        let price = self.unit_price().amount();
        (original > price).then(|| (original - price) * 100 / original)
    }

    /// Builds the cart candidate for a chosen variant. Products that offer
    /// sizes or colors need one of each picked.
    pub fn cart_candidate(&self, size: Option<&str>, color: Option<&str>) -> Result<CartCandidate, ProductError> {
        let size = pick(&self.sizes, size).map_err(|()| ProductError::SizeRequired(self.id))?;
        let color = pick(&self.colors, color).map_err(|()| ProductError::ColorRequired(self.id))?;
        Ok(CartCandidate {
            id: self.id, name: self.name.clone(), price: self.price.clone(),
            original_price: self.original_price.clone(), image: self.image.clone(),
            category: self.category.clone(), brand: Some(self.brand.clone()),
            selected_size: size, selected_color: color,
        })
    }

    pub fn wishlist_entry(&self) -> WishlistEntry {
        WishlistEntry {
            id: self.id, name: self.name.clone(), price: self.price.clone(),
            original_price: self.original_price.clone(), image: self.image.clone(),
            category: self.category.clone(), brand: Some(self.brand.clone()),
            rating: self.rating, reviews: self.reviews,
        }
    }
}

fn pick(offered: &[String], chosen: Option<&str>) -> Result<Option<String>, ()> {
    match chosen.filter(|c| !c.is_empty()) {
        Some(c) if offered.is_empty() || offered.iter().any(|o| o == c) => Ok(Some(c.to_string())),
        Some(_) => Err(()),
        None if offered.is_empty() => Ok(None),
        None => Err(()),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductError {
    #[error("product {0} needs a size selection")]
    SizeRequired(ProductId),
    #[error("product {0} needs a color selection")]
    ColorRequired(ProductId),
}

impl ProductError {
    /// Text shown to the shopper.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SizeRequired(_) => "Vui lòng chọn kích thước",
            Self::ColorRequired(_) => "Vui lòng chọn màu sắc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodysuit() -> Product {
        Product {
            id: 2, name: "Bộ quần áo cotton organic".into(), category: "Quần áo".into(), brand: "Mothercare".into(),
            price: "320.000 đ".into(), original_price: Some("400.000 đ".into()), image: "/clothing-organic.png".into(),
            rating: 4.9, reviews: 203, sizes: vec!["3M".into(), "6M".into()], colors: vec!["Hồng".into()], is_new: true,
        }
    }

    #[test]
    fn test_cart_candidate_requires_variant() {
        let p = bodysuit();
        assert_eq!(p.cart_candidate(None, Some("Hồng")), Err(ProductError::SizeRequired(2)));
        assert_eq!(p.cart_candidate(Some("6M"), None), Err(ProductError::ColorRequired(2)));
        assert_eq!(p.cart_candidate(Some("XXL"), Some("Hồng")), Err(ProductError::SizeRequired(2)));
        let c = p.cart_candidate(Some("6M"), Some("Hồng")).unwrap();
        assert_eq!(c.selected_size.as_deref(), Some("6M"));
        assert_eq!(c.brand.as_deref(), Some("Mothercare"));
    }

    #[test]
    fn test_variantless_product() {
        let p = Product { sizes: vec![], colors: vec![], ..bodysuit() };
        let c = p.cart_candidate(None, None).unwrap();
        assert_eq!(c.identity().size, None);
        assert_eq!(c.identity().color, None);
    }

    #[test]
    fn test_discount_and_wishlist_entry() {
        let p = bodysuit();
        assert_eq!(p.discount_percent(), Some(20));
        assert_eq!(Product { original_price: None, ..bodysuit() }.discount_percent(), None);
        let e = p.wishlist_entry();
        assert_eq!((e.id, e.reviews), (2, 203));
    }
}
