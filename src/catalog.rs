//! Static sample catalog and the browse query behind the listing pages.

use std::cmp::Reverse;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::aggregates::{Product, ProductError, UnknownOption};
use crate::domain::value_objects::ProductId;

pub const PAGE_SIZE: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no product with id {0}")]
    UnknownProduct(ProductId),
    #[error(transparent)]
    Selection(#[from] ProductError),
}

impl CatalogError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownProduct(_) => "Không tìm thấy sản phẩm",
            Self::Selection(e) => e.user_message(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most reviewed first.
    #[default]
    Popular,
    PriceLow,
    PriceHigh,
    /// New arrivals first, then highest id.
    Newest,
    Rating,
}

impl FromStr for SortOrder {
    type Err = UnknownOption;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(Self::Popular),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "newest" => Ok(Self::Newest),
            "rating" => Ok(Self::Rating),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: String,
    pub category: Option<String>,
    pub sizes: Vec<String>,
    pub sort: SortOrder,
    /// 1-based; 0 is read as 1.
    pub page: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogPage<'a> {
    pub products: Vec<&'a Product>,
    pub matched: usize,
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self { Self::sample() }
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self { Self { products } }

    pub fn products(&self) -> &[Product] { &self.products }
    pub fn get(&self, id: ProductId) -> Option<&Product> { self.products.iter().find(|p| p.id == id) }
    pub fn require(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.get(id).ok_or(CatalogError::UnknownProduct(id))
    }

    /// `(category, count)` in first-seen order.
    pub fn categories(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = Vec::new();
        for p in &self.products {
            match out.iter_mut().find(|(c, _)| *c == p.category) {
                Some((_, n)) => *n += 1,
                None => out.push((p.category.as_str(), 1)),
            }
        }
        out
    }

    pub fn browse(&self, query: &CatalogQuery) -> CatalogPage<'_> {
        let needle = query.search.to_lowercase();
        let mut matched: Vec<&Product> = self.products.iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle) || p.brand.to_lowercase().contains(&needle))
            .filter(|p| query.category.as_ref().map_or(true, |c| &p.category == c))
            .filter(|p| query.sizes.is_empty() || query.sizes.iter().any(|s| p.sizes.contains(s)))
            .collect();

        match query.sort {
            SortOrder::Popular => matched.sort_by_key(|p| Reverse(p.reviews)),
            SortOrder::PriceLow => matched.sort_by_key(|p| p.unit_price()),
            SortOrder::PriceHigh => matched.sort_by_key(|p| Reverse(p.unit_price())),
            SortOrder::Newest => matched.sort_by_key(|p| (Reverse(p.is_new), Reverse(p.id))),
            SortOrder::Rating => matched.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        let total = matched.len();
        let total_pages = total.div_ceil(PAGE_SIZE);
        let page = query.page.max(1);
        let products = matched.into_iter().skip((page - 1) * PAGE_SIZE).take(PAGE_SIZE).collect();
        CatalogPage { products, matched: total, page, total_pages }
    }

    pub fn sample() -> Self {
        let product = |id, name: &str, category: &str, brand: &str, price: &str, original: Option<&str>, image: &str, rating, reviews| Product {
            id, name: name.into(), category: category.into(), brand: brand.into(), price: price.into(),
            original_price: original.map(Into::into), image: image.into(), rating, reviews,
            sizes: vec![], colors: vec![], is_new: false,
        };
        let strings = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();

        Self::new(vec![
            Product {
                colors: strings(&["Đen", "Xám", "Xanh navy"]),
                ..product(1, "Xe đẩy trẻ em Joie Chrome DLX", "Xe đẩy", "Joie", "7.500.000 đ", Some("8.500.000 đ"), "/stroller-premium.png", 4.8, 156)
            },
            Product {
                sizes: strings(&["3M", "6M", "9M", "12M", "18M", "24M"]),
                colors: strings(&["Hồng", "Xanh", "Vàng", "Trắng"]),
                is_new: true,
                ..product(2, "Bộ quần áo cotton organic", "Quần áo", "Mothercare", "320.000 đ", Some("400.000 đ"), "/clothing-organic.png", 4.9, 203)
            },
            product(3, "Sữa bột Aptamil Gold+", "Sữa bột", "Aptamil", "580.000 đ", None, "/milk-powder.png", 4.7, 89),
            Product {
                colors: strings(&["Xanh", "Hồng", "Xám"]),
                ..product(4, "Đồ chơi giáo dục Fisher-Price", "Đồ chơi", "Fisher-Price", "450.000 đ", Some("550.000 đ"), "/educational-toy.png", 4.6, 67)
            },
            Product {
                colors: strings(&["Đen", "Xanh dương"]),
                is_new: true,
                ..product(5, "Ghế ăn dặm Chicco Polly", "Ghế ăn", "Chicco", "2.800.000 đ", Some("3.200.000 đ"), "/high-chair.png", 4.8, 124)
            },
            Product {
                colors: strings(&["Gỗ tự nhiên", "Trắng"]),
                ..product(6, "Nôi cũi Babylove Premium", "Nôi cũi", "Babylove", "4.500.000 đ", None, "/crib-premium.png", 4.9, 78)
            },
            Product {
                sizes: strings(&["6M", "9M", "12M", "18M", "24M", "3T"]),
                colors: strings(&["Vàng", "Xanh", "Hồng", "Trắng"]),
                ..product(7, "Áo thun in hình động vật dễ thương", "Quần áo", "Carter's", "150.000 đ", None, "/clothing-2.png", 4.7, 89)
            },
            Product {
                sizes: strings(&["NB", "3M", "6M", "9M"]),
                colors: strings(&["Trắng", "Hồng nhạt", "Xanh nhạt"]),
                is_new: true,
                ..product(8, "Body suit cotton cho trẻ sơ sinh", "Quần áo", "Mothercare", "180.000 đ", Some("220.000 đ"), "/clothing-5.png", 4.8, 203)
            },
        ])
    }
}
