use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);
id_newtype!(UserId);

/// Opaque grouping label as served by the catalog, e.g. `"men's clothing"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "image", default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    /// Price in Brazilian real notation, e.g. `R$ 1.234,56`.
    pub fn formatted_price(&self) -> String {
        format_brl(self.price)
    }
}

pub fn format_brl(amount: f64) -> String {
    let cents = (amount.max(0.0) * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("R$ {grouped},{fraction:02}")
}

/// Entry of the user directory. Only the username takes part in the login
/// pre-check; the rest of the record is carried as served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_prices_with_brazilian_separators() {
        assert_eq!(format_brl(109.95), "R$ 109,95");
        assert_eq!(format_brl(7.0), "R$ 7,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
    }

    #[test]
    fn decodes_catalog_product_payload() {
        let raw = r#"{
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;

        let product: Product = serde_json::from_str(raw).expect("decode product");
        assert_eq!(product.id, ProductId(1));
        assert_eq!(product.category, Category::from("men's clothing"));
        assert!(product.image_url.ends_with(".jpg"));
        assert_eq!(product.rating.map(|r| r.count), Some(120));
        assert_eq!(product.formatted_price(), "R$ 109,95");
    }

    #[test]
    fn decodes_directory_user_ignoring_extra_fields() {
        let raw = r#"{
            "id": 2,
            "email": "morrison@gmail.com",
            "username": "mor_2314",
            "password": "83r5^_",
            "name": { "firstname": "david", "lastname": "morrison" }
        }"#;

        let user: DirectoryUser = serde_json::from_str(raw).expect("decode user");
        assert_eq!(user.username, "mor_2314");
        assert_eq!(user.id, Some(UserId(2)));
    }
}
