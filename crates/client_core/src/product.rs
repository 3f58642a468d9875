use std::sync::Arc;

use shared::domain::{Product, ProductId};

use crate::{
    error::{ClientError, Result},
    transport::{decode, Endpoints, HttpTransport, Method},
};

pub const PRODUCT_NOT_FOUND: &str = "Produto não encontrado.";

#[derive(Clone)]
pub struct ProductService {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
}

impl ProductService {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let raw = self
            .transport
            .request(Method::GET, self.endpoints.product(id), None)
            .await?;

        // The catalog answers unknown ids with an empty 200.
        if raw.is_null() {
            return Err(ClientError::NotFound(PRODUCT_NOT_FOUND.to_string()));
        }
        decode(raw)
    }
}

#[cfg(test)]
#[path = "tests/product_tests.rs"]
mod tests;
