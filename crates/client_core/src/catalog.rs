use std::{collections::HashSet, sync::Arc};

use shared::domain::{Category, Product};
use tracing::error;

use crate::{
    error::Result,
    transport::{decode, Endpoints, HttpTransport, Method},
};

#[derive(Clone)]
pub struct CatalogService {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
}

impl CatalogService {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Categories in server order with duplicates dropped.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let raw = self
            .transport
            .request(Method::GET, self.endpoints.categories(), None)
            .await?;
        let categories: Vec<Category> = decode(raw)?;

        let mut seen = HashSet::with_capacity(categories.len());
        Ok(categories
            .into_iter()
            .filter(|category| seen.insert(category.clone()))
            .collect())
    }

    /// Like `list_categories`, but a failure is logged and degrades to no
    /// filters.
    pub async fn list_categories_or_empty(&self) -> Vec<Category> {
        match self.list_categories().await {
            Ok(categories) => categories,
            Err(err) => {
                error!(error = %err, "failed to fetch categories");
                Vec::new()
            }
        }
    }

    /// `None` fetches the whole catalog, `Some` the category-scoped one.
    pub async fn list_products(&self, category: Option<&Category>) -> Result<Vec<Product>> {
        let url = match category {
            Some(category) => self.endpoints.products_in(category),
            None => self.endpoints.products(),
        };
        let raw = self.transport.request(Method::GET, url, None).await?;
        decode(raw)
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
