//! Orchestration core of the storefront client: services over the catalog
//! API, per-screen view-state controllers and the navigation stack.

use std::sync::Arc;

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod navigation;
pub mod product;
pub mod screens;
pub mod transport;
pub mod view_state;

pub use auth::{AuthService, Session};
pub use catalog::CatalogService;
pub use config::{load_settings, Settings};
pub use error::{ClientError, Result};
pub use navigation::{NavigationEffect, Navigator, Route};
pub use product::ProductService;
pub use screens::{
    AuthState, HomeController, InfoContent, LoginController, LoginOutcome,
    ProductDetailController, Screen, ScreenSnapshot, Storefront,
};
pub use transport::{Endpoints, HttpTransport, ReqwestTransport};
pub use view_state::{FetchTicket, QuerySlot, ViewState};

/// The three services every screen draws from, sharing one transport.
#[derive(Clone)]
pub struct Services {
    pub catalog: CatalogService,
    pub products: ProductService,
    pub auth: AuthService,
}

impl Services {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            catalog: CatalogService::new(Arc::clone(&transport), endpoints.clone()),
            products: ProductService::new(Arc::clone(&transport), endpoints.clone()),
            auth: AuthService::new(transport, endpoints),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            Arc::new(ReqwestTransport::new()),
            settings.endpoints()?,
        ))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
