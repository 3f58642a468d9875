use serde::Serialize;
use shared::domain::ProductId;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Login,
    Home,
    Info,
    ProductDetail { product_id: ProductId },
}

impl Route {
    /// Header title; the login screen is shown without one.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Self::Login => None,
            Self::Home => Some("Produtos"),
            Self::Info => Some("Sobre o App"),
            Self::ProductDetail { .. } => Some("Detalhes do Produto"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEffect {
    Navigate(Route),
    ReplaceWith(Route),
    Back,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            stack: vec![initial],
        }
    }

    pub fn current(&self) -> Route {
        // The stack is never emptied: `back` keeps the root route.
        self.stack.last().copied().unwrap_or(Route::Home)
    }

    pub fn routes(&self) -> &[Route] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn navigate(&mut self, route: Route) {
        info!(from = ?self.current(), to = ?route, "navigate");
        self.stack.push(route);
    }

    /// Swaps the top route and returns the one it replaced.
    pub fn replace(&mut self, route: Route) -> Route {
        info!(from = ?self.current(), to = ?route, "replace");
        let previous = self.current();
        if let Some(top) = self.stack.last_mut() {
            *top = route;
        }
        previous
    }

    pub fn back(&mut self) -> Option<Route> {
        if self.stack.len() <= 1 {
            return None;
        }
        let popped = self.stack.pop();
        info!(to = ?self.current(), "back");
        popped
    }
}
