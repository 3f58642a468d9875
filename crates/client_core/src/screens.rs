//! Screen controllers. Each screen owns its query slots; fetches are started by
//! explicit lifecycle calls (`mount`, `select_category`, `submit`, ...) so the
//! logic runs without any rendering environment.

use serde::Serialize;
use shared::{
    domain::{Category, Product, ProductId},
    error::{ApiError, ErrorCode},
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::{
    auth::{self, AuthService, Session},
    catalog::CatalogService,
    config::Credit,
    navigation::{NavigationEffect, Navigator, Route},
    product::ProductService,
    view_state::{FetchTicket, QuerySlot, ViewState},
    Services,
};

pub const PRODUCT_LOAD_FAILED: &str = "Erro ao carregar produto.";

struct HomeState {
    categories: QuerySlot<Vec<Category>>,
    products: QuerySlot<Vec<Product>>,
    selected: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeSnapshot {
    pub categories: ViewState<Vec<Category>>,
    pub selected: Option<Category>,
    pub products: ViewState<Vec<Product>>,
}

pub struct HomeController {
    catalog: CatalogService,
    inner: Mutex<HomeState>,
}

impl HomeController {
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog,
            inner: Mutex::new(HomeState {
                categories: QuerySlot::new("categories"),
                products: QuerySlot::new("products"),
                selected: None,
            }),
        }
    }

    pub async fn mount(&self) {
        tokio::join!(self.load_categories(), self.load_products());
    }

    /// Category failures are not surfaced: the slot settles on an empty list.
    pub async fn load_categories(&self) -> ViewState<Vec<Category>> {
        let ticket = self.inner.lock().await.categories.begin();
        let categories = self.catalog.list_categories_or_empty().await;

        let mut guard = self.inner.lock().await;
        guard.categories.complete(ticket, Ok(categories));
        guard.categories.state().clone()
    }

    /// Refetches for the current selection.
    pub async fn load_products(&self) -> ViewState<Vec<Product>> {
        let (ticket, category) = {
            let mut guard = self.inner.lock().await;
            (guard.products.begin(), guard.selected.clone())
        };
        self.fetch_products(ticket, category).await
    }

    /// Every call issues exactly one fetch, superseding whatever is in flight.
    pub async fn select_category(&self, category: Option<Category>) -> ViewState<Vec<Product>> {
        let ticket = {
            let mut guard = self.inner.lock().await;
            guard.selected = category.clone();
            guard.products.begin()
        };
        self.fetch_products(ticket, category).await
    }

    async fn fetch_products(
        &self,
        ticket: FetchTicket,
        category: Option<Category>,
    ) -> ViewState<Vec<Product>> {
        let outcome = self
            .catalog
            .list_products(category.as_ref())
            .await
            .map_err(|err| {
                warn!(category = ?category, error = %err, "failed to load products");
                err.to_string()
            });

        let mut guard = self.inner.lock().await;
        guard.products.complete(ticket, outcome);
        guard.products.state().clone()
    }

    pub async fn snapshot(&self) -> HomeSnapshot {
        let guard = self.inner.lock().await;
        HomeSnapshot {
            categories: guard.categories.state().clone(),
            selected: guard.selected.clone(),
            products: guard.products.state().clone(),
        }
    }

    pub async fn unmount(&self) {
        let mut guard = self.inner.lock().await;
        guard.categories.unmount();
        guard.products.unmount();
    }
}

struct DetailState {
    product_id: ProductId,
    product: QuerySlot<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDetailSnapshot {
    pub product_id: ProductId,
    pub product: ViewState<Product>,
}

pub struct ProductDetailController {
    products: ProductService,
    inner: Mutex<DetailState>,
}

impl ProductDetailController {
    pub fn new(products: ProductService, product_id: ProductId) -> Self {
        Self {
            products,
            inner: Mutex::new(DetailState {
                product_id,
                product: QuerySlot::new("product"),
            }),
        }
    }

    pub async fn mount(&self) -> ViewState<Product> {
        self.load().await
    }

    /// Refetches only when the identifier actually changes.
    pub async fn set_product_id(&self, product_id: ProductId) -> ViewState<Product> {
        {
            let mut guard = self.inner.lock().await;
            if guard.product_id == product_id {
                return guard.product.state().clone();
            }
            guard.product_id = product_id;
        }
        self.load().await
    }

    pub async fn load(&self) -> ViewState<Product> {
        let (ticket, product_id) = {
            let mut guard = self.inner.lock().await;
            (guard.product.begin(), guard.product_id)
        };

        let outcome = self.products.get_product(product_id).await.map_err(|err| {
            warn!(%product_id, error = %err, "failed to load product");
            PRODUCT_LOAD_FAILED.to_string()
        });

        let mut guard = self.inner.lock().await;
        guard.product.complete(ticket, outcome);
        guard.product.state().clone()
    }

    pub async fn snapshot(&self) -> ProductDetailSnapshot {
        let guard = self.inner.lock().await;
        ProductDetailSnapshot {
            product_id: guard.product_id,
            product: guard.product.state().clone(),
        }
    }

    pub async fn unmount(&self) {
        self.inner.lock().await.product.unmount();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum AuthState {
    Idle,
    Submitting,
    Authenticated(Session),
    Rejected(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub state: AuthState,
    pub effect: Option<NavigationEffect>,
}

struct LoginState {
    session: QuerySlot<Session>,
    rejection: ErrorCode,
}

impl LoginState {
    fn auth_state(&self) -> AuthState {
        match self.session.state() {
            ViewState::Idle => AuthState::Idle,
            ViewState::Loading => AuthState::Submitting,
            ViewState::Success(session) => AuthState::Authenticated(session.clone()),
            ViewState::Error(message) => {
                AuthState::Rejected(ApiError::new(self.rejection, message.clone()))
            }
        }
    }
}

pub struct LoginController {
    auth: AuthService,
    inner: Mutex<LoginState>,
}

impl LoginController {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            inner: Mutex::new(LoginState {
                session: QuerySlot::new("login"),
                rejection: ErrorCode::Auth,
            }),
        }
    }

    /// Runs the sign-in flow. On success the outcome carries the navigation
    /// effect that takes the user to the home screen.
    pub async fn submit(&self, username: &str, password: &str) -> LoginOutcome {
        if let Err(err) = auth::validate_credentials(username, password) {
            let mut guard = self.inner.lock().await;
            guard.rejection = err.code();
            guard.session.reject(err.to_string());
            return LoginOutcome {
                state: guard.auth_state(),
                effect: None,
            };
        }

        let ticket = self.inner.lock().await.session.begin();
        let outcome = self.auth.login(username, password).await;

        let mut guard = self.inner.lock().await;
        let applied = match outcome {
            Ok(session) => guard.session.complete(ticket, Ok(session)),
            Err(err) => {
                let applied = guard.session.complete(ticket, Err(err.to_string()));
                if applied {
                    guard.rejection = err.code();
                }
                applied
            }
        };

        let state = guard.auth_state();
        let effect = match (&state, applied) {
            (AuthState::Authenticated(_), true) => Some(NavigationEffect::ReplaceWith(Route::Home)),
            _ => None,
        };
        LoginOutcome { state, effect }
    }

    pub async fn state(&self) -> AuthState {
        self.inner.lock().await.auth_state()
    }

    pub async fn view_state(&self) -> ViewState<Session> {
        self.inner.lock().await.session.state().clone()
    }

    pub async fn unmount(&self) {
        self.inner.lock().await.session.unmount();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoContent {
    pub heading: String,
    pub description: String,
    pub credits: Vec<Credit>,
}

impl InfoContent {
    pub fn with_credits(credits: Vec<Credit>) -> Self {
        Self {
            heading: "Desenvolvedores do App".to_string(),
            description: "Vitrine de produtos sobre o catálogo público de demonstração."
                .to_string(),
            credits,
        }
    }
}

impl Default for InfoContent {
    fn default() -> Self {
        Self::with_credits(Vec::new())
    }
}

pub enum Screen {
    Login(LoginController),
    Home(HomeController),
    Info(InfoContent),
    ProductDetail(ProductDetailController),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenSnapshot {
    Login { state: AuthState },
    Home(HomeSnapshot),
    Info(InfoContent),
    ProductDetail(ProductDetailSnapshot),
}

impl Screen {
    pub fn build(route: Route, services: &Services, info: &InfoContent) -> Self {
        match route {
            Route::Login => Self::Login(LoginController::new(services.auth.clone())),
            Route::Home => Self::Home(HomeController::new(services.catalog.clone())),
            Route::Info => Self::Info(info.clone()),
            Route::ProductDetail { product_id } => Self::ProductDetail(
                ProductDetailController::new(services.products.clone(), product_id),
            ),
        }
    }

    pub async fn mount(&self) {
        match self {
            Self::Home(home) => home.mount().await,
            Self::ProductDetail(detail) => {
                detail.mount().await;
            }
            Self::Login(_) | Self::Info(_) => {}
        }
    }

    pub async fn unmount(&self) {
        match self {
            Self::Home(home) => home.unmount().await,
            Self::ProductDetail(detail) => detail.unmount().await,
            Self::Login(login) => login.unmount().await,
            Self::Info(_) => {}
        }
    }

    pub async fn snapshot(&self) -> ScreenSnapshot {
        match self {
            Self::Login(login) => ScreenSnapshot::Login {
                state: login.state().await,
            },
            Self::Home(home) => ScreenSnapshot::Home(home.snapshot().await),
            Self::Info(info) => ScreenSnapshot::Info(info.clone()),
            Self::ProductDetail(detail) => ScreenSnapshot::ProductDetail(detail.snapshot().await),
        }
    }
}

/// Navigation stack with one mounted controller per entry. Pushing mounts the
/// new screen; replacing or popping unmounts the old one.
pub struct Storefront {
    services: Services,
    info: InfoContent,
    navigator: Navigator,
    screens: Vec<Screen>,
}

impl Storefront {
    pub async fn launch(services: Services, info: InfoContent) -> Self {
        Self::start(services, info, Route::Home).await
    }

    pub async fn start(services: Services, info: InfoContent, initial: Route) -> Self {
        let screen = Screen::build(initial, &services, &info);
        screen.mount().await;
        Self {
            services,
            info,
            navigator: Navigator::new(initial),
            screens: vec![screen],
        }
    }

    pub fn route(&self) -> Route {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn active(&self) -> Option<&Screen> {
        self.screens.last()
    }

    pub async fn apply(&mut self, effect: NavigationEffect) {
        match effect {
            NavigationEffect::Navigate(route) => {
                self.navigator.navigate(route);
                self.push_screen(route).await;
            }
            NavigationEffect::ReplaceWith(route) => {
                self.navigator.replace(route);
                if let Some(previous) = self.screens.pop() {
                    previous.unmount().await;
                }
                self.push_screen(route).await;
            }
            NavigationEffect::Back => {
                if self.navigator.back().is_some() {
                    if let Some(previous) = self.screens.pop() {
                        previous.unmount().await;
                    }
                }
            }
        }
    }

    async fn push_screen(&mut self, route: Route) {
        let screen = Screen::build(route, &self.services, &self.info);
        screen.mount().await;
        self.screens.push(screen);
    }

    pub async fn open_product(&mut self, product_id: ProductId) {
        self.apply(NavigationEffect::Navigate(Route::ProductDetail { product_id }))
            .await;
    }

    pub async fn open_info(&mut self) {
        self.apply(NavigationEffect::Navigate(Route::Info)).await;
    }

    pub async fn logout(&mut self) {
        self.apply(NavigationEffect::ReplaceWith(Route::Login)).await;
    }

    pub async fn back(&mut self) {
        self.apply(NavigationEffect::Back).await;
    }

    /// `None` when the active screen is not the login screen.
    pub async fn submit_login(&mut self, username: &str, password: &str) -> Option<LoginOutcome> {
        let outcome = match self.screens.last() {
            Some(Screen::Login(login)) => login.submit(username, password).await,
            _ => return None,
        };
        if let Some(effect) = outcome.effect {
            self.apply(effect).await;
        }
        Some(outcome)
    }

    /// `None` when the active screen is not the home screen.
    pub async fn select_category(
        &self,
        category: Option<Category>,
    ) -> Option<ViewState<Vec<Product>>> {
        match self.screens.last() {
            Some(Screen::Home(home)) => Some(home.select_category(category).await),
            _ => None,
        }
    }

    /// Re-runs the active screen's fetches.
    pub async fn refresh(&self) {
        if let Some(screen) = self.screens.last() {
            screen.mount().await;
        }
    }

    pub async fn snapshot(&self) -> Option<ScreenSnapshot> {
        match self.screens.last() {
            Some(screen) => Some(screen.snapshot().await),
            None => None,
        }
    }

    pub async fn shutdown(&mut self) {
        while let Some(screen) = self.screens.pop() {
            screen.unmount().await;
        }
    }
}

#[cfg(test)]
#[path = "tests/screens_tests.rs"]
mod tests;
