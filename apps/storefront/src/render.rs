//! Plain-text rendering of screen snapshots.

use std::fmt::Write as _;

use client_core::{
    screens::{HomeSnapshot, ProductDetailSnapshot},
    AuthState, InfoContent, Route, ScreenSnapshot, ViewState,
};
use shared::domain::{Category, Product};

use crate::events::{UiError, UiErrorContext};

const LOADING: &str = "Carregando...";

pub fn screen(route: Route, snapshot: &ScreenSnapshot) -> String {
    let mut out = String::new();
    if let Some(title) = route.title() {
        let _ = writeln!(out, "== {title} ==");
    }

    match snapshot {
        ScreenSnapshot::Home(home) => render_home(&mut out, home),
        ScreenSnapshot::ProductDetail(detail) => render_detail(&mut out, detail),
        ScreenSnapshot::Login { state } => render_login(&mut out, state),
        ScreenSnapshot::Info(info) => out.push_str(&info_page(info)),
    }
    out.trim_end().to_string()
}

fn render_home(out: &mut String, home: &HomeSnapshot) {
    // A failed listing replaces the whole screen, filters included.
    if let ViewState::Error(message) = &home.products {
        out.push_str(&UiError::from_message(UiErrorContext::Catalog, message.clone()).to_string());
        return;
    }

    let categories = home.categories.data().map(Vec::as_slice).unwrap_or_default();
    let _ = writeln!(out, "{}", filter_bar(categories, home.selected.as_ref()));

    match &home.products {
        ViewState::Idle | ViewState::Loading => out.push_str(LOADING),
        ViewState::Success(products) => out.push_str(&products_table(products)),
        ViewState::Error(_) => {}
    }
}

fn render_detail(out: &mut String, detail: &ProductDetailSnapshot) {
    match &detail.product {
        ViewState::Idle | ViewState::Loading => out.push_str(LOADING),
        ViewState::Error(message) => {
            out.push_str(&UiError::from_message(UiErrorContext::Product, message.clone()).to_string())
        }
        ViewState::Success(product) => out.push_str(&product_card(product)),
    }
}

fn render_login(out: &mut String, state: &AuthState) {
    out.push_str("Entre com seu usuário e senha: login <user> <pass>");
    match state {
        AuthState::Idle => {}
        AuthState::Submitting => {
            let _ = write!(out, "\n{LOADING}");
        }
        AuthState::Authenticated(session) => {
            let _ = write!(out, "\nconectado como {}", session.username);
        }
        AuthState::Rejected(err) => {
            let _ = write!(out, "\n{}", UiError::from_api(UiErrorContext::Login, err));
        }
    }
}

/// `[Todos]` is the unfiltered chip; the active chip is bracketed.
pub fn filter_bar(categories: &[Category], selected: Option<&Category>) -> String {
    let mut chips = Vec::with_capacity(categories.len() + 1);
    chips.push(chip("Todos", selected.is_none()));
    for category in categories {
        chips.push(chip(category.as_str(), selected == Some(category)));
    }
    chips.join(" ")
}

fn chip(label: &str, active: bool) -> String {
    if active {
        format!("[{label}]")
    } else {
        format!(" {label} ")
    }
}

pub fn categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "(no categories)".to_string();
    }
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn products_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "(nenhum produto)".to_string();
    }
    let width = products
        .iter()
        .map(|product| product.id.to_string().len())
        .max()
        .unwrap_or(1);
    products
        .iter()
        .map(|product| {
            format!(
                "#{:<width$}  {}  {}",
                product.id.to_string(),
                product.formatted_price(),
                product.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn product_card(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.category.as_str().to_uppercase());
    let _ = writeln!(out, "{}", product.title);
    let _ = writeln!(out, "{}", product.formatted_price());
    if let Some(rating) = product.rating {
        let _ = writeln!(out, "{:.1} / 5 ({} avaliações)", rating.rate, rating.count);
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    if !product.image_url.is_empty() {
        let _ = writeln!(out, "\n{}", product.image_url);
    }
    out.trim_end().to_string()
}

pub fn info_page(info: &InfoContent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", info.heading);
    let _ = writeln!(out, "{}", info.description);
    for credit in &info.credits {
        match &credit.note {
            Some(note) => {
                let _ = writeln!(out, "  - {} ({note})", credit.name);
            }
            None => {
                let _ = writeln!(out, "  - {}", credit.name);
            }
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ProductId;

    fn product(id: i64, title: &str, price: f64) -> Product {
        Product {
            id: ProductId(id),
            title: title.to_string(),
            price,
            category: Category::from("electronics"),
            description: String::new(),
            image_url: String::new(),
            rating: None,
        }
    }

    #[test]
    fn filter_bar_marks_active_chip() {
        let categories = vec![Category::from("electronics"), Category::from("jewelery")];
        assert_eq!(
            filter_bar(&categories, None),
            "[Todos]  electronics   jewelery "
        );
        let selected = Category::from("jewelery");
        assert_eq!(
            filter_bar(&categories, Some(&selected)),
            " Todos   electronics  [jewelery]"
        );
    }

    #[test]
    fn home_error_replaces_list() {
        let snapshot = ScreenSnapshot::Home(HomeSnapshot {
            categories: ViewState::Success(vec![Category::from("electronics")]),
            selected: None,
            products: ViewState::Error("request failed with status code 500".to_string()),
        });
        let text = screen(Route::Home, &snapshot);
        assert!(text.starts_with("== Produtos ==\nOcorreu um erro:\nrequest failed"));
        assert!(!text.contains("Todos"));
    }

    #[test]
    fn home_lists_products_with_prices() {
        let snapshot = ScreenSnapshot::Home(HomeSnapshot {
            categories: ViewState::Loading,
            selected: None,
            products: ViewState::Success(vec![product(9, "Hard Drive", 64.0), product(10, "SSD", 109.0)]),
        });
        let text = screen(Route::Home, &snapshot);
        assert!(text.contains("#9   R$ 64,00  Hard Drive"));
        assert!(text.contains("#10  R$ 109,00  SSD"));
    }

    #[test]
    fn detail_shows_loading_then_card() {
        let route = Route::ProductDetail {
            product_id: ProductId(9),
        };
        let loading = ScreenSnapshot::ProductDetail(ProductDetailSnapshot {
            product_id: ProductId(9),
            product: ViewState::Loading,
        });
        assert!(screen(route, &loading).ends_with(LOADING));

        let loaded = ScreenSnapshot::ProductDetail(ProductDetailSnapshot {
            product_id: ProductId(9),
            product: ViewState::Success(product(9, "Hard Drive", 64.0)),
        });
        let text = screen(route, &loaded);
        assert!(text.starts_with("== Detalhes do Produto ==\nELECTRONICS\nHard Drive\nR$ 64,00"));
    }
}
