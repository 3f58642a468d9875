use std::{io::Write as _, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    auth::MSG_LOGIN_SUCCEEDED, load_settings, screens::PRODUCT_LOAD_FAILED, AuthState,
    InfoContent, LoginController, Route, Services, Storefront,
};
use serde::Serialize;
use shared::{
    domain::{Category, ProductId},
    error::ApiError,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod events;
mod render;

use commands::ShellCommand;
use events::{UiError, UiErrorContext};

#[derive(Parser, Debug)]
#[command(name = "storefront", about = "Browse the demo product catalog from a terminal")]
struct Args {
    /// Catalog API root; overrides the settings file and environment.
    #[arg(long)]
    base_url: Option<String>,
    /// Settings file (defaults to ./storefront.toml).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List product categories.
    Categories,
    /// List products, optionally for one category.
    Products {
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product.
    Product { id: i64 },
    /// Check the user directory, then sign in.
    Login {
        username: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// About this app.
    Info,
    /// Interactive session over the screen stack (default).
    Shell,
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }

    fn fail(&self, err: UiError, api: &ApiError) -> Result<()> {
        debug!(category = ?err.category(), context = ?err.context(), "command failed");
        if self.json {
            println!("{}", serde_json::to_string_pretty(api)?);
        } else {
            println!("{err}");
        }
        Err(anyhow!("{}", err.message()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let services = Services::from_settings(&settings)
        .with_context(|| format!("invalid catalog url '{}'", settings.base_url))?;
    let info = InfoContent::with_credits(settings.credits.clone());
    let output = Output { json: args.json };

    match args.command.unwrap_or(Command::Shell) {
        Command::Categories => {
            let categories = services.catalog.list_categories_or_empty().await;
            output.print(&categories, |c| render::categories(c))
        }
        Command::Products { category } => {
            let category = category.map(Category::new);
            match services.catalog.list_products(category.as_ref()).await {
                Ok(products) => output.print(&products, |p| render::products_table(p)),
                Err(err) => {
                    let api = ApiError::from(&err);
                    output.fail(UiError::from_api(UiErrorContext::Catalog, &api), &api)
                }
            }
        }
        Command::Product { id } => match services.products.get_product(ProductId(id)).await {
            Ok(product) => output.print(&product, render::product_card),
            Err(err) => {
                warn!(product_id = id, error = %err, "failed to load product");
                let api = ApiError::new(err.code(), PRODUCT_LOAD_FAILED);
                output.fail(UiError::from_api(UiErrorContext::Product, &api), &api)
            }
        },
        Command::Login { username, password } => {
            let login = LoginController::new(services.auth.clone());
            match login.submit(&username, &password).await.state {
                AuthState::Authenticated(session) => output.print(&session, |s| {
                    format!("{MSG_LOGIN_SUCCEEDED}\ntoken: {}", s.token)
                }),
                AuthState::Rejected(api) => {
                    output.fail(UiError::from_api(UiErrorContext::Login, &api), &api)
                }
                AuthState::Idle | AuthState::Submitting => Err(anyhow!("login did not settle")),
            }
        }
        Command::Info => output.print(&info, render::info_page),
        Command::Shell => run_shell(services, info, output).await,
    }
}

async fn run_shell(services: Services, info: InfoContent, output: Output) -> Result<()> {
    let mut store = Storefront::launch(services, info).await;
    show(&store, output).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}> ", prompt(store.route()));
        std::io::stdout().flush().context("flush prompt")?;

        let Some(line) = lines.next_line().await.context("read command")? else {
            break;
        };
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };
        debug!(command = command.name(), "shell command");

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                println!("{}", commands::HELP);
                continue;
            }
            other => {
                if let Some(notice) = execute(&mut store, other).await {
                    println!("{notice}");
                }
            }
        }
        show(&store, output).await?;
    }

    store.shutdown().await;
    Ok(())
}

/// Runs one command against the active screen. Returns a notice to print
/// before the screen is redrawn.
async fn execute(store: &mut Storefront, command: ShellCommand) -> Option<String> {
    let route = store.route();
    match command {
        ShellCommand::Open(product_id) if route == Route::Home => {
            store.open_product(product_id).await;
            None
        }
        ShellCommand::Filter(category) => match store.select_category(category).await {
            Some(_) => None,
            None => Some("filters are only available on the product list".to_string()),
        },
        ShellCommand::Back => {
            store.back().await;
            None
        }
        ShellCommand::Login { username, password } => {
            match store.submit_login(&username, &password).await {
                Some(outcome) => match outcome.state {
                    AuthState::Authenticated(_) => Some(MSG_LOGIN_SUCCEEDED.to_string()),
                    AuthState::Rejected(api) => {
                        warn!(code = ?api.code, "login rejected");
                        None
                    }
                    AuthState::Idle | AuthState::Submitting => None,
                },
                None => Some("already signed in; use 'logout' first".to_string()),
            }
        }
        ShellCommand::Logout if route == Route::Home => {
            store.logout().await;
            None
        }
        ShellCommand::Info if route == Route::Home => {
            store.open_info().await;
            None
        }
        ShellCommand::Refresh => {
            store.refresh().await;
            None
        }
        ShellCommand::Open(_) | ShellCommand::Logout | ShellCommand::Info => {
            Some("only available from the product list".to_string())
        }
        ShellCommand::Help | ShellCommand::Quit => None,
    }
}

async fn show(store: &Storefront, output: Output) -> Result<()> {
    let Some(snapshot) = store.snapshot().await else {
        return Ok(());
    };
    let route = store.route();
    output.print(&snapshot, |s| render::screen(route, s))
}

fn prompt(route: Route) -> String {
    match route {
        Route::Login => "login".to_string(),
        Route::Home => "produtos".to_string(),
        Route::Info => "info".to_string(),
        Route::ProductDetail { product_id } => format!("produto {product_id}"),
    }
}
