//! Shell commands typed at the storefront prompt.

use shared::domain::{Category, ProductId};

pub const HELP: &str = "\
commands:
  open <id>              open a product from the list
  filter <category|all>  filter the list by category
  back                   return to the previous screen
  login <user> <pass>    sign in (login screen)
  logout                 leave the catalog for the login screen
  info                   about this app
  refresh                refetch the current screen
  help                   show this message
  quit                   exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Open(ProductId),
    Filter(Option<Category>),
    Back,
    Login { username: String, password: String },
    Logout,
    Info,
    Refresh,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Filter(_) => "filter",
            Self::Back => "back",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Info => "info",
            Self::Refresh => "refresh",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

/// `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "open" => {
            let id = rest
                .parse::<i64>()
                .map_err(|_| format!("usage: open <id> (got '{rest}')"))?;
            ShellCommand::Open(ProductId(id))
        }
        "filter" => match rest {
            "" => return Err("usage: filter <category|all>".to_string()),
            "all" | "todos" => ShellCommand::Filter(None),
            category => ShellCommand::Filter(Some(Category::new(category))),
        },
        "back" => ShellCommand::Back,
        "login" => {
            // Missing fields are passed through so the sign-in flow reports them.
            let mut fields = rest.split_whitespace();
            ShellCommand::Login {
                username: fields.next().unwrap_or_default().to_string(),
                password: fields.next().unwrap_or_default().to_string(),
            }
        }
        "logout" => ShellCommand::Logout,
        "info" => ShellCommand::Info,
        "refresh" => ShellCommand::Refresh,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}
