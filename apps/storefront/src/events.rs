//! Error modeling for what the terminal shows the user.

use std::fmt;

use shared::error::{ApiError, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    NotFound,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    Catalog,
    Product,
    Login,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_api(context: UiErrorContext, err: &ApiError) -> Self {
        let category = match err.code {
            ErrorCode::Auth => UiErrorCategory::Auth,
            ErrorCode::Network | ErrorCode::Http => UiErrorCategory::Transport,
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::NotFound => UiErrorCategory::NotFound,
            ErrorCode::Decode => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.message.clone(),
        }
    }

    /// Best-effort classification of a bare view-state message.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("incorrect")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("network")
            || message_lower.contains("connect")
            || message_lower.contains("conectar")
            || message_lower.contains("timed out")
            || message_lower.contains("status code")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("preencha") || message_lower.contains("invalid") {
            UiErrorCategory::Validation
        } else if message_lower.contains("não encontrado") || message_lower.contains("not found") {
            UiErrorCategory::NotFound
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn title(&self) -> &'static str {
        match self.context {
            UiErrorContext::Login => "Erro no Login",
            UiErrorContext::Catalog | UiErrorContext::Product => "Ocorreu um erro:",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self.category {
            UiErrorCategory::Transport => {
                Some("check the catalog URL or your connection, then 'refresh'")
            }
            UiErrorCategory::Validation if self.context == UiErrorContext::Login => {
                Some("usage: login <user> <pass>")
            }
            _ => None,
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title(), self.message)?;
        if let Some(hint) = self.hint() {
            write!(f, "\n({hint})")?;
        }
        Ok(())
    }
}
