//! Two-phase sign-in: the username must exist in the user directory before the
//! credentials are submitted to the login endpoint. Password verification is
//! left entirely to the server.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{
    domain::DirectoryUser,
    protocol::{LoginRequest, LoginResponse},
};
use tracing::{info, warn};

use crate::{
    error::{ClientError, Result},
    transport::{decode, parse_body, Endpoints, HttpTransport, Method},
};

pub const MSG_FILL_IN_FIELDS: &str = "Preencha todos os campos de usuário e senha.";
pub const MSG_USER_NOT_FOUND: &str = "Usuário não encontrado.";
pub const MSG_SERVER_UNREACHABLE: &str =
    "Não foi possível conectar ao servidor. Verifique sua internet.";
pub const MSG_LOGIN_SUCCEEDED: &str = "Login realizado com sucesso!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
}

impl AuthService {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        validate_credentials(username, password)?;

        let directory = self.fetch_directory().await?;
        if !directory.iter().any(|user| user.username == username) {
            warn!(username, "login rejected: unknown username");
            return Err(ClientError::NotFound(MSG_USER_NOT_FOUND.to_string()));
        }

        let token = self
            .submit_credentials(username, password)
            .await
            .map_err(auth_failure)?;

        info!(username, "login accepted");
        Ok(Session {
            username: username.to_string(),
            token,
        })
    }

    pub async fn fetch_directory(&self) -> Result<Vec<DirectoryUser>> {
        let raw = self
            .transport
            .request(Method::GET, self.endpoints.users(), None)
            .await?;
        decode(raw)
    }

    async fn submit_credentials(&self, username: &str, password: &str) -> Result<String> {
        let body = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let raw = self
            .transport
            .request(Method::POST, self.endpoints.login(), Some(body))
            .await?;

        match raw {
            Value::String(token) if !token.trim().is_empty() => Ok(token),
            other => decode::<LoginResponse>(other).map(|response| response.token),
        }
    }
}

/// Both fields must be non-empty; checked before any request is issued.
pub fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.is_empty() || password.is_empty() {
        return Err(ClientError::Validation(MSG_FILL_IN_FIELDS.to_string()));
    }
    Ok(())
}

/// Server-provided body first, then the unreachable notice, then the raw
/// failure text.
fn auth_failure(err: ClientError) -> ClientError {
    let message = match &err {
        ClientError::Http { body, .. } if !body.trim().is_empty() => match parse_body(body) {
            Value::String(text) => text.trim().to_string(),
            _ => body.trim().to_string(),
        },
        ClientError::Network { .. } => MSG_SERVER_UNREACHABLE.to_string(),
        other => other.to_string(),
    };
    ClientError::Auth { message }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
