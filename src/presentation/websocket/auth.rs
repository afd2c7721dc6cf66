//! Connection Authentication Gate
//!
//! Best-effort identity extraction at upgrade time. A bad, expired, or
//! missing credential never rejects the connection; it only downgrades
//! the label to anonymous. Write-side endpoints enforce their own
//! authorization independently of this label.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Role attached to a connection by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Anonymous,
    User,
    Admin,
}

/// Identity label produced for every connection.
#[derive(Debug, Clone)]
pub struct ConnectionLabel {
    pub identity: Option<String>,
    pub role: Role,
}

impl ConnectionLabel {
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            role: Role::Anonymous,
        }
    }
}

/// JWT claims carried by the bearer credential.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    role: Option<String>,
    exp: usize,
}

/// Label a connection from an optional bearer credential.
pub fn authenticate(token: Option<&str>, secret: &str) -> ConnectionLabel {
    let Some(token) = token else {
        return ConnectionLabel::anonymous();
    };

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => {
            let role = match data.claims.role.as_deref() {
                Some("admin") => Role::Admin,
                _ => Role::User,
            };
            ConnectionLabel {
                identity: Some(data.claims.sub),
                role,
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Credential rejected, connection proceeds anonymous");
            ConnectionLabel::anonymous()
        }
    }
}
