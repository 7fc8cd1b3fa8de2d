//! # Owner Identity
//!
//! Every row in the table belongs to an owner. The store only ever consumes an
//! [`OwnerId`]; where it came from is the business of an [`IdentityProvider`]:
//!
//! - **Session**: a signed-in user. The id comes from configuration
//!   (`user_id` / `PROPZ_USER_ID`).
//! - **Anonymous**: no sign-in. A UUID is generated once, persisted in the data
//!   directory (`anonymous_id`) and reused on every later run.
//!
//! Anonymous owners are capped at [`ANONYMOUS_PROPERTY_LIMIT`] listings. The cap is
//! a UI rule: the store reports it, callers enforce it before adding.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::PropzConfig;
use crate::error::{PropzError, Result};

pub const ANONYMOUS_PROPERTY_LIMIT: usize = 10;
const ANONYMOUS_ID_FILE: &str = "anonymous_id";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum OwnerId {
    User(String),
    Anonymous(String),
}

impl OwnerId {
    pub fn as_str(&self) -> &str {
        match self {
            OwnerId::User(id) | OwnerId::Anonymous(id) => id,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, OwnerId::Anonymous(_))
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerId::User(id) => write!(f, "user {}", id),
            OwnerId::Anonymous(id) => write!(f, "anonymous {}", id),
        }
    }
}

pub trait IdentityProvider {
    fn owner_id(&self) -> Result<OwnerId>;
}

/// An authenticated session.
pub struct SessionIdentity {
    user_id: String,
}

impl SessionIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl IdentityProvider for SessionIdentity {
    fn owner_id(&self) -> Result<OwnerId> {
        let id = self.user_id.trim();
        if id.is_empty() {
            return Err(PropzError::Identity("empty user id".to_string()));
        }
        Ok(OwnerId::User(id.to_string()))
    }
}

/// Get-or-create a persistent anonymous id under `dir`.
pub struct AnonymousIdentity {
    dir: PathBuf,
}

impl AnonymousIdentity {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(ANONYMOUS_ID_FILE)
    }

    fn read_existing(&self) -> Result<Option<String>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        let id = raw.trim();
        if id.is_empty() {
            return Ok(None);
        }
        Ok(Some(id.to_string()))
    }

    fn persist(&self, id: &str) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let tmp = self.dir.join(format!(".anonymous-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, id)?;
        fs::rename(&tmp, self.path())?;
        Ok(())
    }
}

impl IdentityProvider for AnonymousIdentity {
    fn owner_id(&self) -> Result<OwnerId> {
        if let Some(id) = self.read_existing()? {
            return Ok(OwnerId::Anonymous(id));
        }
        let id = Uuid::new_v4().to_string();
        self.persist(&id)?;
        tracing::debug!(path = %self.path().display(), "created anonymous id");
        Ok(OwnerId::Anonymous(id))
    }
}

/// Session when a user id is configured, anonymous otherwise.
pub fn resolve_identity(config: &PropzConfig, data_dir: &Path) -> Box<dyn IdentityProvider> {
    match config.user_id.as_deref().map(str::trim) {
        Some(user) if !user.is_empty() => Box::new(SessionIdentity::new(user)),
        _ => Box::new(AnonymousIdentity::new(data_dir)),
    }
}
