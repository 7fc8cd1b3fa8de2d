//! # API Facade
//!
//! The API layer is a **thin facade** over [`PropertyStore`]. It is the single entry
//! point for UI clients (the CLI today), and it speaks in structured results rather
//! than strings.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Loads** the owner's listings once per session before the first operation
//! - **Normalizes ids**: a unique prefix of a listing id stands for the whole id
//! - **Applies UI rules** the store leaves to callers: form validation before `add`,
//!   the anonymous listing cap, "not found" for unknown ids
//! - **Returns structured types** (`Result<CmdResult>`) carrying listings and
//!   leveled messages
//!
//! ## What the API Does NOT Do
//!
//! - **Presentation**: no stdout, colors or formatting
//! - **Argument parsing**: that's the CLI layer's job
//! - **Exit codes**: errors are returned, the caller decides
//!
//! ## Generic Over RemoteTable
//!
//! `PropzApi<R: RemoteTable>` is generic over the table backend:
//! - Production: `PropzApi<Box<dyn RemoteTable>>` (REST or file, picked at startup)
//! - Testing: `PropzApi<MemTable>`

use serde::Serialize;

use crate::error::{PropzError, Result};
use crate::filter::{search, PropertyFilters};
use crate::identity::{OwnerId, ANONYMOUS_PROPERTY_LIMIT};
use crate::model::{Property, PropertyInput, PropertyPatch};
use crate::remote::RemoteTable;
use crate::store::{FavoriteToggle, PropertyStore, Summary, ToggleState, COMPARE_SLOTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Who the session acts as and where its listings live.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Whoami {
    pub owner: OwnerId,
    pub table: String,
    pub count: usize,
    pub limit: Option<usize>,
    pub limit_reached: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    /// Listings created or changed by the command.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub affected: Vec<Property>,
    /// Listings to display.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub listed: Vec<Property>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle: Option<FavoriteToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whoami: Option<Whoami>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, properties: Vec<Property>) -> Self {
        self.affected = properties;
        self
    }

    pub fn with_listed(mut self, properties: Vec<Property>) -> Self {
        self.listed = properties;
        self
    }
}

/// The main API facade for propz operations.
pub struct PropzApi<R: RemoteTable> {
    store: PropertyStore<R>,
    loaded: bool,
}

impl<R: RemoteTable> PropzApi<R> {
    pub fn new(store: PropertyStore<R>) -> Self {
        Self {
            store,
            loaded: false,
        }
    }

    pub fn store(&self) -> &PropertyStore<R> {
        &self.store
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.store.fetch_all()?;
            self.loaded = true;
        }
        Ok(())
    }

    /// Exact id, or a unique prefix of one (the CLI shows short ids).
    fn resolve(&self, id: &str) -> Result<String> {
        let id = id.trim();
        if self.store.get(id).is_some() {
            return Ok(id.to_string());
        }
        let matches: Vec<&str> = self
            .store
            .properties()
            .iter()
            .map(|p| p.id.as_str())
            .filter(|candidate| !id.is_empty() && candidate.starts_with(id))
            .collect();
        match matches.as_slice() {
            [only] => Ok(only.to_string()),
            [] => Err(PropzError::NotFound(id.to_string())),
            _ => Err(PropzError::Api(format!(
                "Ambiguous id {}: matches {} properties",
                id,
                matches.len()
            ))),
        }
    }

    pub fn list(&mut self, filters: PropertyFilters, term: Option<&str>) -> Result<CmdResult> {
        self.ensure_loaded()?;
        self.store.reset_filters();
        self.store.set_filters(filters);

        let shown: Vec<Property> = match term {
            Some(term) => search(self.store.filtered(), term)
                .into_iter()
                .cloned()
                .collect(),
            None => self.store.filtered().to_vec(),
        };

        let mut result = CmdResult::default();
        if self.store.properties().is_empty() {
            result.add_message(CmdMessage::info("No properties yet. Add one with `propz add`."));
        } else if shown.is_empty() {
            result.add_message(CmdMessage::info("No properties match the current filters."));
        }
        Ok(result.with_listed(shown))
    }

    pub fn show(&mut self, id: &str) -> Result<CmdResult> {
        self.ensure_loaded()?;
        let id = self.resolve(id)?;
        let property = self.store.require(&id)?.clone();
        Ok(CmdResult::default().with_listed(vec![property]))
    }

    pub fn add(&mut self, input: PropertyInput) -> Result<CmdResult> {
        self.ensure_loaded()?;
        if self.store.is_anonymous_limit_reached() {
            return Err(PropzError::Api(format!(
                "Anonymous users can track up to {} properties. Sign in to add more.",
                ANONYMOUS_PROPERTY_LIMIT
            )));
        }
        input.validate()?;

        let added = self.store.add(input)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Added \"{}\"", added.title)));
        Ok(result.with_affected(vec![added]))
    }

    pub fn update(&mut self, id: &str, patch: PropertyPatch) -> Result<CmdResult> {
        self.ensure_loaded()?;
        let id = self.resolve(id)?;
        if patch.is_empty() {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning("Nothing to update"));
            return Ok(result);
        }
        patch.validate()?;

        self.store.update(&id, patch)?;
        let updated = self.store.require(&id)?.clone();
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Updated \"{}\"", updated.title)));
        Ok(result.with_affected(vec![updated]))
    }

    pub fn delete(&mut self, id: &str) -> Result<CmdResult> {
        self.ensure_loaded()?;
        let id = self.resolve(id)?;
        let removed = self.store.require(&id)?.clone();
        self.store.delete(&id)?;

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!("Deleted \"{}\"", removed.title)));
        Ok(result.with_affected(vec![removed]))
    }

    /// Optimistic toggle. A reverted toggle is reported as an error.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<CmdResult> {
        self.ensure_loaded()?;
        let id = self.resolve(id)?;
        let title = self.store.require(&id)?.title.clone();
        let toggle = self
            .store
            .toggle_favorite(&id)
            .ok_or_else(|| PropzError::NotFound(id.clone()))?;

        if toggle.state() == ToggleState::Reverted {
            let message = self.store.error().unwrap_or_default().to_string();
            return Err(PropzError::Store(message));
        }

        let mut result = CmdResult::default();
        let message = if toggle.requested() {
            format!("Added \"{}\" to favorites", title)
        } else {
            format!("Removed \"{}\" from favorites", title)
        };
        result.add_message(CmdMessage::success(message));
        let affected = self.store.require(&id)?.clone();
        result.toggle = Some(toggle);
        Ok(result.with_affected(vec![affected]))
    }

    pub fn compare<I: AsRef<str>>(&mut self, ids: &[I]) -> Result<CmdResult> {
        self.ensure_loaded()?;
        let resolved: Vec<String> = ids
            .iter()
            .map(|id| {
                self.resolve(id.as_ref())
                    .unwrap_or_else(|_| id.as_ref().to_string())
            })
            .collect();
        let picked: Vec<Property> = self
            .store
            .compare(resolved.as_slice())
            .into_iter()
            .cloned()
            .collect();

        let mut result = CmdResult::default();
        if ids.len() > COMPARE_SLOTS {
            result.add_message(CmdMessage::warning(format!(
                "Only the first {} properties are compared",
                COMPARE_SLOTS
            )));
        }
        if picked.len() < 2 {
            result.add_message(CmdMessage::warning(
                "Select at least two known properties to compare",
            ));
        }
        Ok(result.with_listed(picked))
    }

    pub fn summary(&mut self) -> Result<CmdResult> {
        self.ensure_loaded()?;
        Ok(CmdResult {
            summary: Some(self.store.summary()),
            ..Default::default()
        })
    }

    pub fn whoami(&mut self) -> Result<CmdResult> {
        self.ensure_loaded()?;
        let owner = self.store.owner().clone();
        let anonymous = owner.is_anonymous();
        let whoami = Whoami {
            table: self.store.remote().describe(),
            count: self.store.properties().len(),
            limit: anonymous.then_some(ANONYMOUS_PROPERTY_LIMIT),
            limit_reached: self.store.is_anonymous_limit_reached(),
            owner,
        };
        let mut result = CmdResult {
            whoami: Some(whoami),
            ..Default::default()
        };
        if self.store.is_anonymous_limit_reached() {
            result.add_message(CmdMessage::warning(
                "Anonymous listing limit reached. Set PROPZ_USER_ID to keep adding.",
            ));
        }
        Ok(result)
    }
}
