//! Copy/paste slots, one per entity kind.
//!
//! Each slot holds one entity serialized to JSON with its `id` stripped.
//! Pasting parses the slot back and stamps a fresh id on it. Copying
//! overwrites the slot for that kind and marks it as the latest.

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::doc::EntityKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("nothing copied")]
    Empty,
    #[error("no {0} copied")]
    EmptySlot(EntityKind),
    #[error("clipboard entry unreadable: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ClipboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slots: HashMap<EntityKind, String>,
    latest: Option<EntityKind>,
}

impl Clipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the most recent copy, if any.
    #[must_use]
    pub fn latest(&self) -> Option<EntityKind> {
        self.latest
    }

    /// Raw serialized contents of the `kind` slot.
    #[must_use]
    pub fn slot(&self, kind: EntityKind) -> Option<&str> {
        self.slots.get(&kind).map(String::as_str)
    }

    /// Serialize `entity` without its id into the `kind` slot.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` if `entity` does not serialize to a JSON object.
    pub fn copy<T: Serialize>(&mut self, kind: EntityKind, entity: &T) -> Result<(), ClipboardError> {
        let mut value = serde_json::to_value(entity)?;
        let Some(fields) = value.as_object_mut() else {
            return Err(ClipboardError::Malformed(format!("{kind} is not an object")));
        };
        fields.remove("id");
        self.slots.insert(kind, value.to_string());
        self.latest = Some(kind);
        Ok(())
    }

    /// Rebuild the entity in the `kind` slot under a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `EmptySlot` when nothing of that kind was copied, or
    /// `Malformed` when the slot no longer parses as `T`.
    pub fn paste<T: DeserializeOwned>(&self, kind: EntityKind) -> Result<T, ClipboardError> {
        let raw = self.slots.get(&kind).ok_or(ClipboardError::EmptySlot(kind))?;
        let mut value: serde_json::Value = serde_json::from_str(raw)?;
        let Some(fields) = value.as_object_mut() else {
            return Err(ClipboardError::Malformed(format!("{kind} slot is not an object")));
        };
        fields.insert("id".to_owned(), serde_json::Value::String(Uuid::new_v4().to_string()));
        Ok(serde_json::from_value(value)?)
    }
}
