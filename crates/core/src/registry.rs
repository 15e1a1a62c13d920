// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Named-function registry.
//!
//! Maps string keys to callable handlers so a service can dispatch by
//! name. The registry is an explicit value owned by whoever needs it —
//! there is no process-wide table. Registering the same key twice is an
//! error, not a silent overwrite.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Registry of named handlers of a single callable type `F`.
///
/// ```rust,ignore
/// let mut registry: FuncRegistry<fn(&str)> = FuncRegistry::new();
/// registry.register("greet", |name| println!("hello {name}"))?;
/// registry.get("greet")?("world");
/// ```
#[derive(Debug, Default)]
pub struct FuncRegistry<F> {
    entries: HashMap<String, F>,
}

impl<F> FuncRegistry<F> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        FuncRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registers a handler under the given key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateHandler`] if the key is already taken;
    /// the existing handler is left in place.
    pub fn register(&mut self, key: impl Into<String>, handler: F) -> Result<()> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateHandler(key));
        }
        self.entries.insert(key, handler);
        Ok(())
    }

    /// Looks up the handler registered under the given key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownHandler`] if no handler is registered.
    pub fn get(&self, key: &str) -> Result<&F> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::UnknownHandler(key.to_string()))
    }

    /// Returns true if a handler is registered under the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
