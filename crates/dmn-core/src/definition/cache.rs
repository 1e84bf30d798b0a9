//! Compile-once cells for memoized compiled expression forms
//!
//! A decision definition is shared by many concurrent evaluations. Each
//! expression node owns a [`CompiledFormCache`] whose slots are filled lazily
//! the first time a backend compiles the node. Reads are lock-free once a slot
//! is populated; a miss takes the node's own lock, so compiles of different
//! nodes proceed in parallel while compiles of the same node are serialized
//! and the losing caller reuses the winner's result.

use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Opaque compiled form stored by an expression backend
pub type CompiledForm = Arc<dyn Any + Send + Sync>;

/// A value computed at most once, never observed half-initialized
pub struct CompileOnce<T> {
    cell: OnceLock<T>,
    lock: Mutex<()>,
}

impl<T> CompileOnce<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            lock: Mutex::new(()),
        }
    }

    /// Current value without compiling
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Return the stored value, running `compile` on a miss
    ///
    /// A failed compile leaves the cell empty so a later call may retry.
    pub fn get_or_try_compile<E, F>(&self, compile: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let _guard = self.lock.lock();
        if let Some(value) = self.cell.get() {
            return Ok(value);
        }

        let value = compile()?;
        Ok(self.cell.get_or_init(move || value))
    }
}

impl<T> Default for CompileOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CompileOnce<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOnce")
            .field("populated", &self.cell.get().is_some())
            .finish()
    }
}

/// Per-node compiled forms, one slot per compiling backend
#[derive(Debug, Default)]
pub struct CompiledFormCache {
    template: CompileOnce<CompiledForm>,
    script: CompileOnce<CompiledForm>,
}

impl CompiledFormCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for the template backend's compiled expression
    pub fn template(&self) -> &CompileOnce<CompiledForm> {
        &self.template
    }

    /// Slot for a script engine's compiled script
    pub fn script(&self) -> &CompileOnce<CompiledForm> {
        &self.script
    }
}

// A cloned node is a new node; its cache starts empty.
impl Clone for CompiledFormCache {
    fn clone(&self) -> Self {
        Self::default()
    }
}
