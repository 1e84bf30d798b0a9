//! Expression interpreter module
//!
//! Provides the interpreter shared by the built-in expression backends.

mod interpreter;
mod operators;

#[cfg(test)]
mod tests;

// Re-export for convenience
pub use interpreter::Interpreter;
