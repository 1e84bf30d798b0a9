//! Test modules for the interpreter
