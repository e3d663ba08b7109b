//! Command implementations for the electron-bundler CLI

pub mod bundle;
pub mod completions;
pub mod prepare;
