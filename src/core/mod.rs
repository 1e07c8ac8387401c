// src/core/mod.rs
pub mod engine;
pub mod grammar;
pub mod lexicon;
pub mod loader;
pub mod types;
