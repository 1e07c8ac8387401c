// src/lib.rs

pub mod core;
pub mod error;
pub mod persistence;
pub use crate::core::engine::Translator;
pub use crate::core::types::{StructureRef, Word, ENGLISH};
pub use crate::error::{Result, TranslatorError};
