//! Reading and writing decomposition documents.

mod json;

pub use json::{DecompositionDocument, DecompositionInput, ExchangeError};
