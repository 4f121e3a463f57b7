//! Natural language processing layer.

pub mod ner;

pub use ner::{load_model, Entity, GazetteerNer, Ner};
