pub mod align;
pub mod error;
pub mod export;
pub mod form;
pub mod import;
pub mod model;
pub mod parse;
pub mod store;
pub mod sync;

pub use error::{MetadataError, Result};
