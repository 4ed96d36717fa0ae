pub mod store;

pub use store::{Document, IDocumentStore};
