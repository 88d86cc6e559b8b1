//! MongoDB storage layer

pub mod mongo;
pub mod schemas;

pub use mongo::{IntoIndexes, LazyCollection, MongoClient, MongoCollection};
