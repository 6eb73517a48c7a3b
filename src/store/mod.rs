pub mod json_store;
pub mod schema;
pub mod summary;

pub use json_store::StatsStore;
pub use schema::StatsDocument;
