pub mod clean;
pub mod fetch;
pub mod pipeline;
pub mod store;
pub mod table;
