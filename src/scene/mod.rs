pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod store;
pub mod types;
