pub mod context;
pub mod pipeline;
pub mod types;
pub mod workflow;
