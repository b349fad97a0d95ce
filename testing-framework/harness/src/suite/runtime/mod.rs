pub(crate) mod context;
pub(crate) mod scheduler;
pub(crate) mod unit;

pub use context::RunContext;
