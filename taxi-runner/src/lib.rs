pub mod scheduler;
pub mod script;
