pub mod cache_steps;
pub mod guard_steps;
