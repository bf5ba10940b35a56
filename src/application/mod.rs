pub mod aggregate;
pub mod classify;
pub mod compare;
pub mod filter;
pub mod monitoring;
pub mod normalize;
pub mod rule_store;
