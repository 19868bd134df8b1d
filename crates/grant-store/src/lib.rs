pub mod error;
pub mod filter;
pub mod funnel;
pub mod model;
pub mod parser;
pub mod store;
pub mod validate;
