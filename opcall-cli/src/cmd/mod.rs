pub mod call;
mod config;
pub mod validate;
