pub mod error;
pub mod handlers;
mod upload;
