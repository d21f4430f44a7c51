pub mod dto;
pub mod error;
pub mod handlers;
mod server;
pub mod state;


pub use server::{build_router, start_server};
