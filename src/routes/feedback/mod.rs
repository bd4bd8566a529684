mod handler;
mod model;

pub use handler::{stats, submit};
