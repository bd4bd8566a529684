mod handler;
mod model;
mod ws;

pub use handler::get_messages;
pub use ws::chat_ws;
