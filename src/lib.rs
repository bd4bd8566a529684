use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;
use tokio::sync::broadcast;

use config::Config;
use routes::ai::GeminiClient;

pub mod config;
pub mod middleware;
pub mod session;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub redis: Arc<RedisClient>,
    /// Fan-out for the single chat room; payloads are pre-serialized events.
    pub chat_tx: broadcast::Sender<String>,
    pub gemini: GeminiClient,
}
