//! # Check-in store
//!
//! Document store behind `POST /checkin` and `GET /analysis`.
//!
//! ## Redis
//!
//! - One list holding every check-in as a JSON document: `checkins`
//! - One list per user: `checkins:user:{userId}`
//! - Writes go straight through on every request, no batching and no transaction
//! - Reads return documents in insertion order
//!
//! ## Memory
//!
//! Used when `REDIS_URL` is not set. Same semantics, lost on restart.
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tokio::sync::RwLock;
use tracing::info;

use crate::{error::AppError, models::WellnessCheckIn};

pub const CHECKINS_KEY: &str = "checkins";

pub enum CheckinStore {
    Memory(RwLock<Vec<WellnessCheckIn>>),
    Redis(ConnectionManager),
}

pub async fn init_store(redis_url: Option<&str>) -> Result<CheckinStore, redis::RedisError> {
    let Some(redis_url) = redis_url else {
        info!("REDIS_URL not set, keeping check-ins in memory");
        return Ok(CheckinStore::Memory(RwLock::new(Vec::new())));
    };

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager().await?;

    info!("Connected to Redis check-in store");
    Ok(CheckinStore::Redis(connection_manager))
}

pub fn user_key(user_id: &str) -> String {
    format!("{CHECKINS_KEY}:user:{user_id}")
}

impl CheckinStore {
    pub async fn add(&self, checkin: &WellnessCheckIn) -> Result<(), AppError> {
        match self {
            CheckinStore::Memory(documents) => {
                documents.write().await.push(checkin.clone());
            }
            CheckinStore::Redis(connection) => {
                let document = serde_json::to_string(checkin)?;
                let mut connection = connection.clone();

                let _: () = connection
                    .rpush(CHECKINS_KEY, &document)
                    .await
                    .map_err(AppError::StoreWrite)?;

                if let Some(user_id) = &checkin.user_id {
                    let _: () = connection
                        .rpush(user_key(user_id), &document)
                        .await
                        .map_err(AppError::StoreWrite)?;
                }
            }
        }

        Ok(())
    }

    pub async fn fetch(&self, user_id: Option<&str>) -> Result<Vec<WellnessCheckIn>, AppError> {
        match self {
            CheckinStore::Memory(documents) => Ok(documents
                .read()
                .await
                .iter()
                .filter(|checkin| user_id.is_none() || checkin.user_id.as_deref() == user_id)
                .cloned()
                .collect()),
            CheckinStore::Redis(connection) => {
                let key = user_id.map_or_else(|| CHECKINS_KEY.to_string(), user_key);

                let documents: Vec<String> = connection
                    .clone()
                    .lrange(key, 0, -1)
                    .await
                    .map_err(AppError::StoreRead)?;

                documents
                    .iter()
                    .map(|document| serde_json::from_str(document).map_err(AppError::from))
                    .collect()
            }
        }
    }
}
