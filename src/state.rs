use std::sync::Arc;

use crate::blogs::repo::{BlogRepo, PgBlogRepo};
use crate::config::AppConfig;
use crate::db;
use crate::users::repo::{PgUserRepo, UserRepo};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub blogs: Arc<dyn BlogRepo>,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.db).await?;

        if let Err(e) = db::migrate(&pool).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self::from_parts(
            Arc::new(PgUserRepo::new(pool.clone())),
            Arc::new(PgBlogRepo::new(pool)),
        ))
    }

    pub fn from_parts(users: Arc<dyn UserRepo>, blogs: Arc<dyn BlogRepo>) -> Self {
        Self { users, blogs }
    }

    /// State over a fresh in-memory store.
    #[cfg(test)]
    pub fn fake() -> Self {
        let store = Arc::new(crate::memory::MemoryStore::default());
        Self::from_parts(store.clone(), store)
    }
}
