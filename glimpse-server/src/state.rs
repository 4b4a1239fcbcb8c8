use crate::db::Database;
use crate::rng::SharedRng;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub rng: SharedRng,
}

impl AppState {
    pub fn new(db: Database, rng: SharedRng) -> Self {
        Self { db, rng }
    }
}
