use crate::db::{DbPool, OrmConn};
use crate::llm::CompletionClient;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub llm: CompletionClient,
}
