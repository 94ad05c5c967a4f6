use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed follow edge in the `seguidores` table. Unique per pair,
/// never reflexive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seguidor {
    pub id_seguidor: Uuid,
    pub id_seguido: Uuid,
}

/// Trimmed profile used by the following list and user search, annotated
/// with whether the requesting user already follows it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub nombre: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_following: bool,
}
