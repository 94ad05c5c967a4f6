use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application-facing account record in the `perfil` table, keyed by the
/// auth identity's id. Created at sign-up with `completed = false`; the
/// completion flow fills the optional fields and flips the flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perfil {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nombre: Option<String>,
    pub edad: Option<i32>,
    pub ubicacion: Option<String>,
    pub biografia: Option<String>,
    pub intereses: Option<Vec<String>>,
    pub interes_otro: Option<String>,
    pub avatar_url: Option<String>,
    pub verificado: bool,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of the precomputed `vista_contadores_perfil` aggregate view.
/// Counts are read from here, never recomputed on the fly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContadoresPerfil {
    pub id_usuario: Uuid,
    pub total_seguidores: i64,
    pub total_siguiendo: i64,
}
