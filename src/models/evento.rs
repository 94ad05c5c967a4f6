use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event listing in the `eventos` table. Read-only for this service;
/// events are managed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evento {
    pub id: Uuid,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub fecha_inicio: Option<DateTime<Utc>>,
    pub fecha_fin: Option<DateTime<Utc>>,
    pub ubicacion: Option<String>,
    pub imagen_url: Option<String>,
}

/// Favorite edge in `eventos_favoritos`, unique per (user, event). The
/// title is cached at favorite time so listings survive event edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventoFavorito {
    pub id_usuario: Uuid,
    pub id_evento: Uuid,
    pub titulo_evento: Option<String>,
    pub creado_en: Option<DateTime<Utc>>,
}
