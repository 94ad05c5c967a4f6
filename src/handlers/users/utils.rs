use std::collections::HashSet;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::Backend;
use crate::middleware::session::CurrentUser;
use crate::models::ContadoresPerfil;

/// Follower/following totals from the precomputed aggregate view; a
/// missing row means zero everywhere
pub async fn fetch_counters(backend: &Backend, user: &CurrentUser, subject: Uuid) -> (i64, i64) {
    let counters: Result<Option<ContadoresPerfil>, _> = backend
        .table("vista_contadores_perfil")
        .auth(&user.access_token)
        .select("id_usuario,total_seguidores,total_siguiendo")
        .eq("id_usuario", subject)
        .fetch_optional()
        .await;

    match counters {
        Ok(Some(row)) => (row.total_seguidores, row.total_siguiendo),
        Ok(None) => (0, 0),
        Err(e) => {
            tracing::warn!("Could not read profile counters for {}: {}", subject, e);
            (0, 0)
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct FollowedRow {
    id_seguido: Uuid,
}

/// Ids of everyone `follower` follows, for follow-status annotation
pub async fn following_ids(
    backend: &Backend,
    access_token: &str,
    follower: Uuid,
) -> Result<HashSet<Uuid>, BackendError> {
    let mut table = backend.table("seguidores").select("id_seguido").eq("id_seguidor", follower);
    if !access_token.is_empty() {
        table = table.auth(access_token);
    }
    let rows: Vec<FollowedRow> = table.fetch().await?;

    Ok(rows.into_iter().map(|r| r.id_seguido).collect())
}
