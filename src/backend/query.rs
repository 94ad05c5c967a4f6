use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::BackendError;
use super::Backend;

/// Builder over the backend's relational query interface. One instance
/// targets one table, view, or server-side function; chained setters
/// accumulate the request and the terminal methods perform it.
///
/// The service speaks a query-string dialect: `select=` for projection,
/// `{column}=eq.{value}` / `{column}=in.({values})` for filters,
/// `order={column}.{direction}` and `limit={n}` for shaping.
pub struct Table<'a> {
    backend: &'a Backend,
    name: String,
    is_rpc: bool,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<i32>,
    access_token: Option<String>,
}

impl<'a> Table<'a> {
    pub(crate) fn new(backend: &'a Backend, name: impl Into<String>) -> Self {
        Self {
            backend,
            name: name.into(),
            is_rpc: false,
            select: None,
            filters: vec![],
            order: None,
            limit: None,
            access_token: None,
        }
    }

    pub(crate) fn rpc(backend: &'a Backend, function: impl Into<String>) -> Self {
        let mut table = Self::new(backend, function);
        table.is_rpc = true;
        table
    }

    /// Act under a user's session so the service's row-level policies
    /// see the caller, not the anonymous role
    pub fn auth(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn in_list<V: ToString>(mut self, column: impl Into<String>, values: &[V]) -> Self {
        let joined = values.iter().map(|v| quote_list_value(&v.to_string())).collect::<Vec<_>>().join(",");
        self.filters.push((column.into(), format!("in.({})", joined)));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{}.{}", column.into(), direction));
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Fetch all matching rows
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        let response = self.request(reqwest::Method::GET)?.send().await?;
        let response = Backend::check_status(response).await?;
        response.json().await.map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Fetch at most one row
    pub async fn fetch_optional<T: DeserializeOwned>(mut self) -> Result<Option<T>, BackendError> {
        self.limit = Some(1);
        let mut rows: Vec<T> = self.fetch().await?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    /// Fetch exactly one row, erroring when it is absent
    pub async fn single<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        self.fetch_optional()
            .await?
            .ok_or(BackendError::Status { status: 404, message: "Row not found".to_string() })
    }

    /// True when at least one matching row exists
    pub async fn exists(self) -> Result<bool, BackendError> {
        let row: Option<serde_json::Value> = self.fetch_optional().await?;
        Ok(row.is_some())
    }

    /// Insert one or more rows
    pub async fn insert(self, body: &impl Serialize) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::POST)?
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        Backend::check_status(response).await?;
        Ok(())
    }

    /// Update the rows selected by the accumulated filters
    pub async fn update(self, body: &impl Serialize) -> Result<(), BackendError> {
        let response = self
            .request(reqwest::Method::PATCH)?
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;
        Backend::check_status(response).await?;
        Ok(())
    }

    /// Delete the rows selected by the accumulated filters
    pub async fn delete(self) -> Result<(), BackendError> {
        let response = self.request(reqwest::Method::DELETE)?.send().await?;
        Backend::check_status(response).await?;
        Ok(())
    }

    /// Call a server-side function with JSON arguments
    pub async fn call<T: DeserializeOwned>(self, args: &impl Serialize) -> Result<T, BackendError> {
        let response = self.request(reqwest::Method::POST)?.json(args).send().await?;
        let response = Backend::check_status(response).await?;
        response.json().await.map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn request(&self, method: reqwest::Method) -> Result<reqwest::RequestBuilder, BackendError> {
        validate_identifier(&self.name)?;
        let path = if self.is_rpc { format!("rpc/{}", self.name) } else { self.name.clone() };
        let url = format!("{}/rest/v1/{}", self.backend.base_url(), path);

        let token = self.access_token.as_deref().unwrap_or(self.backend.anon_key());
        Ok(self
            .backend
            .http()
            .request(method, url)
            .header("apikey", self.backend.anon_key())
            .bearer_auth(token)
            .query(&self.params()))
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![];
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// Table and function names come from code, never from request input,
/// but validate anyway so a bad name fails loudly instead of producing a
/// malformed request path
fn validate_identifier(name: &str) -> Result<(), BackendError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(BackendError::InvalidUrl(format!("invalid identifier: {}", name)))
    }
}

/// Values inside an `in.(...)` list need quoting when they contain the
/// list's own delimiters
fn quote_list_value(value: &str) -> String {
    if value.contains([',', '(', ')', '"']) {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;

    fn backend() -> Backend {
        Backend::new("http://localhost:54321", "anon", 5)
    }

    #[test]
    fn builds_filter_params_in_order() {
        let backend = backend();
        let table = backend
            .table("perfil")
            .select("id,username")
            .eq("username", "maria")
            .order("created_at", false)
            .limit(5);

        assert_eq!(
            table.params(),
            vec![
                ("select".to_string(), "id,username".to_string()),
                ("username".to_string(), "eq.maria".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn builds_in_list_filter() {
        let backend = backend();
        let table = backend.table("perfil").in_list("id", &["a", "b,c"]);
        assert_eq!(table.params(), vec![("id".to_string(), "in.(a,\"b,c\")".to_string())]);
    }

    #[test]
    fn rejects_invalid_identifiers() {
        assert!(validate_identifier("perfil").is_ok());
        assert!(validate_identifier("vista_contadores_perfil").is_ok());
        assert!(validate_identifier("1perfil").is_err());
        assert!(validate_identifier("perfil; drop").is_err());
        assert!(validate_identifier("").is_err());
    }
}
