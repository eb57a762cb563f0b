//! PostgREST (Supabase) role lookup
//!
//! Queries `GET {url}/rest/v1/{table}?email=ilike.{email}&select=*` with the
//! project key in both the `apikey` and bearer headers. Zero rows means the
//! principal has no role.
//!
//! `ilike` makes the match case-insensitive. Pattern characters in the
//! address are escaped; `*` has no escape in PostgREST and is sent as the
//! single-character wildcard, so returned rows are filtered on the exact
//! normalized address.

use super::RoleLookup;
use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::rbac::{normalize_email, PermissionMap, RoleRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// One row of the users table
#[derive(Debug, Clone, Deserialize)]
pub struct RoleRow {
    pub email: String,
    #[serde(alias = "role")]
    pub role_name: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub division_name: Option<String>,
    #[serde(default)]
    pub permissions: Option<PermissionMap>,
}

impl RoleRow {
    /// A row without a role name is a principal without a role
    pub fn into_record(self) -> Option<RoleRecord> {
        let role_name = self.role_name.filter(|name| !name.trim().is_empty())?;
        Some(RoleRecord {
            email: normalize_email(&self.email),
            role_name,
            is_admin: self.is_admin.unwrap_or(false),
            division_name: self.division_name,
            permissions: self.permissions.unwrap_or_default(),
        })
    }
}

/// Decode a PostgREST response body into the record for `email`, if any
pub fn decode_rows(body: &str, email: &str) -> Result<Option<RoleRecord>, LookupError> {
    let email = normalize_email(email);
    let rows: Vec<RoleRow> = serde_json::from_str(body)?;
    Ok(rows
        .into_iter()
        .find(|row| normalize_email(&row.email) == email)
        .and_then(RoleRow::into_record))
}

/// Map an HTTP status and body to a lookup result
pub fn decode_response(
    status: u16,
    body: &str,
    email: &str,
) -> Result<Option<RoleRecord>, LookupError> {
    if !(200..300).contains(&status) {
        log::warn!("Role service returned {} for {}", status, normalize_email(email));
        return Err(LookupError::Service { status, message: body.to_string() });
    }
    decode_rows(body, email)
}

/// Escape an address for a PostgREST `ilike` pattern
fn ilike_pattern(email: &str) -> String {
    let mut pattern = String::with_capacity(email.len());
    for c in email.chars() {
        match c {
            '\\' | '%' | '_' => {
                pattern.push('\\');
                pattern.push(c);
            }
            '*' => pattern.push('_'),
            c => pattern.push(c),
        }
    }
    pattern
}

/// Role lookup against a PostgREST endpoint
pub struct RestRoleLookup {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    table: String,
}

impl RestRoleLookup {
    /// Create a lookup for `base_url` / `table`
    pub fn new(
        base_url: impl Into<String>,
        table: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for role lookup")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            table: table.into(),
        })
    }

    /// Set the project API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn from_config(config: &LookupConfig) -> Result<Self> {
        let url = config
            .rest_url
            .as_deref()
            .context("lookup.rest_url is required for the rest backend")?;

        let lookup = Self::new(url, &config.table, Duration::from_secs(config.timeout_secs))?;
        Ok(match &config.api_key {
            Some(key) => lookup.with_api_key(key),
            None => lookup,
        })
    }

    /// Request URL for a principal
    pub fn query_url(&self, email: &str) -> String {
        format!(
            "{}/rest/v1/{}?email=ilike.{}&select=*",
            self.base_url,
            self.table,
            urlencoding::encode(&ilike_pattern(&normalize_email(email)))
        )
    }
}

#[async_trait::async_trait]
impl RoleLookup for RestRoleLookup {
    async fn lookup(&self, email: &str) -> Result<Option<RoleRecord>, LookupError> {
        let mut request =
            self.client.get(self.query_url(email)).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        decode_response(status, &body, email)
    }

    fn name(&self) -> &str {
        "rest"
    }
}
