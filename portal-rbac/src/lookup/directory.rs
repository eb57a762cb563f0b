//! Role directories stored as TOML or JSON files
//!
//! ```toml
//! [[users]]
//! email = "ana@corp.com"
//! role_name = "Finance Manager"
//! division_name = "Finance"
//!
//! [users.permissions]
//! Payments = ["read", "approve"]
//! ```

use super::MemoryRoleDirectory;
use crate::rbac::RoleRecord;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk shape of a role directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryFile {
    #[serde(default)]
    pub users: Vec<RoleRecord>,
}

impl DirectoryFile {
    /// Parse TOML directory content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML role directory")
    }

    /// Parse JSON directory content: either `{ "users": [...] }` or a bare array
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).context("Failed to parse JSON role directory")?;

        if value.is_array() {
            let users = serde_json::from_value(value).context("Invalid role records")?;
            return Ok(Self { users });
        }

        serde_json::from_value(value).context("Invalid role directory")
    }

    /// Reject duplicate principals and empty role names
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for user in &self.users {
            let email = crate::rbac::normalize_email(&user.email);
            if email.is_empty() {
                bail!("Role directory entry with empty email");
            }
            if user.role_name.trim().is_empty() {
                bail!("Role directory entry for {} has an empty role name", email);
            }
            if !seen.insert(email.clone()) {
                bail!("Duplicate role directory entry for {}", email);
            }
        }
        Ok(())
    }

    pub fn into_directory(self) -> MemoryRoleDirectory {
        MemoryRoleDirectory::from_records(self.users)
    }
}

/// Load a role directory file; the extension picks the format (`.json`, else TOML)
pub fn load_directory(path: impl AsRef<Path>) -> Result<MemoryRoleDirectory> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read role directory: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let file = if is_json {
        DirectoryFile::from_json_str(&content)
    } else {
        DirectoryFile::from_toml_str(&content)
    }
    .with_context(|| format!("Failed to load role directory: {}", path.display()))?;

    file.validate()
        .with_context(|| format!("Invalid role directory: {}", path.display()))?;

    log::info!("📇 Loaded {} role records from {}", file.users.len(), path.display());
    Ok(file.into_directory())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML_DIRECTORY: &str = r#"
[[users]]
email = "Ana@Corp.com"
role_name = "Finance Manager"
division_name = "Finance"

[users.permissions]
Payments = ["read", "approve"]

[[users]]
email = "root@corp.com"
role_name = "IT"
is_admin = true
"#;

    #[test]
    fn test_load_toml_directory() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(TOML_DIRECTORY.as_bytes()).unwrap();

        let directory = load_directory(file.path()).unwrap();
        assert_eq!(directory.len(), 2);

        let ana = directory.get("ana@corp.com").unwrap();
        assert_eq!(ana.role_name, "Finance Manager");
        assert!(ana.permissions.grants("Payments", "approve"));
        assert!(directory.get("root@corp.com").unwrap().is_admin);
    }

    #[test]
    fn test_load_json_array_directory() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(
            br#"[{"email":"bo@corp.com","roleName":"Employee","permissions":{"Forms":["read"]}}]"#,
        )
        .unwrap();

        let directory = load_directory(file.path()).unwrap();
        assert_eq!(directory.get("bo@corp.com").unwrap().role_name, "Employee");
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let file = DirectoryFile {
            users: vec![
                RoleRecord::new("a@corp.com", "Employee"),
                RoleRecord::new("A@corp.com", "Manager"),
            ],
        };
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_directory("/nonexistent/roles.toml").is_err());
    }
}
