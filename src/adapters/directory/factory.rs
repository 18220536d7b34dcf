//! Directory client factory

use super::json::JsonDirectory;
use super::ldap::LdapDirectory;
use super::traits::DirectoryQuery;
use crate::config::{DirectoryConfig, DirectoryKind};
use crate::domain::{Result, RosterError};
use std::sync::Arc;

/// Create a directory client based on `directory.kind`
///
/// # Errors
///
/// Returns a configuration error when the selected kind is missing its
/// required setting
pub fn create_directory(config: &DirectoryConfig) -> Result<Arc<dyn DirectoryQuery>> {
    match config.kind {
        DirectoryKind::Ldap => {
            tracing::info!("Creating LDAP directory client");
            Ok(Arc::new(LdapDirectory::new(config)?))
        }
        DirectoryKind::Json => {
            let path = config.snapshot_path.as_deref().ok_or_else(|| {
                RosterError::Configuration("directory.snapshot_path is required".to_string())
            })?;
            tracing::info!(path, "Creating snapshot directory client");
            Ok(Arc::new(JsonDirectory::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(kind: DirectoryKind) -> DirectoryConfig {
        DirectoryConfig {
            kind,
            url: None,
            bind_dn: None,
            bind_password: None,
            timeout_seconds: 30,
            snapshot_path: None,
        }
    }

    #[test]
    fn test_json_requires_snapshot_path() {
        assert!(create_directory(&config(DirectoryKind::Json)).is_err());

        let mut json = config(DirectoryKind::Json);
        json.snapshot_path = Some("accounts.json".to_string());
        let directory = create_directory(&json).unwrap();
        assert_eq!(directory.describe(), "accounts.json");
    }

    #[test]
    fn test_ldap_requires_url() {
        assert!(create_directory(&config(DirectoryKind::Ldap)).is_err());

        let mut ldap = config(DirectoryKind::Ldap);
        ldap.url = Some("ldaps://dc01.contoso.net".to_string());
        let directory = create_directory(&ldap).unwrap();
        assert_eq!(directory.describe(), "ldaps://dc01.contoso.net");
    }
}
