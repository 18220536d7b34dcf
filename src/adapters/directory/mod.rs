//! Directory access
//!
//! [`DirectoryQuery`] is implemented by [`LdapDirectory`] for Active Directory
//! and by [`JsonDirectory`] for snapshot files.

pub mod factory;
pub mod json;
pub mod ldap;
pub mod traits;

pub use factory::create_directory;
pub use json::JsonDirectory;
pub use ldap::LdapDirectory;
pub use traits::DirectoryQuery;
