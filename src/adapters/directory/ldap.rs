//! LDAP / Active Directory implementation of [`DirectoryQuery`]
//!
//! One paged subtree search runs per scope, each in its own task on a shared
//! connection. The connection driver is a spawned task too; both the search
//! tasks and the driver are joined or aborted before [`LdapDirectory::query`]
//! returns.

use super::traits::DirectoryQuery;
use crate::config::{DirectoryConfig, SecretString};
use crate::core::filter::cutoff;
use crate::domain::{AccountRecord, DirectoryError, Expiration, Result, RosterError, Scope};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use ldap3::adapters::{Adapter, EntriesOnly, PagedResults};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, SearchEntry};
use secrecy::ExposeSecret;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinSet;

/// Attributes requested for every user entry
const USER_ATTRIBUTES: [&str; 21] = [
    "distinguishedName",
    "displayName",
    "sAMAccountName",
    "title",
    "department",
    "company",
    "physicalDeliveryOfficeName",
    "manager",
    "employeeType",
    "co",
    "description",
    "employeeID",
    "telephoneNumber",
    "mobile",
    "ipPhone",
    "homePhone",
    "facsimileTelephoneNumber",
    "pager",
    "whenCreated",
    "accountExpires",
    "userAccountControl",
];

/// Seconds between 1601-01-01 (Windows FILETIME epoch) and 1970-01-01
const FILETIME_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;
const FILETIME_TICKS_PER_SEC: i64 = 10_000_000;
const UAC_ACCOUNT_DISABLED: u32 = 0x2;

/// Entries per page; Active Directory refuses pages above its MaxPageSize (1000)
const PAGE_SIZE: i32 = 500;

/// LDAP directory client
pub struct LdapDirectory {
    url: String,
    bind_dn: Option<String>,
    bind_password: Option<SecretString>,
    timeout: Duration,
}

impl LdapDirectory {
    /// Create a client from configuration
    ///
    /// No connection is opened until [`DirectoryQuery::query`] runs.
    pub fn new(config: &DirectoryConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RosterError::Configuration("directory.url is required".to_string()))?;

        Ok(Self {
            url,
            bind_dn: config.bind_dn.clone(),
            bind_password: config.bind_password.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    async fn bind(&self, ldap: &mut Ldap) -> Result<()> {
        let (Some(dn), Some(password)) = (&self.bind_dn, &self.bind_password) else {
            tracing::debug!("No bind credentials configured, using anonymous bind");
            return Ok(());
        };

        ldap.with_timeout(self.timeout)
            .simple_bind(dn, password.expose_secret().as_ref())
            .await
            .and_then(|res| res.success())
            .map_err(|e| DirectoryError::BindFailed(e.to_string()))?;

        tracing::debug!(bind_dn = %dn, "Bound to directory");
        Ok(())
    }
}

#[async_trait]
impl DirectoryQuery for LdapDirectory {
    async fn query(&self, scopes: &[Scope], since_days: u32) -> Result<Vec<AccountRecord>> {
        let filter = search_filter(cutoff(Utc::now(), since_days));
        tracing::info!(
            url = %self.url,
            scopes = scopes.len(),
            since_days,
            "Querying directory"
        );

        let settings = LdapConnSettings::new().set_conn_timeout(self.timeout);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.url)
            .await
            .map_err(|e| DirectoryError::ConnectionFailed(e.to_string()))?;

        let driver = tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                tracing::warn!(error = %e, "LDAP connection closed with error");
            }
        });

        let result = match self.bind(&mut ldap).await {
            Ok(()) => {
                let timeout = self.timeout;
                fan_out(scopes, |scope| {
                    let mut handle = ldap.clone();
                    let filter = filter.clone();
                    async move { search_scope(&mut handle, &scope, &filter, timeout).await }
                })
                .await
                .map_err(RosterError::from)
            }
            Err(e) => Err(e),
        };

        if let Err(e) = ldap.unbind().await {
            tracing::debug!(error = %e, "Unbind failed");
        }
        driver.abort();
        let _ = driver.await;

        if let Ok(records) = &result {
            tracing::info!(count = records.len(), "Directory query completed");
        }
        result
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Runs one search per scope and merges the results in scope order
///
/// Records found under several scopes are kept once, by distinguished name.
/// On the first failure the remaining searches are cancelled and awaited
/// before the error is returned.
async fn fan_out<F, Fut>(
    scopes: &[Scope],
    search: F,
) -> std::result::Result<Vec<AccountRecord>, DirectoryError>
where
    F: Fn(Scope) -> Fut,
    Fut: Future<Output = std::result::Result<Vec<AccountRecord>, DirectoryError>>
        + Send
        + 'static,
{
    let mut tasks = JoinSet::new();
    for (position, scope) in scopes.iter().enumerate() {
        let found = search(scope.clone());
        tasks.spawn(async move { (position, found.await) });
    }

    let mut per_scope: Vec<Option<Vec<AccountRecord>>> = vec![None; scopes.len()];
    while let Some(joined) = tasks.join_next().await {
        let failure = match joined {
            Ok((position, Ok(records))) => {
                per_scope[position] = Some(records);
                continue;
            }
            Ok((_, Err(e))) => e,
            Err(join_error) => DirectoryError::TaskAborted(join_error.to_string()),
        };
        tasks.shutdown().await;
        return Err(failure);
    }

    let mut seen = HashSet::new();
    Ok(per_scope
        .into_iter()
        .flatten()
        .flatten()
        .filter(|r| seen.insert(r.distinguished_name.to_lowercase()))
        .collect())
}

async fn search_scope(
    ldap: &mut Ldap,
    scope: &Scope,
    filter: &str,
    timeout: Duration,
) -> std::result::Result<Vec<AccountRecord>, DirectoryError> {
    let search_failed = |e: LdapError| DirectoryError::SearchFailed {
        scope: scope.to_string(),
        message: e.to_string(),
    };

    let adapters: Vec<Box<dyn Adapter<_, _>>> = vec![
        Box::new(EntriesOnly::new()),
        Box::new(PagedResults::new(PAGE_SIZE)),
    ];
    let mut stream = ldap
        .with_timeout(timeout)
        .streaming_search_with(
            adapters,
            scope.as_str(),
            ldap3::Scope::Subtree,
            filter,
            USER_ATTRIBUTES.to_vec(),
        )
        .await
        .map_err(search_failed)?;

    let mut records = Vec::new();
    while let Some(raw) = stream.next().await.map_err(search_failed)? {
        let entry = SearchEntry::construct(raw);
        records.push(record_from_attrs(&entry.dn, &entry.attrs)?);
    }
    stream.finish().await.success().map_err(search_failed)?;

    tracing::debug!(scope = %scope, entries = records.len(), "Scope searched");
    Ok(records)
}

/// LDAP filter for user objects created at or after `since`
pub fn search_filter(since: DateTime<Utc>) -> String {
    format!(
        "(&(objectCategory=person)(objectClass=user)(whenCreated>={}))",
        since.format("%Y%m%d%H%M%S.0Z")
    )
}

fn first<'a>(attrs: &'a HashMap<String, Vec<String>>, name: &str) -> &'a str {
    attrs
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map_or("", |v| v.trim())
}

/// Decodes a directory entry into an [`AccountRecord`]
pub fn record_from_attrs(
    dn: &str,
    attrs: &HashMap<String, Vec<String>>,
) -> std::result::Result<AccountRecord, DirectoryError> {
    let invalid = |message: String| DirectoryError::InvalidEntry {
        dn: dn.to_string(),
        message,
    };

    let created = parse_generalized_time(first(attrs, "whenCreated"))
        .ok_or_else(|| invalid(format!("whenCreated '{}'", first(attrs, "whenCreated"))))?;
    let expiration = parse_account_expires(first(attrs, "accountExpires"))
        .ok_or_else(|| invalid(format!("accountExpires '{}'", first(attrs, "accountExpires"))))?;
    let enabled = match first(attrs, "userAccountControl") {
        "" => true,
        raw => {
            let flags: u32 = raw
                .parse()
                .map_err(|_| invalid(format!("userAccountControl '{raw}'")))?;
            flags & UAC_ACCOUNT_DISABLED == 0
        }
    };

    let distinguished_name = match first(attrs, "distinguishedName") {
        "" => dn.to_string(),
        value => value.to_string(),
    };

    Ok(AccountRecord {
        distinguished_name,
        display_name: first(attrs, "displayName").to_string(),
        logon_name: first(attrs, "sAMAccountName").to_string(),
        title: first(attrs, "title").to_string(),
        department: first(attrs, "department").to_string(),
        company: first(attrs, "company").to_string(),
        office: first(attrs, "physicalDeliveryOfficeName").to_string(),
        manager: common_name(first(attrs, "manager")),
        account_type: first(attrs, "employeeType").to_string(),
        country: first(attrs, "co").to_string(),
        description: first(attrs, "description").to_string(),
        employee_id: first(attrs, "employeeID").to_string(),
        office_phone: first(attrs, "telephoneNumber").to_string(),
        mobile_phone: first(attrs, "mobile").to_string(),
        ip_phone: first(attrs, "ipPhone").to_string(),
        home_phone: first(attrs, "homePhone").to_string(),
        fax: first(attrs, "facsimileTelephoneNumber").to_string(),
        pager: first(attrs, "pager").to_string(),
        created,
        expiration,
        enabled,
    })
}

/// Parses LDAP generalized time (`20261015093000.0Z`)
fn parse_generalized_time(raw: &str) -> Option<DateTime<Utc>> {
    let digits = raw.get(..14)?;
    let naive = NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Parses `accountExpires` (100ns ticks since 1601); 0 and `i64::MAX` mean never
fn parse_account_expires(raw: &str) -> Option<Expiration> {
    if raw.is_empty() {
        return Some(Expiration::Never);
    }
    let ticks: i64 = raw.parse().ok()?;
    if ticks <= 0 || ticks == i64::MAX {
        return Some(Expiration::Never);
    }
    let secs = ticks / FILETIME_TICKS_PER_SEC - FILETIME_EPOCH_OFFSET_SECS;
    let moment = Utc.timestamp_opt(secs, 0).single()?;
    Some(Expiration::On(moment.date_naive()))
}

/// Extracts the first RDN value of a DN: `CN=Doe\, John,OU=Users` → `Doe, John`
fn common_name(dn: &str) -> String {
    let Some((_, rest)) = dn.split_once('=') else {
        return dn.to_string();
    };

    let mut out = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            ',' => break,
            other => out.push(other),
        }
    }
    out
}
