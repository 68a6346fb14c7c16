//! Best-effort persistence of the snapshot.
//!
//! The snapshot is written as JSON under a single key into the SQLite
//! key/value table. When that fails the same payload goes into a cookie jar
//! file, provided it is small enough to fit in a cookie. Nothing here ever
//! returns an error to the caller: failures are logged and the session simply
//! keeps running without durable state.

use crate::db::Database;
use crate::models::Snapshot;
use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Key the snapshot is stored under
pub const STORAGE_KEY: &str = "comick-tierlist-data";

/// Payloads at or above this size never go into the cookie jar
pub const MAX_COOKIE_BYTES: usize = 4000;

/// Characters escaped the way `encodeURIComponent` escapes them
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A string key/value backend
pub trait KeyValueStore: Send {
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Primary store backed by the SQLite database
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.db.get_value(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db.put_value(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.db.delete_value(key)
    }
}

/// Fallback store: a file of `Set-Cookie` style lines
///
/// Values are URL-encoded, scoped `Path=/; SameSite=Strict` and expire one
/// year after they were written.
pub struct CookieJar {
    path: PathBuf,
    max_value_bytes: usize,
}

impl CookieJar {
    pub fn new(path: impl AsRef<Path>, max_value_bytes: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_value_bytes,
        }
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read cookie jar: {}", self.path.display()))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cookie jar directory: {}", parent.display()))?;
        }
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write cookie jar: {}", self.path.display()))
    }

    fn other_lines(&self, key: &str) -> Result<Vec<String>> {
        let prefix = format!("{}=", key);
        Ok(self
            .read_lines()?
            .into_iter()
            .filter(|line| !line.starts_with(&prefix))
            .collect())
    }
}

/// Format one cookie line
fn cookie_line(key: &str, value: &str, expires: NaiveDateTime) -> String {
    format!(
        "{}={}; Expires={}; Path=/; SameSite=Strict",
        key,
        utf8_percent_encode(value, COOKIE_VALUE),
        expires.format(COOKIE_DATE_FORMAT)
    )
}

/// Decode the value of a cookie line if it belongs to `key` and is not expired
fn parse_cookie_line(line: &str, key: &str, now: NaiveDateTime) -> Option<String> {
    let mut parts = line.split(';').map(str::trim);
    let (name, raw) = parts.next()?.split_once('=')?;
    if name != key {
        return None;
    }

    for attribute in parts {
        if let Some(expires) = attribute.strip_prefix("Expires=") {
            match NaiveDateTime::parse_from_str(expires, COOKIE_DATE_FORMAT) {
                Ok(at) if at <= now => {
                    debug!(key = key, "Ignoring expired cookie");
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(key = key, error = %e, "Unreadable cookie expiry");
                    return None;
                }
            }
        }
    }

    percent_decode_str(raw).decode_utf8().ok().map(|v| v.into_owned())
}

impl KeyValueStore for CookieJar {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now().naive_utc();
        Ok(self
            .read_lines()?
            .iter()
            .find_map(|line| parse_cookie_line(line, key, now)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if value.len() >= self.max_value_bytes {
            return Err(anyhow!(
                "Payload of {} bytes is too large for cookie storage (limit {})",
                value.len(),
                self.max_value_bytes
            ));
        }

        let mut lines = self.other_lines(key)?;
        let expires = Utc::now().naive_utc() + Duration::days(365);
        lines.push(cookie_line(key, value, expires));
        self.write_lines(&lines)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let lines = self.other_lines(key)?;
        self.write_lines(&lines)
    }
}

/// Where a save ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Primary,
    Fallback,
    Dropped,
}

/// Snapshot persistence over a primary store and a cookie fallback
pub struct SnapshotStore {
    key: String,
    primary: Option<Box<dyn KeyValueStore>>,
    fallback: Box<dyn KeyValueStore>,
}

impl SnapshotStore {
    pub fn new(
        key: impl Into<String>,
        primary: Option<Box<dyn KeyValueStore>>,
        fallback: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            key: key.into(),
            primary,
            fallback,
        }
    }

    /// Open the SQLite store and cookie jar at the given paths
    ///
    /// A database that cannot be opened is logged and skipped; the store then
    /// works from the cookie jar alone.
    pub fn open(
        key: impl Into<String>,
        database: impl AsRef<Path>,
        cookie_jar: impl AsRef<Path>,
        max_cookie_bytes: usize,
    ) -> Self {
        let database = database.as_ref();
        let primary: Option<Box<dyn KeyValueStore>> = match SqliteStore::open(database) {
            Ok(store) => Some(Box::new(store)),
            Err(e) => {
                warn!(path = %database.display(), error = %e, "Primary storage unavailable, using cookie fallback only");
                None
            }
        };

        Self::new(key, primary, Box::new(CookieJar::new(cookie_jar, max_cookie_bytes)))
    }

    /// Persist the snapshot; never fails
    pub fn save(&mut self, snapshot: &Snapshot) -> SaveOutcome {
        let payload = match serde_json::to_string(snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to serialize tier list data");
                return SaveOutcome::Dropped;
            }
        };

        if let Some(primary) = self.primary.as_mut() {
            match primary.set(&self.key, &payload) {
                Ok(()) => {
                    debug!(store = primary.name(), bytes = payload.len(), "Saved tier list data");
                    // An older fallback copy must not outlive this one
                    if let Err(e) = self.fallback.remove(&self.key) {
                        warn!(store = self.fallback.name(), error = %e, "Failed to drop stale fallback copy");
                    }
                    return SaveOutcome::Primary;
                }
                Err(e) => {
                    warn!(store = primary.name(), error = %e, "Primary save failed, trying fallback");
                }
            }
        }

        match self.fallback.set(&self.key, &payload) {
            Ok(()) => {
                debug!(store = self.fallback.name(), bytes = payload.len(), "Saved tier list data");
                if let Some(primary) = self.primary.as_mut() {
                    if let Err(e) = primary.remove(&self.key) {
                        warn!(store = primary.name(), error = %e, "Failed to drop stale primary copy");
                    }
                }
                SaveOutcome::Fallback
            }
            Err(e) => {
                error!(
                    store = self.fallback.name(),
                    bytes = payload.len(),
                    error = %e,
                    "Failed to save tier list data, keeping it for this session only"
                );
                SaveOutcome::Dropped
            }
        }
    }

    /// Load the last saved snapshot, if any is readable
    pub fn load(&self) -> Option<Snapshot> {
        let stores = self
            .primary
            .iter()
            .map(|s| &**s)
            .chain(std::iter::once(&*self.fallback));

        for store in stores {
            let payload = match store.get(&self.key) {
                Ok(Some(payload)) => payload,
                Ok(None) => continue,
                Err(e) => {
                    warn!(store = store.name(), error = %e, "Failed to read tier list data");
                    continue;
                }
            };

            match serde_json::from_str::<Snapshot>(&payload) {
                Ok(snapshot) => {
                    info!(store = store.name(), items = snapshot.all_items.len(), "Loaded tier list data");
                    return Some(snapshot);
                }
                Err(e) => {
                    warn!(store = store.name(), error = %e, "Stored tier list data is unreadable");
                }
            }
        }

        None
    }

    /// Remove the snapshot from every store
    pub fn clear(&mut self) {
        let key = self.key.clone();
        let stores = self
            .primary
            .iter_mut()
            .map(|s| &mut **s)
            .chain(std::iter::once(&mut *self.fallback));

        for store in stores {
            if let Err(e) = store.remove(&key) {
                error!(store = store.name(), error = %e, "Failed to clear tier list data");
            }
        }
        info!("Cleared stored tier list data");
    }
}
