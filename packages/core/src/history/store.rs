//! Persistent connection history
//!
//! Every mutation is written straight through to the JSON document. There
//! is no locking between processes; the last writer wins.

use std::cmp::Ordering;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::HistoryError;
use super::manual::{self, ManualConnection};
use super::migrate::{MigrationOutcome, migrate_legacy_file};
use super::schema::{ConnectionHistory, ConnectionInfo, ForwardType, PortForwardConfig};
use crate::config::paths::{get_history_path, get_legacy_history_path};
use crate::host::HostRecord;

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Connection history backed by a JSON file
pub struct HistoryStore {
    path: PathBuf,
    history: ConnectionHistory,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("path", &self.path)
            .field("connections", &self.history.connections.len())
            .finish()
    }
}

impl HistoryStore {
    /// Open the history at its default location
    ///
    /// Migrates the legacy `~/.ssh` history file on first use.
    pub fn open() -> Result<Self, HistoryError> {
        let path = get_history_path().ok_or(HistoryError::InvalidPath)?;
        let legacy = get_legacy_history_path();
        Self::open_at(path, legacy.as_deref())
    }

    /// Open the history at an explicit path
    pub fn open_at(
        path: impl Into<PathBuf>,
        legacy_path: Option<&Path>,
    ) -> Result<Self, HistoryError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            ensure_private_dir(dir).map_err(|e| {
                HistoryError::LoadFailed(format!(
                    "Failed to create directory {}: {e}",
                    dir.display()
                ))
            })?;
        }

        if let Some(legacy) = legacy_path {
            match migrate_legacy_file(&path, legacy) {
                Ok(MigrationOutcome::Migrated) => {}
                Ok(outcome) => tracing::debug!("History migration: {:?}", outcome),
                Err(e) => tracing::warn!(
                    "Failed to migrate history from {}: {}",
                    legacy.display(),
                    e
                ),
            }
        }

        let history = load_history(&path)?;
        Ok(Self {
            path,
            history,
            clock: Box::new(SystemClock),
        })
    }

    /// Use a different time source
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a connection to a host name or manual identifier
    pub fn record_connection(&mut self, identifier: &str) -> Result<(), HistoryError> {
        self.touch(identifier);
        self.save()
    }

    /// Record a manual connection, returning its identifier
    pub fn record_manual_connection(
        &mut self,
        conn: &ManualConnection,
    ) -> Result<String, HistoryError> {
        let identifier = manual::encode(conn);
        self.record_connection(&identifier)?;
        Ok(identifier)
    }

    /// Record a connection along with the port forwarding it used
    pub fn record_port_forwarding(
        &mut self,
        identifier: &str,
        forward_type: &str,
        local_port: &str,
        remote_host: &str,
        remote_port: &str,
        bind_address: &str,
    ) -> Result<(), HistoryError> {
        let forwarding = PortForwardConfig {
            forward_type: forward_type.parse()?,
            local_port: local_port.to_string(),
            remote_host: remote_host.to_string(),
            remote_port: remote_port.to_string(),
            bind_address: bind_address.to_string(),
        };
        validate_forwarding(&forwarding)?;

        self.touch(identifier).port_forwarding = Some(forwarding);
        self.save()
    }

    /// Time of the last connection, if any
    pub fn last_connect(&self, identifier: &str) -> Option<DateTime<Utc>> {
        self.history
            .connections
            .get(identifier)
            .map(|info| info.last_connect)
    }

    /// Number of recorded connections (0 when unknown)
    pub fn connect_count(&self, identifier: &str) -> u32 {
        self.history
            .connections
            .get(identifier)
            .map_or(0, |info| info.connect_count)
    }

    /// Last port forwarding used with an identifier
    pub fn port_forwarding_for(&self, identifier: &str) -> Option<&PortForwardConfig> {
        self.history
            .connections
            .get(identifier)
            .and_then(|info| info.port_forwarding.as_ref())
    }

    /// Hosts ordered most recently used first
    ///
    /// Hosts never connected to come last, by name.
    pub fn sort_by_recency(&self, hosts: &[HostRecord]) -> Vec<HostRecord> {
        let mut sorted = hosts.to_vec();
        sorted.sort_by(|a, b| self.recency_order(&a.name, &b.name));
        sorted
    }

    /// Hosts ordered by connection count, then recency, then name
    pub fn sort_by_frequency(&self, hosts: &[HostRecord]) -> Vec<HostRecord> {
        let mut sorted = hosts.to_vec();
        sorted.sort_by(|a, b| {
            self.connect_count(&b.name)
                .cmp(&self.connect_count(&a.name))
                .then_with(|| self.recency_order(&a.name, &b.name))
        });
        sorted
    }

    fn recency_order(&self, a: &str, b: &str) -> Ordering {
        match (self.last_connect(a), self.last_connect(b)) {
            (Some(ta), Some(tb)) => tb.cmp(&ta).then_with(|| a.cmp(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }

    /// Drop entries for hosts no longer in the config
    ///
    /// Manual connections are always kept. Returns how many were removed.
    pub fn prune(&mut self, current_hosts: &[HostRecord]) -> Result<usize, HistoryError> {
        let before = self.history.connections.len();
        self.history.connections.retain(|identifier, _| {
            manual::is_manual(identifier) || current_hosts.iter().any(|h| &h.name == identifier)
        });
        let removed = before - self.history.connections.len();

        if removed > 0 {
            tracing::info!("Pruned {} stale history entries", removed);
        }
        self.save()?;
        Ok(removed)
    }

    /// All entries, most recent first
    pub fn all_connections(&self) -> Vec<&ConnectionInfo> {
        let mut all: Vec<&ConnectionInfo> = self.history.connections.values().collect();
        all.sort_by(|a, b| {
            b.last_connect
                .cmp(&a.last_connect)
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        all
    }

    /// Forget a single entry
    pub fn remove_connection(&mut self, identifier: &str) -> Result<(), HistoryError> {
        if self.history.connections.remove(identifier).is_none() {
            return Err(HistoryError::NotFound(identifier.to_string()));
        }
        self.save()
    }

    /// Entries whose identifier, user or hostname contains `term`
    ///
    /// Matching ignores case. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&ConnectionInfo> {
        let term = term.trim().to_lowercase();
        self.all_connections()
            .into_iter()
            .filter(|info| {
                if term.is_empty() || info.identifier.to_lowercase().contains(&term) {
                    return true;
                }
                manual::decode(&info.identifier).is_some_and(|d| {
                    d.user.to_lowercase().contains(&term)
                        || d.hostname.to_lowercase().contains(&term)
                })
            })
            .collect()
    }

    /// `ssh` arguments to reconnect to a recorded identifier
    ///
    /// `None` if the identifier has no history or cannot be decoded.
    pub fn ssh_args_for(
        &self,
        identifier: &str,
        config_file: Option<&Path>,
    ) -> Option<Vec<String>> {
        if !self.history.connections.contains_key(identifier) {
            return None;
        }
        manual::reconnect_args(identifier, config_file)
    }

    fn touch(&mut self, identifier: &str) -> &mut ConnectionInfo {
        let now = self.clock.now();
        let info = self
            .history
            .connections
            .entry(identifier.to_string())
            .and_modify(|info| {
                info.connect_count += 1;
                info.last_connect = now;
            })
            .or_insert_with(|| ConnectionInfo {
                identifier: identifier.to_string(),
                last_connect: now,
                connect_count: 1,
                port_forwarding: None,
            });
        tracing::debug!(
            "Recorded connection to {} (count {})",
            identifier,
            info.connect_count
        );
        info
    }

    fn save(&self) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(&self.history)
            .map_err(|e| HistoryError::SaveFailed(format!("Failed to serialize: {e}")))?;

        write_private_file(&self.path, json.as_bytes()).map_err(|e| {
            HistoryError::SaveFailed(format!(
                "Failed to write {}: {e}",
                self.path.display()
            ))
        })?;

        tracing::debug!("Saved history to: {}", self.path.display());
        Ok(())
    }
}

fn validate_forwarding(forwarding: &PortForwardConfig) -> Result<(), HistoryError> {
    check_port("local port", &forwarding.local_port)?;
    if forwarding.forward_type != ForwardType::Dynamic {
        if forwarding.remote_host.trim().is_empty() {
            return Err(HistoryError::Validation(format!(
                "{} forwarding requires a remote host",
                forwarding.forward_type
            )));
        }
        check_port("remote port", &forwarding.remote_port)?;
    }
    Ok(())
}

fn check_port(label: &str, value: &str) -> Result<(), HistoryError> {
    match value.parse::<u16>() {
        Ok(port) if port != 0 => Ok(()),
        _ => Err(HistoryError::Validation(format!(
            "{label} must be a number between 1 and 65535, got '{value}'"
        ))),
    }
}

fn load_history(path: &Path) -> Result<ConnectionHistory, HistoryError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No history file at {}, starting empty", path.display());
            return Ok(ConnectionHistory::default());
        }
        Err(e) => {
            return Err(HistoryError::LoadFailed(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    if contents.trim().is_empty() {
        return Ok(ConnectionHistory::default());
    }

    let history: ConnectionHistory = serde_json::from_str(&contents).map_err(|e| {
        HistoryError::LoadFailed(format!("Invalid JSON in {}: {e}", path.display()))
    })?;

    tracing::debug!(
        "Loaded {} history entries from {}",
        history.connections.len(),
        path.display()
    );
    Ok(history)
}

/// Write `contents` to `path` readable by the owner only
pub(super) fn write_private_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;

    // The open mode only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

fn ensure_private_dir(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Store with a settable clock
    fn store_in(temp_dir: &TempDir) -> (HistoryStore, Rc<Cell<DateTime<Utc>>>) {
        let now = Rc::new(Cell::new(t0()));
        let clock = Rc::clone(&now);
        let store = HistoryStore::open_at(temp_dir.path().join("history.json"), None)
            .unwrap()
            .with_clock(move || clock.get());
        (store, now)
    }

    fn hosts(names: &[&str]) -> Vec<HostRecord> {
        names
            .iter()
            .map(|n| HostRecord::new(*n).with_hostname("example.com"))
            .collect()
    }

    fn names(records: &[HostRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_record_connection_twice() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, now) = store_in(&temp_dir);

        store.record_connection("web").unwrap();
        now.set(t0() + Duration::minutes(5));
        store.record_connection("web").unwrap();

        assert_eq!(store.connect_count("web"), 2);
        assert_eq!(store.last_connect("web"), Some(t0() + Duration::minutes(5)));
        assert_eq!(store.connect_count("db"), 0);
        assert_eq!(store.last_connect("db"), None);
    }

    #[test]
    fn test_history_persists_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);
        store.record_connection("web").unwrap();
        store
            .record_manual_connection(&ManualConnection::new("10.0.0.1").with_user("root"))
            .unwrap();

        let reopened = HistoryStore::open_at(temp_dir.path().join("history.json"), None).unwrap();
        assert_eq!(reopened.connect_count("web"), 1);
        assert_eq!(reopened.connect_count("manual:root@10.0.0.1:22"), 1);
        assert_eq!(reopened.last_connect("web"), Some(t0()));
    }

    #[cfg(unix)]
    #[test]
    fn test_history_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("history.json");
        let mut store = HistoryStore::open_at(&path, None).unwrap();
        store.record_connection("web").unwrap();

        let file_mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, 0o600);
        let dir_mode = fs::metadata(path.parent().unwrap()).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history.json");
        fs::write(&path, "{not json").unwrap();

        let result = HistoryStore::open_at(&path, None);
        assert!(matches!(result, Err(HistoryError::LoadFailed(_))));
    }

    #[test]
    fn test_open_migrates_legacy_file() {
        let temp_dir = TempDir::new().unwrap();
        let legacy = temp_dir.path().join("sshmark_history.json");
        fs::write(
            &legacy,
            r#"{"connections":{"web":{"host_name":"web",
                "last_connect":"2024-06-01T12:00:00Z","connect_count":7}}}"#,
        )
        .unwrap();

        let store =
            HistoryStore::open_at(temp_dir.path().join("history.json"), Some(&legacy)).unwrap();

        assert_eq!(store.connect_count("web"), 7);
        assert!(!legacy.exists());
    }

    #[test]
    fn test_sort_by_recency() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, now) = store_in(&temp_dir);

        now.set(t0() - Duration::hours(1));
        store.record_connection("B").unwrap();
        now.set(t0());
        store.record_connection("A").unwrap();

        let input = hosts(&["C", "B", "A"]);
        let sorted = store.sort_by_recency(&input);

        assert_eq!(names(&sorted), vec!["A", "B", "C"]);
        // Input untouched
        assert_eq!(names(&input), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_sort_by_recency_ties_break_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);
        store.record_connection("zeta").unwrap();
        store.record_connection("alpha").unwrap();

        let sorted = store.sort_by_recency(&hosts(&["zeta", "never2", "alpha", "never1"]));
        assert_eq!(names(&sorted), vec!["alpha", "zeta", "never1", "never2"]);
    }

    #[test]
    fn test_sort_by_frequency() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, now) = store_in(&temp_dir);

        now.set(t0() - Duration::hours(1));
        for _ in 0..5 {
            store.record_connection("B").unwrap();
        }
        for _ in 0..2 {
            store.record_connection("C").unwrap();
        }
        now.set(t0());
        for _ in 0..5 {
            store.record_connection("A").unwrap();
        }

        let sorted = store.sort_by_frequency(&hosts(&["C", "B", "A"]));
        assert_eq!(names(&sorted), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_prune_keeps_manual_connections() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);
        store.record_connection("web").unwrap();
        store.record_connection("manual:u@h:22").unwrap();

        let removed = store.prune(&[]).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.connect_count("web"), 0);
        assert_eq!(store.connect_count("manual:u@h:22"), 1);
    }

    #[test]
    fn test_prune_keeps_current_hosts() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);
        store.record_connection("web").unwrap();
        store.record_connection("old").unwrap();

        let removed = store.prune(&hosts(&["web"])).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.connect_count("web"), 1);
        assert_eq!(store.connect_count("old"), 0);
    }

    #[test]
    fn test_all_connections_order() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, now) = store_in(&temp_dir);
        store.record_connection("b").unwrap();
        store.record_connection("a").unwrap();
        now.set(t0() + Duration::seconds(1));
        store.record_connection("c").unwrap();

        let ids: Vec<&str> = store
            .all_connections()
            .iter()
            .map(|c| c.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_port_forwarding() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);

        store
            .record_port_forwarding("web", "local", "8080", "localhost", "80", "")
            .unwrap();

        let forwarding = store.port_forwarding_for("web").unwrap();
        assert_eq!(forwarding.forward_type, ForwardType::Local);
        assert_eq!(forwarding.local_port, "8080");
        assert_eq!(store.connect_count("web"), 1);

        store
            .record_port_forwarding("web", "dynamic", "1080", "", "", "")
            .unwrap();
        assert_eq!(
            store.port_forwarding_for("web").unwrap().forward_type,
            ForwardType::Dynamic
        );
        assert_eq!(store.connect_count("web"), 2);
    }

    #[test]
    fn test_port_forwarding_validation() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);

        let result = store.record_port_forwarding("web", "sideways", "8080", "h", "80", "");
        assert!(matches!(result, Err(HistoryError::Validation(_))));

        let result = store.record_port_forwarding("web", "local", "http", "h", "80", "");
        assert!(matches!(result, Err(HistoryError::Validation(_))));

        let result = store.record_port_forwarding("web", "remote", "8080", "", "80", "");
        assert!(matches!(result, Err(HistoryError::Validation(_))));

        // Rejected calls record nothing
        assert_eq!(store.connect_count("web"), 0);
    }

    #[test]
    fn test_remove_connection() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);
        store.record_connection("web").unwrap();

        store.remove_connection("web").unwrap();
        assert_eq!(store.connect_count("web"), 0);

        let result = store.remove_connection("web");
        assert!(matches!(result, Err(HistoryError::NotFound(_))));
    }

    #[test]
    fn test_search() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);
        store.record_connection("Web-Prod").unwrap();
        store.record_connection("db").unwrap();
        store.record_connection("manual:deploy@10.0.0.5:22").unwrap();

        let found: Vec<&str> = store
            .search("web")
            .iter()
            .map(|c| c.identifier.as_str())
            .collect();
        assert_eq!(found, vec!["Web-Prod"]);

        assert_eq!(store.search("DEPLOY").len(), 1);
        assert_eq!(store.search("10.0.0").len(), 1);
        assert_eq!(store.search("").len(), 3);
        assert!(store.search("nothing").is_empty());
    }

    #[test]
    fn test_ssh_args_for() {
        let temp_dir = TempDir::new().unwrap();
        let (mut store, _) = store_in(&temp_dir);
        store.record_connection("web").unwrap();
        store.record_connection("manual:root@10.0.0.1:2222").unwrap();

        assert_eq!(
            store.ssh_args_for("web", None).unwrap(),
            vec!["web".to_string()]
        );
        assert_eq!(
            store.ssh_args_for("manual:root@10.0.0.1:2222", None).unwrap(),
            vec!["-p", "2222", "root@10.0.0.1"]
        );
        assert_eq!(store.ssh_args_for("unknown", None), None);
    }
}
