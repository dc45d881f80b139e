//! Session records and the key-value store they live in.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Key the session record is stored under.
pub const SESSION_KEY: &str = "geocoin:session";

/// Current session record version; older records without one are version 1.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Flat string key-value store holding the session record.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Store kept in memory, used by tests and when no browser storage exists.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

fn snapshot_version() -> u32 {
    1
}

/// Everything needed to resume a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default = "snapshot_version")]
    pub version: u32,
    pub player_position: Cell,
    pub player_coins: Vec<Coin>,
    pub cache_mementos: Vec<(String, Memento)>,
    #[serde(default)]
    pub player_path: Vec<LatLng>,
}

impl SessionSnapshot {
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| GameError::Encode(err.to_string()))
    }

    pub fn decode(raw: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(raw)
            .map_err(|err| GameError::MalformedSnapshot(err.to_string()))?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(GameError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    pub fn write_to(&self, store: &mut impl KeyValueStore) -> Result<()> {
        store.write(SESSION_KEY, &self.encode()?)
    }

    /// `Ok(None)` when nothing is stored.
    pub fn read_from(store: &impl KeyValueStore) -> Result<Option<Self>> {
        store
            .read(SESSION_KEY)?
            .map(|raw| Self::decode(&raw))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            player_position: Cell::new(1, -2),
            player_coins: vec![Coin::new(Cell::new(2, -1), 3)],
            cache_mementos: vec![("2,-1".to_string(), Memento::from_raw("[]"))],
            player_path: Vec::new(),
        }
    }

    #[test]
    fn record_uses_documented_field_names() {
        let json = snapshot().encode().unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"version":1,"playerPosition":{"i":1,"j":-2},"#,
                r#""playerCoins":[{"cell":{"i":2,"j":-1},"serialNumber":3}],"#,
                r#""cacheMementos":[["2,-1","[]"]],"playerPath":[]}"#
            )
        );
    }

    #[test]
    fn record_without_version_or_path_is_accepted() {
        let raw = r#"{"playerPosition":{"i":0,"j":0},"playerCoins":[],"cacheMementos":[]}"#;
        let snapshot = SessionSnapshot::decode(raw).unwrap();

        assert_eq!(snapshot.version, 1);
        assert!(snapshot.player_path.is_empty());
    }

    #[test]
    fn future_versions_are_rejected() {
        let raw = r#"{"version":9,"playerPosition":{"i":0,"j":0},"playerCoins":[],"cacheMementos":[]}"#;

        assert_eq!(
            SessionSnapshot::decode(raw),
            Err(GameError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn malformed_records_are_distinguishable() {
        assert!(matches!(
            SessionSnapshot::decode("{not json"),
            Err(GameError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(SessionSnapshot::read_from(&store), Ok(None));

        snapshot().write_to(&mut store).unwrap();

        assert!(store.contains(SESSION_KEY));
        assert_eq!(SessionSnapshot::read_from(&store), Ok(Some(snapshot())));
    }
}
