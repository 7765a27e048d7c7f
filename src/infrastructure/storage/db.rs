use crate::domain::error::RecapError;
use crate::domain::model::{CacheEntry, CacheKey};
use crate::domain::policy::{ResourceType, WriteMode};
use crate::domain::traits::ResourceStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, OptionalExtension};
use std::io::Cursor;
use std::path::Path;
use tokio_rusqlite::{params, Connection};
use zstd::stream::{decode_all, encode_all};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    game_name TEXT NOT NULL,
    tag_line TEXT NOT NULL,
    region TEXT NOT NULL,
    puuid TEXT NOT NULL,
    data BLOB NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (game_name, tag_line, region)
);
CREATE TABLE IF NOT EXISTS profiles (
    puuid TEXT NOT NULL,
    region TEXT NOT NULL,
    data BLOB NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (puuid, region)
);
CREATE TABLE IF NOT EXISTS match_id_lists (
    puuid TEXT NOT NULL,
    region TEXT NOT NULL,
    match_ids TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (puuid, region)
);
CREATE INDEX IF NOT EXISTS idx_match_id_lists_created ON match_id_lists(created_at);
CREATE TABLE IF NOT EXISTS matches (
    match_id TEXT PRIMARY KEY,
    region TEXT NOT NULL,
    data BLOB NOT NULL,
    game_datetime INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_matches_game_datetime ON matches(game_datetime);
CREATE TABLE IF NOT EXISTS ranked_standings (
    summoner_id TEXT NOT NULL,
    region TEXT NOT NULL,
    data BLOB NOT NULL,
    updated_at INTEGER NOT NULL,
    PRIMARY KEY (summoner_id, region)
);
";

pub async fn init_database(db_path: &Path) -> Result<Connection, RecapError> {
    let db = Connection::open(db_path.to_path_buf()).await?;
    migrate(&db).await?;
    Ok(db)
}

/// Create any missing tables. Safe to run repeatedly.
pub async fn migrate(db: &Connection) -> Result<(), RecapError> {
    db.call(|conn| conn.execute_batch(SCHEMA)).await?;
    Ok(())
}

/// SQLite-backed [`ResourceStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub async fn open(db_path: &Path) -> Result<Self, RecapError> {
        Ok(Self::new(init_database(db_path).await?))
    }

    pub async fn open_in_memory() -> Result<Self, RecapError> {
        let conn = Connection::open_in_memory().await?;
        migrate(&conn).await?;
        Ok(Self::new(conn))
    }

    /// Shift an entry's write time into the past.
    #[cfg(test)]
    pub(crate) async fn backdate(
        &self,
        key: &CacheKey,
        age: chrono::Duration,
    ) -> Result<(), RecapError> {
        use rusqlite::types::Value;

        let resource = key.resource();
        let sql = format!(
            "UPDATE {} SET {} = {} - ? WHERE {}",
            resource.table(),
            timestamp_column(resource),
            timestamp_column(resource),
            key_predicate(resource)
        );
        let mut values = vec![Value::Integer(age.num_milliseconds())];
        values.extend(key_params(key).into_iter().map(Value::Text));
        self.conn
            .call(move |conn| conn.execute(&sql, params_from_iter(values)))
            .await?;
        Ok(())
    }
}

fn timestamp_column(resource: ResourceType) -> &'static str {
    match resource {
        ResourceType::MatchIds | ResourceType::MatchDetail => "created_at",
        _ => "updated_at",
    }
}

fn data_column(resource: ResourceType) -> &'static str {
    match resource {
        ResourceType::MatchIds => "match_ids",
        _ => "data",
    }
}

fn key_predicate(resource: ResourceType) -> &'static str {
    match resource {
        ResourceType::Account => "game_name = ? AND tag_line = ? AND region = ?",
        ResourceType::Profile | ResourceType::MatchIds => "puuid = ? AND region = ?",
        // Match IDs are globally unique.
        ResourceType::MatchDetail => "match_id = ?",
        ResourceType::RankedStanding => "summoner_id = ? AND region = ?",
    }
}

fn key_params(key: &CacheKey) -> Vec<String> {
    let region = key.region().to_string();
    match key.resource() {
        ResourceType::Account => {
            let (name, tag) = key
                .natural_key()
                .split_once('#')
                .unwrap_or((key.natural_key(), ""));
            vec![name.to_string(), tag.to_string(), region]
        }
        ResourceType::MatchDetail => vec![key.natural_key().to_string()],
        _ => vec![key.natural_key().to_string(), region],
    }
}

// First writer wins for insert-once resources; the rest refresh payload and timestamp.
fn conflict_action(resource: ResourceType) -> String {
    match resource.write_mode() {
        WriteMode::InsertOnce => "DO NOTHING".to_string(),
        WriteMode::Upsert => format!(
            "DO UPDATE SET {data} = excluded.{data}, {ts} = excluded.{ts}",
            data = data_column(resource),
            ts = timestamp_column(resource),
        ),
    }
}

// Match-ID lists stay plain JSON text; everything else is compressed.
fn encode_payload(resource: ResourceType, payload: &serde_json::Value) -> Result<Vec<u8>, RecapError> {
    let serialized = serde_json::to_vec(payload)?;
    if resource == ResourceType::MatchIds {
        return Ok(serialized);
    }
    Ok(encode_all(Cursor::new(&serialized), 0)?)
}

fn decode_payload(resource: ResourceType, raw: &[u8]) -> Result<serde_json::Value, RecapError> {
    if resource == ResourceType::MatchIds {
        return Ok(serde_json::from_slice(raw)?);
    }
    let decompressed = decode_all(Cursor::new(raw))?;
    Ok(serde_json::from_slice(&decompressed)?)
}

fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, RecapError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| RecapError::Cache(format!("Invalid stored timestamp: {}", millis)))
}

#[async_trait]
impl ResourceStore for SqliteStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, RecapError> {
        let resource = key.resource();
        let sql = format!(
            "SELECT {}, {} FROM {} WHERE {}",
            data_column(resource),
            timestamp_column(resource),
            resource.table(),
            key_predicate(resource)
        );
        let values = key_params(key);

        let row = self
            .conn
            .call(move |conn| {
                conn.query_row(&sql, params_from_iter(values), |row| {
                    let raw = match row.get_ref(0)? {
                        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
                        _ => Vec::new(),
                    };
                    let stored_at: i64 = row.get(1)?;
                    Ok((raw, stored_at))
                })
                .optional()
            })
            .await?;

        let Some((raw, stored_at)) = row else {
            return Ok(None);
        };

        Ok(Some(CacheEntry {
            key: key.clone(),
            payload: decode_payload(resource, &raw)?,
            stored_at: millis_to_datetime(stored_at)?,
        }))
    }

    async fn put(&self, key: &CacheKey, payload: &serde_json::Value) -> Result<(), RecapError> {
        let resource = key.resource();
        let data = encode_payload(resource, payload)?;
        let now = Utc::now().timestamp_millis();
        let region = key.region().to_string();
        let natural_key = key.natural_key().to_string();

        match resource {
            ResourceType::Account => {
                let puuid = payload
                    .get("puuid")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| RecapError::Decode("Account payload has no puuid".to_string()))?
                    .to_string();
                let mut values = key_params(key).into_iter();
                let (name, tag) = (
                    values.next().unwrap_or_default(),
                    values.next().unwrap_or_default(),
                );
                self.conn
                    .call(move |conn| {
                        conn.execute(
                            "INSERT INTO accounts (game_name, tag_line, region, puuid, data, updated_at)
                             VALUES (?, ?, ?, ?, ?, ?)
                             ON CONFLICT (game_name, tag_line, region) DO UPDATE SET
                                puuid = excluded.puuid,
                                data = excluded.data,
                                updated_at = excluded.updated_at",
                            params![name, tag, region, puuid, data, now],
                        )
                    })
                    .await?;
            }
            ResourceType::MatchDetail => {
                let game_datetime = payload
                    .pointer("/info/game_datetime")
                    .and_then(|v| v.as_i64())
                    .unwrap_or_default();
                let sql = format!(
                    "INSERT INTO matches (match_id, region, data, game_datetime, created_at)
                     VALUES (?, ?, ?, ?, ?)
                     ON CONFLICT (match_id) {}",
                    conflict_action(resource)
                );
                self.conn
                    .call(move |conn| {
                        conn.execute(&sql, params![natural_key, region, data, game_datetime, now])
                    })
                    .await?;
            }
            ResourceType::Profile | ResourceType::MatchIds | ResourceType::RankedStanding => {
                let id_column = match resource {
                    ResourceType::RankedStanding => "summoner_id",
                    _ => "puuid",
                };
                let sql = format!(
                    "INSERT INTO {table} ({id}, region, {data}, {ts}) VALUES (?, ?, ?, ?)
                     ON CONFLICT ({id}, region) {action}",
                    table = resource.table(),
                    id = id_column,
                    data = data_column(resource),
                    ts = timestamp_column(resource),
                    action = conflict_action(resource),
                );
                if resource == ResourceType::MatchIds {
                    // Keep the list readable as text in the table.
                    let text = String::from_utf8(data)
                        .map_err(|e| RecapError::Decode(e.to_string()))?;
                    self.conn
                        .call(move |conn| conn.execute(&sql, params![natural_key, region, text, now]))
                        .await?;
                } else {
                    self.conn
                        .call(move |conn| conn.execute(&sql, params![natural_key, region, data, now]))
                        .await?;
                }
            }
        }

        Ok(())
    }

    async fn purge_all(&self) -> Result<usize, RecapError> {
        let deleted = self
            .conn
            .call(|conn| {
                let tx = conn.transaction()?;
                let mut count = 0;
                for resource in ResourceType::ALL {
                    count += tx.execute(&format!("DELETE FROM {}", resource.table()), [])?;
                }
                tx.commit()?;
                Ok::<_, rusqlite::Error>(count)
            })
            .await?;

        Ok(deleted)
    }

    async fn delete_match_id_lists_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, RecapError> {
        let cutoff = cutoff.timestamp_millis();
        let deleted = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM match_id_lists WHERE created_at < ?",
                    params![cutoff],
                )
            })
            .await?;

        Ok(deleted)
    }

    async fn table_counts(&self) -> Result<Vec<(&'static str, usize)>, RecapError> {
        let counts = self
            .conn
            .call(|conn| {
                let mut counts = Vec::with_capacity(ResourceType::ALL.len());
                for resource in ResourceType::ALL {
                    let table = resource.table();
                    let count: i64 = conn.query_row(
                        &format!("SELECT COUNT(*) FROM {}", table),
                        params![],
                        |row| row.get(0),
                    )?;
                    counts.push((table, count as usize));
                }
                Ok::<_, rusqlite::Error>(counts)
            })
            .await?;

        Ok(counts)
    }
}
