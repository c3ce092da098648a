//! SQLite memo store
//!
//! Memos and their relations live in two tables. Filter expressions are
//! evaluated in-process after the SQL-level constraints, so `limit` and
//! `offset` apply to the filtered rows.

use super::{
    CreateMemo, FindMemo, FindMemoRelation, MemoFilter, MemoLookup, MemoStore, StoreError,
    UpdateMemo,
};
use crate::memo::{Memo, MemoPayload, MemoRelation, MemoRelationType, RowStatus, Visibility};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS memo (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    uid TEXT NOT NULL UNIQUE,
    creator_id INTEGER NOT NULL,
    created_ts INTEGER NOT NULL,
    updated_ts INTEGER NOT NULL,
    row_status TEXT NOT NULL DEFAULT 'NORMAL',
    content TEXT NOT NULL DEFAULT '',
    visibility TEXT NOT NULL DEFAULT 'PRIVATE',
    pinned INTEGER NOT NULL DEFAULT 0,
    payload TEXT NOT NULL DEFAULT '{}'
);
CREATE TABLE IF NOT EXISTS memo_relation (
    memo_id INTEGER NOT NULL,
    related_memo_id INTEGER NOT NULL,
    type TEXT NOT NULL,
    UNIQUE(memo_id, related_memo_id, type)
);
";

const MEMO_COLUMNS: &str = "
    m.id, m.uid, m.creator_id, m.created_ts, m.updated_ts, m.row_status,
    m.content, m.visibility, m.pinned, m.payload,
    (SELECT p.uid FROM memo_relation r JOIN memo p ON p.id = r.related_memo_id
     WHERE r.memo_id = m.id AND r.type = 'COMMENT' LIMIT 1) AS parent_uid";

/// Memo store backed by a single SQLite connection
pub struct SqliteMemoStore {
    conn: Mutex<Connection>,
}

impl SqliteMemoStore {
    /// Open (or create) a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl MemoStore for SqliteMemoStore {
    async fn create_memo(&self, create: CreateMemo) -> Result<Memo, StoreError> {
        let conn = self.conn.lock().await;
        let now = Utc::now().timestamp();
        let payload = encode_payload(create.payload.as_ref())?;

        conn.execute(
            "INSERT INTO memo (uid, creator_id, created_ts, updated_ts, row_status, content, visibility, pinned, payload)
             VALUES (?1, ?2, ?3, ?3, ?4, ?5, ?6, 0, ?7)",
            params![
                create.uid,
                create.creator_id,
                now,
                RowStatus::Normal.as_str(),
                create.content,
                create.visibility.as_str(),
                payload,
            ],
        )?;
        let id = conn.last_insert_rowid() as i32;
        tracing::debug!("Created memo {} (id {})", create.uid, id);

        Ok(Memo {
            id,
            uid: create.uid,
            creator_id: create.creator_id,
            created_ts: now,
            updated_ts: now,
            row_status: RowStatus::Normal,
            content: create.content,
            visibility: create.visibility,
            pinned: false,
            payload: create.payload,
            parent_uid: create.parent_uid,
        })
    }

    async fn list_memos(&self, find: &FindMemo) -> Result<Vec<Memo>, StoreError> {
        let conn = self.conn.lock().await;
        query_memos(&conn, find)
    }

    async fn get_memo(&self, lookup: &MemoLookup) -> Result<Option<Memo>, StoreError> {
        let conn = self.conn.lock().await;
        let (clause, value) = match lookup {
            MemoLookup::Uid(uid) => ("m.uid = ?1", SqlValue::Text(uid.clone())),
            MemoLookup::Id(id) => ("m.id = ?1", SqlValue::Integer(i64::from(*id))),
        };
        let sql = format!("SELECT {} FROM memo m WHERE {}", MEMO_COLUMNS, clause);
        let row = conn
            .query_row(&sql, [value], read_row)
            .optional()?;
        row.map(RawMemo::into_memo).transpose()
    }

    async fn update_memo(&self, update: &UpdateMemo) -> Result<(), StoreError> {
        if update.is_empty() {
            return Ok(());
        }
        let conn = self.conn.lock().await;

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(content) = &update.content {
            sets.push("content = ?");
            values.push(SqlValue::Text(content.clone()));
        }
        if let Some(visibility) = &update.visibility {
            sets.push("visibility = ?");
            values.push(SqlValue::Text(visibility.as_str().to_string()));
        }
        if let Some(row_status) = update.row_status {
            sets.push("row_status = ?");
            values.push(SqlValue::Text(row_status.as_str().to_string()));
        }
        if let Some(pinned) = update.pinned {
            sets.push("pinned = ?");
            values.push(SqlValue::Integer(i64::from(pinned)));
        }
        if update.tags.is_some() || update.property.is_some() {
            let current: Option<String> = conn
                .query_row(
                    "SELECT payload FROM memo WHERE id = ?1",
                    [update.id],
                    |row| row.get(0),
                )
                .optional()?;
            let current = current.ok_or(StoreError::MissingMemo(update.id))?;
            let mut payload = decode_payload(&current)?.unwrap_or_default();
            if let Some(tags) = &update.tags {
                payload.tags = tags.clone();
            }
            if let Some(property) = update.property {
                payload.property = Some(property);
            }
            sets.push("payload = ?");
            values.push(SqlValue::Text(serde_json::to_string(&payload)?));
        }

        sets.push("updated_ts = ?");
        values.push(SqlValue::Integer(Utc::now().timestamp()));
        values.push(SqlValue::Integer(i64::from(update.id)));

        let sql = format!("UPDATE memo SET {} WHERE id = ?", sets.join(", "));
        let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(StoreError::MissingMemo(update.id));
        }
        Ok(())
    }

    async fn delete_memo(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM memo_relation WHERE memo_id = ?1",
            [id],
        )?;
        tx.execute("DELETE FROM memo WHERE id = ?1", [id])?;
        tx.commit()?;
        tracing::debug!("Deleted memo id {}", id);
        Ok(())
    }

    async fn list_memo_relations(
        &self,
        find: &FindMemoRelation,
    ) -> Result<Vec<MemoRelation>, StoreError> {
        let conn = self.conn.lock().await;

        let mut wheres = vec!["1 = 1"];
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(memo_id) = find.memo_id {
            wheres.push("memo_id = ?");
            values.push(SqlValue::Integer(i64::from(memo_id)));
        }
        if let Some(related) = find.related_memo_id {
            wheres.push("related_memo_id = ?");
            values.push(SqlValue::Integer(i64::from(related)));
        }
        if let Some(relation_type) = find.relation_type {
            wheres.push("type = ?");
            values.push(SqlValue::Text(relation_type.as_str().to_string()));
        }

        let sql = format!(
            "SELECT memo_id, related_memo_id, type FROM memo_relation WHERE {} ORDER BY rowid",
            wheres.join(" AND ")
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok((
                row.get::<_, i32>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut relations = Vec::new();
        for row in rows {
            let (memo_id, related_memo_id, relation_type) = row?;
            let relation_type =
                MemoRelationType::parse(&relation_type).ok_or_else(|| StoreError::CorruptRow {
                    id: memo_id,
                    message: format!("unknown relation type {:?}", relation_type),
                })?;
            relations.push(MemoRelation {
                memo_id,
                related_memo_id,
                relation_type,
            });
        }
        Ok(relations)
    }

    async fn upsert_memo_relation(
        &self,
        relation: MemoRelation,
    ) -> Result<MemoRelation, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR IGNORE INTO memo_relation (memo_id, related_memo_id, type) VALUES (?1, ?2, ?3)",
            params![
                relation.memo_id,
                relation.related_memo_id,
                relation.relation_type.as_str()
            ],
        )?;
        Ok(relation)
    }
}

fn query_memos(conn: &Connection, find: &FindMemo) -> Result<Vec<Memo>, StoreError> {
    let filter = MemoFilter::compile(&find.filters)?;

    let mut wheres: Vec<String> = vec!["1 = 1".to_string()];
    let mut values: Vec<SqlValue> = Vec::new();

    if let Some(row_status) = find.row_status {
        wheres.push("m.row_status = ?".to_string());
        values.push(SqlValue::Text(row_status.as_str().to_string()));
    }
    if !find.visibility_list.is_empty() {
        let placeholders = vec!["?"; find.visibility_list.len()].join(", ");
        wheres.push(format!("m.visibility IN ({})", placeholders));
        for visibility in &find.visibility_list {
            values.push(SqlValue::Text(visibility.as_str().to_string()));
        }
    }
    if let Some(ids) = &find.id_list {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        wheres.push(format!("m.id IN ({})", placeholders));
        values.extend(ids.iter().map(|id| SqlValue::Integer(i64::from(*id))));
    }
    if find.exclude_comments {
        wheres.push(
            "NOT EXISTS (SELECT 1 FROM memo_relation c WHERE c.memo_id = m.id AND c.type = 'COMMENT')"
                .to_string(),
        );
    }

    let order = if find.order_by_pinned {
        "m.pinned DESC, m.created_ts DESC, m.id DESC"
    } else {
        "m.created_ts DESC, m.id DESC"
    };
    let sql = format!(
        "SELECT {} FROM memo m WHERE {} ORDER BY {}",
        MEMO_COLUMNS,
        wheres.join(" AND "),
        order
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values.iter()), read_row)?;

    let offset = find.offset.unwrap_or(0);
    let limit = find.limit.unwrap_or(usize::MAX);
    let mut skipped = 0;
    let mut memos = Vec::new();

    for row in rows {
        if memos.len() >= limit {
            break;
        }
        let mut memo = row?.into_memo()?;
        if !filter.matches(&memo)? {
            continue;
        }
        if skipped < offset {
            skipped += 1;
            continue;
        }
        if find.exclude_content {
            memo.content.clear();
        }
        memos.push(memo);
    }

    tracing::debug!(
        "Memo query matched {} rows (filters: {}, offset: {})",
        memos.len(),
        find.filters.len(),
        offset
    );
    Ok(memos)
}

/// Column values before conversion into the model
struct RawMemo {
    id: i32,
    uid: String,
    creator_id: i32,
    created_ts: i64,
    updated_ts: i64,
    row_status: String,
    content: String,
    visibility: String,
    pinned: bool,
    payload: String,
    parent_uid: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawMemo> {
    Ok(RawMemo {
        id: row.get(0)?,
        uid: row.get(1)?,
        creator_id: row.get(2)?,
        created_ts: row.get(3)?,
        updated_ts: row.get(4)?,
        row_status: row.get(5)?,
        content: row.get(6)?,
        visibility: row.get(7)?,
        pinned: row.get(8)?,
        payload: row.get(9)?,
        parent_uid: row.get(10)?,
    })
}

impl RawMemo {
    fn into_memo(self) -> Result<Memo, StoreError> {
        let row_status = RowStatus::parse(&self.row_status).ok_or_else(|| StoreError::CorruptRow {
            id: self.id,
            message: format!("unknown row status {:?}", self.row_status),
        })?;
        Ok(Memo {
            id: self.id,
            uid: self.uid,
            creator_id: self.creator_id,
            created_ts: self.created_ts,
            updated_ts: self.updated_ts,
            row_status,
            content: self.content,
            visibility: Visibility::from_stored(&self.visibility),
            pinned: self.pinned,
            payload: decode_payload(&self.payload)?,
            parent_uid: self.parent_uid,
        })
    }
}

fn encode_payload(payload: Option<&MemoPayload>) -> Result<String, StoreError> {
    match payload {
        Some(payload) => Ok(serde_json::to_string(payload)?),
        None => Ok("{}".to_string()),
    }
}

/// An empty payload object reads back as `None`
fn decode_payload(raw: &str) -> Result<Option<MemoPayload>, StoreError> {
    let payload: MemoPayload = serde_json::from_str(raw)?;
    if payload == MemoPayload::default() {
        Ok(None)
    } else {
        Ok(Some(payload))
    }
}
