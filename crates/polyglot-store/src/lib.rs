//! Polyglot Storage Layer
//!
//! Implements the [`RelationStore`] trait on SQLite.
//!
//! # Architecture
//!
//! - `site_relations`: the undirected site graph, one row per edge, smaller id first
//! - `content_relations`: translation group rows keyed by their canonical source
//!
//! # Examples
//!
//! ```no_run
//! use polyglot_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for relation operations
//! ```

#![warn(missing_docs)]

use polyglot_domain::traits::RelationStore;
use polyglot_domain::{
    ContentId, ContentRelation, DomainError, GroupKey, RelationType, SiteId, SiteRelation,
};
use rusqlite::{params, Connection, Row};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Connection mutex poisoned by a panicking writer
    #[error("Store connection lock poisoned")]
    Lock,
}

const CONTENT_COLUMNS: &str =
    "source_site_id, source_content_id, site_id, content_id, relation_type";

/// SQLite-based implementation of [`RelationStore`]
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one store can be shared between
/// threads; calls are serialized. Multi-statement operations (group merges,
/// bulk edge inserts, site clean-up) each run in a single transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use polyglot_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("polyglot.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create a store backed by a private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::new(":memory:")
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.lock()?.execute_batch(schema)?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Lock)
    }

    /// Number of content relation rows (all types)
    pub fn content_row_count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM content_relations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn site_from_sql(value: i64, column: usize) -> rusqlite::Result<SiteId> {
        u64::try_from(value)
            .map_err(|_| DomainError::InvalidSiteId(0))
            .and_then(SiteId::new)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    column,
                    rusqlite::types::Type::Integer,
                    Box::new(e),
                )
            })
    }

    fn content_relation_from_row(row: &Row<'_>) -> rusqlite::Result<ContentRelation> {
        let relation_type: String = row.get(4)?;
        let relation_type = RelationType::new(relation_type).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(ContentRelation {
            source_site_id: Self::site_from_sql(row.get(0)?, 0)?,
            source_content_id: row.get::<_, i64>(1)? as ContentId,
            site_id: Self::site_from_sql(row.get(2)?, 2)?,
            content_id: row.get::<_, i64>(3)? as ContentId,
            relation_type,
        })
    }

    fn sql_id(value: u64) -> Result<i64, StoreError> {
        i64::try_from(value).map_err(|_| {
            StoreError::InvalidData(format!("Id {} does not fit in an SQL integer", value))
        })
    }
}

impl RelationStore for SqliteStore {
    type Error = StoreError;

    fn related_sites(&self, site: SiteId) -> Result<Vec<SiteId>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT CASE WHEN site_1 = ?1 THEN site_2 ELSE site_1 END AS other
             FROM site_relations
             WHERE site_1 = ?1 OR site_2 = ?1
             ORDER BY other",
        )?;

        let sites = stmt
            .query_map(params![Self::sql_id(site.value())?], |row| {
                Self::site_from_sql(row.get(0)?, 0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sites)
    }

    fn site_relations(&self) -> Result<Vec<SiteRelation>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT site_1, site_2 FROM site_relations ORDER BY site_1, site_2")?;

        let pairs = stmt
            .query_map([], |row| {
                Ok((
                    Self::site_from_sql(row.get(0)?, 0)?,
                    Self::site_from_sql(row.get(1)?, 1)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        pairs
            .into_iter()
            .map(|(a, b)| {
                SiteRelation::new(a, b).map_err(|e| StoreError::InvalidData(e.to_string()))
            })
            .collect()
    }

    fn set_relations(&self, base: SiteId, sites: &[SiteId]) -> Result<usize, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut created = 0;

        for site in sites {
            // Self pairs are silently skipped
            let Ok(relation) = SiteRelation::new(base, *site) else {
                continue;
            };
            created += tx.execute(
                "INSERT OR IGNORE INTO site_relations (site_1, site_2) VALUES (?1, ?2)",
                params![
                    Self::sql_id(relation.site_a().value())?,
                    Self::sql_id(relation.site_b().value())?,
                ],
            )?;
        }

        tx.commit()?;
        Ok(created)
    }

    fn delete_relations(
        &self,
        site: SiteId,
        other: Option<SiteId>,
    ) -> Result<usize, Self::Error> {
        let conn = self.lock()?;

        let removed = match other {
            Some(other) => {
                let Ok(relation) = SiteRelation::new(site, other) else {
                    return Ok(0);
                };
                conn.execute(
                    "DELETE FROM site_relations WHERE site_1 = ?1 AND site_2 = ?2",
                    params![
                        Self::sql_id(relation.site_a().value())?,
                        Self::sql_id(relation.site_b().value())?,
                    ],
                )?
            }
            None => conn.execute(
                "DELETE FROM site_relations WHERE site_1 = ?1 OR site_2 = ?1",
                params![Self::sql_id(site.value())?],
            )?,
        };

        Ok(removed)
    }

    fn content_relations(
        &self,
        site: SiteId,
        content_id: ContentId,
        relation_type: &RelationType,
    ) -> Result<BTreeMap<SiteId, ContentId>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT r.site_id, r.content_id
             FROM content_relations r
             JOIN (
                 SELECT source_site_id, source_content_id
                 FROM content_relations
                 WHERE site_id = ?1 AND content_id = ?2 AND relation_type = ?3
                 ORDER BY id
                 LIMIT 1
             ) g ON r.source_site_id = g.source_site_id
                AND r.source_content_id = g.source_content_id
             WHERE r.relation_type = ?3
             ORDER BY r.id",
        )?;

        let rows = stmt
            .query_map(
                params![
                    Self::sql_id(site.value())?,
                    Self::sql_id(content_id)?,
                    relation_type.as_str()
                ],
                |row| {
                    Ok((
                        Self::site_from_sql(row.get(0)?, 0)?,
                        row.get::<_, i64>(1)? as ContentId,
                    ))
                },
            )?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(rows)
    }

    fn find_group_keys(
        &self,
        members: &[(SiteId, ContentId)],
        relation_type: &RelationType,
    ) -> Result<Vec<GroupKey>, Self::Error> {
        if members.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = String::from(
            "SELECT source_site_id, source_content_id, MIN(id) AS first_id
             FROM content_relations
             WHERE relation_type = ? AND (",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> =
            vec![Box::new(relation_type.as_str().to_string())];

        for (index, (site, content_id)) in members.iter().enumerate() {
            if index > 0 {
                sql.push_str(" OR ");
            }
            sql.push_str("(site_id = ? AND content_id = ?)");
            params.push(Box::new(Self::sql_id(site.value())?));
            params.push(Box::new(Self::sql_id(*content_id)?));
        }
        sql.push_str(") GROUP BY source_site_id, source_content_id ORDER BY first_id");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let keys = stmt
            .query_map(&param_refs[..], |row| {
                Ok(GroupKey::new(
                    Self::site_from_sql(row.get(0)?, 0)?,
                    row.get::<_, i64>(1)? as ContentId,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(keys)
    }

    fn group_members(
        &self,
        key: GroupKey,
        relation_type: &RelationType,
    ) -> Result<Vec<ContentRelation>, Self::Error> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CONTENT_COLUMNS}
             FROM content_relations
             WHERE source_site_id = ?1 AND source_content_id = ?2 AND relation_type = ?3
             ORDER BY id"
        ))?;

        let rows = stmt
            .query_map(
                params![
                    Self::sql_id(key.site_id.value())?,
                    Self::sql_id(key.content_id)?,
                    relation_type.as_str()
                ],
                Self::content_relation_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn insert_content_row(&self, row: &ContentRelation) -> Result<bool, Self::Error> {
        if row.content_id == 0 || row.source_content_id == 0 {
            return Err(StoreError::InvalidData(
                "Content relation rows require non-zero content ids".to_string(),
            ));
        }

        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO content_relations
                 (source_site_id, source_content_id, site_id, content_id, relation_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Self::sql_id(row.source_site_id.value())?,
                Self::sql_id(row.source_content_id)?,
                Self::sql_id(row.site_id.value())?,
                Self::sql_id(row.content_id)?,
                row.relation_type.as_str(),
            ],
        )?;

        Ok(inserted > 0)
    }

    fn delete_content_row(
        &self,
        key: GroupKey,
        site: SiteId,
        relation_type: &RelationType,
    ) -> Result<usize, Self::Error> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM content_relations
             WHERE source_site_id = ?1 AND source_content_id = ?2
               AND site_id = ?3 AND relation_type = ?4",
            params![
                Self::sql_id(key.site_id.value())?,
                Self::sql_id(key.content_id)?,
                Self::sql_id(site.value())?,
                relation_type.as_str(),
            ],
        )?;
        Ok(removed)
    }

    fn delete_content_relation(
        &self,
        source_site: SiteId,
        target_site: SiteId,
        source_content: ContentId,
        target_content: ContentId,
        relation_type: &RelationType,
    ) -> Result<usize, Self::Error> {
        let conn = self.lock()?;
        let removed = conn.execute(
            "DELETE FROM content_relations
             WHERE relation_type = ?5 AND site_id = ?2 AND content_id = ?4
               AND (source_site_id, source_content_id) IN (
                   SELECT source_site_id, source_content_id
                   FROM content_relations
                   WHERE site_id = ?1 AND content_id = ?3 AND relation_type = ?5
               )",
            params![
                Self::sql_id(source_site.value())?,
                Self::sql_id(target_site.value())?,
                Self::sql_id(source_content)?,
                Self::sql_id(target_content)?,
                relation_type.as_str(),
            ],
        )?;
        Ok(removed)
    }

    fn merge_groups(
        &self,
        into: GroupKey,
        from: &[GroupKey],
        relation_type: &RelationType,
    ) -> Result<usize, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut moved = 0;

        for key in from.iter().filter(|key| **key != into) {
            let dropped = tx.execute(
                "DELETE FROM content_relations
                 WHERE relation_type = ?1 AND source_site_id = ?2 AND source_content_id = ?3
                   AND site_id IN (
                       SELECT site_id FROM content_relations
                       WHERE relation_type = ?1 AND source_site_id = ?4 AND source_content_id = ?5
                   )",
                params![
                    relation_type.as_str(),
                    Self::sql_id(key.site_id.value())?,
                    Self::sql_id(key.content_id)?,
                    Self::sql_id(into.site_id.value())?,
                    Self::sql_id(into.content_id)?,
                ],
            )?;

            let updated = tx.execute(
                "UPDATE content_relations
                 SET source_site_id = ?4, source_content_id = ?5
                 WHERE relation_type = ?1 AND source_site_id = ?2 AND source_content_id = ?3",
                params![
                    relation_type.as_str(),
                    Self::sql_id(key.site_id.value())?,
                    Self::sql_id(key.content_id)?,
                    Self::sql_id(into.site_id.value())?,
                    Self::sql_id(into.content_id)?,
                ],
            )?;

            debug!(
                from_site = key.site_id.value(),
                from_content = key.content_id,
                into_site = into.site_id.value(),
                into_content = into.content_id,
                dropped,
                updated,
                "Merged duplicate translation group"
            );
            moved += updated;
        }

        tx.commit()?;
        Ok(moved)
    }

    fn site_content_relations(
        &self,
        site: SiteId,
        relation_type: Option<&RelationType>,
    ) -> Result<Vec<ContentRelation>, Self::Error> {
        let conn = self.lock()?;
        let site_param = Self::sql_id(site.value())?;

        let rows = match relation_type {
            Some(relation_type) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CONTENT_COLUMNS} FROM content_relations
                     WHERE site_id = ?1 AND relation_type = ?2 ORDER BY id"
                ))?;
                let rows = stmt
                    .query_map(
                        params![site_param, relation_type.as_str()],
                        Self::content_relation_from_row,
                    )?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CONTENT_COLUMNS} FROM content_relations
                     WHERE site_id = ?1 ORDER BY id"
                ))?;
                let rows = stmt
                    .query_map(params![site_param], Self::content_relation_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(rows)
    }

    fn copy_site_content_relations(
        &self,
        source: SiteId,
        target: SiteId,
    ) -> Result<usize, Self::Error> {
        if source == target {
            return Ok(0);
        }

        let conn = self.lock()?;
        // The (group, site, type) unique constraint skips groups that already hold a target row
        let created = conn.execute(
            "INSERT OR IGNORE INTO content_relations
                 (source_site_id, source_content_id, site_id, content_id, relation_type)
             SELECT source_site_id, source_content_id, ?2, content_id, relation_type
             FROM content_relations
             WHERE site_id = ?1
             ORDER BY id",
            params![Self::sql_id(source.value())?, Self::sql_id(target.value())?],
        )?;
        Ok(created)
    }

    fn delete_site_content_relations(&self, site: SiteId) -> Result<usize, Self::Error> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let site_param = Self::sql_id(site.value())?;

        let touched: Vec<(i64, i64, String)> = {
            let mut stmt = tx.prepare(
                "SELECT DISTINCT source_site_id, source_content_id, relation_type
                 FROM content_relations WHERE site_id = ?1",
            )?;
            let groups = stmt
                .query_map(params![site_param], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            groups
        };

        let mut removed = tx.execute(
            "DELETE FROM content_relations WHERE site_id = ?1",
            params![site_param],
        )?;

        // A group reduced to one row no longer relates anything
        for (source_site, source_content, relation_type) in &touched {
            removed += tx.execute(
                "DELETE FROM content_relations
                 WHERE source_site_id = ?1 AND source_content_id = ?2 AND relation_type = ?3
                   AND (SELECT COUNT(*) FROM content_relations
                        WHERE source_site_id = ?1 AND source_content_id = ?2
                          AND relation_type = ?3) = 1",
                params![source_site, source_content, relation_type],
            )?;
        }

        tx.commit()?;
        Ok(removed)
    }
}
