//! Content relation resolver: translation groups on top of a relation store

use crate::{RelationsConfig, RelationsError};
use polyglot_domain::traits::{Cache, RelationStore};
use polyglot_domain::{CacheKey, ContentId, ContentRelation, GroupKey, RelationType, SiteId};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Cache namespace of translation group lookups
pub const RELATIONS_CACHE_NAMESPACE: &str = "content_relations";

/// Cache namespace of per-item translation set generations
pub const TRANSLATIONS_GENERATION_NAMESPACE: &str = "translations_generation";

/// Cache key of the group lookup for one member
pub fn relations_cache_key(
    site: SiteId,
    content_id: ContentId,
    relation_type: &RelationType,
) -> CacheKey {
    CacheKey::new(RELATIONS_CACHE_NAMESPACE)
        .field("site_id", site)
        .field("content_id", content_id)
        .field("type", relation_type)
}

/// Cache key of the translation set generation of one item
///
/// Every write touching the item's group stores a new value under this key.
/// Translation set caches embed the current value in their own keys, so a
/// write makes every earlier entry for the item unreachable.
pub fn translations_generation_key(
    site: SiteId,
    content_id: ContentId,
    relation_type: &RelationType,
) -> CacheKey {
    CacheKey::new(TRANSLATIONS_GENERATION_NAMESPACE)
        .field("site_id", site)
        .field("content_id", content_id)
        .field("type", relation_type)
}

/// Translation groups over a [`RelationStore`]
///
/// Group keys are not stable: either side of an existing relation may be
/// passed as "the source". Every write first resolves the canonical key,
/// healing duplicate groups on the way, then upserts under that key.
///
/// # Examples
///
/// ```no_run
/// use polyglot_domain::{RelationType, SiteId};
/// use polyglot_relations::{ContentRelations, RelationsConfig};
/// use polyglot_store::SqliteStore;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::new(":memory:")?);
/// let relations = ContentRelations::new(store, RelationsConfig::default());
///
/// let en = SiteId::new(1)?;
/// let de = SiteId::new(2)?;
/// relations.set_relation(en, de, 10, 20, &RelationType::POST)?;
/// assert_eq!(relations.get_relations(de, 20, &RelationType::POST)?[&en], 10);
/// # Ok(())
/// # }
/// ```
pub struct ContentRelations<S> {
    store: Arc<S>,
    cache: Option<Arc<dyn Cache>>,
    config: RelationsConfig,
}

impl<S> ContentRelations<S>
where
    S: RelationStore,
    S::Error: StdError + Send + Sync + 'static,
{
    /// Create a resolver without a cache
    pub fn new(store: Arc<S>, config: RelationsConfig) -> Self {
        Self {
            store,
            cache: None,
            config,
        }
    }

    /// Attach a cache for group lookups
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn store_err(error: S::Error) -> RelationsError {
        RelationsError::Store(Box::new(error))
    }

    /// The translation group containing `(site, content_id)`
    ///
    /// Empty when `content_id` is 0 or the item has no relations.
    pub fn get_relations(
        &self,
        site: SiteId,
        content_id: ContentId,
        relation_type: &RelationType,
    ) -> Result<BTreeMap<SiteId, ContentId>, RelationsError> {
        if content_id == 0 {
            return Ok(BTreeMap::new());
        }

        let key = relations_cache_key(site, content_id, relation_type);
        if let Some(cached) = self.cached_group(&key) {
            debug!(site = site.value(), content_id, "Translation group cache hit");
            return Ok(cached);
        }

        let group = self
            .store
            .content_relations(site, content_id, relation_type)
            .map_err(Self::store_err)?;

        if let Some(cache) = &self.cache {
            let entries: Vec<(SiteId, ContentId)> =
                group.iter().map(|(site, content)| (*site, *content)).collect();
            if let Ok(value) = serde_json::to_string(&entries) {
                cache.set(&key, value, self.config.cache_ttl());
            }
        }

        Ok(group)
    }

    /// Current translation set generation of `(site, content_id)`
    ///
    /// `None` without a cache: writes could not invalidate anything, so
    /// translation sets must not be cached at all.
    pub fn translations_generation(
        &self,
        site: SiteId,
        content_id: ContentId,
        relation_type: &RelationType,
    ) -> Option<u64> {
        let cache = self.cache.as_ref()?;
        let key = translations_generation_key(site, content_id, relation_type);
        Some(read_generation(cache.as_ref(), &key))
    }

    fn cached_group(&self, key: &CacheKey) -> Option<BTreeMap<SiteId, ContentId>> {
        let raw = self.cache.as_ref()?.get(key)?;
        match serde_json::from_str::<Vec<(SiteId, ContentId)>>(&raw) {
            Ok(entries) => Some(entries.into_iter().collect()),
            Err(e) => {
                debug!(error = %e, "Discarding unreadable translation group cache entry");
                None
            }
        }
    }

    /// Find the canonical key of the group `(site_a, content_a)` and
    /// `(site_b, content_b)` belong to, creating or healing it as needed
    ///
    /// - no group yet: bootstraps one with a self row for `(site_a, content_a)`
    /// - one group: returns its key
    /// - several groups: keeps the first (in row order) and merges all others into it
    pub fn resolve_group_key(
        &self,
        site_a: SiteId,
        content_a: ContentId,
        site_b: SiteId,
        content_b: ContentId,
        relation_type: &RelationType,
    ) -> Result<GroupKey, RelationsError> {
        let members = [(site_a, content_a), (site_b, content_b)];
        let candidates = self
            .store
            .find_group_keys(&members, relation_type)
            .map_err(Self::store_err)?;

        let candidates = if candidates.is_empty() {
            let key = GroupKey::new(site_a, content_a);
            self.store
                .insert_content_row(&ContentRelation {
                    source_site_id: site_a,
                    source_content_id: content_a,
                    site_id: site_a,
                    content_id: content_a,
                    relation_type: relation_type.clone(),
                })
                .map_err(Self::store_err)?;

            // Refetch once: a concurrent caller may have bootstrapped the same item
            let refetched = self
                .store
                .find_group_keys(&members, relation_type)
                .map_err(Self::store_err)?;
            if refetched.is_empty() {
                vec![key]
            } else {
                refetched
            }
        } else {
            candidates
        };

        let (first, rest) = candidates
            .split_first()
            .map(|(first, rest)| (*first, rest))
            .ok_or_else(|| RelationsError::Store("Group bootstrap was not persisted".into()))?;

        if !rest.is_empty() {
            warn!(
                site = first.site_id.value(),
                content_id = first.content_id,
                duplicates = rest.len(),
                relation_type = %relation_type,
                "Healing duplicate translation groups"
            );
            self.invalidate_groups(rest, relation_type)?;
            self.store
                .merge_groups(first, rest, relation_type)
                .map_err(Self::store_err)?;
            self.invalidate_groups(&[first], relation_type)?;
        }

        Ok(first)
    }

    /// Link `(target_site, target_content)` to the group of `(source_site, source_content)`
    ///
    /// Returns `true` when a row was written and `false` when both items were
    /// already mapped as requested. A stale mapping for either site is deleted
    /// before the new row is inserted. `target_content == 0` unlinks
    /// `target_site` instead.
    pub fn set_relation(
        &self,
        source_site: SiteId,
        target_site: SiteId,
        source_content: ContentId,
        target_content: ContentId,
        relation_type: &RelationType,
    ) -> Result<bool, RelationsError> {
        if source_content == 0 {
            return Err(RelationsError::InvalidInput(
                "Source content id must be positive".to_string(),
            ));
        }
        if source_site == target_site && source_content != target_content {
            return Err(RelationsError::InvalidInput(format!(
                "Site {} cannot hold two items of one translation group",
                source_site
            )));
        }

        if target_content == 0 {
            return self.unlink_site(source_site, source_content, target_site, relation_type);
        }

        let key = self.resolve_group_key(
            source_site,
            source_content,
            target_site,
            target_content,
            relation_type,
        )?;

        let members = self
            .store
            .group_members(key, relation_type)
            .map_err(Self::store_err)?;

        // The key may come from the target's group, so the source needs the same upsert
        let source_written =
            self.upsert_member(key, &members, source_site, source_content, relation_type)?;
        let target_written =
            self.upsert_member(key, &members, target_site, target_content, relation_type)?;

        if !(source_written || target_written) {
            return Ok(false);
        }

        self.invalidate_rows(&members);
        self.invalidate(source_site, source_content, relation_type);
        self.invalidate(target_site, target_content, relation_type);

        debug!(
            source_site = source_site.value(),
            target_site = target_site.value(),
            source_content,
            target_content,
            "Content relation set"
        );
        Ok(true)
    }

    /// Make `site` map to `content_id` within group `key`; `false` when it already does
    fn upsert_member(
        &self,
        key: GroupKey,
        members: &[ContentRelation],
        site: SiteId,
        content_id: ContentId,
        relation_type: &RelationType,
    ) -> Result<bool, RelationsError> {
        let current = members.iter().find(|row| row.site_id == site);
        if current.is_some_and(|row| row.content_id == content_id) {
            return Ok(false);
        }

        // Replace, never update in place
        if current.is_some() {
            self.store
                .delete_content_row(key, site, relation_type)
                .map_err(Self::store_err)?;
        }

        self.store
            .insert_content_row(&ContentRelation {
                source_site_id: key.site_id,
                source_content_id: key.content_id,
                site_id: site,
                content_id,
                relation_type: relation_type.clone(),
            })
            .map_err(Self::store_err)
    }

    fn unlink_site(
        &self,
        source_site: SiteId,
        source_content: ContentId,
        target_site: SiteId,
        relation_type: &RelationType,
    ) -> Result<bool, RelationsError> {
        let group = self
            .store
            .content_relations(source_site, source_content, relation_type)
            .map_err(Self::store_err)?;

        match group.get(&target_site) {
            Some(target_content) => {
                let removed = self.delete_relation(
                    source_site,
                    target_site,
                    source_content,
                    *target_content,
                    relation_type,
                )?;
                Ok(removed > 0)
            }
            None => Ok(false),
        }
    }

    /// Remove `(target_site, target_content)` from the group of
    /// `(source_site, source_content)`
    ///
    /// A group left with a single row is removed entirely. Returns the number
    /// of rows deleted.
    pub fn delete_relation(
        &self,
        source_site: SiteId,
        target_site: SiteId,
        source_content: ContentId,
        target_content: ContentId,
        relation_type: &RelationType,
    ) -> Result<usize, RelationsError> {
        let keys = self
            .store
            .find_group_keys(&[(source_site, source_content)], relation_type)
            .map_err(Self::store_err)?;

        let before = self.group_rows(&keys, relation_type)?;

        let mut removed = self
            .store
            .delete_content_relation(
                source_site,
                target_site,
                source_content,
                target_content,
                relation_type,
            )
            .map_err(Self::store_err)?;

        for key in &keys {
            let remaining = self
                .store
                .group_members(*key, relation_type)
                .map_err(Self::store_err)?;
            if let [last] = remaining.as_slice() {
                removed += self
                    .store
                    .delete_content_row(*key, last.site_id, relation_type)
                    .map_err(Self::store_err)?;
            }
        }

        self.invalidate_rows(&before);
        Ok(removed)
    }

    /// Remove a decommissioned site from the network
    ///
    /// Deletes its site relations and every content relation row it holds.
    /// Returns the number of content rows deleted.
    pub fn delete_all_for_site(&self, site: SiteId) -> Result<usize, RelationsError> {
        let held = self
            .store
            .site_content_relations(site, None)
            .map_err(Self::store_err)?;

        let mut affected = Vec::new();
        let mut seen = BTreeSet::new();
        for row in &held {
            if seen.insert((row.group_key(), row.relation_type.clone())) {
                affected.extend(
                    self.store
                        .group_members(row.group_key(), &row.relation_type)
                        .map_err(Self::store_err)?,
                );
            }
        }

        let edges = self
            .store
            .delete_relations(site, None)
            .map_err(Self::store_err)?;
        let rows = self
            .store
            .delete_site_content_relations(site)
            .map_err(Self::store_err)?;

        self.invalidate_rows(&affected);
        info!(site = site.value(), edges, rows, "Removed site from network");
        Ok(rows)
    }

    /// Whether `site` holds any content relation, optionally of one type
    pub fn has_site_relations(
        &self,
        site: SiteId,
        relation_type: Option<&RelationType>,
    ) -> Result<bool, RelationsError> {
        let rows = self
            .store
            .site_content_relations(site, relation_type)
            .map_err(Self::store_err)?;
        Ok(!rows.is_empty())
    }

    /// Make `new_site`, a clone of `source`, part of everything `source` is part of
    ///
    /// `new_site` joins every translation group of `source` with the same
    /// content ids, and gets site relations to `source` and all its neighbours.
    /// Returns the number of content rows created.
    pub fn duplicate_relations(
        &self,
        source: SiteId,
        new_site: SiteId,
    ) -> Result<usize, RelationsError> {
        if source == new_site {
            return Ok(0);
        }

        let mut neighbours = self
            .store
            .related_sites(source)
            .map_err(Self::store_err)?;
        neighbours.push(source);
        let edges = self
            .store
            .set_relations(new_site, &neighbours)
            .map_err(Self::store_err)?;

        let rows = self
            .store
            .copy_site_content_relations(source, new_site)
            .map_err(Self::store_err)?;

        let held = self
            .store
            .site_content_relations(new_site, None)
            .map_err(Self::store_err)?;
        for row in &held {
            let members = self
                .store
                .group_members(row.group_key(), &row.relation_type)
                .map_err(Self::store_err)?;
            self.invalidate_rows(&members);
        }

        info!(
            source = source.value(),
            new_site = new_site.value(),
            edges,
            rows,
            "Duplicated site relations"
        );
        Ok(rows)
    }

    /// Relate each of `content_ids` on `source` to the same id on `target`
    ///
    /// Used when `target` holds a byte-identical copy of `source`'s content.
    /// Returns the number of relations written.
    pub fn relate_all_content_of_type<I>(
        &self,
        source: SiteId,
        target: SiteId,
        relation_type: &RelationType,
        content_ids: I,
    ) -> Result<usize, RelationsError>
    where
        I: IntoIterator<Item = ContentId>,
    {
        if source == target {
            return Ok(0);
        }

        let mut written = 0;
        for content_id in content_ids.into_iter().filter(|id| *id > 0) {
            if self.set_relation(source, target, content_id, content_id, relation_type)? {
                written += 1;
            }
        }

        info!(
            source = source.value(),
            target = target.value(),
            relation_type = %relation_type,
            written,
            "Related identical content"
        );
        Ok(written)
    }

    fn group_rows(
        &self,
        keys: &[GroupKey],
        relation_type: &RelationType,
    ) -> Result<Vec<ContentRelation>, RelationsError> {
        let mut rows = Vec::new();
        for key in keys {
            rows.extend(
                self.store
                    .group_members(*key, relation_type)
                    .map_err(Self::store_err)?,
            );
        }
        Ok(rows)
    }

    fn invalidate_groups(
        &self,
        keys: &[GroupKey],
        relation_type: &RelationType,
    ) -> Result<(), RelationsError> {
        if self.cache.is_none() {
            return Ok(());
        }
        let rows = self.group_rows(keys, relation_type)?;
        self.invalidate_rows(&rows);
        Ok(())
    }

    fn invalidate_rows(&self, rows: &[ContentRelation]) {
        for row in rows {
            self.invalidate(row.site_id, row.content_id, &row.relation_type);
        }
    }

    fn invalidate(&self, site: SiteId, content_id: ContentId, relation_type: &RelationType) {
        let Some(cache) = &self.cache else {
            return;
        };
        cache.delete(&relations_cache_key(site, content_id, relation_type));

        let key = translations_generation_key(site, content_id, relation_type);
        let generation = next_generation(read_generation(cache.as_ref(), &key));
        cache.set(&key, generation.to_string(), None);
    }
}

fn read_generation(cache: &dyn Cache, key: &CacheKey) -> u64 {
    cache
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0)
}

/// Clock based, so a generation lost to eviction never comes back with an old value
fn next_generation(current: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0);
    now.max(current.saturating_add(1))
}
