//! Integration tests for polyglot-relations
//!
//! Runs the content relation resolver against an in-memory SQLite store.

use polyglot_domain::traits::{Cache, RelationStore};
use polyglot_domain::{CacheKey, ContentId, ContentRelation, GroupKey, RelationType, SiteId};
use polyglot_relations::{
    relations_cache_key, translations_generation_key, ContentRelations, RelationsConfig,
    RelationsError,
};
use polyglot_store::{SqliteStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn site(id: u64) -> SiteId {
    SiteId::new(id).unwrap()
}

fn relations() -> ContentRelations<SqliteStore> {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    ContentRelations::new(store, RelationsConfig::default())
}

/// Minimal cache recording every deleted key
#[derive(Default)]
struct RecordingCache {
    entries: Mutex<HashMap<String, String>>,
    deleted: Mutex<Vec<String>>,
}

impl Cache for RecordingCache {
    fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.lock().unwrap().get(&key.digest()).cloned()
    }

    fn set(&self, key: &CacheKey, value: String, _ttl: Option<Duration>) {
        self.entries.lock().unwrap().insert(key.digest(), value);
    }

    fn delete(&self, key: &CacheKey) -> bool {
        self.deleted.lock().unwrap().push(key.digest());
        self.entries.lock().unwrap().remove(&key.digest()).is_some()
    }
}

// ==================== set_relation ====================

#[test]
fn test_round_trip() {
    let relations = relations();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();

    let group = relations
        .get_relations(site(1), 10, &RelationType::POST)
        .unwrap();
    assert_eq!(group.get(&site(2)), Some(&20));
    // The self entry is part of the group
    assert_eq!(group.get(&site(1)), Some(&10));
}

#[test]
fn test_first_use_bootstraps_group_with_source_key() {
    let relations = relations();
    relations
        .set_relation(site(3), site(1), 30, 10, &RelationType::POST)
        .unwrap();

    let keys = relations
        .store()
        .find_group_keys(&[(site(1), 10)], &RelationType::POST)
        .unwrap();
    assert_eq!(keys, vec![GroupKey::new(site(3), 30)]);
}

#[test]
fn test_unchanged_target_performs_no_write() {
    let relations = relations();
    assert!(relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap());
    let rows_before = relations.store().content_row_count().unwrap();

    assert!(!relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap());
    // Either side may act as the source
    assert!(!relations
        .set_relation(site(2), site(1), 20, 10, &RelationType::POST)
        .unwrap());
    assert_eq!(relations.store().content_row_count().unwrap(), rows_before);
}

#[test]
fn test_stale_target_is_replaced() {
    let relations = relations();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(1), site(2), 10, 21, &RelationType::POST)
        .unwrap();

    let group = relations
        .get_relations(site(1), 10, &RelationType::POST)
        .unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!(group[&site(2)], 21);

    assert!(relations
        .get_relations(site(2), 20, &RelationType::POST)
        .unwrap()
        .is_empty());
}

#[test]
fn test_source_joins_targets_existing_group() {
    let relations = relations();
    relations
        .set_relation(site(2), site(3), 20, 30, &RelationType::POST)
        .unwrap();

    // Site 1 is new; the group is found through the target
    assert!(relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap());

    let group = relations
        .get_relations(site(1), 10, &RelationType::POST)
        .unwrap();
    assert_eq!(group.len(), 3);
    assert_eq!(group[&site(3)], 30);
}

#[test]
fn test_types_are_independent() {
    let relations = relations();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(1), site(2), 10, 99, &RelationType::TERM)
        .unwrap();

    assert_eq!(
        relations
            .get_relations(site(1), 10, &RelationType::POST)
            .unwrap()[&site(2)],
        20
    );
    assert_eq!(
        relations
            .get_relations(site(1), 10, &RelationType::TERM)
            .unwrap()[&site(2)],
        99
    );
}

#[test]
fn test_invalid_input() {
    let relations = relations();

    let result = relations.set_relation(site(1), site(2), 0, 20, &RelationType::POST);
    assert!(matches!(result, Err(RelationsError::InvalidInput(_))));

    let result = relations.set_relation(site(1), site(1), 10, 11, &RelationType::POST);
    assert!(matches!(result, Err(RelationsError::InvalidInput(_))));
}

#[test]
fn test_zero_target_unlinks() {
    let relations = relations();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap();

    assert!(relations
        .set_relation(site(1), site(2), 10, 0, &RelationType::POST)
        .unwrap());
    let group = relations
        .get_relations(site(1), 10, &RelationType::POST)
        .unwrap();
    assert!(!group.contains_key(&site(2)));
    assert_eq!(group.len(), 2);

    // Nothing left to unlink
    assert!(!relations
        .set_relation(site(1), site(2), 10, 0, &RelationType::POST)
        .unwrap());
}

// ==================== Duplicate healing ====================

#[test]
fn test_duplicate_groups_converge() {
    let relations = relations();

    // Two independent bootstraps of what is one logical item
    relations
        .resolve_group_key(site(1), 10, site(1), 10, &RelationType::POST)
        .unwrap();
    relations
        .resolve_group_key(site(2), 20, site(2), 20, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(2), site(4), 20, 40, &RelationType::POST)
        .unwrap();

    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();

    let group = relations
        .get_relations(site(4), 40, &RelationType::POST)
        .unwrap();
    assert_eq!(group.len(), 4);
    assert_eq!(group[&site(1)], 10);
    assert_eq!(group[&site(3)], 30);

    let keys = relations
        .store()
        .find_group_keys(
            &[(site(1), 10), (site(2), 20), (site(3), 30), (site(4), 40)],
            &RelationType::POST,
        )
        .unwrap();
    assert_eq!(keys, vec![GroupKey::new(site(1), 10)]);
}

#[test]
fn test_merge_keeps_oldest_group_deterministically() {
    let relations = relations();
    relations
        .resolve_group_key(site(2), 20, site(2), 20, &RelationType::POST)
        .unwrap();
    relations
        .resolve_group_key(site(1), 10, site(1), 10, &RelationType::POST)
        .unwrap();

    let key = relations
        .resolve_group_key(site(1), 10, site(2), 20, &RelationType::POST)
        .unwrap();
    assert_eq!(key, GroupKey::new(site(2), 20));

    // Repeating converges on the same key
    let again = relations
        .resolve_group_key(site(2), 20, site(1), 10, &RelationType::POST)
        .unwrap();
    assert_eq!(again, key);
}

#[test]
fn test_three_duplicate_groups_collapse_into_the_first() {
    let relations = relations();
    let row = |key: (u64, ContentId), member: (u64, ContentId)| ContentRelation {
        source_site_id: site(key.0),
        source_content_id: key.1,
        site_id: site(member.0),
        content_id: member.1,
        relation_type: RelationType::POST,
    };

    // (1,10) sits in two groups, (2,20) in a third
    for (key, member) in [
        ((1, 10), (1, 10)),
        ((5, 50), (5, 50)),
        ((5, 50), (1, 10)),
        ((2, 20), (2, 20)),
        ((2, 20), (3, 30)),
    ] {
        assert!(relations.store().insert_content_row(&row(key, member)).unwrap());
    }

    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();

    let keys = relations
        .store()
        .find_group_keys(
            &[(site(1), 10), (site(2), 20), (site(3), 30), (site(5), 50)],
            &RelationType::POST,
        )
        .unwrap();
    assert_eq!(keys, vec![GroupKey::new(site(1), 10)]);

    let group = relations
        .get_relations(site(3), 30, &RelationType::POST)
        .unwrap();
    assert_eq!(group.len(), 4);
    assert_eq!(group[&site(1)], 10);
    assert_eq!(group[&site(2)], 20);
    assert_eq!(group[&site(5)], 50);
    // The second (1,10) row was dropped in the merge
    assert_eq!(relations.store().content_row_count().unwrap(), 4);
}

// ==================== delete_relation ====================

#[test]
fn test_delete_relation_removes_single_row_group() {
    let relations = relations();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();

    let removed = relations
        .delete_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    // Target row plus the orphaned source row
    assert_eq!(removed, 2);
    assert_eq!(relations.store().content_row_count().unwrap(), 0);
}

#[test]
fn test_delete_relation_keeps_larger_group() {
    let relations = relations();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap();

    let removed = relations
        .delete_relation(site(3), site(2), 30, 20, &RelationType::POST)
        .unwrap();
    assert_eq!(removed, 1);

    let group = relations
        .get_relations(site(1), 10, &RelationType::POST)
        .unwrap();
    assert_eq!(group.len(), 2);
}

// ==================== Site level operations ====================

#[test]
fn test_has_site_relations() {
    let relations = relations();
    assert!(!relations.has_site_relations(site(2), None).unwrap());

    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::TERM)
        .unwrap();
    assert!(relations.has_site_relations(site(2), None).unwrap());
    assert!(relations
        .has_site_relations(site(2), Some(&RelationType::TERM))
        .unwrap());
    assert!(!relations
        .has_site_relations(site(2), Some(&RelationType::POST))
        .unwrap());
}

#[test]
fn test_delete_all_for_site() {
    let relations = relations();
    relations.store().set_relations(site(1), &[site(2), site(3)]).unwrap();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap();

    relations.delete_all_for_site(site(2)).unwrap();

    assert!(!relations.has_site_relations(site(2), None).unwrap());
    assert_eq!(relations.store().related_sites(site(1)).unwrap(), vec![site(3)]);
    assert_eq!(
        relations
            .get_relations(site(1), 10, &RelationType::POST)
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_duplicate_relations_onto_cloned_site() {
    let relations = relations();
    relations.store().set_relations(site(1), &[site(2)]).unwrap();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    relations
        .set_relation(site(1), site(2), 5, 6, &RelationType::TERM)
        .unwrap();

    let created = relations.duplicate_relations(site(1), site(9)).unwrap();
    assert_eq!(created, 2);

    assert_eq!(
        relations.store().related_sites(site(9)).unwrap(),
        vec![site(1), site(2)]
    );
    let group = relations
        .get_relations(site(2), 20, &RelationType::POST)
        .unwrap();
    assert_eq!(group[&site(9)], 10);
    let terms = relations
        .get_relations(site(9), 5, &RelationType::TERM)
        .unwrap();
    assert_eq!(terms[&site(2)], 6);
}

#[test]
fn test_relate_all_content_of_type() {
    let relations = relations();
    let written = relations
        .relate_all_content_of_type(site(1), site(2), &RelationType::POST, [1, 2, 0, 3])
        .unwrap();
    assert_eq!(written, 3);

    for id in [1, 2, 3] {
        let group = relations
            .get_relations(site(2), id, &RelationType::POST)
            .unwrap();
        assert_eq!(group[&site(1)], id);
    }

    // Second run finds everything in place
    let written = relations
        .relate_all_content_of_type(site(1), site(2), &RelationType::POST, [1, 2, 3])
        .unwrap();
    assert_eq!(written, 0);
}

// ==================== Caching ====================

#[test]
fn test_group_lookup_is_cached_and_invalidated() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let cache = Arc::new(RecordingCache::default());
    let relations =
        ContentRelations::new(store, RelationsConfig::default()).with_cache(cache.clone());

    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    let first = relations
        .get_relations(site(2), 20, &RelationType::POST)
        .unwrap();
    assert_eq!(first.len(), 2);

    let key = relations_cache_key(site(2), 20, &RelationType::POST);
    assert!(cache.get(&key).is_some());

    relations
        .set_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap();
    assert!(cache.deleted.lock().unwrap().contains(&key.digest()));

    let second = relations
        .get_relations(site(2), 20, &RelationType::POST)
        .unwrap();
    assert_eq!(second.len(), 3);
}

#[test]
fn test_writes_bump_translation_generations() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let cache = Arc::new(RecordingCache::default());
    let relations =
        ContentRelations::new(store, RelationsConfig::default()).with_cache(cache.clone());
    let generation = |site_id: u64, content_id: ContentId| {
        relations
            .translations_generation(site(site_id), content_id, &RelationType::POST)
            .unwrap()
    };

    assert_eq!(generation(2, 20), 0);

    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    let linked = generation(2, 20);
    assert!(linked > 0);
    assert!(cache
        .get(&translations_generation_key(site(1), 10, &RelationType::POST))
        .is_some());

    // A write elsewhere in the group reaches every member
    relations
        .set_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap();
    let extended = generation(2, 20);
    assert!(extended > linked);

    // No-op writes leave generations alone
    assert!(!relations
        .set_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap());
    assert_eq!(generation(2, 20), extended);

    relations
        .delete_relation(site(1), site(3), 10, 30, &RelationType::POST)
        .unwrap();
    let deleted = generation(2, 20);
    assert!(deleted > extended);
    assert!(generation(3, 30) > 0);

    relations.duplicate_relations(site(1), site(9)).unwrap();
    let duplicated = generation(2, 20);
    assert!(duplicated > deleted);

    relations.delete_all_for_site(site(9)).unwrap();
    assert!(generation(2, 20) > duplicated);
}

#[test]
fn test_no_translation_generation_without_cache() {
    let relations = relations();
    relations
        .set_relation(site(1), site(2), 10, 20, &RelationType::POST)
        .unwrap();
    assert_eq!(
        relations.translations_generation(site(1), 10, &RelationType::POST),
        None
    );
}

// ==================== Errors ====================

#[test]
fn test_store_failure_keeps_its_type() {
    let relations = relations();
    let error = relations
        .get_relations(site(u64::MAX), 10, &RelationType::POST)
        .unwrap_err();

    let RelationsError::Store(inner) = &error else {
        panic!("expected a storage error, got {error:?}");
    };
    assert!(matches!(
        inner.downcast_ref::<StoreError>(),
        Some(StoreError::InvalidData(_))
    ));
    let source = std::error::Error::source(&error)
        .and_then(|source| source.downcast_ref::<StoreError>());
    assert!(source.is_some());
}

#[test]
fn test_zero_content_id_is_empty() {
    let relations = relations();
    assert!(relations
        .get_relations(site(1), 0, &RelationType::POST)
        .unwrap()
        .is_empty());
}
