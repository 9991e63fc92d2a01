//! Integration tests for the Redis command families.
//!
//! Each test starts Redis (or uses `KEDAI_TEST_REDIS_URL`) and is skipped
//! when neither is available.

mod common;

use common::TestRedis;
use kedai_store::{Batch, GroupStart, KeyTtl, RedisList, RedisMap, RedisSet, RedisZSet};
use std::collections::HashSet;
use std::time::Duration;

macro_rules! redis_or_skip {
    () => {
        match TestRedis::start().await {
            Some(redis) => redis,
            None => return,
        }
    };
}

// ============================================================================
// Keys and strings
// ============================================================================

#[tokio::test]
async fn test_string_expires_after_ttl() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("name");

    store
        .values()
        .set_ex(&key, "Eko", Duration::from_secs(2))
        .await
        .unwrap();
    assert_eq!(store.values().get(&key).await.unwrap(), Some("Eko".to_string()));

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(store.values().get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn test_key_ttl_and_delete() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("counter");

    assert_eq!(store.keys().ttl(&key).await.unwrap(), KeyTtl::Missing);

    assert_eq!(store.values().increment(&key, 5).await.unwrap(), 5);
    assert_eq!(store.values().increment(&key, -2).await.unwrap(), 3);
    assert_eq!(store.keys().ttl(&key).await.unwrap(), KeyTtl::Persistent);

    assert!(store.keys().expire(&key, Duration::from_secs(60)).await.unwrap());
    let remaining = store.keys().ttl(&key).await.unwrap().remaining().unwrap();
    assert!(remaining <= Duration::from_secs(60));
    assert!(remaining > Duration::from_secs(50));

    assert!(store.keys().exists(&key).await.unwrap());
    assert_eq!(store.keys().delete(&[key.as_str()]).await.unwrap(), 1);
    assert!(!store.keys().exists(&key).await.unwrap());
}

// ============================================================================
// Collections
// ============================================================================

#[tokio::test]
async fn test_list_is_fifo_with_right_push_left_pop() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("names");

    store
        .lists()
        .right_push(&key, &["Eko", "Kurniawan", "Khannedy"])
        .await
        .unwrap();
    assert_eq!(store.lists().len(&key).await.unwrap(), 3);

    assert_eq!(store.lists().left_pop(&key).await.unwrap().as_deref(), Some("Eko"));
    assert_eq!(
        store.lists().left_pop(&key).await.unwrap().as_deref(),
        Some("Kurniawan")
    );
    assert_eq!(
        store.lists().left_pop(&key).await.unwrap().as_deref(),
        Some("Khannedy")
    );
    assert_eq!(store.lists().left_pop(&key).await.unwrap(), None);
}

#[tokio::test]
async fn test_list_left_push_and_right_pop() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("stack");

    store.lists().left_push(&key, &["a", "b", "c"]).await.unwrap();
    assert_eq!(store.lists().range(&key, 0, -1).await.unwrap(), vec!["c", "b", "a"]);
    assert_eq!(store.lists().right_pop(&key).await.unwrap().as_deref(), Some("a"));
}

#[tokio::test]
async fn test_set_deduplicates_members() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("students");

    store.sets().add(&key, &["Eko", "Eko", "Kurniawan"]).await.unwrap();
    store.sets().add(&key, &["Kurniawan", "Khannedy"]).await.unwrap();

    assert_eq!(store.sets().card(&key).await.unwrap(), 3);
    let expected: HashSet<String> = ["Eko", "Kurniawan", "Khannedy"]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(store.sets().members(&key).await.unwrap(), expected);

    assert_eq!(store.sets().remove(&key, &["Eko"]).await.unwrap(), 1);
    assert!(!store.sets().is_member(&key, "Eko").await.unwrap());
}

#[tokio::test]
async fn test_sorted_set_pops_highest_score_first() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("score");

    store.zsets().add(&key, "Eko", 100.0).await.unwrap();
    store.zsets().add(&key, "Budi", 85.0).await.unwrap();
    store.zsets().add(&key, "Joko", 90.0).await.unwrap();

    assert_eq!(store.zsets().card(&key).await.unwrap(), 3);
    assert_eq!(store.zsets().score(&key, "Joko").await.unwrap(), Some(90.0));
    assert_eq!(
        store.zsets().range(&key, 0, -1).await.unwrap(),
        vec!["Budi", "Joko", "Eko"]
    );

    let popped: Vec<String> = [
        store.zsets().pop_max(&key).await.unwrap(),
        store.zsets().pop_max(&key).await.unwrap(),
        store.zsets().pop_max(&key).await.unwrap(),
    ]
    .into_iter()
    .flatten()
    .map(|(member, _)| member)
    .collect();
    assert_eq!(popped, vec!["Eko", "Joko", "Budi"]);
    assert_eq!(store.zsets().pop_min(&key).await.unwrap(), None);
}

#[tokio::test]
async fn test_hash_fields() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("user:1");

    store
        .hashes()
        .put_all(&key, &[("id", "1"), ("name", "Eko")])
        .await
        .unwrap();
    assert!(store.hashes().put(&key, "email", "eko@example.com").await.unwrap());
    assert!(!store.hashes().put(&key, "name", "Eko K").await.unwrap());

    assert_eq!(store.hashes().len(&key).await.unwrap(), 3);
    assert_eq!(
        store.hashes().get(&key, "name").await.unwrap().as_deref(),
        Some("Eko K")
    );

    assert!(store.hashes().delete(&key, "email").await.unwrap());
    let entries = store.hashes().entries(&key).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["id"], "1");
}

#[tokio::test]
async fn test_hyperloglog_counts_distinct_elements() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("traffics");

    store.hyperloglog().add(&key, &["eko", "kurniawan", "khannedy"]).await.unwrap();
    store.hyperloglog().add(&key, &["eko", "budi", "joko"]).await.unwrap();
    store.hyperloglog().add(&key, &["budi", "joko", "rully"]).await.unwrap();

    assert_eq!(store.hyperloglog().count(&[key.as_str()]).await.unwrap(), 6);
}

#[tokio::test]
async fn test_hyperloglog_merge() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let monday = redis.key("visitors:mon");
    let tuesday = redis.key("visitors:tue");
    let week = redis.key("visitors:week");

    store.hyperloglog().add(&monday, &["a", "b"]).await.unwrap();
    store.hyperloglog().add(&tuesday, &["b", "c"]).await.unwrap();
    store
        .hyperloglog()
        .merge(&week, &[monday.as_str(), tuesday.as_str()])
        .await
        .unwrap();

    assert_eq!(store.hyperloglog().count(&[week.as_str()]).await.unwrap(), 3);
}

// ============================================================================
// Batches
// ============================================================================

#[tokio::test]
async fn test_transaction_writes_are_visible_after_exec() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let first = redis.key("test1");
    let second = redis.key("test2");

    let statuses = Batch::transaction()
        .set_ex(&first, "Eko", Duration::from_secs(2))
        .set_ex(&second, "Budi", Duration::from_secs(2))
        .execute(store.as_ref())
        .await
        .unwrap();

    assert_eq!(statuses, vec![true, true]);
    assert_eq!(store.values().get(&first).await.unwrap().as_deref(), Some("Eko"));
    assert_eq!(store.values().get(&second).await.unwrap().as_deref(), Some("Budi"));
}

#[tokio::test]
async fn test_pipeline_statuses_are_all_true() {
    let redis = redis_or_skip!();
    let store = redis.store();

    let mut batch = Batch::pipeline();
    for i in 1..=4 {
        batch = batch.set_ex(&redis.key(&format!("test{}", i)), "Eko", Duration::from_secs(2));
    }

    let statuses = batch.execute(store.as_ref()).await.unwrap();
    assert_eq!(statuses.len(), 4);
    assert!(statuses.iter().all(|ok| *ok));
}

#[tokio::test]
async fn test_pipeline_mixed_commands() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let list = redis.key("queue");
    let set = redis.key("tags");
    let hash = redis.key("doc");

    let statuses = Batch::pipeline()
        .right_push(&list, "job-1")
        .add_to_set(&set, "rust")
        .add_to_set(&set, "rust")
        .hash_put(&hash, &[("title", "Kedai")])
        .expire(&hash, Duration::from_secs(30))
        .delete(&redis.key("absent"))
        .execute(store.as_ref())
        .await
        .unwrap();

    // The duplicate SADD and the DEL of a missing key both reply 0
    assert_eq!(statuses, vec![true, true, false, true, true, false]);
}

// ============================================================================
// Streams
// ============================================================================

#[tokio::test]
async fn test_stream_consumer_group_reads_each_entry_once() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("stream-1");

    assert!(store
        .streams()
        .create_group(&key, "sample-group", GroupStart::Latest)
        .await
        .unwrap());
    // Second create is tolerated
    assert!(!store
        .streams()
        .create_group(&key, "sample-group", GroupStart::Latest)
        .await
        .unwrap());

    for _ in 0..10 {
        store
            .streams()
            .add(&key, &[("name", "Eko Kurniawan"), ("address", "Indonesia")])
            .await
            .unwrap();
    }
    assert_eq!(store.streams().len(&key).await.unwrap(), 10);

    let records = store
        .streams()
        .read_group(&key, "sample-group", "sample-1", 100)
        .await
        .unwrap();
    assert_eq!(records.len(), 10);
    assert_eq!(records[0].fields["name"], "Eko Kurniawan");
    assert_eq!(records[0].fields["address"], "Indonesia");

    let again = store
        .streams()
        .read_group(&key, "sample-group", "sample-2", 100)
        .await
        .unwrap();
    assert!(again.is_empty());

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(store.streams().ack(&key, "sample-group", &ids).await.unwrap(), 10);
}

#[tokio::test]
async fn test_stream_group_from_beginning_sees_history() {
    let redis = redis_or_skip!();
    let store = redis.store();
    let key = redis.key("history");

    store.streams().add(&key, &[("n", "1")]).await.unwrap();
    store.streams().add(&key, &[("n", "2")]).await.unwrap();
    store
        .streams()
        .create_group(&key, "replay", GroupStart::Beginning)
        .await
        .unwrap();

    let records = store
        .streams()
        .read_group(&key, "replay", "c1", 1)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields["n"], "1");
}

// ============================================================================
// Collection views
// ============================================================================

#[tokio::test]
async fn test_redis_list_view() {
    let redis = redis_or_skip!();
    let list = RedisList::new(redis.store(), redis.key("names"));

    list.push("Eko").await.unwrap();
    list.extend(&["Kurniawan", "Khannedy"]).await.unwrap();

    assert_eq!(list.to_vec().await.unwrap(), vec!["Eko", "Kurniawan", "Khannedy"]);
    assert_eq!(list.get(1).await.unwrap().as_deref(), Some("Kurniawan"));

    // Same data is visible through the raw list commands
    let raw = redis.store().lists().range(list.key(), 0, -1).await.unwrap();
    assert_eq!(raw, vec!["Eko", "Kurniawan", "Khannedy"]);

    list.clear().await.unwrap();
    assert!(list.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_redis_set_view() {
    let redis = redis_or_skip!();
    let set = RedisSet::new(redis.store(), redis.key("traffic"));

    assert!(set.insert("eko").await.unwrap());
    assert!(!set.insert("eko").await.unwrap());
    assert!(set.insert("budi").await.unwrap());

    assert_eq!(set.len().await.unwrap(), 2);
    assert!(set.contains("budi").await.unwrap());
    assert!(set.remove("budi").await.unwrap());
    assert!(!set.contains("budi").await.unwrap());
}

#[tokio::test]
async fn test_redis_zset_view() {
    let redis = redis_or_skip!();
    let zset = RedisZSet::new(redis.store(), redis.key("winner"));

    zset.insert("Eko", 100.0).await.unwrap();
    zset.insert("Budi", 85.0).await.unwrap();
    zset.insert("Joko", 90.0).await.unwrap();

    assert_eq!(zset.members().await.unwrap(), vec!["Budi", "Joko", "Eko"]);
    assert_eq!(zset.pop_last().await.unwrap(), Some(("Eko".to_string(), 100.0)));
    assert_eq!(zset.pop_first().await.unwrap(), Some(("Budi".to_string(), 85.0)));
    assert_eq!(zset.len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_redis_map_view() {
    let redis = redis_or_skip!();
    let map = RedisMap::new(redis.store(), redis.key("user:1"));

    map.insert("name", "Eko").await.unwrap();
    map.insert("address", "Indonesia").await.unwrap();

    assert!(map.contains_key("name").await.unwrap());
    assert_eq!(map.len().await.unwrap(), 2);

    let entries = map.entries().await.unwrap();
    assert_eq!(entries["address"], "Indonesia");

    assert!(map.remove("address").await.unwrap());
    assert_eq!(map.get("address").await.unwrap(), None);
}
