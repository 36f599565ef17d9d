//! Concurrent, bounded store of game records with status-driven refresh and
//! pruning.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::{
    dto::game::{Game, GameStatus},
    upstream::{MlbClient, UpstreamError},
};

/// Default bound on the number of cached games.
pub const DEFAULT_CAPACITY: usize = 255;

/// Failures surfaced by cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The capacity bound was hit; existing entries are never displaced.
    #[error("game cache is full with {0} games")]
    Full(usize),
    /// The id is not present, not even as a placeholder.
    #[error("game {0} is not in the cache")]
    Missing(u32),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Result of one audit sweep: ids refreshed with changes, ids pruned, and ids
/// whose refresh failed. The three lists are pairwise disjoint.
#[derive(Debug, Default)]
pub struct AuditOutcome {
    pub updated: Vec<u32>,
    pub removed: Vec<u32>,
    pub failed: Vec<u32>,
}

/// Keyed store of [`Game`] records, safe for concurrent readers and writers.
///
/// Entries move through two phases: discovered (link known, state empty) and
/// ready (hydrated at least once). Refreshes project the upstream payload
/// outside the map and write the finished record in one step, so no lock is
/// held across I/O.
pub struct GameCache {
    upstream: MlbClient,
    games: DashMap<u32, Game>,
    occupancy: AtomicUsize,
    capacity: usize,
}

impl GameCache {
    pub fn with_capacity(upstream: MlbClient, capacity: usize) -> Self {
        Self {
            upstream,
            games: DashMap::new(),
            occupancy: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Insert a placeholder for a newly scheduled game. Returns `Ok(true)` on
    /// insertion, `Ok(false)` when the id is already present (the stored link
    /// is left untouched), and [`CacheError::Full`] at capacity.
    pub fn discover(&self, id: u32, link: String) -> Result<bool, CacheError> {
        match self.games.entry(id) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let reserved = self.occupancy.fetch_update(
                    Ordering::AcqRel,
                    Ordering::Acquire,
                    |occupied| (occupied < self.capacity).then_some(occupied + 1),
                );
                if reserved.is_err() {
                    return Err(CacheError::Full(self.capacity));
                }
                slot.insert(Game::discovered(id, link));
                Ok(true)
            }
        }
    }

    /// Refresh one entry from upstream. Returns `Ok(true)` when the stored
    /// record changed, `Ok(false)` when the re-projected record is
    /// content-equal (the stored record, timestamp included, is retained).
    pub async fn fetch(&self, cancel: &CancellationToken, id: u32) -> Result<bool, CacheError> {
        let link = self
            .games
            .get(&id)
            .map(|entry| entry.link.clone())
            .ok_or(CacheError::Missing(id))?;

        let fresh = self.upstream.fetch_game(cancel, &link).await?;

        match self.games.entry(id) {
            Entry::Occupied(mut entry) => {
                if entry.get().same_content(&fresh) {
                    Ok(false)
                } else {
                    entry.insert(fresh);
                    Ok(true)
                }
            }
            // Pruned while the request was in flight; do not resurrect it.
            Entry::Vacant(_) => Ok(false),
        }
    }

    /// Fetch one ready record, hydrating a placeholder on the spot. `None`
    /// when the id is absent or still unready after the attempt.
    pub async fn get_one(&self, cancel: &CancellationToken, id: u32) -> Option<Game> {
        let current = self.games.get(&id).map(|entry| entry.value().clone())?;
        if current.metadata.ready {
            return Some(current);
        }

        match self.fetch(cancel, id).await {
            Ok(true) => self
                .games
                .get(&id)
                .map(|entry| entry.value().clone())
                .filter(|game| game.metadata.ready),
            Ok(false) => None,
            Err(err) => {
                warn!(game = id, error = %err, "failed to hydrate game");
                None
            }
        }
    }

    /// Snapshot of every ready record, in no particular order.
    pub fn get_all(&self) -> Vec<Game> {
        self.games
            .iter()
            .filter(|entry| entry.metadata.ready)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Remove an entry; no-op when absent.
    pub fn delete(&self, id: u32) {
        if self.games.remove(&id).is_some() {
            self.occupancy.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Number of entries currently held, placeholders included.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Insert a record directly, bypassing discovery and hydration.
    #[cfg(test)]
    pub(crate) fn seed(&self, game: Game) {
        self.occupancy.fetch_add(1, Ordering::AcqRel);
        self.games.insert(game.id, game);
    }

    /// Sweep the store: refresh entries that are stale for their status and
    /// prune entries that are finished or postponed. Each key is its own
    /// transaction; the sweep is not atomic across keys.
    pub async fn audit(&self, cancel: &CancellationToken) -> AuditOutcome {
        let snapshot: Vec<(u32, GameStatus, DateTime<Utc>, DateTime<Utc>)> = self
            .games
            .iter()
            .map(|entry| {
                (
                    entry.id,
                    entry.state.status.general,
                    entry.metadata.timestamp,
                    entry.state.status.start_time.date_time,
                )
            })
            .collect();

        let mut outcome = AuditOutcome::default();
        for (id, status, written, start) in snapshot {
            let now = Utc::now();
            if refresh_due(status, now - written) {
                match self.fetch(cancel, id).await {
                    Ok(true) => outcome.updated.push(id),
                    Ok(false) => {}
                    Err(err) => {
                        warn!(game = id, error = %err, "failed to refresh game");
                        outcome.failed.push(id);
                    }
                }
            } else if prune_due(status, now, start) {
                self.delete(id);
                outcome.removed.push(id);
            }
        }
        outcome
    }
}

/// A record is stale once its age exceeds the refresh interval for its
/// status: live games move every pitch, previews and finals barely at all.
fn refresh_due(status: GameStatus, age: TimeDelta) -> bool {
    match status {
        GameStatus::Live => age > TimeDelta::seconds(5),
        GameStatus::Preview => age > TimeDelta::minutes(15),
        GameStatus::Final => age > TimeDelta::minutes(30),
    }
}

/// Finals that started over 15 hours ago are over for good; previews whose
/// first pitch sits more than a day out have been postponed.
fn prune_due(status: GameStatus, now: DateTime<Utc>, start: DateTime<Utc>) -> bool {
    match status {
        GameStatus::Final => now - start > TimeDelta::hours(15),
        GameStatus::Preview => start - now > TimeDelta::hours(24),
        GameStatus::Live => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::dto::game::{Metadata, StartTime, State, Status};

    use super::*;

    fn test_cache(capacity: usize) -> GameCache {
        // The address is never dialed; every test below stays off the network.
        let upstream = MlbClient::new("http://127.0.0.1:9").unwrap();
        GameCache::with_capacity(upstream, capacity)
    }

    fn ready_game(id: u32, status: GameStatus, start: DateTime<Utc>) -> Game {
        Game {
            metadata: Metadata::new(true),
            link: format!("http://example.invalid/game/{id}"),
            id,
            state: State {
                status: Status {
                    general: status,
                    detailed: String::new(),
                    start_time: StartTime { date_time: start },
                },
                ..State::default()
            },
        }
    }

    #[test]
    fn discover_inserts_once_and_preserves_link() {
        let cache = test_cache(8);
        assert!(cache.discover(745000, "http://a".into()).unwrap());
        assert!(!cache.discover(745000, "http://b".into()).unwrap());

        let stored = cache.games.get(&745000).unwrap();
        assert_eq!(stored.link, "http://a");
        assert!(!stored.metadata.ready);
        assert_eq!(stored.state, State::default());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn discover_rejects_when_full_and_leaves_store_unchanged() {
        let cache = test_cache(2);
        cache.discover(1, "http://a".into()).unwrap();
        cache.discover(2, "http://b".into()).unwrap();

        let err = cache.discover(3, "http://c".into()).unwrap_err();
        assert!(matches!(err, CacheError::Full(2)));
        assert_eq!(cache.len(), 2);

        // A present id is still reported as already known, not as full.
        assert!(!cache.discover(1, "http://z".into()).unwrap());
    }

    #[test]
    fn delete_frees_capacity() {
        let cache = test_cache(1);
        cache.discover(1, "http://a".into()).unwrap();
        cache.delete(1);
        assert!(cache.is_empty());
        assert!(cache.discover(2, "http://b".into()).unwrap());
    }

    #[test]
    fn delete_is_a_noop_for_unknown_ids() {
        let cache = test_cache(1);
        cache.discover(1, "http://a".into()).unwrap();
        cache.delete(42);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_all_returns_only_ready_entries() {
        let cache = test_cache(8);
        cache.discover(1, "http://a".into()).unwrap();
        cache.seed(ready_game(2, GameStatus::Live, Utc::now()));

        let all = cache.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 2);
    }

    #[tokio::test]
    async fn get_one_returns_none_for_absent_ids() {
        let cache = test_cache(8);
        assert!(cache.get_one(&CancellationToken::new(), 1).await.is_none());
    }

    #[tokio::test]
    async fn get_one_on_failed_hydration_keeps_entry_unready() {
        let cache = test_cache(8);
        cache.discover(1, "http://127.0.0.1:9/game".into()).unwrap();

        assert!(cache.get_one(&CancellationToken::new(), 1).await.is_none());
        assert!(!cache.games.get(&1).unwrap().metadata.ready);
    }

    #[tokio::test]
    async fn audit_on_empty_cache_returns_empty_lists() {
        let cache = test_cache(8);
        let outcome = cache.audit(&CancellationToken::new()).await;
        assert!(outcome.updated.is_empty());
        assert!(outcome.removed.is_empty());
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn audit_prunes_old_finals() {
        let cache = test_cache(8);
        cache.seed(ready_game(
            1,
            GameStatus::Final,
            Utc::now() - TimeDelta::hours(16),
        ));

        let cancel = CancellationToken::new();
        let outcome = cache.audit(&cancel).await;
        assert_eq!(outcome.removed, vec![1]);
        assert!(outcome.updated.is_empty());
        assert!(outcome.failed.is_empty());
        assert!(cache.get_one(&cancel, 1).await.is_none());
    }

    #[tokio::test]
    async fn audit_prunes_postponed_previews() {
        let cache = test_cache(8);
        cache.seed(ready_game(
            1,
            GameStatus::Preview,
            Utc::now() + TimeDelta::hours(25),
        ));

        let outcome = cache.audit(&CancellationToken::new()).await;
        assert_eq!(outcome.removed, vec![1]);
    }

    #[tokio::test]
    async fn audit_leaves_fresh_entries_alone() {
        let cache = test_cache(8);
        let now = Utc::now();
        cache.seed(ready_game(1, GameStatus::Live, now));
        cache.seed(ready_game(2, GameStatus::Final, now));
        cache.seed(ready_game(3, GameStatus::Preview, now + TimeDelta::hours(3)));

        let outcome = cache.audit(&CancellationToken::new()).await;
        assert!(outcome.updated.is_empty());
        assert!(outcome.removed.is_empty());
        assert!(outcome.failed.is_empty());
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn audit_marks_failed_refreshes() {
        let cache = test_cache(8);
        let mut stale = ready_game(1, GameStatus::Live, Utc::now());
        stale.metadata.timestamp = Utc::now() - TimeDelta::seconds(30);
        stale.link = "http://127.0.0.1:9/game".to_string();
        cache.seed(stale);

        let outcome = cache.audit(&CancellationToken::new()).await;
        assert_eq!(outcome.failed, vec![1]);
        assert!(outcome.updated.is_empty());
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn refresh_intervals_depend_on_status() {
        assert!(refresh_due(GameStatus::Live, TimeDelta::seconds(6)));
        assert!(!refresh_due(GameStatus::Live, TimeDelta::seconds(4)));
        assert!(refresh_due(GameStatus::Preview, TimeDelta::minutes(16)));
        assert!(!refresh_due(GameStatus::Preview, TimeDelta::minutes(14)));
        assert!(refresh_due(GameStatus::Final, TimeDelta::minutes(31)));
        assert!(!refresh_due(GameStatus::Final, TimeDelta::minutes(29)));
    }

    #[test]
    fn prune_rules_depend_on_start_time() {
        let now = Utc::now();
        assert!(prune_due(GameStatus::Final, now, now - TimeDelta::hours(16)));
        assert!(!prune_due(GameStatus::Final, now, now - TimeDelta::hours(14)));
        assert!(prune_due(GameStatus::Preview, now, now + TimeDelta::hours(25)));
        assert!(!prune_due(GameStatus::Preview, now, now + TimeDelta::hours(23)));
        assert!(!prune_due(GameStatus::Live, now, now - TimeDelta::hours(20)));
    }
}
