//! Single-flight resolution per token.

use crate::handle::PoolHandle;
use crate::resolver::PoolResolver;
use mooner_domain::ResolveError;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Per-token state. `completed` counts finished resolutions so a waiter can
/// tell a result written for it from one left over by an earlier call.
#[derive(Default)]
struct Slot {
    completed: AtomicU64,
    result: Mutex<Option<Result<PoolHandle, ResolveError>>>,
}

/// Wraps a [`PoolResolver`] so the same token is never resolved twice at
/// once.
///
/// A caller arriving while a resolution for the same token is running waits
/// for it and shares its result. A successful result is reused until the
/// caller forces a refresh; a failed one is retried on the next call.
pub struct GuardedResolver {
    resolver: Arc<PoolResolver>,
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl GuardedResolver {
    #[must_use]
    pub fn new(resolver: Arc<PoolResolver>) -> Self {
        Self {
            resolver,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &PoolResolver {
        &self.resolver
    }

    /// Resolves `token_id`, sharing in-flight work and cached successes.
    ///
    /// # Errors
    /// Propagates the underlying resolution error.
    pub async fn resolve(
        &self,
        token_id: &str,
        force_refresh: bool,
    ) -> Result<PoolHandle, ResolveError> {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.entry(token_id.to_string()).or_default().clone()
        };

        let mut entry = match slot.result.try_lock() {
            Ok(entry) => {
                if !force_refresh {
                    if let Some(Ok(handle)) = entry.as_ref() {
                        return Ok(handle.clone());
                    }
                }
                entry
            }
            Err(_) => {
                debug!(token = token_id, "Resolution already in flight, waiting");
                let seen = slot.completed.load(Ordering::Acquire);
                let entry = slot.result.lock().await;
                if slot.completed.load(Ordering::Acquire) != seen {
                    if let Some(result) = entry.as_ref() {
                        return result.clone();
                    }
                }
                debug!(token = token_id, "In-flight resolution abandoned, resolving again");
                entry
            }
        };

        let result = self.resolver.resolve(token_id).await;
        *entry = Some(result.clone());
        slot.completed.fetch_add(1, Ordering::Release);
        drop(entry);

        if result.is_err() {
            self.forget(token_id, &slot).await;
        }
        result
    }

    /// Forgets any cached result for `token_id`.
    pub async fn invalidate(&self, token_id: &str) {
        self.slots.lock().await.remove(token_id);
    }

    /// Drops the map entry if it still belongs to `slot`. Callers already
    /// waiting on `slot` keep their handle to it.
    async fn forget(&self, token_id: &str, slot: &Arc<Slot>) {
        let mut slots = self.slots.lock().await;
        if slots
            .get(token_id)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.remove(token_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::testing::{FakeBondingCurve, FakeCpAmm, FakeLedger};
    use mooner_protocols::addresses::native_mint;
    use solana_sdk::pubkey::Pubkey;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn guarded(bc: FakeBondingCurve) -> (GuardedResolver, Arc<FakeBondingCurve>) {
        let bc = Arc::new(bc);
        let resolver = PoolResolver::new(
            bc.clone(),
            Arc::new(FakeCpAmm::default()),
            Arc::new(FakeLedger::default()),
            ResolverConfig::default(),
        );
        (GuardedResolver::new(Arc::new(resolver)), bc)
    }

    #[tokio::test]
    async fn test_completed_result_is_reused() {
        let base = Pubkey::new_unique();
        let (guard, bc) =
            guarded(FakeBondingCurve::default().with_pool(base, native_mint(), 1, 1, false));
        let token = base.to_string();

        let first = guard.resolve(&token, false).await.unwrap();
        let lookups = bc.lookup_count();
        let second = guard.resolve(&token, false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(bc.lookup_count(), lookups);
    }

    #[tokio::test]
    async fn test_force_refresh_resolves_again() {
        let base = Pubkey::new_unique();
        let (guard, bc) =
            guarded(FakeBondingCurve::default().with_pool(base, native_mint(), 1, 1, false));
        let token = base.to_string();

        guard.resolve(&token, false).await.unwrap();
        let lookups = bc.lookup_count();
        guard.resolve(&token, true).await.unwrap();

        assert_eq!(bc.lookup_count(), lookups + 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_resolution() {
        let base = Pubkey::new_unique();
        let (guard, bc) =
            guarded(FakeBondingCurve::default().with_pool(base, native_mint(), 1, 1, false));
        let token = base.to_string();

        let (a, b) = tokio::join!(guard.resolve(&token, false), guard.resolve(&token, false));

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(bc.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let (guard, bc) = guarded(FakeBondingCurve::default());
        let token = Pubkey::new_unique().to_string();

        assert_eq!(
            guard.resolve(&token, false).await.unwrap_err(),
            ResolveError::NotFound
        );
        guard.resolve(&token, false).await.unwrap_err();
        assert_eq!(bc.lookup_count(), 2);
        assert!(guard.slots.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiter_resolves_again_after_holder_is_dropped() {
        let base = Pubkey::new_unique();
        let gate = Arc::new(Notify::new());
        let (guard, bc) = guarded(
            FakeBondingCurve::default()
                .with_pool(base, native_mint(), 1, 1, false)
                .with_lookup_gate(gate.clone()),
        );
        let token = base.to_string();

        gate.notify_one();
        guard.resolve(&token, false).await.unwrap();
        assert_eq!(bc.lookup_count(), 1);

        let (abandoned, waited) = tokio::join!(
            async {
                let abandoned =
                    tokio::time::timeout(Duration::from_millis(10), guard.resolve(&token, true))
                        .await;
                gate.notify_one();
                abandoned
            },
            guard.resolve(&token, true),
        );

        assert!(abandoned.is_err());
        assert!(waited.is_ok());
        assert_eq!(bc.lookup_count(), 2);
    }
}
