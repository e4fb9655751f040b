//! Server state - shared references to every service
//!
//! `ServerState` is cloned into each request handler; everything inside
//! is either `Clone`-cheap (Arc, DashMap handles) or plain config.

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::cache::ResponseCache;
use crate::cart::CartStore;
use crate::checkout::CheckoutService;
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::payment::PaymentService;
use shared::error::AppError;

/// How often the periodic sweepers run
const SWEEP_INTERVAL: Duration = Duration::from_secs(30);
/// How often the payout reconciler runs
const RECONCILE_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database
    pub db: Surreal<Db>,
    /// Response cache (injected into read handlers and the checkout
    /// pipeline for invalidation)
    pub cache: ResponseCache,
    /// Session carts
    pub carts: CartStore,
    /// JWT session service
    pub jwt_service: Arc<JwtService>,
    /// Payment provider service
    pub payments: Arc<PaymentService>,
}

impl ServerState {
    /// Initialize all services against the on-disk database
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::new(&config.database_dir()).await?;
        Ok(Self::with_db(config, db_service.db))
    }

    /// Initialize against a fresh in-memory database (tests)
    pub async fn initialize_in_memory(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::memory().await?;
        Ok(Self::with_db(config, db_service.db))
    }

    fn with_db(config: &Config, db: Surreal<Db>) -> Self {
        Self {
            config: config.clone(),
            db,
            cache: ResponseCache::new(Duration::from_secs(config.cache_ttl_secs)),
            carts: CartStore::new(Duration::from_secs(config.cart_ttl_secs)),
            jwt_service: Arc::new(JwtService::new(
                config.jwt_secret.clone(),
                config.token_ttl_hours,
            )),
            payments: Arc::new(PaymentService::from_config(config)),
        }
    }

    /// The order pipeline, wired to this state's services
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(
            self.db.clone(),
            self.carts.clone(),
            self.cache.clone(),
            self.payments.clone(),
        )
    }

    /// Register and start the background tasks.
    ///
    /// - cache-sweeper: evicts expired response-cache entries
    /// - cart-sweeper: drops carts idle beyond the session TTL
    /// - payout-reconciler: retries payout records for paid orders that
    ///   have none
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let cache = self.cache.clone();
        let token = tasks.shutdown_token();
        tasks.spawn("cache-sweeper", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let evicted = cache.sweep();
                        if evicted > 0 {
                            tracing::debug!(evicted, "Cache sweep");
                        }
                    }
                }
            }
        });

        let carts = self.carts.clone();
        let token = tasks.shutdown_token();
        tasks.spawn("cart-sweeper", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let dropped = carts.sweep_idle();
                        if dropped > 0 {
                            tracing::debug!(dropped, "Idle cart sweep");
                        }
                    }
                }
            }
        });

        let checkout = self.checkout();
        let token = tasks.shutdown_token();
        tasks.spawn("payout-reconciler", TaskKind::Periodic, async move {
            let mut interval = tokio::time::interval(RECONCILE_INTERVAL);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let recovered = checkout.reconcile_missing_payouts().await;
                        if recovered > 0 {
                            tracing::warn!(recovered, "Reconciled missing payout records");
                        }
                    }
                }
            }
        });

        tasks
    }
}
