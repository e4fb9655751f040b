//! Bazaar Server - multi-vendor marketplace backend
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── auth/          # JWT sessions, current-user extractor, roles
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # embedded SurrealDB, models, repositories
//! ├── cart/          # session-scoped in-memory carts
//! ├── cache/         # TTL response cache with explicit invalidation
//! ├── payment/       # payment gateway client + demo mode
//! ├── checkout/      # order pipeline: create, settle, payouts
//! └── utils/         # logging, result aliases
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod cart;
pub mod checkout;
pub mod core;
pub mod db;
pub mod payment;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use cache::ResponseCache;
pub use cart::CartStore;
pub use checkout::CheckoutService;
pub use core::{Config, Server, ServerState};
pub use payment::PaymentService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
