//! HTTP clients.

pub mod flywheel;
pub mod jupiter;
pub mod migrated_pools;

pub use flywheel::{FlywheelClient, FlywheelOperation, FlywheelStats, PoolCreatedPayload};
pub use jupiter::{FeedConfig, JupiterFeed, JupiterPool};
pub use migrated_pools::{
    MigratedPool, MigratedPoolClient, MigratedPoolConfig, MigratedPoolDetails, MigratedPoolMetrics,
};
