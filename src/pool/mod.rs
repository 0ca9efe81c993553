pub mod fee_tier;
pub mod position;
pub mod v3_pool;
