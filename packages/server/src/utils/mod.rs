pub mod hash;
pub mod jwt;
pub mod lookup;
pub mod rate_limit;
pub mod result_store;
