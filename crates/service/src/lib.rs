//! Service layer for subscriptions.
//! - `subscription::repository` is the data access contract, with a SeaORM and an in-memory implementation.
//! - `subscription::service` holds the business rules (identity minting, read-modify-write updates).
//! - Validation of external input happens before these types are constructed (see the `server` crate).

pub mod errors;
pub mod subscription;
#[cfg(test)]
pub mod test_support;
