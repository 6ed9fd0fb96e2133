//! Subscription module: domain inputs, data access and business service.

pub mod domain;
pub mod query;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::SubscriptionService;
