pub mod seaorm;

pub use seaorm::SeaOrmSubscriptionRepository;
