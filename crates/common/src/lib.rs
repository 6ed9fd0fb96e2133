pub mod retry;
pub mod types;
pub mod utils;
