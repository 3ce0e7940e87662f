pub mod client;
pub mod executor;
pub mod manager;
pub mod pool;
pub mod session;
