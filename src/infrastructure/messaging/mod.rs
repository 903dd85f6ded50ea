pub mod embedding_workers;
pub mod worker_pool;

pub use embedding_workers::{FileJob, FileJobHandler, MessageJobHandler};
pub use worker_pool::{WorkerPool, WorkerPoolConfig};
