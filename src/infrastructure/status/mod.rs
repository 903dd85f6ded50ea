pub mod file_status_notifier;

pub use file_status_notifier::{BarrierError, FileStatusNotifier};
