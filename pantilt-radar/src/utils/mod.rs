pub use range::Range;
pub use scale::Scalable;
pub use shutdown::Shutdown;
pub use tokio;

mod range;
mod scale;
mod shutdown;

/// Asynchronously waits for the given number of milliseconds.
#[macro_export]
macro_rules! pause {
    ($ms:expr) => {
        tokio::time::sleep(tokio::time::Duration::from_millis($ms as u64)).await
    };
}

/// Blocks the current thread for the given number of milliseconds.
#[macro_export]
macro_rules! pause_sync {
    ($ms:expr) => {
        std::thread::sleep(std::time::Duration::from_millis($ms as u64))
    };
}
