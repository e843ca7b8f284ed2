//! Entry point trait for event-processing tasks.

/// A task that runs forever, consuming events from the static channels.
pub trait Runnable {
    async fn run(&mut self);
}
