//! Upstream feed synchronization

mod client;
mod synchronizer;

pub use client::DeltaStream;
pub use synchronizer::FeedSynchronizer;
