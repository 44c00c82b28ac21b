pub mod broadcast;

pub use broadcast::BroadcastEventPublisher;
