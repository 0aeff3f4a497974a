pub mod published_hands;
pub mod reactive_model;
pub mod sync_channel;
