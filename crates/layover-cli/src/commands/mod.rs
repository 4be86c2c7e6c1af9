pub mod amenities;
pub mod classify;
pub mod collections;
pub mod config;
pub mod metrics;
pub mod policy;
pub mod recommend;
pub mod track;
pub mod vibes;
