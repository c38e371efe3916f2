//! Video entity data model and filename derivation.

pub mod entity;
pub mod naming;

pub use entity::{DefaultSettings, VideoEntity, VideoStatus};
