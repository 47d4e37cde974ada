//! Systems run over an inflated entity tree

mod world_transform;

pub use world_transform::{TransformChanged, WorldPose, WorldTransformTracker};
