//! Animation clips and their binding to inflated entities

mod binding;
mod clip;

pub use binding::{resolve_name, BindingTarget, ClipBinding};
pub use clip::{AnimationClip, ClipTrack, Interpolation, TrackProperty, TrackValues};
