//! Animation clips addressed by node name

use puppet_core::{Quat, Vec3};
use smallvec::SmallVec;

/// A loaded animation clip
///
/// Tracks name their target node rather than index it, so a clip survives
/// inflation re-parenting the nodes it drives.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    /// Clip name
    pub name: String,
    /// Duration in seconds
    pub duration: f32,
    /// One track per animated property
    pub tracks: Vec<ClipTrack>,
}

impl AnimationClip {
    /// Create an empty clip
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: 0.0,
            tracks: Vec::new(),
        }
    }

    /// Add a track, extending the duration to its last keyframe
    pub fn with_track(mut self, track: ClipTrack) -> Self {
        self.push_track(track);
        self
    }

    /// Add a track, extending the duration to its last keyframe
    pub fn push_track(&mut self, track: ClipTrack) {
        if let Some(&last) = track.times.last() {
            self.duration = self.duration.max(last);
        }
        self.tracks.push(track);
    }

    /// Distinct target node names in first-use order
    pub fn target_names(&self) -> SmallVec<[&str; 8]> {
        let mut names: SmallVec<[&str; 8]> = SmallVec::new();
        for track in &self.tracks {
            if !names.contains(&track.node_name.as_str()) {
                names.push(&track.node_name);
            }
        }
        names
    }
}

/// Keyframes for one property of one node
#[derive(Clone, Debug)]
pub struct ClipTrack {
    /// Name of the node this track drives
    pub node_name: String,
    /// Driven property
    pub property: TrackProperty,
    /// Keyframe times in seconds
    pub times: Vec<f32>,
    /// Interpolation between keyframes
    pub interpolation: Interpolation,
    /// Keyframe values
    pub values: TrackValues,
}

impl ClipTrack {
    /// Translation track
    pub fn translation(node_name: impl Into<String>, times: Vec<f32>, values: Vec<Vec3>) -> Self {
        Self {
            node_name: node_name.into(),
            property: TrackProperty::Translation,
            times,
            interpolation: Interpolation::Linear,
            values: TrackValues::Vec3(values),
        }
    }

    /// Rotation track
    pub fn rotation(node_name: impl Into<String>, times: Vec<f32>, values: Vec<Quat>) -> Self {
        Self {
            node_name: node_name.into(),
            property: TrackProperty::Rotation,
            times,
            interpolation: Interpolation::Linear,
            values: TrackValues::Quat(values),
        }
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Animated property
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackProperty {
    Translation,
    Rotation,
    Scale,
    /// Morph target weights
    Weights,
}

/// Interpolation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    #[default]
    Linear,
    CubicSpline,
}

/// Keyframe values
#[derive(Clone, Debug)]
pub enum TrackValues {
    /// Translation or scale
    Vec3(Vec<Vec3>),
    /// Rotation
    Quat(Vec<Quat>),
    /// Morph weights, flattened per keyframe
    Scalar(Vec<f32>),
}
