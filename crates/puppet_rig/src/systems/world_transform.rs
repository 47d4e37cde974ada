//! Absolute transform listener

use crate::entity::InflatedEntity;
use puppet_core::{Identity, Mat4, Quat, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};

/// World-space pose decomposed from a world matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldPose {
    pub matrix: Mat4,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl WorldPose {
    /// Create from a world matrix
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (position, rotation, scale) = matrix.decompose();
        Self {
            matrix,
            position,
            rotation,
            scale,
        }
    }

    /// Check if `other` differs by more than `epsilon` in position or rotation
    fn moved_from(&self, other: &WorldPose, epsilon: f32) -> bool {
        self.position.distance(other.position) > epsilon
            || self.rotation.angle_to(other.rotation) > epsilon
    }
}

impl Default for WorldPose {
    fn default() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }
}

/// Emitted when a watched entity's world pose changed
#[derive(Clone, Debug, PartialEq)]
pub struct TransformChanged {
    pub identity: Identity,
    pub name: String,
    pub pose: WorldPose,
}

/// Computes world matrices for an entity tree and reports watched entities
/// that moved since the previous poll
pub struct WorldTransformTracker {
    epsilon: f32,
    watched: FxHashSet<Identity>,
    /// Pose reported for each watched entity at the last poll
    reported: FxHashMap<Identity, WorldPose>,
    /// World poses from the last update
    poses: FxHashMap<Identity, WorldPose>,
}

impl WorldTransformTracker {
    /// Create a tracker reporting moves larger than `epsilon`
    pub fn new(epsilon: f32) -> Self {
        Self {
            epsilon,
            watched: FxHashSet::default(),
            reported: FxHashMap::default(),
            poses: FxHashMap::default(),
        }
    }

    /// Start reporting changes for an entity
    ///
    /// The next poll reports the entity once so listeners receive its
    /// initial pose.
    pub fn watch(&mut self, identity: Identity) {
        self.watched.insert(identity);
    }

    /// Stop reporting changes for an entity
    pub fn unwatch(&mut self, identity: Identity) {
        self.watched.remove(&identity);
        self.reported.remove(&identity);
    }

    pub fn is_watched(&self, identity: Identity) -> bool {
        self.watched.contains(&identity)
    }

    /// World pose computed by the last update
    pub fn world_pose(&self, identity: Identity) -> Option<WorldPose> {
        self.poses.get(&identity).copied()
    }

    /// Recompute world poses for every entity of the tree
    pub fn update(&mut self, root: &InflatedEntity) {
        self.poses.clear();
        self.update_recursive(root, &Mat4::IDENTITY);
    }

    fn update_recursive(&mut self, entity: &InflatedEntity, parent_world: &Mat4) {
        let world = parent_world.mul(&entity.local_matrix());
        self.poses.insert(entity.identity, WorldPose::from_matrix(world));
        for child in &entity.children {
            self.update_recursive(child, &world);
        }
    }

    /// Update and return changes for watched entities, in tree order
    pub fn poll(&mut self, root: &InflatedEntity) -> Vec<TransformChanged> {
        self.update(root);

        let mut changes = Vec::new();
        root.walk(&mut |entity| {
            if !self.watched.contains(&entity.identity) {
                return;
            }
            let Some(pose) = self.poses.get(&entity.identity).copied() else {
                return;
            };
            let moved = self
                .reported
                .get(&entity.identity)
                .map_or(true, |last| pose.moved_from(last, self.epsilon));
            if moved {
                self.reported.insert(entity.identity, pose);
                changes.push(TransformChanged {
                    identity: entity.identity,
                    name: entity.object_name.clone(),
                    pose,
                });
            }
        });

        if !changes.is_empty() {
            tracing::trace!(changed = changes.len(), "world transforms changed");
        }
        changes
    }
}
