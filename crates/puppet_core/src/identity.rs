//! Identity tokens
//!
//! Animation retargeting locates scene objects by identity rather than by
//! position in the tree. Tokens are random v4 UUIDs, so tokens minted by
//! different loaders or rigs in the same process never collide.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique token addressing a scene node or entity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Uuid);

impl Identity {
    /// Mint a fresh, never-before-used token
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::generate()
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Upper-case hyphenated form, the way host scenes print object ids
        write!(f, "{}", self.0.hyphenated().encode_upper(&mut Uuid::encode_buffer()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_unique() {
        let tokens: HashSet<Identity> = (0..1000).map(|_| Identity::generate()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_display_is_uuid_shaped() {
        let id = Identity::generate().to_string();
        assert_eq!(id.len(), 36);
        assert_eq!(id.matches('-').count(), 4);
        assert_eq!(id, id.to_uppercase());
    }
}
