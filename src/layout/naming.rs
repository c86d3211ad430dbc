//! Filesystem naming: display-name slugs and the collision strategy shared by
//! the serializer and the deploy compiler.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::types::{ComputeBlock, StateKind};

/// Lowercase, punctuation-stripped rendering of a display name. Runs of
/// non-alphanumeric characters collapse to a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("block");
    }
    slug
}

/// First `-`-separated segment of an identifier, used as a collision suffix.
pub fn id_fragment(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// Allocates one directory per Compute Block, disambiguating slug collisions
/// with the block's id fragment. Allocation order is the project's state
/// order, so repeated serializations of the same project are stable.
#[derive(Debug, Default)]
pub struct BlockDirAllocator {
    taken: HashMap<PathBuf, String>,
}

impl BlockDirAllocator {
    pub fn new() -> Self {
        BlockDirAllocator::default()
    }

    /// Directory for `block`, relative to the project root.
    pub fn allocate(&mut self, block: &ComputeBlock) -> PathBuf {
        let base = PathBuf::from(StateKind::Lambda.dir_name()).join(slugify(&block.name));

        let dir = match self.taken.get(&base) {
            Some(owner) if owner != &block.id => {
                PathBuf::from(format!("{}-{}", base.display(), id_fragment(&block.id)))
            }
            _ => base,
        };

        self.taken.insert(dir.clone(), block.id.clone());
        dir
    }
}
