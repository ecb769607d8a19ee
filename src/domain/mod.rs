//! Domain types: semantic versions, pre-release cycles and release tags

pub mod prerelease;
pub mod tag;
pub mod version;

pub use prerelease::PreRelease;
pub use tag::Tag;
pub use version::{BumpKind, Version};
