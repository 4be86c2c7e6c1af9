//! Policy import/export module.
//!
//! This module provides functionality for:
//! - Exporting and importing engine tunables with semantic versioning
//! - Checking bundle compatibility before an import
//! - Built-in policy packs for common deployment archetypes

mod bundle;
mod compat;
mod packs;

pub use bundle::{PolicyBundle, PolicyData, PolicyMetadata, POLICY_VERSION};
pub use compat::{check_compatibility, parse_version, Compatibility};
pub use packs::{builtin_packs, find_pack, pack_ids, PolicyPack};
