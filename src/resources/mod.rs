//! Resource models and lifecycles
//!
//! Each submodule owns one Distribution resource end to end: the
//! configuration model (what a manifest declares), the wire model (what the
//! API sends and receives), the normalized state model (what a read-after-write
//! reproduces exactly), and the Create / Read / Update / Delete operations
//! over them.
//!
//! # Lifecycle contract
//!
//! - Create: validate, normalize, convert to the wire payload, call the API,
//!   convert the response back. Any failure aborts before state is produced.
//! - Read: a 404 yields `Ok(None)` ("resource no longer exists, drop it"),
//!   never an error.
//! - Update: only for fields not marked force-replacement; resources whose
//!   API has no distinct update semantics reuse the create converter.
//! - Delete: a 404 is treated as success (already deleted) for every
//!   resource.
//!
//! # Module Structure
//!
//! - [`permission`] - Permission targets (users/groups over destinations)
//! - [`release_bundle`] - Release bundles v1
//! - [`signing_key`] - GPG/PGP signing keys with inline key material
//! - [`vault_signing_key`] - Signing keys referenced from a Vault secret store

pub mod permission;
pub mod release_bundle;
pub mod signing_key;
pub mod vault_signing_key;

use crate::error::DistError;

/// Outcome of comparing desired configuration against current state.
///
/// `Replace` means an immutable ("force replacement") field changed, so the
/// transition is delete-then-create rather than an in-place update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Create,
    Update,
    Replace,
    NoChange,
}

impl PlanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanAction::Create => "create",
            PlanAction::Update => "update",
            PlanAction::Replace => "replace",
            PlanAction::NoChange => "no change",
        }
    }
}

impl std::fmt::Display for PlanAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a delete result so an already-absent resource counts as success.
pub(crate) fn absent_is_ok(result: Result<(), DistError>) -> Result<(), DistError> {
    match result {
        Err(DistError::NotFound) => Ok(()),
        other => other,
    }
}
