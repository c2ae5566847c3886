//! Signing keys referenced from a Vault secret store
//!
//! Instead of inline key material, the creation body carries a Vault
//! integration name and `{path, key}` references to the public and private
//! halves. The alias is server-assigned: creation must find the deployment
//! report entry with status `SUCCESS` to learn it, and fails loudly when no
//! target deployed the key.

use serde::{Deserialize, Serialize};

use crate::client::DistClient;
use crate::error::DistError;
use crate::resources::signing_key::{
    RenameRequest, SigningKeyCreateResponse, SigningKeyInfo, PROTOCOLS,
};
use crate::resources::{absent_is_ok, PlanAction};
use crate::usage;
use crate::validate::{require_non_empty, require_one_of, Violations};

// =============================================================================
// Configuration model
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultSigningKeyConfig {
    pub protocol: String,
    #[serde(default)]
    pub propagate_to_edge_nodes: Option<bool>,
    #[serde(default)]
    pub fail_on_propagation_failure: Option<bool>,
    #[serde(default)]
    pub set_as_default: Option<bool>,
    /// Name of the Vault integration in Artifactory
    pub vault_id: String,
    pub public_key: VaultKeyRefConfig,
    pub private_key: VaultKeyRefConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultKeyRefConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

// =============================================================================
// Wire model
// =============================================================================

/// POST body for `keys/{protocol}` with vault-backed material
#[derive(Debug, Clone, Serialize)]
pub struct VaultSigningKeyRequest {
    pub propagate_to_edge_nodes: bool,
    pub fail_on_propagation_failure: bool,
    pub set_as_default: bool,
    pub key: VaultKeyEnvelope,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultKeyEnvelope {
    pub vault_data: VaultData,
}

#[derive(Debug, Clone, Serialize)]
pub struct VaultData {
    pub vault_id: String,
    pub public_key: VaultKeyRef,
    pub private_key: VaultKeyRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultKeyRef {
    pub path: String,
    pub key: String,
}

// =============================================================================
// State model
// =============================================================================

/// Normalized state. The alias comes from the creation report, not the
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSigningKeyState {
    pub protocol: String,
    pub alias: String,
    pub propagate_to_edge_nodes: bool,
    pub fail_on_propagation_failure: bool,
    pub set_as_default: bool,
    pub vault_id: String,
    pub public_key: VaultKeyRef,
    pub private_key: VaultKeyRef,
}

// =============================================================================
// Validation and conversion
// =============================================================================

/// Check every static constraint in one pass; never mutates the input.
pub fn validate(config: &VaultSigningKeyConfig) -> Violations {
    let mut violations = Violations::new();

    require_one_of(&mut violations, "protocol", &config.protocol, PROTOCOLS);
    require_non_empty(&mut violations, "vault_id", &config.vault_id);
    validate_key_ref(&mut violations, "public_key", &config.public_key);
    validate_key_ref(&mut violations, "private_key", &config.private_key);

    violations
}

fn validate_key_ref(violations: &mut Violations, path: &str, key_ref: &VaultKeyRefConfig) {
    match &key_ref.path {
        None => violations.push(format!("{path}.path"), "required"),
        Some(value) => require_non_empty(violations, &format!("{path}.path"), value),
    }
    match &key_ref.key {
        None => violations.push(format!("{path}.key"), "required"),
        Some(value) => require_non_empty(violations, &format!("{path}.key"), value),
    }
}

/// Convert a configuration into the creation request body.
pub fn to_payload(config: &VaultSigningKeyConfig) -> Result<VaultSigningKeyRequest, Violations> {
    validate(config).into_result()?;

    Ok(VaultSigningKeyRequest {
        propagate_to_edge_nodes: config.propagate_to_edge_nodes.unwrap_or(false),
        fail_on_propagation_failure: config.fail_on_propagation_failure.unwrap_or(false),
        set_as_default: config.set_as_default.unwrap_or(false),
        key: VaultKeyEnvelope {
            vault_data: VaultData {
                vault_id: config.vault_id.clone(),
                public_key: key_ref(&config.public_key),
                private_key: key_ref(&config.private_key),
            },
        },
    })
}

fn key_ref(config: &VaultKeyRefConfig) -> VaultKeyRef {
    VaultKeyRef {
        path: config.path.clone().unwrap_or_default(),
        key: config.key.clone().unwrap_or_default(),
    }
}

/// Decide the lifecycle transition. The alias is server-assigned, so every
/// configurable field forces replacement; there is no in-place update.
pub fn plan(
    current: Option<&VaultSigningKeyState>,
    desired: &VaultSigningKeyConfig,
) -> Result<PlanAction, DistError> {
    let payload = to_payload(desired)?;

    let Some(current) = current else {
        return Ok(PlanAction::Create);
    };

    let data = &payload.key.vault_data;
    if current.protocol != desired.protocol
        || current.vault_id != data.vault_id
        || current.public_key != data.public_key
        || current.private_key != data.private_key
        || current.propagate_to_edge_nodes != payload.propagate_to_edge_nodes
        || current.fail_on_propagation_failure != payload.fail_on_propagation_failure
        || current.set_as_default != payload.set_as_default
    {
        return Ok(PlanAction::Replace);
    }

    Ok(PlanAction::NoChange)
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Deploy a vault-backed signing key and adopt the server-assigned alias
/// from the SUCCESS report entry. No state is produced when the report has
/// no SUCCESS entry.
pub async fn create(
    client: &DistClient,
    config: &VaultSigningKeyConfig,
) -> Result<VaultSigningKeyState, DistError> {
    usage::send(client, "vault_signing_key", "CREATE");

    let payload = to_payload(config)?;
    let response: SigningKeyCreateResponse = client
        .post_json(&client.signing_keys_url(&config.protocol), &payload, &[])
        .await?;

    tracing::info!(report = %response.report, "vault signing key created");
    let success = response.report.success_detail()?;

    let data = payload.key.vault_data;
    Ok(VaultSigningKeyState {
        protocol: config.protocol.clone(),
        alias: success.key_alias.clone(),
        propagate_to_edge_nodes: payload.propagate_to_edge_nodes,
        fail_on_propagation_failure: payload.fail_on_propagation_failure,
        set_as_default: payload.set_as_default,
        vault_id: data.vault_id,
        public_key: data.public_key,
        private_key: data.private_key,
    })
}

/// Read a vault-backed signing key. `Ok(None)` means it no longer exists.
pub async fn read(
    client: &DistClient,
    protocol: &str,
    alias: &str,
) -> Result<Option<SigningKeyInfo>, DistError> {
    usage::send(client, "vault_signing_key", "READ");

    match client
        .get_json::<SigningKeyInfo>(&client.signing_key_url(protocol, alias))
        .await
    {
        Ok(info) => Ok(Some(info)),
        Err(DistError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Rename a vault-backed signing key, keyed by its prior alias.
pub async fn rename(
    client: &DistClient,
    protocol: &str,
    current_alias: &str,
    new_alias: &str,
) -> Result<(), DistError> {
    usage::send(client, "vault_signing_key", "UPDATE");

    let body = RenameRequest {
        new_alias: new_alias.to_string(),
    };
    client
        .put(&client.signing_key_url(protocol, current_alias), &body, &[])
        .await
}

/// Delete a vault-backed signing key. Already-absent counts as success.
pub async fn delete(client: &DistClient, protocol: &str, alias: &str) -> Result<(), DistError> {
    usage::send(client, "vault_signing_key", "DELETE");
    absent_is_ok(client.delete(&client.signing_key_url(protocol, alias)).await)
}
