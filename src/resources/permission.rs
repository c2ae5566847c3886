//! Permission targets
//!
//! A permission target binds user and group principals to distribution
//! destinations. The API keys it by name; create and update are the same PUT,
//! so replacement semantics only apply to the name and resource type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::DistClient;
use crate::error::DistError;
use crate::resources::{absent_is_ok, PlanAction};
use crate::usage;
use crate::validate::{require_non_empty, require_one_of, Violations};

/// Resource type accepted by the API. No other value is currently valid.
pub const RESOURCE_TYPE_DESTINATION: &str = "destination";

// =============================================================================
// Configuration model
// =============================================================================

/// Declared configuration for a permission target.
///
/// Destination sub-fields are optional here so that partially-specified
/// objects can be represented and rejected with precise field paths instead
/// of failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionConfig {
    pub name: String,
    pub resource_type: String,
    #[serde(default)]
    pub distribution_destinations: Vec<DestinationConfig>,
    #[serde(default)]
    pub principals: Option<PrincipalsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub city_name: Option<String>,
    #[serde(default)]
    pub country_codes: Option<Vec<String>>,
}

/// User and group principals. An absent map normalizes to an empty map, so
/// "not configured" and "configured empty" cannot drift apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrincipalsConfig {
    #[serde(default)]
    pub users: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub groups: Option<BTreeMap<String, Vec<String>>>,
}

// =============================================================================
// Wire model
// =============================================================================

/// Request/response body for `security/permissions/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionPayload {
    pub name: String,
    pub resource_type: String,
    #[serde(default)]
    pub distribution_destinations: Vec<Destination>,
    #[serde(default)]
    pub principals: PrincipalsPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Destination {
    pub site_name: String,
    pub city_name: String,
    pub country_codes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalsPayload {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub groups: BTreeMap<String, Vec<String>>,
}

// =============================================================================
// State model
// =============================================================================

/// Normalized state: permission lists sorted ascending, both principal maps
/// always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    pub name: String,
    pub resource_type: String,
    pub distribution_destinations: Vec<Destination>,
    pub principals: PrincipalsState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalsState {
    #[serde(default)]
    pub users: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

impl PermissionState {
    /// Convert an API body into normalized state.
    pub fn from_payload(payload: PermissionPayload) -> Self {
        Self {
            name: payload.name,
            resource_type: payload.resource_type,
            distribution_destinations: payload.distribution_destinations,
            principals: PrincipalsState {
                users: sorted_principal_map(payload.principals.users),
                groups: sorted_principal_map(payload.principals.groups),
            },
        }
    }
}

/// Sort each principal's permission list ascending. Order carries no meaning
/// to the backend but must be canonical for idempotent comparison.
fn sorted_principal_map(map: BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<String>> {
    map.into_iter()
        .map(|(principal, mut permissions)| {
            permissions.sort();
            (principal, permissions)
        })
        .collect()
}

// =============================================================================
// Validation and conversion
// =============================================================================

/// Check every static constraint in one pass; never mutates the input.
pub fn validate(config: &PermissionConfig) -> Violations {
    let mut violations = Violations::new();

    require_non_empty(&mut violations, "name", &config.name);
    require_one_of(
        &mut violations,
        "resource_type",
        &config.resource_type,
        &[RESOURCE_TYPE_DESTINATION],
    );

    if config.distribution_destinations.is_empty() {
        violations.push(
            "distribution_destinations",
            "at least one destination required",
        );
    }
    for (i, dest) in config.distribution_destinations.iter().enumerate() {
        let path = format!("distribution_destinations[{i}]");
        if dest.site_name.is_none() {
            violations.push(format!("{path}.site_name"), "required");
        }
        if dest.city_name.is_none() {
            violations.push(format!("{path}.city_name"), "required");
        }
        if dest.country_codes.is_none() {
            violations.push(format!("{path}.country_codes"), "required");
        }
    }

    match &config.principals {
        None => violations.push("principals", "required"),
        Some(principals) => {
            let has_users = principals.users.as_ref().is_some_and(|m| !m.is_empty());
            let has_groups = principals.groups.as_ref().is_some_and(|m| !m.is_empty());
            if !has_users && !has_groups {
                violations.push("principals", "at least one user or group required");
            }
        }
    }

    violations
}

/// Convert a configuration into the wire payload.
///
/// Validates first, then normalizes: permission lists are sorted and absent
/// principal maps become empty maps.
pub fn to_payload(config: &PermissionConfig) -> Result<PermissionPayload, Violations> {
    validate(config).into_result()?;

    let destinations = config
        .distribution_destinations
        .iter()
        .map(|dest| Destination {
            site_name: dest.site_name.clone().unwrap_or_default(),
            city_name: dest.city_name.clone().unwrap_or_default(),
            country_codes: dest.country_codes.clone().unwrap_or_default(),
        })
        .collect();

    let principals = config.principals.clone().unwrap_or_default();

    Ok(PermissionPayload {
        name: config.name.clone(),
        resource_type: config.resource_type.clone(),
        distribution_destinations: destinations,
        principals: PrincipalsPayload {
            users: sorted_principal_map(principals.users.unwrap_or_default()),
            groups: sorted_principal_map(principals.groups.unwrap_or_default()),
        },
    })
}

/// The normalized state this configuration would settle into after a
/// successful write and read-back.
pub fn expected_state(config: &PermissionConfig) -> Result<PermissionState, Violations> {
    Ok(PermissionState::from_payload(to_payload(config)?))
}

/// Decide the lifecycle transition for a desired configuration.
pub fn plan(
    current: Option<&PermissionState>,
    desired: &PermissionConfig,
) -> Result<PlanAction, DistError> {
    let expected = expected_state(desired)?;

    let Some(current) = current else {
        return Ok(PlanAction::Create);
    };

    // name and resource_type are immutable by replacement
    if current.name != expected.name || current.resource_type != expected.resource_type {
        return Ok(PlanAction::Replace);
    }

    if *current != expected {
        return Ok(PlanAction::Update);
    }

    Ok(PlanAction::NoChange)
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Create a permission target
pub async fn create(
    client: &DistClient,
    config: &PermissionConfig,
) -> Result<PermissionState, DistError> {
    usage::send(client, "permission_target", "CREATE");
    let state = upsert(client, config).await?;
    tracing::info!(name = %state.name, "permission target created");
    Ok(state)
}

/// Update a permission target in place. The API has no distinct update
/// semantics beyond re-PUT, so this converges with create.
pub async fn update(
    client: &DistClient,
    config: &PermissionConfig,
) -> Result<PermissionState, DistError> {
    usage::send(client, "permission_target", "UPDATE");
    let state = upsert(client, config).await?;
    tracing::info!(name = %state.name, "permission target updated");
    Ok(state)
}

async fn upsert(
    client: &DistClient,
    config: &PermissionConfig,
) -> Result<PermissionState, DistError> {
    let payload = to_payload(config)?;
    let url = client.permission_url(&payload.name);

    // The API echoes the stored permission; an empty body falls back to the
    // request payload, which is already normalized.
    let response: serde_json::Value = client.put_json(&url, &payload, &[]).await?;
    let stored = if response.is_null() {
        payload
    } else {
        serde_json::from_value(response)?
    };

    Ok(PermissionState::from_payload(stored))
}

/// Read a permission target. `Ok(None)` means it no longer exists and should
/// be dropped from managed state.
pub async fn read(
    client: &DistClient,
    name: &str,
) -> Result<Option<PermissionState>, DistError> {
    usage::send(client, "permission_target", "READ");

    match client
        .get_json::<PermissionPayload>(&client.permission_url(name))
        .await
    {
        Ok(payload) => Ok(Some(PermissionState::from_payload(payload))),
        Err(DistError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Delete a permission target. Already-absent counts as success.
pub async fn delete(client: &DistClient, name: &str) -> Result<(), DistError> {
    usage::send(client, "permission_target", "DELETE");
    absent_is_ok(client.delete(&client.permission_url(name)).await)
}

/// Parse an import identifier: the bare permission name.
pub fn parse_import_id(id: &str) -> Result<String, DistError> {
    if id.is_empty() {
        return Err(DistError::ImportId {
            id: id.to_string(),
            expected: "permission name",
        });
    }
    Ok(id.to_string())
}
