//! Release bundles v1
//!
//! A release bundle is a named, versioned, immutable snapshot of artifacts
//! selected by AQL queries. The API creates with a POST to the collection and
//! updates with a PUT to the `{name}/{version}` path; both return the same
//! server-computed body. The signing passphrase never enters the JSON body,
//! it travels in the `X-GPG-PASSPHRASE` header.

use serde::{Deserialize, Serialize};

use crate::client::DistClient;
use crate::error::DistError;
use crate::resources::{absent_is_ok, PlanAction};
use crate::tristate::TriState;
use crate::usage;
use crate::validate::{
    require_length_between, require_match, require_non_empty, require_one_of, Violations,
    BUNDLE_NAME_RE, QUERY_NAME_RE,
};

/// Header carrying the signing passphrase out of band
pub const GPG_PASSPHRASE_HEADER: &str = "X-GPG-PASSPHRASE";

/// Version string the API reserves; never a valid bundle version
pub const RESERVED_VERSION: &str = "LATEST";

const SYNTAX_VALUES: &[&str] = &["markdown", "asciidoc", "plain_text"];

// =============================================================================
// Configuration model
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseBundleConfig {
    pub name: String,
    pub version: String,
    /// Sent as a transport header when set, never in the body.
    #[serde(default)]
    pub gpg_passphrase: Option<String>,
    #[serde(default)]
    pub dry_run: Option<bool>,
    #[serde(default)]
    pub sign_immediately: Option<bool>,
    #[serde(default)]
    pub storing_repository: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_notes: Option<ReleaseNotesConfig>,
    #[serde(default)]
    pub spec: BundleSpecConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseNotesConfig {
    /// Defaults to `plain_text` when unset.
    #[serde(default)]
    pub syntax: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleSpecConfig {
    #[serde(default)]
    pub queries: Vec<QueryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryConfig {
    pub aql: String,
    #[serde(default)]
    pub query_name: Option<String>,
    #[serde(default)]
    pub mappings: Vec<MappingConfig>,
    #[serde(default)]
    pub added_props: Vec<PropConfig>,
    #[serde(default)]
    pub exclude_props_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropConfig {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

// =============================================================================
// Wire model
// =============================================================================

/// Request body for POST (create) and PUT (update)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseBundlePayload {
    pub name: String,
    pub version: String,
    pub dry_run: bool,
    pub sign_immediately: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storing_repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<ReleaseNotes>,
    pub spec: BundleSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReleaseNotes {
    pub syntax: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSpec {
    #[serde(default)]
    pub queries: Vec<Query>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Query {
    pub aql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_name: Option<String>,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
    #[serde(default)]
    pub added_props: Vec<Prop>,
    #[serde(default)]
    pub exclude_props_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Mapping {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Prop {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Server-computed body returned by POST and PUT
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseBundleCreateResponse {
    #[serde(default)]
    pub storing_repository: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub distributed_by: TriState<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub artifacts_size: i64,
    #[serde(default)]
    pub archived: bool,
}

/// Body returned by GET
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseBundleGetResponse {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub storing_repository: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub release_notes: Option<ReleaseNotes>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub distributed_by: TriState<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub artifacts_size: i64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub spec: BundleSpec,
}

/// The artifact path fields are camelCase on the wire, unlike everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Artifact {
    pub checksum: String,
    #[serde(rename = "sourceRepoPath")]
    pub source_repo_path: String,
    #[serde(rename = "targetRepoPath")]
    pub target_repo_path: String,
    #[serde(default)]
    pub props: Vec<Prop>,
}

// =============================================================================
// State model
// =============================================================================

/// Normalized state. Set-typed collections are canonically sorted;
/// `distributed_by` is explicitly null when the server has not set it,
/// never omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseBundleState {
    pub name: String,
    pub version: String,
    pub storing_repository: Option<String>,
    pub description: Option<String>,
    pub release_notes: Option<ReleaseNotes>,
    pub state: String,
    pub created: String,
    pub created_by: String,
    #[serde(default)]
    pub distributed_by: TriState<String>,
    pub artifacts: Vec<Artifact>,
    pub artifacts_size: i64,
    pub archived: bool,
    pub spec: BundleSpec,
}

impl ReleaseBundleState {
    /// Build state after a create/update, merging the declared payload with
    /// the server-computed response fields.
    pub fn from_create(payload: &ReleaseBundlePayload, response: ReleaseBundleCreateResponse) -> Self {
        Self {
            name: payload.name.clone(),
            version: payload.version.clone(),
            storing_repository: response
                .storing_repository
                .filter(|s| !s.is_empty())
                .or_else(|| payload.storing_repository.clone()),
            description: normalized_string(payload.description.clone()),
            release_notes: payload.release_notes.clone(),
            state: response.state,
            created: response.created,
            created_by: response.created_by,
            distributed_by: normalized_distributed_by(response.distributed_by),
            artifacts: sorted_artifacts(response.artifacts),
            artifacts_size: response.artifacts_size,
            archived: response.archived,
            spec: normalized_spec(payload.spec.clone()),
        }
    }

    /// Build state from a GET body.
    pub fn from_get(response: ReleaseBundleGetResponse) -> Self {
        Self {
            name: response.name,
            version: response.version,
            storing_repository: response.storing_repository.filter(|s| !s.is_empty()),
            description: normalized_string(response.description),
            release_notes: response
                .release_notes
                .filter(|notes| !notes.content.is_empty()),
            state: response.state,
            created: response.created,
            created_by: response.created_by,
            distributed_by: normalized_distributed_by(response.distributed_by),
            artifacts: sorted_artifacts(response.artifacts),
            artifacts_size: response.artifacts_size,
            archived: response.archived,
            spec: normalized_spec(response.spec),
        }
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Empty strings from the server collapse to `None` so that "not set" reads
/// back identically regardless of how the backend spells it.
fn normalized_string(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// `distributed_by` is kept explicitly null in state, never unset, so the
/// state shape is stable across reads.
fn normalized_distributed_by(value: TriState<String>) -> TriState<String> {
    match value {
        TriState::Value(v) => TriState::Value(v),
        _ => TriState::Null,
    }
}

/// Canonically order every set-typed collection inside a spec. Queries,
/// mappings, added props, their value lists, and exclude patterns all carry
/// set semantics on the wire, so any input order must settle into one
/// representation.
fn normalized_spec(mut spec: BundleSpec) -> BundleSpec {
    for query in &mut spec.queries {
        query.query_name = query.query_name.take().filter(|s| !s.is_empty());
        query.mappings.sort();
        for prop in &mut query.added_props {
            prop.values.sort();
        }
        query.added_props.sort();
        query.exclude_props_patterns.sort();
    }
    spec.queries.sort();
    spec
}

fn sorted_artifacts(mut artifacts: Vec<Artifact>) -> Vec<Artifact> {
    for artifact in &mut artifacts {
        for prop in &mut artifact.props {
            prop.values.sort();
        }
        artifact.props.sort();
    }
    artifacts.sort();
    artifacts
}

// =============================================================================
// Validation and conversion
// =============================================================================

const NAME_FORMAT_MSG: &str = "must begin with a letter or digit and consist only of letters, digits, underscores, periods, hyphens, and colons";
const QUERY_NAME_FORMAT_MSG: &str =
    "must start with an alphabetic character followed by alphanumeric or '_-.:' characters only";

/// Check every static constraint in one pass; never mutates the input.
pub fn validate(config: &ReleaseBundleConfig) -> Violations {
    let mut violations = Violations::new();

    require_length_between(&mut violations, "name", &config.name, 1, 128);
    require_match(
        &mut violations,
        "name",
        &config.name,
        &BUNDLE_NAME_RE,
        NAME_FORMAT_MSG,
    );

    require_length_between(&mut violations, "version", &config.version, 1, 32);
    require_match(
        &mut violations,
        "version",
        &config.version,
        &BUNDLE_NAME_RE,
        NAME_FORMAT_MSG,
    );
    if config.version == RESERVED_VERSION {
        violations.push("version", "the string `LATEST` is prohibited");
    }

    if let Some(passphrase) = &config.gpg_passphrase {
        require_non_empty(&mut violations, "gpg_passphrase", passphrase);
    }
    if let Some(repo) = &config.storing_repository {
        require_non_empty(&mut violations, "storing_repository", repo);
    }
    if let Some(description) = &config.description {
        require_non_empty(&mut violations, "description", description);
    }

    if let Some(notes) = &config.release_notes {
        require_non_empty(&mut violations, "release_notes.content", &notes.content);
        if let Some(syntax) = &notes.syntax {
            require_one_of(
                &mut violations,
                "release_notes.syntax",
                syntax,
                SYNTAX_VALUES,
            );
        }
    }

    for (i, query) in config.spec.queries.iter().enumerate() {
        let path = format!("spec.queries[{i}]");
        require_non_empty(&mut violations, &format!("{path}.aql"), &query.aql);

        if let Some(query_name) = &query.query_name {
            require_length_between(
                &mut violations,
                &format!("{path}.query_name"),
                query_name,
                2,
                32,
            );
            require_match(
                &mut violations,
                &format!("{path}.query_name"),
                query_name,
                &QUERY_NAME_RE,
                QUERY_NAME_FORMAT_MSG,
            );
        }

        for (j, mapping) in query.mappings.iter().enumerate() {
            require_non_empty(
                &mut violations,
                &format!("{path}.mappings[{j}].input"),
                &mapping.input,
            );
            require_non_empty(
                &mut violations,
                &format!("{path}.mappings[{j}].output"),
                &mapping.output,
            );
        }

        for (j, prop) in query.added_props.iter().enumerate() {
            require_non_empty(
                &mut violations,
                &format!("{path}.added_props[{j}].key"),
                &prop.key,
            );
        }
    }

    violations
}

/// Convert a configuration into the wire payload. Validates first; the
/// optional booleans default to `false` and the spec is canonically sorted.
pub fn to_payload(config: &ReleaseBundleConfig) -> Result<ReleaseBundlePayload, Violations> {
    validate(config).into_result()?;

    let queries = config
        .spec
        .queries
        .iter()
        .map(|query| Query {
            aql: query.aql.clone(),
            query_name: query.query_name.clone(),
            mappings: query
                .mappings
                .iter()
                .map(|m| Mapping {
                    input: m.input.clone(),
                    output: m.output.clone(),
                })
                .collect(),
            added_props: query
                .added_props
                .iter()
                .map(|p| Prop {
                    key: p.key.clone(),
                    values: p.values.clone(),
                })
                .collect(),
            exclude_props_patterns: query.exclude_props_patterns.clone(),
        })
        .collect();

    Ok(ReleaseBundlePayload {
        name: config.name.clone(),
        version: config.version.clone(),
        dry_run: config.dry_run.unwrap_or(false),
        sign_immediately: config.sign_immediately.unwrap_or(false),
        storing_repository: config.storing_repository.clone(),
        description: config.description.clone(),
        release_notes: config.release_notes.as_ref().map(|notes| ReleaseNotes {
            syntax: notes
                .syntax
                .clone()
                .unwrap_or_else(|| "plain_text".to_string()),
            content: notes.content.clone(),
        }),
        spec: normalized_spec(BundleSpec { queries }),
    })
}

/// Decide the lifecycle transition for a desired configuration.
pub fn plan(
    current: Option<&ReleaseBundleState>,
    desired: &ReleaseBundleConfig,
) -> Result<PlanAction, DistError> {
    let expected = to_payload(desired)?;

    let Some(current) = current else {
        return Ok(PlanAction::Create);
    };

    // name and version are immutable by replacement
    if current.name != expected.name || current.version != expected.version {
        return Ok(PlanAction::Replace);
    }

    let spec_matches = current.spec == expected.spec;
    let description_matches = current.description == normalized_string(expected.description.clone());
    let notes_match = current.release_notes == expected.release_notes;
    // server assigns a repository when none is declared; only a declared one
    // participates in the diff
    let repo_matches = expected
        .storing_repository
        .as_ref()
        .map(|repo| current.storing_repository.as_ref() == Some(repo))
        .unwrap_or(true);

    if spec_matches && description_matches && notes_match && repo_matches {
        Ok(PlanAction::NoChange)
    } else {
        Ok(PlanAction::Update)
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

fn passphrase_headers(config: &ReleaseBundleConfig) -> Vec<(&str, &str)> {
    match &config.gpg_passphrase {
        Some(passphrase) => vec![(GPG_PASSPHRASE_HEADER, passphrase.as_str())],
        None => vec![],
    }
}

/// Create a release bundle version
pub async fn create(
    client: &DistClient,
    config: &ReleaseBundleConfig,
) -> Result<ReleaseBundleState, DistError> {
    usage::send(client, "release_bundle_v1", "CREATE");

    let payload = to_payload(config)?;
    let response: ReleaseBundleCreateResponse = client
        .post_json(
            &client.release_bundles_url(),
            &payload,
            &passphrase_headers(config),
        )
        .await?;

    let state = ReleaseBundleState::from_create(&payload, response);
    tracing::info!(name = %state.name, version = %state.version, "release bundle created");
    Ok(state)
}

/// Update a release bundle version in place
pub async fn update(
    client: &DistClient,
    config: &ReleaseBundleConfig,
) -> Result<ReleaseBundleState, DistError> {
    usage::send(client, "release_bundle_v1", "UPDATE");

    let payload = to_payload(config)?;
    let url = client.release_bundle_url(&payload.name, &payload.version);
    let response: ReleaseBundleCreateResponse = client
        .put_json(&url, &payload, &passphrase_headers(config))
        .await?;

    let state = ReleaseBundleState::from_create(&payload, response);
    tracing::info!(name = %state.name, version = %state.version, "release bundle updated");
    Ok(state)
}

/// Read a release bundle version. `Ok(None)` means it no longer exists.
pub async fn read(
    client: &DistClient,
    name: &str,
    version: &str,
) -> Result<Option<ReleaseBundleState>, DistError> {
    usage::send(client, "release_bundle_v1", "READ");

    let url = format!("{}?format=json", client.release_bundle_url(name, version));
    match client.get_json::<ReleaseBundleGetResponse>(&url).await {
        Ok(response) => Ok(Some(ReleaseBundleState::from_get(response))),
        Err(DistError::NotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Delete a release bundle version. Already-absent counts as success.
pub async fn delete(client: &DistClient, name: &str, version: &str) -> Result<(), DistError> {
    usage::send(client, "release_bundle_v1", "DELETE");
    absent_is_ok(client.delete(&client.release_bundle_url(name, version)).await)
}

/// Parse an import identifier of the form `name:version`.
pub fn parse_import_id(id: &str) -> Result<(String, String), DistError> {
    let mut parts = id.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(name), Some(version)) if !name.is_empty() && !version.is_empty() => {
            Ok((name.to_string(), version.to_string()))
        }
        _ => Err(DistError::ImportId {
            id: id.to_string(),
            expected: "name:version",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ReleaseBundleConfig {
        ReleaseBundleConfig {
            name: "my-bundle".to_string(),
            version: "1.0.0".to_string(),
            spec: BundleSpecConfig {
                queries: vec![QueryConfig {
                    aql: r#"items.find({"repo": "my-repo"})"#.to_string(),
                    query_name: Some("main-query".to_string()),
                    mappings: vec![MappingConfig {
                        input: "(.*)/a.zip".to_string(),
                        output: "$1/b.zip".to_string(),
                    }],
                    added_props: vec![PropConfig {
                        key: "release".to_string(),
                        values: vec!["b".to_string(), "a".to_string()],
                    }],
                    exclude_props_patterns: vec!["internal.*".to_string()],
                }],
            },
            ..Default::default()
        }
    }

    #[test]
    fn valid_config_is_accepted() {
        assert!(validate(&valid_config()).is_empty());
    }

    #[test]
    fn latest_version_is_rejected() {
        let mut config = valid_config();
        config.version = "LATEST".to_string();
        let violations = validate(&config);
        assert!(violations.iter().any(|v| v.path == "version"));
    }

    #[test]
    fn latest_check_is_case_sensitive() {
        let mut config = valid_config();
        config.version = "latest".to_string();
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn malformed_name_is_rejected() {
        for bad in ["-bundle", "b", "has space", ""] {
            let mut config = valid_config();
            config.name = bad.to_string();
            assert!(
                !validate(&config).is_empty(),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn query_name_constraints() {
        let mut config = valid_config();
        config.spec.queries[0].query_name = Some("1invalid".to_string());
        assert!(!validate(&config).is_empty());

        config.spec.queries[0].query_name = Some("i".to_string());
        assert!(!validate(&config).is_empty());

        config.spec.queries[0].query_name = None;
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn optional_booleans_default_to_false() {
        let payload = to_payload(&valid_config()).unwrap();
        assert!(!payload.dry_run);
        assert!(!payload.sign_immediately);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["dry_run"], serde_json::json!(false));
        assert_eq!(json["sign_immediately"], serde_json::json!(false));
    }

    #[test]
    fn release_notes_syntax_defaults_to_plain_text() {
        let mut config = valid_config();
        config.release_notes = Some(ReleaseNotesConfig {
            syntax: None,
            content: "notes".to_string(),
        });
        let payload = to_payload(&config).unwrap();
        assert_eq!(payload.release_notes.unwrap().syntax, "plain_text");
    }

    #[test]
    fn invalid_release_notes_syntax_is_rejected() {
        let mut config = valid_config();
        config.release_notes = Some(ReleaseNotesConfig {
            syntax: Some("html".to_string()),
            content: "notes".to_string(),
        });
        assert!(!validate(&config).is_empty());
    }

    #[test]
    fn spec_collections_are_canonically_sorted() {
        let mut config = valid_config();
        config.spec.queries.push(QueryConfig {
            aql: "a-query".to_string(),
            ..Default::default()
        });
        // declared out of order on purpose
        let payload = to_payload(&config).unwrap();
        assert_eq!(payload.spec.queries[0].aql, "a-query");
        assert_eq!(
            payload.spec.queries[1].added_props[0].values,
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn artifact_wire_names_are_camel_case() {
        let artifact = Artifact {
            checksum: "abc".to_string(),
            source_repo_path: "src/a".to_string(),
            target_repo_path: "dst/a".to_string(),
            props: vec![],
        };
        let json = serde_json::to_value(&artifact).unwrap();
        assert!(json.get("sourceRepoPath").is_some());
        assert!(json.get("targetRepoPath").is_some());
    }

    #[test]
    fn distributed_by_is_null_in_state_when_absent() {
        let payload = to_payload(&valid_config()).unwrap();
        let state = ReleaseBundleState::from_create(
            &payload,
            ReleaseBundleCreateResponse::default(),
        );
        assert!(state.distributed_by.is_null());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["distributed_by"], serde_json::Value::Null);
    }

    #[test]
    fn get_round_trip_is_a_fixed_point() {
        let response = ReleaseBundleGetResponse {
            name: "my-bundle".to_string(),
            version: "1.0.0".to_string(),
            state: "OPEN".to_string(),
            created: "2024-01-01T00:00:00Z".to_string(),
            created_by: "admin".to_string(),
            artifacts: vec![
                Artifact {
                    checksum: "bbb".to_string(),
                    source_repo_path: "repo/b".to_string(),
                    target_repo_path: "repo/b".to_string(),
                    props: vec![],
                },
                Artifact {
                    checksum: "aaa".to_string(),
                    source_repo_path: "repo/a".to_string(),
                    target_repo_path: "repo/a".to_string(),
                    props: vec![Prop {
                        key: "k".to_string(),
                        values: vec!["2".to_string(), "1".to_string()],
                    }],
                },
            ],
            spec: BundleSpec {
                queries: vec![Query {
                    aql: "q".to_string(),
                    query_name: Some(String::new()),
                    mappings: vec![
                        Mapping {
                            input: "z".to_string(),
                            output: "z".to_string(),
                        },
                        Mapping {
                            input: "a".to_string(),
                            output: "a".to_string(),
                        },
                    ],
                    ..Default::default()
                }],
            },
            ..Default::default()
        };

        let state = ReleaseBundleState::from_get(response);

        // artifacts and nested sets are sorted, empty query_name collapses
        assert_eq!(state.artifacts[0].checksum, "aaa");
        assert_eq!(state.artifacts[0].props[0].values, vec!["1", "2"]);
        assert_eq!(state.spec.queries[0].query_name, None);
        assert_eq!(state.spec.queries[0].mappings[0].input, "a");

        // normalizing again changes nothing
        let again = ReleaseBundleState {
            artifacts: sorted_artifacts(state.artifacts.clone()),
            spec: normalized_spec(state.spec.clone()),
            ..state.clone()
        };
        assert_eq!(state, again);
    }

    #[test]
    fn plan_decision_table() {
        let config = valid_config();
        let payload = to_payload(&config).unwrap();
        let state =
            ReleaseBundleState::from_create(&payload, ReleaseBundleCreateResponse::default());

        assert_eq!(plan(None, &config).unwrap(), PlanAction::Create);
        assert_eq!(plan(Some(&state), &config).unwrap(), PlanAction::NoChange);

        let mut new_version = config.clone();
        new_version.version = "2.0.0".to_string();
        assert_eq!(
            plan(Some(&state), &new_version).unwrap(),
            PlanAction::Replace
        );

        let mut new_description = config.clone();
        new_description.description = Some("now described".to_string());
        assert_eq!(
            plan(Some(&state), &new_description).unwrap(),
            PlanAction::Update
        );
    }

    #[test]
    fn import_id_is_name_colon_version() {
        assert_eq!(
            parse_import_id("bundle:1.0.0").unwrap(),
            ("bundle".to_string(), "1.0.0".to_string())
        );
        // version may itself contain colons; only the first splits
        assert_eq!(
            parse_import_id("bundle:1:rc").unwrap(),
            ("bundle".to_string(), "1:rc".to_string())
        );
        assert!(parse_import_id("no-version").is_err());
        assert!(parse_import_id(":1.0.0").is_err());
        assert!(parse_import_id("bundle:").is_err());
    }
}
