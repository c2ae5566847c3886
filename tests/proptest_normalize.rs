//! Property-based tests using proptest
//!
//! These tests verify the normalization invariants of the model converters:
//! round-trip stability, sort invariance, and empty-map defaulting.

use proptest::prelude::*;
use std::collections::BTreeMap;

use distctl::resources::permission::{
    self, DestinationConfig, PermissionConfig, PermissionPayload, PermissionState,
    PrincipalsConfig, PrincipalsPayload,
};
use distctl::resources::release_bundle::{
    self, BundleSpecConfig, MappingConfig, PropConfig, QueryConfig, ReleaseBundleConfig,
};

/// Generate a permission-string list
fn arb_permissions() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 1..6)
}

/// Generate a principals map (user/group name to permission list)
fn arb_principal_map() -> impl Strategy<Value = BTreeMap<String, Vec<String>>> {
    prop::collection::btree_map("[a-z][a-z0-9-]{0,10}", arb_permissions(), 1..5)
}

/// Generate a valid permission target configuration
fn arb_permission_config() -> impl Strategy<Value = PermissionConfig> {
    (
        "[a-z][a-z0-9-]{0,20}",
        arb_principal_map(),
        prop::collection::vec(("[a-z*]{1,8}", "[a-z*]{1,8}"), 1..4),
    )
        .prop_map(|(name, users, sites)| PermissionConfig {
            name,
            resource_type: "destination".to_string(),
            distribution_destinations: sites
                .into_iter()
                .map(|(site, city)| DestinationConfig {
                    site_name: Some(site),
                    city_name: Some(city),
                    country_codes: Some(vec!["*".to_string()]),
                })
                .collect(),
            principals: Some(PrincipalsConfig {
                users: Some(users),
                groups: None,
            }),
        })
}

/// Rebuild a configuration from normalized state, as a refresh would
fn config_from_state(state: &PermissionState) -> PermissionConfig {
    PermissionConfig {
        name: state.name.clone(),
        resource_type: state.resource_type.clone(),
        distribution_destinations: state
            .distribution_destinations
            .iter()
            .map(|d| DestinationConfig {
                site_name: Some(d.site_name.clone()),
                city_name: Some(d.city_name.clone()),
                country_codes: Some(d.country_codes.clone()),
            })
            .collect(),
        principals: Some(PrincipalsConfig {
            users: Some(state.principals.users.clone()),
            groups: Some(state.principals.groups.clone()),
        }),
    }
}

proptest! {
    /// Applying the conversion pipeline twice is a fixed point: no valid
    /// configuration can produce a perpetual diff.
    #[test]
    fn round_trip_is_a_fixed_point(config in arb_permission_config()) {
        let once = permission::expected_state(&config).unwrap();
        let twice = permission::expected_state(&config_from_state(&once)).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Any permutation of a permission list normalizes to the same state
    #[test]
    fn permission_lists_are_sort_invariant(
        config in arb_permission_config(),
        seed in any::<u64>(),
    ) {
        let baseline = permission::expected_state(&config).unwrap();

        // rotate every permission list by a pseudo-random offset
        let mut permuted = config.clone();
        if let Some(principals) = &mut permuted.principals {
            if let Some(users) = &mut principals.users {
                for perms in users.values_mut() {
                    let offset = (seed as usize) % perms.len().max(1);
                    perms.rotate_left(offset);
                }
            }
        }

        let state = permission::expected_state(&permuted).unwrap();
        prop_assert_eq!(baseline, state);
    }

    /// Omitting a principals map is observably identical to setting it empty
    #[test]
    fn empty_map_defaulting(config in arb_permission_config()) {
        let mut explicit = config.clone();
        if let Some(principals) = &mut explicit.principals {
            principals.groups = Some(BTreeMap::new());
        }

        prop_assert_eq!(
            permission::expected_state(&config).unwrap(),
            permission::expected_state(&explicit).unwrap()
        );
    }

    /// Whatever ordering the server responds with, the normalized state is
    /// identical: set semantics do not leak ordering into the state.
    #[test]
    fn server_ordering_is_irrelevant(
        config in arb_permission_config(),
        seed in any::<u64>(),
    ) {
        let payload = permission::to_payload(&config).unwrap();

        let mut reordered = payload.clone();
        for perms in reordered.principals.users.values_mut() {
            let offset = (seed as usize) % perms.len().max(1);
            perms.rotate_left(offset);
        }

        prop_assert_eq!(
            PermissionState::from_payload(payload),
            PermissionState::from_payload(reordered)
        );
    }
}

/// Generate a release bundle spec with multiple queries and nested sets
fn arb_bundle_config() -> impl Strategy<Value = ReleaseBundleConfig> {
    (
        "[a-z0-9][a-z0-9-]{1,20}",
        "[0-9][0-9.]{1,10}",
        prop::collection::vec(
            (
                "[a-z]{3,12}",
                prop::collection::vec(("[a-z]{1,6}", "[a-z]{1,6}"), 0..4),
                prop::collection::vec("[a-z]{1,6}", 0..4),
            ),
            1..4,
        ),
    )
        .prop_map(|(name, version, queries)| ReleaseBundleConfig {
            name,
            version,
            spec: BundleSpecConfig {
                queries: queries
                    .into_iter()
                    .map(|(aql, mappings, patterns)| QueryConfig {
                        aql,
                        query_name: None,
                        mappings: mappings
                            .into_iter()
                            .map(|(input, output)| MappingConfig { input, output })
                            .collect(),
                        added_props: vec![PropConfig {
                            key: "release".to_string(),
                            values: patterns.clone(),
                        }],
                        exclude_props_patterns: patterns,
                    })
                    .collect(),
            },
            ..Default::default()
        })
}

proptest! {
    /// Reversing every set-typed collection in the declaration produces an
    /// identical wire payload: the canonical ordering absorbs input order.
    #[test]
    fn bundle_spec_ordering_is_canonical(config in arb_bundle_config()) {
        let baseline = release_bundle::to_payload(&config).unwrap();

        let mut reversed = config.clone();
        reversed.spec.queries.reverse();
        for query in &mut reversed.spec.queries {
            query.mappings.reverse();
            query.exclude_props_patterns.reverse();
            for prop in &mut query.added_props {
                prop.values.reverse();
            }
        }

        let payload = release_bundle::to_payload(&reversed).unwrap();
        prop_assert_eq!(baseline.spec, payload.spec);
    }

    /// Normalizing an already-normalized payload changes nothing
    #[test]
    fn bundle_normalization_is_idempotent(config in arb_bundle_config()) {
        let payload = release_bundle::to_payload(&config).unwrap();

        // feed the normalized payload back through as a declaration
        let requoted = ReleaseBundleConfig {
            name: payload.name.clone(),
            version: payload.version.clone(),
            spec: BundleSpecConfig {
                queries: payload
                    .spec
                    .queries
                    .iter()
                    .map(|q| QueryConfig {
                        aql: q.aql.clone(),
                        query_name: q.query_name.clone(),
                        mappings: q
                            .mappings
                            .iter()
                            .map(|m| MappingConfig {
                                input: m.input.clone(),
                                output: m.output.clone(),
                            })
                            .collect(),
                        added_props: q
                            .added_props
                            .iter()
                            .map(|p| PropConfig {
                                key: p.key.clone(),
                                values: p.values.clone(),
                            })
                            .collect(),
                        exclude_props_patterns: q.exclude_props_patterns.clone(),
                    })
                    .collect(),
            },
            ..Default::default()
        };

        let again = release_bundle::to_payload(&requoted).unwrap();
        prop_assert_eq!(payload.spec, again.spec);
    }
}

/// Non-property check kept here with the other normalization coverage: a
/// payload built by hand with unsorted lists still settles into sorted state.
#[test]
fn from_payload_sorts_unsorted_server_response() {
    let state = PermissionState::from_payload(PermissionPayload {
        name: "p".to_string(),
        resource_type: "destination".to_string(),
        distribution_destinations: vec![],
        principals: PrincipalsPayload {
            users: BTreeMap::from([(
                "u".to_string(),
                vec!["z".to_string(), "a".to_string()],
            )]),
            groups: BTreeMap::new(),
        },
    });
    assert_eq!(state.principals.users["u"], vec!["a", "z"]);
}
