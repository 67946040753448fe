// src/core/ownership.rs

//! The ownership resolver: maps a user-supplied resource reference (display
//! name or canonical id) to a provider id, gated by owner identity and the
//! management marker.

use crate::core::StratoError;
use crate::core::gateway::{ResourceGateway, ResourceKind, ResourceState};
use std::collections::HashMap;

/// Resolves `reference` to the canonical id of a resource owned by `owner`.
///
/// Queries the gateway for the owner's managed resources of the given kind
/// (optionally restricted to one lifecycle state, e.g. requiring "stopped"
/// before a start is allowed), then resolves in two passes: first as a
/// display name, then as a canonical id appearing in the owner's set.
///
/// `Ok(None)` means no owned match exists. This is the single ownership gate:
/// a caller can never affect a resource, even by guessing its canonical id,
/// unless it carries their owner tag and the management marker.
///
/// Display names are not enforced unique by the gateway; if duplicates exist,
/// resolution by name is last-match in enumeration order.
pub async fn resolve_owned_reference(
    gateway: &dyn ResourceGateway,
    owner: &str,
    kind: ResourceKind,
    reference: &str,
    state: Option<ResourceState>,
) -> Result<Option<String>, StratoError> {
    let owned = gateway.list(kind, Some(owner), state).await?;

    let by_name: HashMap<&str, &str> = owned
        .iter()
        .map(|record| (record.name.as_str(), record.id.as_str()))
        .collect();

    if let Some(id) = by_name.get(reference) {
        return Ok(Some((*id).to_string()));
    }
    if owned.iter().any(|record| record.id == reference) {
        return Ok(Some(reference.to_string()));
    }
    Ok(None)
}
