//! Node inventory (C2): typed node DTO for the wire boundary, and the
//! `NodeInfo` domain type the rest of the pipeline operates over.

use std::collections::HashMap;

use k8s_openapi::api::core::v1::Node as KubeNode;
use serde::{Deserialize, Serialize};

use crate::core::resources::{parse_resource, ResourceVector};
use crate::error::AutoscalerError;

const LABEL_REGION: &str = "failure-domain.beta.kubernetes.io/region";
const LABEL_ZONE: &str = "failure-domain.beta.kubernetes.io/zone";
const LABEL_INSTANCE_TYPE: &str = "beta.kubernetes.io/instance-type";
const UNKNOWN: &str = "unknown";

/// Schema-free node facts lifted straight off the cluster API's wire
/// object, before any typed parsing. Mirrors `status.capacity` being a
/// map of quantity strings rather than numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeDto {
    pub name: String,
    pub labels: HashMap<String, String>,
    pub capacity: HashMap<String, String>,
    pub external_id: String,
}

impl NodeDto {
    /// Builds a `NodeDto` from the real Kubernetes wire type. Missing
    /// fields degrade to empty/`"unknown"` rather than failing — no node
    /// is filtered out at this stage (spec.md §4.2).
    pub fn from_kube_node(node: &KubeNode) -> Self {
        let name = node.metadata.name.clone().unwrap_or_default();
        let labels = node.metadata.labels.clone().unwrap_or_default();
        let capacity = node
            .status
            .as_ref()
            .and_then(|status| status.capacity.as_ref())
            .map(|capacity| {
                capacity
                    .iter()
                    .map(|(k, v)| (k.clone(), v.0.clone()))
                    .collect()
            })
            .unwrap_or_default();
        // `spec.externalID` was removed from the Kubernetes API well before
        // k8s-openapi's supported version range; `spec.providerID` is its
        // modern equivalent (cloud-provider instance identifier).
        let external_id = node
            .spec
            .as_ref()
            .and_then(|spec| spec.provider_id.clone())
            .unwrap_or_default();

        Self {
            name,
            labels,
            capacity,
            external_id,
        }
    }
}

/// The typed node facts the reconciliation pipeline actually reasons
/// about. `capacity.cpu >= 0`, `capacity.memory >= 0`, and
/// `capacity.pods >= 1` hold for any node worth scheduling onto; the
/// controller does not itself enforce that invariant (it only ever
/// reads capacity that the cluster API reported).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub name: String,
    pub region: String,
    pub zone: String,
    pub instance_id: String,
    pub instance_type: String,
    pub capacity: ResourceVector,
}

/// Parses a `NodeDto` into a `NodeInfo`. Missing labels become
/// `"unknown"`; missing capacity entries default to 0; quantity strings
/// that fail to parse are `InvalidQuantity` (fatal to the pass that
/// observed them).
pub fn parse_node(dto: &NodeDto) -> Result<NodeInfo, AutoscalerError> {
    let label = |key: &str| -> String {
        dto.labels
            .get(key)
            .cloned()
            .unwrap_or_else(|| UNKNOWN.to_string())
    };

    let mut capacity = ResourceVector::new();
    for resource in ["cpu", "memory", "pods"] {
        let value = match dto.capacity.get(resource) {
            Some(raw) => parse_resource(raw)?,
            None => 0.0,
        };
        capacity.set(resource, value);
    }

    Ok(NodeInfo {
        name: dto.name.clone(),
        region: label(LABEL_REGION),
        zone: label(LABEL_ZONE),
        instance_id: dto.external_id.clone(),
        instance_type: label(LABEL_INSTANCE_TYPE),
        capacity,
    })
}

/// Builds the `nodeName -> NodeInfo` inventory from a batch of node DTOs.
pub fn build_inventory(dtos: &[NodeDto]) -> Result<HashMap<String, NodeInfo>, AutoscalerError> {
    let mut inventory = HashMap::with_capacity(dtos.len());
    for dto in dtos {
        let info = parse_node(dto)?;
        inventory.insert(info.name.clone(), info);
    }
    Ok(inventory)
}
