//! Per-communication routing constraints.
//!
//! For every communication, the assembly in [encode_routing] composes the individual
//! generators: one-direction use of undirected links, cycle freedom, the variable
//! hierarchy between flows, links, resources and the communication, per-flow end-node
//! placement, proxy handling and caller-supplied extra constraints.

use crate::encoding::constraints::Constraint;
use crate::encoding::variables::{CommunicationFlow, VariablePool};
use crate::model::{Architecture, Specification, Task};

/// **(internal)** One direction per undirected routing link.
mod one_direction;
/// **(internal)** Cycle freedom through per-resource level variables.
mod cycle_break;
/// **(internal)** The flow/link/resource/communication variable hierarchy.
mod hierarchy;
/// **(internal)** End-node placement on the mapping targets of the neighbor tasks.
mod end_node;
/// **(internal)** Proxied resources are invisible to routing.
mod proxy;

pub use end_node::encode_end_nodes;

/// Extra routing constraints, passed through the assembly verbatim. Implementations
/// may intern additional variables through the pool.
pub trait AdditionalRoutingConstraints {
    fn to_constraints(
        &self,
        communication: &Task,
        flows: &[CommunicationFlow],
        routing: &Architecture,
        pool: &mut VariablePool,
    ) -> Vec<Constraint>;
}

/// The default: no extra constraints.
pub struct NoAdditionalConstraints;

impl AdditionalRoutingConstraints for NoAdditionalConstraints {
    fn to_constraints(
        &self,
        _communication: &Task,
        _flows: &[CommunicationFlow],
        _routing: &Architecture,
        _pool: &mut VariablePool,
    ) -> Vec<Constraint> {
        Vec::new()
    }
}

/// The proxy a resource stands behind: the `proxy` attribute of the architecture
/// resource with the given identifier, or the identifier itself.
pub(crate) fn proxy_id<'a>(architecture: &'a Architecture, resource: &'a str) -> &'a str {
    architecture
        .vertex(resource)
        .and_then(|r| r.attributes.get_str("proxy"))
        .unwrap_or(resource)
}

/// Emit all routing constraints of one communication.
pub fn encode_routing(
    specification: &Specification,
    communication: &Task,
    flows: &[CommunicationFlow],
    routing: &Architecture,
    pool: &mut VariablePool,
    additional: &dyn AdditionalRoutingConstraints,
) -> Result<Vec<Constraint>, String> {
    let mut constraints = Vec::new();
    // Links are used in one direction only.
    constraints.extend(one_direction::encode(communication, routing, pool));
    // The used sub-graph is cycle free.
    constraints.extend(cycle_break::encode(communication, routing, pool));
    // The variable hierarchy between flows, links, resources and the communication.
    constraints.extend(hierarchy::encode(communication, flows, routing, pool));
    // Proxied resources do not carry traffic themselves.
    constraints.extend(proxy::encode(specification, communication, routing, pool));
    // End nodes of every flow sit on the mapping targets of the neighbor tasks.
    for flow in flows {
        constraints.extend(encode_end_nodes(specification, flow, routing, pool)?);
    }
    constraints.extend(additional.to_constraints(communication, flows, routing, pool));
    Ok(constraints)
}
