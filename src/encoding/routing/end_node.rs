use crate::encoding::constraints::{and_gate, fixed, Constraint};
use crate::encoding::routing::proxy_id;
use crate::encoding::variables::{CommunicationFlow, Variable, VariablePool};
use crate::model::{Architecture, Indexed, Mapping, Specification};

/// Place the end nodes of a flow's physical routing on the mapping targets of the
/// neighbor tasks of the communication.
///
/// For every routing resource, the mappings of the flow's source and destination task
/// whose target proxies onto that resource are collected. No such mapping pins the
/// end-node variable to 0; exactly one ties it to the conjunction of the mapping
/// variable and the two flow endpoint variables. More than one mapping between the
/// same task and resource violates the model contract and aborts the encoding.
pub fn encode_end_nodes(
    specification: &Specification,
    flow: &CommunicationFlow,
    routing: &Architecture,
    pool: &mut VariablePool,
) -> Result<Vec<Constraint>, String> {
    let mut constraints = Vec::new();
    for resource in routing.vertices() {
        let mut source_mappings: Vec<&Mapping> = Vec::new();
        let mut destination_mappings: Vec<&Mapping> = Vec::new();
        for mapping in specification.mappings().iter() {
            let proxy = proxy_id(specification.architecture(), mapping.target());
            if proxy != resource.id() {
                continue;
            }
            if mapping.source() == flow.source_task {
                source_mappings.push(mapping);
            }
            if mapping.source() == flow.destination_task {
                destination_mappings.push(mapping);
            }
        }
        constraints.extend(end_node_constraints(
            flow,
            resource.id(),
            &source_mappings,
            true,
            pool,
        )?);
        constraints.extend(end_node_constraints(
            flow,
            resource.id(),
            &destination_mappings,
            false,
            pool,
        )?);
    }
    Ok(constraints)
}

/// **(internal)** The constraints of one end-node variable.
fn end_node_constraints(
    flow: &CommunicationFlow,
    resource: &str,
    mappings: &[&Mapping],
    source: bool,
    pool: &mut VariablePool,
) -> Result<Vec<Constraint>, String> {
    let end_node = if source {
        Variable::FlowSource {
            flow: flow.clone(),
            resource: resource.to_string(),
        }
    } else {
        Variable::FlowDestination {
            flow: flow.clone(),
            resource: resource.to_string(),
        }
    };
    let end_node = pool.pos(end_node);

    match mappings {
        [] => Ok(vec![fixed(end_node, false)]),
        [mapping] => {
            let conditions = [
                pool.pos(Variable::Mapping {
                    mapping: mapping.id().to_string(),
                }),
                pool.pos(Variable::TaskPair {
                    source: flow.source_task.clone(),
                    destination: flow.communication.clone(),
                }),
                pool.pos(Variable::TaskPair {
                    source: flow.communication.clone(),
                    destination: flow.destination_task.clone(),
                }),
            ];
            Ok(and_gate(end_node, &conditions))
        }
        _ => {
            let task = if source {
                &flow.source_task
            } else {
                &flow.destination_task
            };
            Err(format!(
                "More than one mapping between task `{}` and resource `{}`.",
                task, resource
            ))
        }
    }
}
