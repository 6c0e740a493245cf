//! The symbolic encoder: a compiler from a [Specification] to a linear pseudo-Boolean
//! constraint system whose models correspond one-to-one with valid implementations.
//!
//! The encoder walks a stable snapshot of the specification and emits, per task, the
//! activity and mapping-exclusivity constraints, and per communication the endpoint
//! gates plus the full routing assembly of [routing::encode_routing]. It never
//! interprets the constraint system; the [Encoding] is handed to an external solver
//! and the chosen model is decoded back into a concrete implementation downstream.

use crate::model::{Indexed, Specification, Task};
use std::collections::HashSet;

pub mod constraints;
pub mod routing;
pub mod variables;

use constraints::{and_gate, fixed, Constraint, RelOp};
use routing::{AdditionalRoutingConstraints, NoAdditionalConstraints};
use variables::{CommunicationFlow, Variable, VariablePool};

/// The result of an encoding pass: the interned variables and the constraint system
/// over them.
#[derive(Clone, Debug)]
pub struct Encoding {
    pub variables: VariablePool,
    pub constraints: Vec<Constraint>,
}

/// Encode a specification with the default routing assembly.
pub fn encode(specification: &Specification) -> Result<Encoding, String> {
    encode_with(specification, &NoAdditionalConstraints)
}

/// Encode a specification, passing extra routing constraints through verbatim.
pub fn encode_with(
    specification: &Specification,
    additional: &dyn AdditionalRoutingConstraints,
) -> Result<Encoding, String> {
    let mut pool = VariablePool::new();
    let mut constraints = Vec::new();

    // Every task of a static application is implemented.
    for task in specification.application().tasks() {
        let active = pool.pos(Variable::Task {
            task: task.id().to_string(),
        });
        constraints.push(fixed(active, true));
    }

    // An active process is bound by exactly one of its mappings.
    for process in specification.application().processes() {
        let mut exclusive = Constraint::new(RelOp::Eq, 0);
        for mapping in specification.mappings().of_task(process.id()) {
            exclusive.add(
                1,
                pool.pos(Variable::Mapping {
                    mapping: mapping.id().to_string(),
                }),
            );
        }
        exclusive.add(
            -1,
            pool.pos(Variable::Task {
                task: process.id().to_string(),
            }),
        );
        constraints.push(exclusive);
    }

    for communication in specification.application().communications() {
        let flows = communication_flows(specification, communication)?;

        // Endpoint gates: a task pair exchanges data iff both tasks are active.
        let mut emitted: HashSet<(String, String)> = HashSet::new();
        for flow in &flows {
            for (source, destination) in [flow.source_pair(), flow.destination_pair()] {
                if !emitted.insert((source.to_string(), destination.to_string())) {
                    continue;
                }
                let pair = pool.pos(Variable::TaskPair {
                    source: source.to_string(),
                    destination: destination.to_string(),
                });
                let endpoints = [
                    pool.pos(Variable::Task {
                        task: source.to_string(),
                    }),
                    pool.pos(Variable::Task {
                        task: destination.to_string(),
                    }),
                ];
                constraints.extend(and_gate(pair, &endpoints));
            }
        }

        // Without an explicit routing the whole architecture is the routing space.
        let default_routing;
        let routing = match specification.routings().get(communication.id()) {
            Some(routing) => routing,
            None => {
                default_routing = specification.architecture().clone();
                &default_routing
            }
        };

        constraints.extend(routing::encode_routing(
            specification,
            communication,
            &flows,
            routing,
            &mut pool,
            additional,
        )?);
    }

    Ok(Encoding {
        variables: pool,
        constraints,
    })
}

/// The flows of a communication: one per pair of predecessor and successor process.
/// A communication without a predecessor or successor process is malformed.
fn communication_flows(
    specification: &Specification,
    communication: &Task,
) -> Result<Vec<CommunicationFlow>, String> {
    let predecessors: Vec<&Task> = specification
        .application()
        .predecessors(communication.id())
        .into_iter()
        .filter(|task| !task.is_communication())
        .collect();
    let successors: Vec<&Task> = specification
        .application()
        .successors(communication.id())
        .into_iter()
        .filter(|task| !task.is_communication())
        .collect();
    if predecessors.is_empty() || successors.is_empty() {
        return Err(format!(
            "Communication `{}` must connect at least one predecessor and one successor task.",
            communication.id()
        ));
    }
    let mut flows = Vec::with_capacity(predecessors.len() * successors.len());
    for predecessor in &predecessors {
        for successor in &successors {
            flows.push(CommunicationFlow::new(
                predecessor.id(),
                communication.id(),
                successor.id(),
            ));
        }
    }
    Ok(flows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ops::tests::sample_specification;
    use crate::model::{Dependency, Mapping, Task as ModelTask};

    #[test]
    fn test_encode_sample_specification() {
        let specification = sample_specification();
        let encoding = encode(&specification).unwrap();

        assert!(!encoding.constraints.is_empty());
        // All task activity variables are interned.
        for task in ["t1", "t2", "t3"] {
            assert!(encoding
                .variables
                .index_of(&Variable::Task {
                    task: task.to_string()
                })
                .is_some());
        }
        // Mapping selection variables exist for both mappings.
        for mapping in ["m1", "m2"] {
            assert!(encoding
                .variables
                .index_of(&Variable::Mapping {
                    mapping: mapping.to_string()
                })
                .is_some());
        }
        // The flow endpoints of the single flow (t1, t2, t3) are present.
        assert!(encoding
            .variables
            .index_of(&Variable::TaskPair {
                source: "t1".to_string(),
                destination: "t2".to_string()
            })
            .is_some());
        assert!(encoding
            .variables
            .index_of(&Variable::TaskPair {
                source: "t2".to_string(),
                destination: "t3".to_string()
            })
            .is_some());
    }

    #[test]
    fn test_mapping_exclusivity_constraint() {
        let specification = sample_specification();
        let encoding = encode(&specification).unwrap();
        let mapping = encoding
            .variables
            .index_of(&Variable::Mapping {
                mapping: "m1".to_string(),
            })
            .unwrap();
        // Exactly one constraint ties m1 to the activity of t1.
        let exclusivity: Vec<&Constraint> = encoding
            .constraints
            .iter()
            .filter(|constraint| {
                constraint.op() == RelOp::Eq
                    && constraint.rhs() == 0
                    && constraint
                        .terms()
                        .iter()
                        .any(|(_, lit)| lit.index() == mapping)
            })
            .collect();
        assert_eq!(exclusivity.len(), 1);
        assert_eq!(exclusivity[0].terms().len(), 2);
    }

    #[test]
    fn test_duplicate_mapping_aborts_encoding() {
        let mut specification = sample_specification();
        specification
            .mappings_mut()
            .add(Mapping::new("m1b", "t1", "r1"));
        let error = encode(&specification).unwrap_err();
        assert!(error.contains("More than one mapping"), "{}", error);
    }

    #[test]
    fn test_dangling_communication_is_rejected() {
        let mut specification = sample_specification();
        specification
            .application_mut()
            .add_task(ModelTask::communication("lonely"));
        let error = encode(&specification).unwrap_err();
        assert!(error.contains("lonely"), "{}", error);
    }

    #[test]
    fn test_unrouted_communication_uses_whole_architecture() {
        let mut specification = sample_specification();
        specification.routings_mut().remove("t2");
        let encoding = encode(&specification).unwrap();
        // The one-direction constraints over the undirected architecture links only
        // exist when the architecture is the routing space.
        let flow = CommunicationFlow::new("t1", "t2", "t3");
        assert!(encoding
            .variables
            .index_of(&Variable::FlowSource {
                flow,
                resource: "r1".to_string()
            })
            .is_some());
        assert!(encoding
            .variables
            .index_of(&Variable::CommunicationLink {
                communication: "t2".to_string(),
                link: "l1".to_string(),
                source: "can".to_string(),
                destination: "r1".to_string()
            })
            .is_some());
    }

    #[test]
    fn test_multiple_flows() {
        let mut specification = sample_specification();
        // A second successor process turns the communication into two flows.
        specification.application_mut().add_task(ModelTask::new("t4"));
        specification
            .application_mut()
            .add_dependency(Dependency::new("d3"), "t2", "t4");
        specification
            .mappings_mut()
            .add(Mapping::new("m4", "t4", "r2"));
        let encoding = encode(&specification).unwrap();
        for destination in ["t3", "t4"] {
            assert!(encoding
                .variables
                .index_of(&Variable::FlowDestination {
                    flow: CommunicationFlow::new("t1", "t2", destination),
                    resource: "r2".to_string(),
                })
                .is_some());
        }
    }
}
