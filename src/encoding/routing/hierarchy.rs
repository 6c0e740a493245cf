use crate::encoding::constraints::{or_gate, Constraint};
use crate::encoding::variables::{CommunicationFlow, Lit, Variable, VariablePool};
use crate::model::ops::{in_links, out_links};
use crate::model::{Architecture, Indexed, Task};

/// The variable hierarchy of a routed communication, tied in both directions:
/// - a directed link is used by the communication iff at least one flow uses it,
/// - a resource is used iff it is incident to a used directed link,
/// - the communication is active iff at least one routing resource is used.
pub fn encode(
    communication: &Task,
    flows: &[CommunicationFlow],
    routing: &Architecture,
    pool: &mut VariablePool,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    // Link level: the communication uses a directed link iff some flow does.
    for resource in routing.vertices() {
        for directed in out_links(routing, resource.id()) {
            let link = pool.pos(Variable::CommunicationLink {
                communication: communication.id().to_string(),
                link: directed.link.id().to_string(),
                source: directed.source.id().to_string(),
                destination: directed.destination.id().to_string(),
            });
            let flow_links: Vec<Lit> = flows
                .iter()
                .map(|flow| {
                    pool.pos(Variable::FlowLink {
                        flow: flow.clone(),
                        link: directed.link.id().to_string(),
                        source: directed.source.id().to_string(),
                        destination: directed.destination.id().to_string(),
                    })
                })
                .collect();
            constraints.extend(or_gate(link, &flow_links));
        }
    }

    // Resource level: a resource is used iff an incident directed link is used.
    let mut resource_variables: Vec<Lit> = Vec::new();
    for resource in routing.vertices() {
        let mut incident: Vec<Lit> = Vec::new();
        for directed in out_links(routing, resource.id())
            .into_iter()
            .chain(in_links(routing, resource.id()))
        {
            incident.push(pool.pos(Variable::CommunicationLink {
                communication: communication.id().to_string(),
                link: directed.link.id().to_string(),
                source: directed.source.id().to_string(),
                destination: directed.destination.id().to_string(),
            }));
        }
        incident.dedup();
        let used = pool.pos(Variable::CommunicationResource {
            communication: communication.id().to_string(),
            resource: resource.id().to_string(),
        });
        constraints.extend(or_gate(used, &incident));
        resource_variables.push(used);
    }

    // Top level: the communication is active iff it occupies some resource.
    let active = pool.pos(Variable::Task {
        task: communication.id().to_string(),
    });
    constraints.extend(or_gate(active, &resource_variables));

    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ops::tests::sample_specification;

    #[test]
    fn test_hierarchy_shape() {
        let specification = sample_specification();
        let communication = specification.application().task("t2").unwrap();
        let flow = CommunicationFlow::new("t1", "t2", "t3");
        let mut pool = VariablePool::new();
        let routing = specification.routings().get("t2").unwrap();

        let constraints = encode(communication, &[flow], routing, &mut pool);
        // Two directed links with one flow: 2 gates of 2 constraints each.
        // Three resources: r1 and r2 see one incident direction, can sees two,
        // giving 2 + 2 + 3 constraints, plus 4 for the top-level gate.
        assert_eq!(constraints.len(), 4 + 7 + 4);
        // The task variable participates in the hierarchy.
        assert!(pool
            .index_of(&Variable::Task {
                task: "t2".to_string()
            })
            .is_some());
        assert!(pool
            .index_of(&Variable::CommunicationResource {
                communication: "t2".to_string(),
                resource: "can".to_string()
            })
            .is_some());
    }
}
