use crate::encoding::constraints::{fixed, Constraint};
use crate::encoding::routing::proxy_id;
use crate::encoding::variables::{Variable, VariablePool};
use crate::model::ops::{in_links, out_links};
use crate::model::{Architecture, Indexed, Specification, Task};

/// A resource standing behind a proxy does not carry traffic itself: its routing
/// vertex and every incident directed link are pinned to zero. Messages of tasks
/// mapped onto such a resource enter the network at the proxy, which is where the
/// end-node placement puts them.
pub fn encode(
    specification: &Specification,
    communication: &Task,
    routing: &Architecture,
    pool: &mut VariablePool,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    for resource in routing.vertices() {
        if proxy_id(specification.architecture(), resource.id()) == resource.id() {
            continue;
        }
        let used = pool.pos(Variable::CommunicationResource {
            communication: communication.id().to_string(),
            resource: resource.id().to_string(),
        });
        constraints.push(fixed(used, false));
        for directed in out_links(routing, resource.id())
            .into_iter()
            .chain(in_links(routing, resource.id()))
        {
            let link = pool.pos(Variable::CommunicationLink {
                communication: communication.id().to_string(),
                link: directed.link.id().to_string(),
                source: directed.source.id().to_string(),
                destination: directed.destination.id().to_string(),
            });
            constraints.push(fixed(link, false));
        }
    }
    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ops::tests::sample_specification;
    use crate::model::{AttributeValue, Element};

    #[test]
    fn test_unproxied_routing_is_unconstrained() {
        let specification = sample_specification();
        let communication = specification.application().task("t2").unwrap();
        let mut pool = VariablePool::new();
        let routing = specification.routings().get("t2").unwrap();
        assert!(encode(&specification, communication, routing, &mut pool).is_empty());
    }

    #[test]
    fn test_proxied_resource_is_pinned_to_zero() {
        let mut specification = sample_specification();
        specification
            .architecture_mut()
            .vertex_mut("r1")
            .unwrap()
            .set_attribute("proxy", AttributeValue::Str("can".to_string()));
        let mut pool = VariablePool::new();
        let routing = specification.routings().get("t2").unwrap().clone();
        let communication = specification.application().task("t2").unwrap();

        let constraints = encode(&specification, communication, &routing, &mut pool);
        // The r1 vertex and its one incident directed link (r1 -> can) are zeroed.
        assert_eq!(constraints.len(), 2);
        for constraint in &constraints {
            assert_eq!(constraint.rhs(), 0);
        }
    }
}
