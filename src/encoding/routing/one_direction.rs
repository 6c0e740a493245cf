use crate::encoding::constraints::{pair_at_most_one, Constraint};
use crate::encoding::variables::{Variable, VariablePool};
use crate::model::{Architecture, EdgeKind, Indexed, Task};

/// For every undirected link of the routing, at most one of its two directed
/// incarnations may be used by the communication.
pub fn encode(
    communication: &Task,
    routing: &Architecture,
    pool: &mut VariablePool,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    for entry in routing.edge_entries() {
        if entry.kind() != EdgeKind::Undirected {
            continue;
        }
        let forward = pool.pos(Variable::CommunicationLink {
            communication: communication.id().to_string(),
            link: entry.edge().id().to_string(),
            source: entry.source().to_string(),
            destination: entry.target().to_string(),
        });
        let backward = pool.pos(Variable::CommunicationLink {
            communication: communication.id().to_string(),
            link: entry.edge().id().to_string(),
            source: entry.target().to_string(),
            destination: entry.source().to_string(),
        });
        constraints.push(pair_at_most_one(forward, backward));
    }
    constraints
}
