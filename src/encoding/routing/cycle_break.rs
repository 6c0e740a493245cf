use crate::encoding::constraints::{Constraint, RelOp};
use crate::encoding::variables::{Variable, VariablePool};
use crate::model::ops::directed_links;
use crate::model::{Architecture, Indexed, Task};

/// The chosen directed sub-graph must be cycle free.
///
/// Every routing resource gets a binary level number; using a directed link forces a
/// strictly increasing level along it: `lvl(dst) - lvl(src) - M * used >= 1 - M` with
/// `M = 2^bits`, so the inequality is vacuous for unused links and enforces
/// `lvl(src) < lvl(dst)` for used ones.
pub fn encode(
    communication: &Task,
    routing: &Architecture,
    pool: &mut VariablePool,
) -> Vec<Constraint> {
    let resources = routing.vertex_count();
    if resources < 2 {
        return Vec::new();
    }
    let mut bits = 1u32;
    while (1usize << bits) < resources {
        bits += 1;
    }
    let big_m = 1i64 << bits;

    let mut constraints = Vec::new();
    for directed in directed_links(routing) {
        let mut constraint = Constraint::new(RelOp::Ge, 1 - big_m);
        for bit in 0..bits {
            constraint.add(
                1 << bit,
                pool.pos(Variable::ResourceLevel {
                    communication: communication.id().to_string(),
                    resource: directed.destination.id().to_string(),
                    bit,
                }),
            );
            constraint.add(
                -(1 << bit),
                pool.pos(Variable::ResourceLevel {
                    communication: communication.id().to_string(),
                    resource: directed.source.id().to_string(),
                    bit,
                }),
            );
        }
        constraint.add(
            -big_m,
            pool.pos(Variable::CommunicationLink {
                communication: communication.id().to_string(),
                link: directed.link.id().to_string(),
                source: directed.source.id().to_string(),
                destination: directed.destination.id().to_string(),
            }),
        );
        constraints.push(constraint);
    }
    constraints
}
