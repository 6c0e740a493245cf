//! Operations on whole specifications: the directed view of mixed architectures,
//! element lookup tables, type filters, deep copy, shallow clone, and the two
//! narrowing filters (by resources, by functions).

use crate::model::{
    Application, Architecture, Dependency, Element, Indexed, Link, Mapping, Mappings, Resource,
    Routings, Specification, Task,
};
use indexmap::IndexMap;
use std::collections::HashSet;

/// A [Link] viewed in one concrete direction, together with its endpoints.
#[derive(Clone, Copy, Debug)]
pub struct DirectedLink<'a> {
    pub link: &'a Link,
    pub source: &'a Resource,
    pub destination: &'a Resource,
}

/// The directed links leaving `resource`. An incident undirected link is emitted with
/// `resource` as source.
pub fn out_links<'a>(architecture: &'a Architecture, resource: &str) -> Vec<DirectedLink<'a>> {
    architecture
        .out_edges(resource)
        .iter()
        .map(|entry| {
            // Incident edges always have both endpoints in the graph.
            let opposite = architecture.opposite(resource, entry.edge().id()).unwrap();
            DirectedLink {
                link: entry.edge(),
                source: architecture.vertex(resource).unwrap(),
                destination: architecture.vertex(opposite).unwrap(),
            }
        })
        .collect()
}

/// The directed links entering `resource`. An incident undirected link is emitted with
/// `resource` as destination.
pub fn in_links<'a>(architecture: &'a Architecture, resource: &str) -> Vec<DirectedLink<'a>> {
    architecture
        .in_edges(resource)
        .iter()
        .map(|entry| {
            let opposite = architecture.opposite(resource, entry.edge().id()).unwrap();
            DirectedLink {
                link: entry.edge(),
                source: architecture.vertex(opposite).unwrap(),
                destination: architecture.vertex(resource).unwrap(),
            }
        })
        .collect()
}

/// All directed links of an architecture. Undirected links appear twice, once per
/// orientation; directed links once.
pub fn directed_links(architecture: &Architecture) -> Vec<DirectedLink> {
    let mut links = Vec::new();
    for resource in architecture.vertices() {
        links.extend(out_links(architecture, resource.id()));
    }
    links
}

/// The directed incarnations of a single link: two for an undirected link, one for a
/// directed one. Unknown identifiers yield an empty list.
pub fn links_of<'a>(architecture: &'a Architecture, link: &str) -> Vec<DirectedLink<'a>> {
    let entry = match architecture.edge_entries().find(|e| e.edge().id() == link) {
        Some(entry) => entry,
        None => return Vec::new(),
    };
    let source = architecture.vertex(entry.source()).unwrap();
    let destination = architecture.vertex(entry.target()).unwrap();
    let forward = DirectedLink {
        link: entry.edge(),
        source,
        destination,
    };
    match entry.kind() {
        crate::model::EdgeKind::Directed => vec![forward],
        crate::model::EdgeKind::Undirected => vec![
            forward,
            DirectedLink {
                link: entry.edge(),
                source: destination,
                destination: source,
            },
        ],
    }
}

/// A borrowed view of any element of a specification.
#[derive(Clone, Copy, Debug)]
pub enum ElementView<'a> {
    Task(&'a Task),
    Resource(&'a Resource),
    Link(&'a Link),
    Dependency(&'a Dependency),
    Mapping(&'a Mapping),
}

impl<'a> ElementView<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            ElementView::Task(e) => e.id(),
            ElementView::Resource(e) => e.id(),
            ElementView::Link(e) => e.id(),
            ElementView::Dependency(e) => e.id(),
            ElementView::Mapping(e) => e.id(),
        }
    }
}

/// All elements of a specification keyed by identifier.
pub fn elements_map(specification: &Specification) -> IndexMap<&str, ElementView> {
    let mut elements: IndexMap<&str, ElementView> = IndexMap::new();
    for resource in specification.architecture.vertices() {
        elements.insert(resource.id(), ElementView::Resource(resource));
    }
    for link in specification.architecture.edges() {
        elements.insert(link.id(), ElementView::Link(link));
    }
    for task in specification.application.tasks() {
        elements.insert(task.id(), ElementView::Task(task));
    }
    for dependency in specification.application.dependencies() {
        elements.insert(dependency.id(), ElementView::Dependency(dependency));
    }
    for mapping in specification.mappings.iter() {
        elements.insert(mapping.id(), ElementView::Mapping(mapping));
    }
    elements
}

/// Keep only the elements whose `TYPE` attribute matches one of `types`.
pub fn filter_type<'a, E: Element + 'a>(
    elements: impl IntoIterator<Item = &'a E>,
    types: &[&str],
) -> Vec<&'a E> {
    elements
        .into_iter()
        .filter(|element| {
            element
                .element_type()
                .map_or(false, |tag| types.contains(&tag))
        })
        .collect()
}

/// Deep copy: an isomorphic specification in which every element and container is
/// rebuilt. Edges are recreated over the new endpoints, function attributes are copied
/// from a representative member, mappings are rebound, and routing vertices are
/// re-derived from the copied architecture (looked up by identifier, not re-copied).
/// Routing vertices unknown to the architecture are dropped silently.
pub fn copy(specification: &Specification) -> Specification {
    let mut architecture = Architecture::new();
    for resource in specification.architecture.vertices() {
        architecture.add_vertex(resource.clone());
    }
    for entry in specification.architecture.edge_entries() {
        architecture.add_edge(
            entry.edge().clone(),
            entry.source(),
            entry.target(),
            entry.kind(),
        );
    }

    let mut application = Application::new();
    for task in specification.application.tasks() {
        application.add_task(task.clone());
    }
    for entry in specification.application.graph().edge_entries() {
        application.add_dependency(entry.edge().clone(), entry.source(), entry.target());
    }
    for (anchor, attributes) in specification.application.function_entries() {
        application.set_function_attributes(anchor, attributes.clone());
    }

    let mut mappings = Mappings::new();
    for mapping in specification.mappings.iter() {
        mappings.add(mapping.rebind(mapping.source(), mapping.target()));
    }

    let mut routings = Routings::new();
    for communication in specification.application.communications() {
        if let Some(source_routing) = specification.routings.get(communication.id()) {
            let mut routing = Architecture::new();
            for resource in source_routing.vertices() {
                if let Some(parent) = architecture.vertex(resource.id()) {
                    routing.add_vertex(Resource::derived(parent));
                }
            }
            for entry in source_routing.edge_entries() {
                if routing.contains_vertex(entry.source()) && routing.contains_vertex(entry.target())
                {
                    routing.add_edge(
                        entry.edge().clone(),
                        entry.source(),
                        entry.target(),
                        entry.kind(),
                    );
                }
            }
            routings.set(communication.id(), routing);
        }
    }

    Specification {
        application,
        architecture,
        mappings,
        routings,
        attributes: specification.attributes.clone(),
    }
}

/// Shallow clone: the containers are rebuilt but every element value is reused as-is,
/// including the routing sub-architectures.
pub fn clone_shallow(specification: &Specification) -> Specification {
    let mut architecture = Architecture::new();
    for resource in specification.architecture.vertices() {
        architecture.add_vertex(resource.clone());
    }
    for entry in specification.architecture.edge_entries() {
        architecture.add_edge(
            entry.edge().clone(),
            entry.source(),
            entry.target(),
            entry.kind(),
        );
    }

    let mut application = Application::new();
    for task in specification.application.tasks() {
        application.add_task(task.clone());
    }
    for entry in specification.application.graph().edge_entries() {
        application.add_dependency(entry.edge().clone(), entry.source(), entry.target());
    }
    for (anchor, attributes) in specification.application.function_entries() {
        application.set_function_attributes(anchor, attributes.clone());
    }

    let mut mappings = Mappings::new();
    for mapping in specification.mappings.iter() {
        mappings.add(mapping.clone());
    }

    let mut routings = Routings::new();
    for communication in specification.application.communications() {
        if let Some(routing) = specification.routings.get(communication.id()) {
            routings.set(communication.id(), routing.clone());
        }
    }

    Specification {
        application,
        architecture,
        mappings,
        routings,
        attributes: specification.attributes.clone(),
    }
}

/// Narrow a specification down to a subset of its resources.
///
/// Every communication first has its routing pruned to the kept resources and is then
/// removed from the application altogether: routings cannot be meaningfully preserved
/// across a resource filter, so the definitive policy is to drop all communications.
/// (An alternative policy, dropping a communication only once its routing becomes
/// empty, has been considered and is deliberately not implemented.)
///
/// Process tasks keep the mappings whose target survives; mappings outside the kept
/// set are deleted, and a process without surviving mappings is deleted too.
/// Deletions apply in the order mappings, tasks, resources.
pub fn filter_by_resources(specification: &mut Specification, resources: &[&str]) {
    let keep: HashSet<&str> = resources.iter().copied().collect();

    let delete_resources: Vec<String> = specification
        .architecture
        .vertices()
        .map(|resource| resource.id().to_string())
        .filter(|id| !keep.contains(id.as_str()))
        .collect();

    let mut delete_mappings: Vec<String> = Vec::new();
    let mut delete_tasks: Vec<String> = Vec::new();

    let tasks: Vec<(String, bool)> = specification
        .application
        .tasks()
        .map(|task| (task.id().to_string(), task.is_communication()))
        .collect();

    for (task, is_communication) in tasks {
        if is_communication {
            if let Some(routing) = specification.routings.get_mut(&task) {
                let prune: Vec<String> = routing
                    .vertices()
                    .map(|resource| resource.id().to_string())
                    .filter(|id| !keep.contains(id.as_str()))
                    .collect();
                routing.remove_vertices(prune.iter().map(String::as_str));
            }
            delete_tasks.push(task);
        } else {
            let mut keep_task = false;
            for mapping in specification.mappings.of_task(&task) {
                if keep.contains(mapping.target()) {
                    keep_task = true;
                } else {
                    delete_mappings.push(mapping.id().to_string());
                }
            }
            if !keep_task {
                delete_tasks.push(task);
            }
        }
    }

    specification
        .mappings
        .remove_all(delete_mappings.iter().map(String::as_str));
    for task in &delete_tasks {
        specification.application.remove_task(task);
    }
    specification
        .architecture
        .remove_vertices(delete_resources.iter().map(String::as_str));
}

/// Narrow a specification down to a set of functions, each given as the identifiers of
/// its member tasks.
///
/// Tasks outside the kept functions are deleted (communications lose their routing as
/// well), then mappings whose source is gone. Resources survive if they are a target
/// of a remaining mapping or appear in a remaining routing; finally every routing is
/// pruned to the surviving architecture.
pub fn filter_by_functions(specification: &mut Specification, functions: &[Vec<String>]) {
    let keep: HashSet<&str> = functions
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();

    let remove_tasks: Vec<(String, bool)> = specification
        .application
        .tasks()
        .filter(|task| !keep.contains(task.id()))
        .map(|task| (task.id().to_string(), task.is_communication()))
        .collect();
    let remove_mappings: Vec<String> = specification
        .mappings
        .iter()
        .filter(|mapping| !keep.contains(mapping.source()))
        .map(|mapping| mapping.id().to_string())
        .collect();

    for (task, is_communication) in &remove_tasks {
        if *is_communication {
            specification.routings.remove(task);
        }
        specification.application.remove_task(task);
    }
    specification
        .mappings
        .remove_all(remove_mappings.iter().map(String::as_str));

    let mut keep_resources: HashSet<String> = specification
        .mappings
        .iter()
        .map(|mapping| mapping.target().to_string())
        .collect();
    for (_, routing) in specification.routings.iter() {
        for resource in routing.vertices() {
            keep_resources.insert(resource.id().to_string());
        }
    }
    let remove_resources: Vec<String> = specification
        .architecture
        .vertices()
        .map(|resource| resource.id().to_string())
        .filter(|id| !keep_resources.contains(id))
        .collect();
    specification
        .architecture
        .remove_vertices(remove_resources.iter().map(String::as_str));

    let architecture_ids: HashSet<String> = specification
        .architecture
        .vertices()
        .map(|resource| resource.id().to_string())
        .collect();
    for (_, routing) in specification.routings.iter_mut() {
        let prune: Vec<String> = routing
            .vertices()
            .map(|resource| resource.id().to_string())
            .filter(|id| !architecture_ids.contains(id))
            .collect();
        routing.remove_vertices(prune.iter().map(String::as_str));
    }
}

/// Like [filter_by_functions], with each function designated by any of its member
/// tasks. Unknown identifiers designate empty functions.
pub fn filter_by_function_names(specification: &mut Specification, anchors: &[&str]) {
    let functions: Vec<Vec<String>> = anchors
        .iter()
        .map(|anchor| specification.application.component_of(anchor))
        .collect();
    filter_by_functions(specification, &functions);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{
        Application, Architecture, AttributeValue, Dependency, EdgeKind, Element, Link, Mapping,
        Mappings, Resource, Routings, Specification, Task,
    };

    /// **(test)** A small but complete specification: two processing resources around
    /// a bus, a three-task chain with one message, and a fixed routing for the message.
    pub(crate) fn sample_specification() -> Specification {
        let mut architecture = Architecture::new();
        let mut r1 = Resource::new("r1");
        r1.set_attribute("TYPE", AttributeValue::Str("ECU".to_string()));
        architecture.add_vertex(r1);
        let mut r2 = Resource::new("r2");
        r2.set_attribute("TYPE", AttributeValue::Str("ECU".to_string()));
        architecture.add_vertex(r2);
        let mut can = Resource::new("can");
        can.set_attribute("TYPE", AttributeValue::Str("BUS".to_string()));
        architecture.add_vertex(can);
        architecture.add_edge(Link::new("l1"), "r1", "can", EdgeKind::Undirected);
        architecture.add_edge(Link::new("l2"), "r2", "can", EdgeKind::Undirected);

        let mut application = Application::new();
        application.add_task(Task::new("t1"));
        application.add_task(Task::communication("t2"));
        application.add_task(Task::new("t3"));
        application.add_dependency(Dependency::new("d1"), "t1", "t2");
        application.add_dependency(Dependency::new("d2"), "t2", "t3");

        let mut mappings = Mappings::new();
        mappings.add(Mapping::new("m1", "t1", "r1"));
        mappings.add(Mapping::new("m2", "t3", "r2"));

        let mut routing = Architecture::new();
        routing.add_vertex(Resource::derived(architecture.vertex("r1").unwrap()));
        routing.add_vertex(Resource::derived(architecture.vertex("can").unwrap()));
        routing.add_vertex(Resource::derived(architecture.vertex("r2").unwrap()));
        routing.add_edge(
            Link::derived(architecture.edge("l1").unwrap()),
            "r1",
            "can",
            EdgeKind::Directed,
        );
        routing.add_edge(
            Link::derived(architecture.edge("l2").unwrap()),
            "can",
            "r2",
            EdgeKind::Directed,
        );
        let mut routings = Routings::new();
        routings.set("t2", routing);

        Specification::with_routings(application, architecture, mappings, routings)
    }

    #[test]
    fn test_directed_link_view() {
        let specification = sample_specification();
        let links = directed_links(specification.architecture());
        let view: Vec<(&str, &str, &str)> = links
            .iter()
            .map(|dl| (dl.link.id(), dl.source.id(), dl.destination.id()))
            .collect();
        assert_eq!(view.len(), 4);
        assert!(view.contains(&("l1", "r1", "can")));
        assert!(view.contains(&("l1", "can", "r1")));
        assert!(view.contains(&("l2", "r2", "can")));
        assert!(view.contains(&("l2", "can", "r2")));
    }

    #[test]
    fn test_links_of_single_link() {
        let specification = sample_specification();
        let links = links_of(specification.architecture(), "l1");
        assert_eq!(links.len(), 2);
        let mut routing_links = links_of(specification.routings().get("t2").unwrap(), "l1");
        assert_eq!(routing_links.len(), 1);
        let only = routing_links.pop().unwrap();
        assert_eq!((only.source.id(), only.destination.id()), ("r1", "can"));
    }

    #[test]
    fn test_filter_by_resources() {
        let mut specification = sample_specification();
        filter_by_resources(&mut specification, &["r1", "can"]);

        let resources: Vec<&str> = specification
            .architecture()
            .vertices()
            .map(|r| r.id())
            .collect();
        assert_eq!(resources, vec!["r1", "can"]);
        // All communications are dropped; t3 follows because its only mapping is gone.
        let tasks: Vec<&str> = specification.application().tasks().map(|t| t.id()).collect();
        assert_eq!(tasks, vec!["t1"]);
        let mappings: Vec<&str> = specification.mappings().iter().map(|m| m.id()).collect();
        assert_eq!(mappings, vec!["m1"]);
        // Every remaining mapping targets a kept resource and no process lost all
        // of its mappings without being deleted.
        for mapping in specification.mappings().iter() {
            assert!(specification.architecture().contains_vertex(mapping.target()));
        }
        for task in specification.application().processes() {
            assert!(specification.mappings().of_task(task.id()).next().is_some());
        }
    }

    #[test]
    fn test_filter_by_functions() {
        let mut specification = sample_specification();
        specification.application_mut().add_task(Task::new("u1"));
        specification
            .mappings_mut()
            .add(Mapping::new("m3", "u1", "r2"));

        filter_by_function_names(&mut specification, &["u1"]);

        let tasks: Vec<&str> = specification.application().tasks().map(|t| t.id()).collect();
        assert_eq!(tasks, vec!["u1"]);
        let mappings: Vec<&str> = specification.mappings().iter().map(|m| m.id()).collect();
        assert_eq!(mappings, vec!["m3"]);
        // Only the mapping target survives in the architecture, routings are gone.
        let resources: Vec<&str> = specification
            .architecture()
            .vertices()
            .map(|r| r.id())
            .collect();
        assert_eq!(resources, vec!["r2"]);
        assert!(specification.routings().is_empty());
    }

    #[test]
    fn test_function_filter_keeps_routed_resources() {
        let mut specification = sample_specification();
        specification.application_mut().add_task(Task::new("u1"));
        specification
            .mappings_mut()
            .add(Mapping::new("m3", "u1", "r2"));

        filter_by_function_names(&mut specification, &["t2"]);

        let tasks: Vec<&str> = specification.application().tasks().map(|t| t.id()).collect();
        assert_eq!(tasks, vec!["t1", "t2", "t3"]);
        // `can` survives through the routing of t2 even though no mapping targets it.
        assert!(specification.architecture().contains_vertex("can"));
        assert_eq!(specification.architecture().vertex_count(), 3);
    }

    #[test]
    fn test_copy_is_isomorphic() {
        let mut specification = sample_specification();
        let mut function_attributes = crate::model::Attributes::new();
        function_attributes.set("PERIOD", AttributeValue::Double(10.0));
        specification
            .application_mut()
            .set_function_attributes("t1", function_attributes);

        let copied = copy(&specification);
        assert_eq!(copied, specification);
    }

    #[test]
    fn test_clone_shallow_preserves_values() {
        let specification = sample_specification();
        let cloned = clone_shallow(&specification);
        assert_eq!(cloned, specification);
        // Every vertex, edge and mapping resolves to an equal element.
        for task in specification.application().tasks() {
            assert_eq!(cloned.application().task(task.id()), Some(task));
        }
        for mapping in specification.mappings().iter() {
            assert_eq!(cloned.mappings().get(mapping.id()), Some(mapping));
        }
    }

    #[test]
    fn test_copy_drops_unknown_routing_vertices() {
        let mut specification = sample_specification();
        let routing = specification.routings_mut().get_mut("t2").unwrap();
        routing.add_vertex(Resource::new("ghost"));
        let copied = copy(&specification);
        assert!(!copied.routings().get("t2").unwrap().contains_vertex("ghost"));
    }

    #[test]
    fn test_elements_map_and_filter_type() {
        let specification = sample_specification();
        let elements = elements_map(&specification);
        assert_eq!(elements.len(), 10);
        assert!(matches!(elements.get("t2"), Some(ElementView::Task(_))));
        assert!(matches!(elements.get("m1"), Some(ElementView::Mapping(_))));

        let buses = filter_type(specification.architecture().vertices(), &["BUS"]);
        let ids: Vec<&str> = buses.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["can"]);
    }
}
