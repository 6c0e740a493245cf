//! Reading a [Specification] from its XML wire format.
//!
//! The reader validates as it goes: schema violations, unknown classes, unparseable
//! parameter literals and dangling references abort the read with a message naming the
//! offending fragment. Element references inside attribute values resolve through a
//! per-read element table with one sub-table per namespace, so an identifier is
//! materialized once per namespace and reused afterwards.

use crate::io::common::{
    is_collection_class, is_element_class, parse_range, parse_select, parse_uid, to_instance,
    LIST, NS, SET,
};
use crate::model::{
    Application, Architecture, AttributeValue, Attributes, Dependency, EdgeKind, Element,
    ElementRef, Indexed, Link, Mapping, Mappings, Resource, Routings, Specification, Task,
};
use roxmltree::{ExpandedName, Node};
use std::collections::HashMap;
use std::io::Read;

/// The namespaces of the reader's element table. Identifiers are unique per namespace,
/// not globally, so each namespace keeps its own sub-table.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Namespace {
    Routings,
    Architecture,
    Application,
    Function,
    Attributes,
}

/// **(internal)** The per-read element table. It records, per namespace, the class an
/// identifier was first materialized with; later references reuse that class.
struct ElementTable {
    classes: HashMap<(Namespace, String), String>,
}

impl ElementTable {
    fn new() -> ElementTable {
        ElementTable {
            classes: HashMap::new(),
        }
    }

    fn register(&mut self, namespace: Namespace, id: &str, class: &str) {
        self.classes
            .entry((namespace, id.to_string()))
            .or_insert_with(|| class.to_string());
    }

    fn resolve(&mut self, namespace: Namespace, id: &str, class: &str) -> ElementRef {
        self.register(namespace, id, class);
        let class = self.classes[&(namespace, id.to_string())].clone();
        ElementRef {
            class,
            id: id.to_string(),
        }
    }
}

impl Specification {
    /// Try to read a [Specification] from an XML string.
    pub fn try_from_xml(xml: &str) -> Result<Specification, String> {
        let document =
            roxmltree::Document::parse(xml).map_err(|e| format!("XML error: {:?}", e))?;
        let root = document.root_element();
        if root.tag_name().name() != "specification" {
            return Err(format!(
                "Root element is <{}>, expected <specification>.",
                root.tag_name().name()
            ));
        }
        if root.tag_name().namespace() != Some(NS) {
            return Err(format!("The document does not use the `{}` namespace.", NS));
        }
        to_specification(root)
    }

    /// Read a [Specification] from a stream carrying the XML wire format.
    pub fn read_xml(input: &mut dyn Read) -> Result<Specification, String> {
        let mut buffer = String::new();
        input
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Cannot read input: {}", e))?;
        Specification::try_from_xml(&buffer)
    }
}

fn to_specification(root: Node) -> Result<Specification, String> {
    let mut table = ElementTable::new();

    let e_architecture = unique_child(root, "architecture")?;
    let e_application = unique_child(root, "application")?;
    let e_mappings = unique_child(root, "mappings")?;

    let architecture = to_architecture(e_architecture, &mut table)?;
    let application = to_application(e_application, &mut table)?;
    let mappings = to_mappings(e_mappings, &architecture, &application, &mut table)?;
    let routings = match optional_child(root, "routings")? {
        Some(e_routings) => to_routings(e_routings, &architecture, &application, &mut table)?,
        None => Routings::new(),
    };

    let mut specification =
        Specification::with_routings(application, architecture, mappings, routings);
    if let Some(e_attributes) = optional_child(root, "attributes")? {
        *specification.attributes_mut() =
            to_attributes(e_attributes, Namespace::Attributes, &mut table)?;
    }
    Ok(specification)
}

/// **(internal)** The element children of `parent` with the given local name.
fn children<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    let expanded = ExpandedName::from((NS, name));
    parent
        .children()
        .filter(move |node| node.is_element() && node.tag_name() == expanded)
}

/// **(internal)** At most one child with the given name; more than one is an error.
fn optional_child<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> Result<Option<Node<'a, 'input>>, String> {
    let mut tags = children(parent, name);
    let first = tags.next();
    if tags.next().is_some() {
        return Err(format!(
            "Multiple <{}> found in <{}>.",
            name,
            parent.tag_name().name()
        ));
    }
    Ok(first)
}

/// **(internal)** Exactly one child with the given name.
fn unique_child<'a, 'input: 'a>(
    parent: Node<'a, 'input>,
    name: &'static str,
) -> Result<Node<'a, 'input>, String> {
    optional_child(parent, name)?.ok_or_else(|| {
        format!(
            "Missing <{}> in <{}>.",
            name,
            parent.tag_name().name()
        )
    })
}

fn required_attribute<'a>(element: Node<'a, '_>, name: &str) -> Result<&'a str, String> {
    let value = element.attribute(name).ok_or_else(|| {
        format!(
            "Missing attribute `{}` on <{}>.",
            name,
            element.tag_name().name()
        )
    })?;
    if value.is_empty() {
        return Err(format!(
            "Empty attribute `{}` on <{}>.",
            name,
            element.tag_name().name()
        ));
    }
    Ok(value)
}

fn edge_kind(element: Node) -> Result<EdgeKind, String> {
    match element.attribute("orientation") {
        None | Some("UNDIRECTED") => Ok(EdgeKind::Undirected),
        Some("DIRECTED") => Ok(EdgeKind::Directed),
        Some(other) => Err(format!("Unknown orientation `{}`.", other)),
    }
}

fn to_architecture(element: Node, table: &mut ElementTable) -> Result<Architecture, String> {
    let mut architecture = Architecture::new();

    for e_resource in children(element, "resource") {
        let resource = to_resource(e_resource, None, Namespace::Architecture, table)?;
        match architecture.vertex_mut(resource.id()) {
            // An already known identifier refers to the same element; additional
            // attributes merge into it.
            Some(existing) => existing.attributes_mut().extend_from(resource.attributes()),
            None => {
                architecture.add_vertex(resource);
            }
        }
    }

    for e_link in children(element, "link") {
        let link = to_link(e_link, Namespace::Architecture, table)?;
        let kind = edge_kind(e_link)?;
        let source = required_attribute(e_link, "source")?;
        let target = required_attribute(e_link, "destination")?;
        if !architecture.contains_vertex(source) {
            return Err(format!(
                "Invalid source `{}` in <link id=\"{}\">.",
                source,
                link.id()
            ));
        }
        if !architecture.contains_vertex(target) {
            return Err(format!(
                "Invalid destination `{}` in <link id=\"{}\">.",
                target,
                link.id()
            ));
        }
        if architecture.contains_edge(link.id()) {
            return Err(format!("Duplicate link `{}`.", link.id()));
        }
        architecture.add_edge(link, source, target, kind);
    }

    Ok(architecture)
}

fn to_application(element: Node, table: &mut ElementTable) -> Result<Application, String> {
    let mut application = Application::new();

    for e_task in children(element, "task") {
        let task = to_task(e_task, false, table)?;
        match application.task_mut(task.id()) {
            Some(existing) => existing.attributes_mut().extend_from(task.attributes()),
            None => {
                application.add_task(task);
            }
        }
    }
    for e_communication in children(element, "communication") {
        let communication = to_task(e_communication, true, table)?;
        match application.task_mut(communication.id()) {
            Some(existing) => existing
                .attributes_mut()
                .extend_from(communication.attributes()),
            None => {
                application.add_task(communication);
            }
        }
    }

    for e_dependency in children(element, "dependency") {
        let dependency = to_dependency(e_dependency, table)?;
        let source = required_attribute(e_dependency, "source")?;
        let target = required_attribute(e_dependency, "destination")?;
        if !application.contains_task(source) {
            return Err(format!(
                "Invalid source `{}` in <dependency id=\"{}\">.",
                source,
                dependency.id()
            ));
        }
        if !application.contains_task(target) {
            return Err(format!(
                "Invalid destination `{}` in <dependency id=\"{}\">.",
                target,
                dependency.id()
            ));
        }
        if application.graph().contains_edge(dependency.id()) {
            return Err(format!("Duplicate dependency `{}`.", dependency.id()));
        }
        application.add_dependency(dependency, source, target);
    }

    if let Some(e_functions) = optional_child(element, "functions")? {
        for e_function in children(e_functions, "function") {
            let anchor = required_attribute(e_function, "anchor")?;
            if !application.contains_task(anchor) {
                return Err(format!("Unknown function anchor `{}`.", anchor));
            }
            let e_attributes = unique_child(e_function, "attributes")?;
            let attributes = to_attributes(e_attributes, Namespace::Function, table)?;
            application.set_function_attributes(anchor, attributes);
        }
    }

    Ok(application)
}

fn to_mappings(
    element: Node,
    architecture: &Architecture,
    application: &Application,
    table: &mut ElementTable,
) -> Result<Mappings, String> {
    let mut mappings = Mappings::new();

    for e_mapping in children(element, "mapping") {
        let id = required_attribute(e_mapping, "id")?;
        let source = required_attribute(e_mapping, "source")?;
        let target = required_attribute(e_mapping, "target")?;
        if !application.contains_task(source) {
            return Err(format!("Unknown task `{}` in <mapping id=\"{}\">.", source, id));
        }
        if !architecture.contains_vertex(target) {
            return Err(format!(
                "Unknown resource `{}` in <mapping id=\"{}\">.",
                target, id
            ));
        }

        let mut mapping = Mapping::new(id, source, target);
        if let Some(class) = e_mapping.attribute("class") {
            mapping.set_class(class);
        }
        if let Some(e_attributes) = optional_child(e_mapping, "attributes")? {
            *mapping.attributes_mut() =
                to_attributes(e_attributes, Namespace::Attributes, table)?;
        }
        if !mappings.add(mapping) {
            return Err(format!("Duplicate mapping `{}`.", id));
        }
    }

    Ok(mappings)
}

fn to_routings(
    element: Node,
    architecture: &Architecture,
    application: &Application,
    table: &mut ElementTable,
) -> Result<Routings, String> {
    let mut routings = Routings::new();

    for e_routing in children(element, "routing") {
        let source = required_attribute(e_routing, "source")?;
        if !application.contains_task(source) {
            return Err(format!("Unknown routing source `{}`.", source));
        }
        let routing = to_routing(e_routing, architecture, table)?;
        routings.set(source, routing);
    }

    Ok(routings)
}

fn to_routing(
    element: Node,
    architecture: &Architecture,
    table: &mut ElementTable,
) -> Result<Architecture, String> {
    let mut routing = Architecture::new();

    for e_resource in children(element, "resource") {
        let id = required_attribute(e_resource, "id")?;
        let parent = architecture.vertex(id).ok_or_else(|| {
            format!("Routing resource `{}` does not exist in the architecture.", id)
        })?;
        let resource = to_resource(e_resource, Some(parent), Namespace::Routings, table)?;
        routing.add_vertex(resource);
    }

    for e_link in children(element, "link") {
        let id = required_attribute(e_link, "id")?;
        let parent = architecture.edge(id).ok_or_else(|| {
            format!("Routing link `{}` does not exist in the architecture.", id)
        })?;
        let link = to_link_derived(e_link, parent, Namespace::Routings, table)?;
        let kind = edge_kind(e_link)?;
        let source = required_attribute(e_link, "source")?;
        let target = required_attribute(e_link, "destination")?;
        if !routing.contains_vertex(source) {
            return Err(format!(
                "Invalid source `{}` in routing <link id=\"{}\">.",
                source, id
            ));
        }
        if !routing.contains_vertex(target) {
            return Err(format!(
                "Invalid destination `{}` in routing <link id=\"{}\">.",
                target, id
            ));
        }
        routing.add_edge(link, source, target, kind);
    }

    Ok(routing)
}

fn to_resource(
    element: Node,
    parent: Option<&Resource>,
    namespace: Namespace,
    table: &mut ElementTable,
) -> Result<Resource, String> {
    let id = required_attribute(element, "id")?;
    let mut resource = match parent {
        Some(parent) => Resource::derived(parent),
        None => Resource::new(id),
    };
    if let Some(class) = element.attribute("class") {
        resource.set_class(class);
    }
    table.register(namespace, id, resource.class().unwrap_or("resource"));
    if let Some(e_attributes) = optional_child(element, "attributes")? {
        resource
            .attributes_mut()
            .extend_from(&to_attributes(e_attributes, namespace, table)?);
    }
    Ok(resource)
}

fn to_link(
    element: Node,
    namespace: Namespace,
    table: &mut ElementTable,
) -> Result<Link, String> {
    let id = required_attribute(element, "id")?;
    let mut link = Link::new(id);
    if let Some(class) = element.attribute("class") {
        link.set_class(class);
    }
    table.register(namespace, id, link.class().unwrap_or("link"));
    if let Some(e_attributes) = optional_child(element, "attributes")? {
        link.attributes_mut()
            .extend_from(&to_attributes(e_attributes, namespace, table)?);
    }
    Ok(link)
}

fn to_link_derived(
    element: Node,
    parent: &Link,
    namespace: Namespace,
    table: &mut ElementTable,
) -> Result<Link, String> {
    let mut link = Link::derived(parent);
    if let Some(class) = element.attribute("class") {
        link.set_class(class);
    }
    table.register(namespace, link.id(), link.class().unwrap_or("link"));
    if let Some(e_attributes) = optional_child(element, "attributes")? {
        link.attributes_mut()
            .extend_from(&to_attributes(e_attributes, namespace, table)?);
    }
    Ok(link)
}

fn to_task(element: Node, communication: bool, table: &mut ElementTable) -> Result<Task, String> {
    let id = required_attribute(element, "id")?;
    let mut task = if communication {
        Task::communication(id)
    } else {
        Task::new(id)
    };
    if let Some(class) = element.attribute("class") {
        task.set_class(class);
    }
    let default_class = if communication { "communication" } else { "task" };
    table.register(
        Namespace::Application,
        id,
        task.class().unwrap_or(default_class),
    );
    if let Some(e_attributes) = optional_child(element, "attributes")? {
        task.attributes_mut()
            .extend_from(&to_attributes(e_attributes, Namespace::Application, table)?);
    }
    Ok(task)
}

fn to_dependency(element: Node, table: &mut ElementTable) -> Result<Dependency, String> {
    let id = required_attribute(element, "id")?;
    let mut dependency = Dependency::new(id);
    if let Some(class) = element.attribute("class") {
        dependency.set_class(class);
    }
    table.register(
        Namespace::Application,
        id,
        dependency.class().unwrap_or("dependency"),
    );
    if let Some(e_attributes) = optional_child(element, "attributes")? {
        dependency
            .attributes_mut()
            .extend_from(&to_attributes(e_attributes, Namespace::Application, table)?);
    }
    Ok(dependency)
}

fn to_attributes(
    element: Node,
    namespace: Namespace,
    table: &mut ElementTable,
) -> Result<Attributes, String> {
    let mut attributes = Attributes::new();
    for e_attribute in children(element, "attribute") {
        let name = required_attribute(e_attribute, "name")?;
        let value = to_attribute_value(e_attribute, namespace, table)?;
        attributes.set(name, value);
    }
    Ok(attributes)
}

fn to_attribute_value(
    element: Node,
    namespace: Namespace,
    table: &mut ElementTable,
) -> Result<AttributeValue, String> {
    let parameter = element.attribute("parameter");
    let class = element.attribute("type");
    let text = element.text().unwrap_or("");

    if let Some(parameter) = parameter {
        return match parameter {
            "RANGE" => parse_range(text).map(AttributeValue::Param),
            "SELECT" => {
                let class = class
                    .ok_or_else(|| format!("Select parameter `{}` has no type.", text))?;
                parse_select(class, text).map(AttributeValue::Param)
            }
            "UID" => parse_uid(text).map(AttributeValue::Param),
            other => Err(format!("Unknown parameter type `{}`.", other)),
        };
    }

    let class = class.ok_or_else(|| {
        format!(
            "Attribute `{}` has no type.",
            element.attribute("name").unwrap_or("?")
        )
    })?;

    if is_collection_class(class) {
        let mut values = Vec::new();
        for child in children(element, "attribute") {
            values.push(to_attribute_value(child, namespace, table)?);
        }
        return Ok(if class == LIST {
            AttributeValue::List(values)
        } else {
            debug_assert_eq!(class, SET);
            AttributeValue::Set(values)
        });
    }

    if is_element_class(class) {
        let id = text.trim();
        if id.is_empty() {
            return Err(format!("Empty element reference of class `{}`.", class));
        }
        return Ok(AttributeValue::Ref(table.resolve(namespace, id, class)));
    }

    to_instance(text, class)
}
