//! The specification data model.
//!
//! A [Specification] aggregates four structures: an [Application] (tasks and the messages
//! exchanged between them), an [Architecture] (resources connected by links), a set of
//! candidate [Mappings] and the per-message [Routings]. All elements carry an identifier
//! and an ordered [Attributes] map; identity is the identifier, and all cross-references
//! between the four structures are expressed through identifiers.

use indexmap::IndexMap;

pub mod graph;

/// Model transforms: filters, deep copy, shallow clone and the directed-link view.
pub mod ops;

/// **(internal)** Constructors and accessors for [Application], including functions.
mod _impl_application;
/// **(internal)** Accessors for [Attributes], [AttributeValue] and [Parameter].
mod _impl_attributes;
/// **(internal)** The [Element] trait and the concrete element types.
mod _impl_element;
/// **(internal)** Accessors for [Mappings].
mod _impl_mappings;
/// **(internal)** Accessors for [Routings].
mod _impl_routings;
/// **(internal)** Accessors for [Specification].
mod _impl_specification;

pub use graph::{EdgeEntry, EdgeKind, Graph, Indexed};

/// An insertion-ordered map from attribute names to [AttributeValue]s.
///
/// Every element of a specification carries one, and the specification itself does too.
/// Attribute order is preserved through the XML round-trip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    pub(crate) entries: IndexMap<String, AttributeValue>,
}

/// A single attribute value. The kinds are closed; deserialization dispatches on the
/// declared value class (see [crate::io::common]).
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Str(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    /// An opaque payload, carried as base64 text on the wire.
    Blob(Vec<u8>),
    /// A typed parameter spanning a sub-space of values.
    Param(Parameter),
    /// A homogeneous, insertion-ordered list of values.
    List(Vec<AttributeValue>),
    /// Like [AttributeValue::List], but with set semantics on the wire.
    Set(Vec<AttributeValue>),
    /// A reference to another element of the specification.
    Ref(ElementRef),
}

/// A reference to an element, given by its value class and identifier. The referenced
/// element is resolved against the owning specification when needed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ElementRef {
    pub class: String,
    pub id: String,
}

/// A typed parameter attribute. Parameters describe a value together with the space of
/// values it may range over, which downstream exploration may use as design knobs.
#[derive(Clone, Debug, PartialEq)]
pub enum Parameter {
    /// A continuous value in `[lower, upper]` with a step width.
    Range {
        default: f64,
        lower: f64,
        upper: f64,
        granularity: f64,
    },
    /// A discrete choice among `choices`, optionally cross-referenced to another
    /// element's parameter of the same name. Choice tokens keep their declared value
    /// class and are parsed on demand.
    Select {
        class: String,
        default: String,
        choices: Vec<String>,
        reference: Option<String>,
    },
    /// A discrete value that is logically unique within the group named by `identifier`.
    UniqueId { default: i64, identifier: String },
}

/// A process or a message of the [Application]. Messages ("communications") are tasks
/// with the `communication` tag set; they are routed over the architecture while plain
/// tasks are mapped onto resources.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub(crate) id: String,
    pub(crate) class: Option<String>,
    pub(crate) communication: bool,
    pub(crate) attributes: Attributes,
}

/// A processing resource of the [Architecture]. Resources appearing in a routing carry
/// a `parent` reference to the architecture resource they stand for.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    pub(crate) id: String,
    pub(crate) class: Option<String>,
    pub(crate) parent: Option<String>,
    pub(crate) attributes: Attributes,
}

/// An interconnect link of the [Architecture]; directed or undirected depending on the
/// [EdgeKind] it is inserted with. Routing links carry a `parent` reference like
/// routing resources do.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub(crate) id: String,
    pub(crate) class: Option<String>,
    pub(crate) parent: Option<String>,
    pub(crate) attributes: Attributes,
}

/// A directed dependency edge of the [Application].
#[derive(Clone, Debug, PartialEq)]
pub struct Dependency {
    pub(crate) id: String,
    pub(crate) class: Option<String>,
    pub(crate) attributes: Attributes,
}

/// A candidate binding of a task (`source`) onto a resource (`target`). Several
/// mappings per task span the search space; at most one mapping may exist per
/// (task, resource) pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    pub(crate) id: String,
    pub(crate) class: Option<String>,
    pub(crate) source: String,
    pub(crate) target: String,
    pub(crate) attributes: Attributes,
}

/// The application: a directed acyclic multigraph of [Task]s connected by
/// [Dependency] edges. Its weakly connected components are the *functions*; each
/// function can carry its own attribute map, anchored at any member task.
#[derive(Clone, Debug, PartialEq)]
pub struct Application {
    pub(crate) graph: Graph<Task, Dependency>,
    pub(crate) functions: Vec<(String, Attributes)>,
}

/// The architecture: a mixed multigraph of [Resource]s connected by [Link]s.
pub type Architecture = Graph<Resource, Link>;

/// The per-message routing spaces: a partial map from communication identifiers to
/// sub-architectures describing where the message may physically travel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Routings {
    pub(crate) routings: IndexMap<String, Architecture>,
}

/// The set of candidate [Mapping]s, iterated in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mappings {
    pub(crate) mappings: IndexMap<String, Mapping>,
}

/// A complete problem instance: application, architecture, mappings and routings,
/// plus the specification's own attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Specification {
    pub(crate) application: Application,
    pub(crate) architecture: Architecture,
    pub(crate) mappings: Mappings,
    pub(crate) routings: Routings,
    pub(crate) attributes: Attributes,
}

/// Identifier access plus the attribute map every element carries.
///
/// The element *type* in the sense of [ops::filter_type] is the value of the `TYPE`
/// attribute, which type-based inputs (e.g. TGFF imports) use to group elements.
pub trait Element: Indexed {
    fn attributes(&self) -> &Attributes;

    fn attributes_mut(&mut self) -> &mut Attributes;

    /// The value class written to (and read from) the XML `class` attribute, if any.
    fn class(&self) -> Option<&str>;

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes().get(name)
    }

    fn set_attribute(&mut self, name: &str, value: AttributeValue) {
        self.attributes_mut().set(name, value);
    }

    /// The element type tag, i.e. the `TYPE` attribute as a string.
    fn element_type(&self) -> Option<&str> {
        match self.attribute("TYPE") {
            Some(AttributeValue::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }
}
