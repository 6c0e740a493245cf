use crate::model::{
    Attributes, Dependency, Element, Indexed, Link, Mapping, Resource, Task,
};
use std::fmt::{Display, Error, Formatter};

impl Task {
    /// Create a process task.
    pub fn new(id: &str) -> Task {
        Task {
            id: id.to_string(),
            class: None,
            communication: false,
            attributes: Attributes::new(),
        }
    }

    /// Create a communication task (a message).
    pub fn communication(id: &str) -> Task {
        Task {
            id: id.to_string(),
            class: None,
            communication: true,
            attributes: Attributes::new(),
        }
    }

    /// `true` if this task is a message rather than a process.
    pub fn is_communication(&self) -> bool {
        self.communication
    }

    pub fn set_class(&mut self, class: &str) {
        self.class = Some(class.to_string());
    }
}

impl Resource {
    pub fn new(id: &str) -> Resource {
        Resource {
            id: id.to_string(),
            class: None,
            parent: None,
            attributes: Attributes::new(),
        }
    }

    /// Create a routing resource standing for `parent`. The child shares the parent's
    /// identifier, starts with an empty local attribute map and records the parent
    /// reference for fallback lookup.
    pub fn derived(parent: &Resource) -> Resource {
        Resource {
            id: parent.id.clone(),
            class: parent.class.clone(),
            parent: Some(parent.id.clone()),
            attributes: Attributes::new(),
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn set_class(&mut self, class: &str) {
        self.class = Some(class.to_string());
    }
}

impl Link {
    pub fn new(id: &str) -> Link {
        Link {
            id: id.to_string(),
            class: None,
            parent: None,
            attributes: Attributes::new(),
        }
    }

    /// Create a routing link standing for `parent`; see [Resource::derived].
    pub fn derived(parent: &Link) -> Link {
        Link {
            id: parent.id.clone(),
            class: parent.class.clone(),
            parent: Some(parent.id.clone()),
            attributes: Attributes::new(),
        }
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn set_class(&mut self, class: &str) {
        self.class = Some(class.to_string());
    }
}

impl Dependency {
    pub fn new(id: &str) -> Dependency {
        Dependency {
            id: id.to_string(),
            class: None,
            attributes: Attributes::new(),
        }
    }

    pub fn set_class(&mut self, class: &str) {
        self.class = Some(class.to_string());
    }
}

impl Mapping {
    pub fn new(id: &str, source: &str, target: &str) -> Mapping {
        Mapping {
            id: id.to_string(),
            class: None,
            source: source.to_string(),
            target: target.to_string(),
            attributes: Attributes::new(),
        }
    }

    /// The identifier of the mapped task.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The identifier of the resource the task is mapped onto.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Copy this mapping onto new endpoints, keeping identifier, class and attributes.
    pub fn rebind(&self, source: &str, target: &str) -> Mapping {
        Mapping {
            id: self.id.clone(),
            class: self.class.clone(),
            source: source.to_string(),
            target: target.to_string(),
            attributes: self.attributes.clone(),
        }
    }

    pub fn set_class(&mut self, class: &str) {
        self.class = Some(class.to_string());
    }
}

macro_rules! impl_element {
    ($type:ty) => {
        impl Indexed for $type {
            fn id(&self) -> &str {
                &self.id
            }
        }

        impl Element for $type {
            fn attributes(&self) -> &Attributes {
                &self.attributes
            }

            fn attributes_mut(&mut self) -> &mut Attributes {
                &mut self.attributes
            }

            fn class(&self) -> Option<&str> {
                self.class.as_deref()
            }
        }

        impl Display for $type {
            fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
                write!(f, "{}", self.id)
            }
        }
    };
}

impl_element!(Task);
impl_element!(Resource);
impl_element!(Link);
impl_element!(Dependency);
impl_element!(Mapping);

#[cfg(test)]
mod tests {
    use crate::model::{AttributeValue, Element, Mapping, Resource, Task};

    #[test]
    fn test_communication_tag() {
        assert!(!Task::new("t1").is_communication());
        assert!(Task::communication("t2").is_communication());
    }

    #[test]
    fn test_derived_resource() {
        let mut parent = Resource::new("can");
        parent.set_attribute("TYPE", AttributeValue::Str("BUS".to_string()));
        let child = Resource::derived(&parent);
        assert_eq!(child.id, "can");
        assert_eq!(child.parent(), Some("can"));
        // The child has its own attribute map.
        assert!(child.attribute("TYPE").is_none());
    }

    #[test]
    fn test_mapping_rebind() {
        let mut mapping = Mapping::new("m1", "t1", "r1");
        mapping.set_attribute("cost", AttributeValue::Double(2.0));
        let rebound = mapping.rebind("t1", "r9");
        assert_eq!(rebound.id, "m1");
        assert_eq!(rebound.target(), "r9");
        assert_eq!(rebound.attribute("cost"), mapping.attribute("cost"));
    }

    #[test]
    fn test_element_type() {
        let mut task = Task::new("t1");
        assert_eq!(task.element_type(), None);
        task.set_attribute("TYPE", AttributeValue::Str("fft".to_string()));
        assert_eq!(task.element_type(), Some("fft"));
    }
}
