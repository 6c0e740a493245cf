//! Writing a [Specification] to its XML wire format.
//!
//! The writer is the authority on the wire format: the reader accepts exactly what is
//! produced here, and `read(write(s))` reproduces `s`.

use crate::io::common::{escape_xml, parameter_token, value_class, value_text, NS};
use crate::model::{
    Attributes, AttributeValue, Dependency, EdgeEntry, Element, Indexed, Link, Mapping, Resource,
    Specification, Task,
};
use std::io::{Error, Write};

impl Specification {
    /// Serialize this specification into an XML string.
    pub fn to_xml(&self) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        self.write_xml(&mut buffer)
            .expect("Cannot write specification as XML.");
        String::from_utf8(buffer).expect("Invalid UTF formatting in string.")
    }

    /// Write this specification to a stream in the XML wire format.
    pub fn write_xml(&self, out: &mut dyn Write) -> Result<(), Error> {
        write!(out, "<?xml version='1.0' encoding='UTF-8' standalone='no'?>")?;
        write!(out, "<specification xmlns=\"{}\">", NS)?;
        self.write_architecture(out)?;
        self.write_application(out)?;
        self.write_mappings(out)?;
        self.write_routings(out)?;
        if !self.attributes().is_empty() {
            write_attributes(out, self.attributes())?;
        }
        write!(out, "</specification>")?;
        Ok(())
    }

    fn write_architecture(&self, out: &mut dyn Write) -> Result<(), Error> {
        write!(out, "<architecture>")?;
        for resource in self.architecture().vertices() {
            write_resource(out, resource)?;
        }
        for entry in self.architecture().edge_entries() {
            write_link(out, entry)?;
        }
        write!(out, "</architecture>")?;
        Ok(())
    }

    fn write_application(&self, out: &mut dyn Write) -> Result<(), Error> {
        write!(out, "<application>")?;
        for task in self.application().tasks() {
            write_task(out, task)?;
        }
        for entry in self.application().graph().edge_entries() {
            write_dependency(out, entry.edge(), entry.source(), entry.target())?;
        }
        if self.application().function_entries().next().is_some() {
            write!(out, "<functions>")?;
            for (anchor, attributes) in self.application().function_entries() {
                write!(out, "<function anchor=\"{}\">", escape_xml(anchor))?;
                write_attributes(out, attributes)?;
                write!(out, "</function>")?;
            }
            write!(out, "</functions>")?;
        }
        write!(out, "</application>")?;
        Ok(())
    }

    fn write_mappings(&self, out: &mut dyn Write) -> Result<(), Error> {
        write!(out, "<mappings>")?;
        for mapping in self.mappings().iter() {
            write_mapping(out, mapping)?;
        }
        write!(out, "</mappings>")?;
        Ok(())
    }

    fn write_routings(&self, out: &mut dyn Write) -> Result<(), Error> {
        let routed: Vec<&Task> = self
            .application()
            .communications()
            .filter(|communication| self.routings().contains(communication.id()))
            .collect();
        if routed.is_empty() {
            return Ok(());
        }
        write!(out, "<routings>")?;
        for communication in routed {
            // The filter above guarantees the entry exists.
            let routing = self.routings().get(communication.id()).unwrap();
            write!(out, "<routing source=\"{}\">", escape_xml(communication.id()))?;
            for resource in routing.vertices() {
                write_resource(out, resource)?;
            }
            for entry in routing.edge_entries() {
                write_link(out, entry)?;
            }
            write!(out, "</routing>")?;
        }
        write!(out, "</routings>")?;
        Ok(())
    }
}

fn write_class(out: &mut dyn Write, class: Option<&str>) -> Result<(), Error> {
    if let Some(class) = class {
        write!(out, " class=\"{}\"", escape_xml(class))?;
    }
    Ok(())
}

fn write_resource(out: &mut dyn Write, resource: &Resource) -> Result<(), Error> {
    write!(out, "<resource id=\"{}\"", escape_xml(resource.id()))?;
    write_class(out, resource.class())?;
    if resource.attributes().is_empty() {
        write!(out, "/>")?;
    } else {
        write!(out, ">")?;
        write_attributes(out, resource.attributes())?;
        write!(out, "</resource>")?;
    }
    Ok(())
}

fn write_link(out: &mut dyn Write, entry: &EdgeEntry<Link>) -> Result<(), Error> {
    let link = entry.edge();
    write!(
        out,
        "<link id=\"{}\" source=\"{}\" destination=\"{}\" orientation=\"{}\"",
        escape_xml(link.id()),
        escape_xml(entry.source()),
        escape_xml(entry.target()),
        match entry.kind() {
            crate::model::EdgeKind::Directed => "DIRECTED",
            crate::model::EdgeKind::Undirected => "UNDIRECTED",
        }
    )?;
    write_class(out, link.class())?;
    if link.attributes().is_empty() {
        write!(out, "/>")?;
    } else {
        write!(out, ">")?;
        write_attributes(out, link.attributes())?;
        write!(out, "</link>")?;
    }
    Ok(())
}

fn write_task(out: &mut dyn Write, task: &Task) -> Result<(), Error> {
    let tag = if task.is_communication() {
        "communication"
    } else {
        "task"
    };
    write!(out, "<{} id=\"{}\"", tag, escape_xml(task.id()))?;
    write_class(out, task.class())?;
    if task.attributes().is_empty() {
        write!(out, "/>")?;
    } else {
        write!(out, ">")?;
        write_attributes(out, task.attributes())?;
        write!(out, "</{}>", tag)?;
    }
    Ok(())
}

fn write_dependency(
    out: &mut dyn Write,
    dependency: &Dependency,
    source: &str,
    target: &str,
) -> Result<(), Error> {
    write!(
        out,
        "<dependency id=\"{}\" source=\"{}\" destination=\"{}\"",
        escape_xml(dependency.id()),
        escape_xml(source),
        escape_xml(target)
    )?;
    write_class(out, dependency.class())?;
    if dependency.attributes().is_empty() {
        write!(out, "/>")?;
    } else {
        write!(out, ">")?;
        write_attributes(out, dependency.attributes())?;
        write!(out, "</dependency>")?;
    }
    Ok(())
}

fn write_mapping(out: &mut dyn Write, mapping: &Mapping) -> Result<(), Error> {
    write!(
        out,
        "<mapping id=\"{}\" source=\"{}\" target=\"{}\"",
        escape_xml(mapping.id()),
        escape_xml(mapping.source()),
        escape_xml(mapping.target())
    )?;
    write_class(out, mapping.class())?;
    if mapping.attributes().is_empty() {
        write!(out, "/>")?;
    } else {
        write!(out, ">")?;
        write_attributes(out, mapping.attributes())?;
        write!(out, "</mapping>")?;
    }
    Ok(())
}

fn write_attributes(out: &mut dyn Write, attributes: &Attributes) -> Result<(), Error> {
    write!(out, "<attributes>")?;
    for (name, value) in attributes.iter() {
        write_attribute(out, Some(name), value)?;
    }
    write!(out, "</attributes>")?;
    Ok(())
}

fn write_attribute(
    out: &mut dyn Write,
    name: Option<&str>,
    value: &AttributeValue,
) -> Result<(), Error> {
    write!(out, "<attribute")?;
    if let Some(name) = name {
        write!(out, " name=\"{}\"", escape_xml(name))?;
    }
    match value {
        AttributeValue::Param(parameter) => {
            write!(
                out,
                " type=\"{}\" parameter=\"{}\">",
                escape_xml(value_class(value)),
                parameter_token(parameter)
            )?;
            write!(out, "{}", escape_xml(&value_text(value)))?;
            write!(out, "</attribute>")?;
        }
        AttributeValue::List(values) | AttributeValue::Set(values) => {
            write!(out, " type=\"{}\">", value_class(value))?;
            for entry in values {
                write_attribute(out, None, entry)?;
            }
            write!(out, "</attribute>")?;
        }
        _ => {
            write!(out, " type=\"{}\">", escape_xml(value_class(value)))?;
            write!(out, "{}", escape_xml(&value_text(value)))?;
            write!(out, "</attribute>")?;
        }
    }
    Ok(())
}
