//! A best-effort adapter for TGFF benchmark files, as generated by Task Graphs For
//! Free and used by the E3S benchmark suite.
//!
//! The adapter imports the task graphs as an [Application] (arcs become
//! communication tasks between their endpoint processes), the processor tables as
//! resource *types* with type-based [Mappings], and the wiring block as a link type.
//! The format is line-oriented: sections start with an `@` keyword, blocks close with
//! `}`, comments start with `#`.

use crate::model::{
    Application, AttributeValue, Dependency, Element, Indexed, Link, Mappings, Mapping, Resource,
    Task,
};
use std::collections::HashMap;

pub const TGFF_TYPE: &str = "TGFF_TYPE";
pub const PERIOD: &str = "PERIOD";
pub const MSG_SIZE: &str = "MSG_SIZE";
pub const HARD_DEADLINE: &str = "HARD_DEADLINE";
pub const SOFT_DEADLINE: &str = "SOFT_DEADLINE";

/// The outcome of a TGFF import. Resources and links are *types*: concrete
/// architectures are built downstream by instantiating them, and the mappings bind
/// tasks to the resource types.
#[derive(Clone, Debug)]
pub struct TypeBasedSpecification {
    pub application: Application,
    pub resource_types: Vec<Resource>,
    pub link_types: Vec<Link>,
    pub mappings: Mappings,
    pub hyperperiod: f64,
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_closing(line: &str) -> bool {
    line.contains('}') && !line.contains('#')
}

/// Read a [TypeBasedSpecification] from the content of a TGFF file.
pub fn read_tgff(content: &str) -> Result<TypeBasedSpecification, String> {
    let lines: Vec<&str> = content.lines().collect();

    // Hyperperiod and message sizes first, so that messages can be annotated while
    // the task graphs are built.
    let mut hyperperiod = 0.0;
    let mut message_sizes: HashMap<String, f64> = HashMap::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.contains("@HYPERPERIOD") {
            hyperperiod = line
                .replace("@HYPERPERIOD", "")
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid hyperperiod line `{}`.", line))?;
        } else if line.contains("@COMMUN_QUANT") {
            i += 1;
            while i < lines.len() && !is_closing(lines[i]) {
                let entry = lines[i];
                if !is_comment(entry) && !entry.trim().is_empty() {
                    let entries: Vec<&str> = entry.split_whitespace().collect();
                    if entries.len() < 2 {
                        return Err(format!("Invalid message size line `{}`.", entry));
                    }
                    let size = entries[1]
                        .parse::<f64>()
                        .map_err(|_| format!("Invalid message size line `{}`.", entry))?;
                    message_sizes.insert(entries[0].to_string(), size);
                }
                i += 1;
            }
        }
        i += 1;
    }

    let mut application = Application::new();
    let mut type_map: HashMap<String, Vec<String>> = HashMap::new();

    let mut i = 0;
    while i < lines.len() {
        if lines[i].contains("@TASK_GRAPH") {
            i = read_task_graph(
                &lines,
                i,
                &mut application,
                &mut type_map,
                &message_sizes,
            )?;
        } else {
            i += 1;
        }
    }

    let mut resource_types = Vec::new();
    let mut mappings = Mappings::new();
    let mut link_types = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.contains("@CORE")
            || line.contains("@PROC")
            || line.contains("@CLIENT_PE")
            || line.contains("@SERVER_PE")
        {
            i = read_processor(&lines, i, &type_map, &mut resource_types, &mut mappings)?;
        } else if line.contains("@WIRING") {
            i = read_wiring(&lines, i, &mut link_types);
        } else {
            i += 1;
        }
    }

    Ok(TypeBasedSpecification {
        application,
        resource_types,
        link_types,
        mappings,
        hyperperiod,
    })
}

/// **(internal)** Read one `@TASK_GRAPH` block, returning the index past it.
fn read_task_graph(
    lines: &[&str],
    start: usize,
    application: &mut Application,
    type_map: &mut HashMap<String, Vec<String>>,
    message_sizes: &HashMap<String, f64>,
) -> Result<usize, String> {
    let header: Vec<&str> = lines[start].split_whitespace().collect();
    if header.len() < 2 {
        return Err(format!("Invalid task graph header `{}`.", lines[start]));
    }
    let suffix = format!("_{}", header[1]);

    let mut period = -1.0;
    let mut i = start + 1;
    while i < lines.len() && !is_closing(lines[i]) {
        let line = lines[i];
        i += 1;
        if is_comment(line) || line.trim().is_empty() {
            continue;
        }
        let entries: Vec<&str> = line.split_whitespace().collect();

        if line.contains(PERIOD) && entries.len() >= 2 {
            period = entries[1]
                .parse::<f64>()
                .map_err(|_| format!("Invalid period line `{}`.", line))?;
        } else if entries[0] == "TASK" {
            if entries.len() < 4 {
                return Err(format!("Invalid task line `{}`.", line));
            }
            let id = format!("{}{}", entries[1], suffix);
            let tgff_type = entries[3];
            let mut task = Task::new(&id);
            task.set_attribute(PERIOD, AttributeValue::Double(period));
            task.set_attribute(TGFF_TYPE, AttributeValue::Str(tgff_type.to_string()));
            type_map
                .entry(tgff_type.to_string())
                .or_default()
                .push(id.clone());
            application.add_task(task);
        } else if entries[0] == "ARC" {
            if entries.len() < 8 {
                return Err(format!("Invalid arc line `{}`.", line));
            }
            let id = entries[1];
            let from = format!("{}{}", entries[3], suffix);
            let to = format!("{}{}", entries[5], suffix);
            let tgff_type = entries[7];
            if !application.contains_task(&from) {
                return Err(format!("Unknown arc source `{}` in `{}`.", from, line));
            }
            if !application.contains_task(&to) {
                return Err(format!("Unknown arc destination `{}` in `{}`.", to, line));
            }
            let mut communication = Task::communication(id);
            communication.set_attribute(PERIOD, AttributeValue::Double(period));
            communication.set_attribute(TGFF_TYPE, AttributeValue::Str(tgff_type.to_string()));
            if let Some(size) = message_sizes.get(tgff_type) {
                communication.set_attribute(MSG_SIZE, AttributeValue::Double(*size));
            }
            application.add_task(communication);
            application.add_dependency(Dependency::new(&format!("{}_0", id)), &from, id);
            application.add_dependency(Dependency::new(&format!("{}_1", id)), id, &to);
        } else if entries[0] == HARD_DEADLINE || entries[0] == SOFT_DEADLINE {
            if entries.len() < 6 {
                return Err(format!("Invalid deadline line `{}`.", line));
            }
            let task = format!("{}{}", entries[3], suffix);
            let deadline = entries[5]
                .parse::<f64>()
                .map_err(|_| format!("Invalid deadline line `{}`.", line))?;
            let task = application
                .task_mut(&task)
                .ok_or_else(|| format!("Unknown task `{}` in `{}`.", task, line))?;
            task.set_attribute(entries[0], AttributeValue::Double(deadline));
        }
    }
    Ok(i + 1)
}

/// **(internal)** Read one processor block: the property table becomes a resource
/// type, the per-task-type table becomes mappings onto it (valid rows only).
fn read_processor(
    lines: &[&str],
    start: usize,
    type_map: &HashMap<String, Vec<String>>,
    resource_types: &mut Vec<Resource>,
    mappings: &mut Mappings,
) -> Result<usize, String> {
    let header: Vec<&str> = lines[start].split_whitespace().collect();
    if header.len() < 2 {
        return Err(format!("Invalid processor header `{}`.", lines[start]));
    }
    let id = format!("r{}", header[1]);
    let mut resource = Resource::new(&id);

    let mut i = start + 1;
    while i < lines.len() && lines[i].trim().is_empty() {
        i += 1;
    }
    // The first two meaningful lines carry the resource properties.
    if i + 1 < lines.len()
        && is_comment(lines[i])
        && !lines[i].contains("#---------")
        && !is_closing(lines[i + 1])
    {
        let names: Vec<&str> = lines[i]
            .trim_start_matches(&['#', ' '][..])
            .split_whitespace()
            .collect();
        let values: Vec<&str> = lines[i + 1].split_whitespace().collect();
        if names.len() != values.len() {
            return Err(format!(
                "Processor `{}`: {} property names but {} values.",
                id,
                names.len(),
                values.len()
            ));
        }
        for (name, value) in names.into_iter().zip(values) {
            resource.set_attribute(name, AttributeValue::Str(value.to_string()));
        }
        i += 2;
    }

    // Skip ahead to the operation table separator.
    while i < lines.len() && !is_closing(lines[i]) && !lines[i].contains("#---------") {
        i += 1;
    }

    let mut columns: Vec<String> = Vec::new();
    while i < lines.len() && !is_closing(lines[i]) {
        let line = lines[i];
        i += 1;
        if line.trim().is_empty() {
            continue;
        }
        if is_comment(line) {
            if line.contains("type") {
                columns = line
                    .trim_start_matches(&['#', ' '][..])
                    .split_whitespace()
                    .map(|column| column.to_string())
                    .collect();
            }
            continue;
        }
        let values: Vec<&str> = line.split_whitespace().collect();
        if values.len() != columns.len() {
            return Err(format!(
                "Processor `{}`: row `{}` does not match columns {:?}.",
                id, line, columns
            ));
        }
        let tgff_type = values[0];
        let valid = match columns.iter().position(|column| column == "valid") {
            Some(index) => values[index] == "1",
            None => false,
        };
        if !valid {
            continue;
        }
        if let Some(tasks) = type_map.get(tgff_type) {
            for task in tasks {
                let mut mapping =
                    Mapping::new(&format!("m_{}_{}", task, resource.id()), task, resource.id());
                for (column, value) in columns.iter().zip(values.iter()) {
                    mapping.set_attribute(column, AttributeValue::Str(value.to_string()));
                }
                mappings.add(mapping);
            }
        }
    }

    resource_types.push(resource);
    Ok(i + 1)
}

/// **(internal)** Read the `@WIRING` block into a link type: each comment names a
/// property, the following line carries its value.
fn read_wiring(lines: &[&str], start: usize, link_types: &mut Vec<Link>) -> usize {
    let mut link = Link::new("wiring");
    let mut property = String::new();

    let mut i = start + 1;
    while i < lines.len() && !is_closing(lines[i]) {
        let line = lines[i];
        i += 1;
        if line.trim().is_empty() {
            continue;
        }
        if is_comment(line) {
            property = line.trim_start_matches(&['#', ' '][..]).trim().to_string();
        } else if !property.is_empty() {
            link.set_attribute(&property, AttributeValue::Str(line.trim().to_string()));
        }
    }
    link_types.push(link);
    i + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;

    const TGFF: &str = "\
@HYPERPERIOD 1200

@COMMUN_QUANT 0 {
0 48.5
1 33.5
}

@TASK_GRAPH 0 {
PERIOD 300
TASK t0_0 TYPE 8
TASK t0_1 TYPE 9
ARC a0_0 FROM t0_0 TO t0_1 TYPE 0
HARD_DEADLINE d0_0 ON t0_1 AT 900
}

@CORE 0 {
# price
80.0
#---------
# type version valid task_time
0 0 1 0.00043
8 0 1 0.00057
9 0 0 0.00043
}

@WIRING 0 {
# width
32
}
";

    #[test]
    fn test_read_tgff() {
        let imported = read_tgff(TGFF).unwrap();
        assert_eq!(imported.hyperperiod, 1200.0);

        let application = &imported.application;
        let tasks: Vec<&str> = application.tasks().map(|t| t.id()).collect();
        assert_eq!(tasks, vec!["t0_0_0", "t0_1_0", "a0_0"]);
        let message = application.task("a0_0").unwrap();
        assert!(message.is_communication());
        assert_eq!(message.attributes().get_double(MSG_SIZE), Some(48.5));
        assert_eq!(message.attributes().get_double(PERIOD), Some(300.0));
        assert_eq!(
            application
                .task("t0_1_0")
                .unwrap()
                .attributes()
                .get_double(HARD_DEADLINE),
            Some(900.0)
        );
        assert_eq!(application.dependencies().count(), 2);

        assert_eq!(imported.resource_types.len(), 1);
        let core = &imported.resource_types[0];
        assert_eq!(core.id(), "r0");
        assert_eq!(core.attributes().get_str("price"), Some("80.0"));

        // Only the valid row with existing tasks produces a mapping.
        let ids: Vec<&str> = imported.mappings.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["m_t0_0_0_r0"]);
        let mapping = imported.mappings.get("m_t0_0_0_r0").unwrap();
        assert_eq!(mapping.source(), "t0_0_0");
        assert_eq!(mapping.target(), "r0");
        assert_eq!(mapping.attributes().get_str("task_time"), Some("0.00057"));

        assert_eq!(imported.link_types.len(), 1);
        assert_eq!(imported.link_types[0].attributes().get_str("width"), Some("32"));
    }
}
