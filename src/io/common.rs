//! Shared pieces of the XML wire format: the namespace, the value class tokens, the
//! text grammars of typed parameters, and escaping.

use crate::model::{AttributeValue, Parameter};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;

/// The XML namespace of every element of a serialized specification.
pub const NS: &str = "http://opendse.sf.net";

pub const STRING: &str = "STRING";
pub const INT: &str = "INT";
pub const DOUBLE: &str = "DOUBLE";
pub const BOOL: &str = "BOOL";
pub const BLOB: &str = "BLOB";
pub const LIST: &str = "LIST";
pub const SET: &str = "SET";

lazy_static! {
    /// Grammar of the unique-id parameter: default value and group identifier.
    static ref UID_REGEX: Regex = Regex::new(r"(\w+) \[UID:(\w+)\]").unwrap();
}

/// `true` for the class tokens whose attribute values are written as nested
/// `<attribute>` elements.
pub fn is_collection_class(class: &str) -> bool {
    class == LIST || class == SET
}

/// `true` for class tokens naming an element kind; such attribute values are
/// references resolved through the reader's element table.
pub fn is_element_class(class: &str) -> bool {
    matches!(
        class,
        "task" | "communication" | "resource" | "link" | "dependency" | "mapping"
    )
}

/// Parse a scalar attribute text into a value of the given class.
pub fn to_instance(value: &str, class: &str) -> Result<AttributeValue, String> {
    match class {
        STRING => Ok(AttributeValue::Str(value.to_string())),
        INT => value
            .trim()
            .parse::<i64>()
            .map(AttributeValue::Int)
            .map_err(|_| format!("Invalid integer literal `{}`.", value)),
        DOUBLE => value
            .trim()
            .parse::<f64>()
            .map(AttributeValue::Double)
            .map_err(|_| format!("Invalid double literal `{}`.", value)),
        BOOL => match value.trim() {
            "true" => Ok(AttributeValue::Bool(true)),
            "false" => Ok(AttributeValue::Bool(false)),
            _ => Err(format!("Invalid boolean literal `{}`.", value)),
        },
        BLOB => STANDARD
            .decode(value.trim())
            .map(AttributeValue::Blob)
            .map_err(|_| format!("Invalid base64 payload `{}`.", value)),
        _ => Err(format!("Unknown value class `{}`.", class)),
    }
}

/// The class token a value is written with.
pub fn value_class(value: &AttributeValue) -> &str {
    match value {
        AttributeValue::Str(_) => STRING,
        AttributeValue::Int(_) => INT,
        AttributeValue::Double(_) => DOUBLE,
        AttributeValue::Bool(_) => BOOL,
        AttributeValue::Blob(_) => BLOB,
        AttributeValue::List(_) => LIST,
        AttributeValue::Set(_) => SET,
        AttributeValue::Ref(reference) => &reference.class,
        AttributeValue::Param(Parameter::Range { .. }) => DOUBLE,
        AttributeValue::Param(Parameter::Select { class, .. }) => class,
        AttributeValue::Param(Parameter::UniqueId { .. }) => INT,
    }
}

/// The `parameter` token of a typed parameter.
pub fn parameter_token(parameter: &Parameter) -> &'static str {
    match parameter {
        Parameter::Range { .. } => "RANGE",
        Parameter::Select { .. } => "SELECT",
        Parameter::UniqueId { .. } => "UID",
    }
}

/// Parse a range parameter: four doubles separated by whitespace, commas or
/// parentheses, in the order default, lower bound, upper bound, granularity.
pub fn parse_range(text: &str) -> Result<Parameter, String> {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',' || c == '(' || c == ')')
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.len() < 4 {
        return Err(format!("Invalid range parameter `{}`.", text));
    }
    let mut values = [0.0; 4];
    for (i, token) in tokens.iter().take(4).enumerate() {
        values[i] = token
            .parse::<f64>()
            .map_err(|_| format!("Invalid double literal `{}` in range parameter.", token))?;
    }
    Ok(Parameter::range(values[0], values[1], values[2], values[3]))
}

/// Parse a selection parameter: `default (choice, choice, ...) reference?`.
/// Brackets are normalized to parentheses first; the reference is optional.
pub fn parse_select(class: &str, text: &str) -> Result<Parameter, String> {
    let normalized = text.replace('[', "(").replace(']', ")");
    let open = normalized
        .find('(')
        .ok_or_else(|| format!("Invalid select parameter `{}`.", text))?;
    let close = normalized
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| format!("Invalid select parameter `{}`.", text))?;

    let default = normalized[..open].trim();
    if default.is_empty() {
        return Err(format!("Select parameter `{}` has no default.", text));
    }
    let choices: Vec<String> = normalized[open + 1..close]
        .split(',')
        .map(|choice| choice.trim().to_string())
        .filter(|choice| !choice.is_empty())
        .collect();
    if choices.is_empty() {
        return Err(format!("Select parameter `{}` has no choices.", text));
    }
    let reference = normalized[close + 1..].trim();
    let reference = if reference.is_empty() {
        None
    } else {
        Some(reference.to_string())
    };
    Ok(Parameter::select(class, default, choices, reference))
}

/// Parse a unique-id parameter: `<default> [UID:<identifier>]`.
pub fn parse_uid(text: &str) -> Result<Parameter, String> {
    let captures = UID_REGEX
        .captures(text)
        .ok_or_else(|| format!("Invalid unique id parameter `{}`.", text))?;
    let default = captures[1]
        .parse::<i64>()
        .map_err(|_| format!("Invalid default `{}` in unique id parameter.", &captures[1]))?;
    Ok(Parameter::unique_id(default, &captures[2]))
}

/// The canonical text of a parameter, i.e. exactly what the writer emits.
pub fn parameter_text(parameter: &Parameter) -> String {
    match parameter {
        Parameter::Range {
            default,
            lower,
            upper,
            granularity,
        } => format!("{:?} {:?} {:?} {:?}", default, lower, upper, granularity),
        Parameter::Select {
            default,
            choices,
            reference,
            ..
        } => {
            let body = format!("{} ({})", default, choices.join(","));
            match reference {
                Some(reference) => format!("{} {}", body, reference),
                None => body,
            }
        }
        Parameter::UniqueId {
            default,
            identifier,
        } => format!("{} [UID:{}]", default, identifier),
    }
}

/// The canonical text of a scalar attribute value.
pub fn value_text(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Str(text) => text.clone(),
        AttributeValue::Int(number) => number.to_string(),
        AttributeValue::Double(number) => format!("{:?}", number),
        AttributeValue::Bool(flag) => flag.to_string(),
        AttributeValue::Blob(payload) => STANDARD.encode(payload),
        AttributeValue::Ref(reference) => reference.id.clone(),
        AttributeValue::Param(parameter) => parameter_text(parameter),
        AttributeValue::List(_) | AttributeValue::Set(_) => {
            unreachable!("Collections are written as nested elements.")
        }
    }
}

/// Escape a string for use in XML text or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parameter;

    #[test]
    fn test_parse_range() {
        let parameter = parse_range("3.0 0.0 10.0 0.5").unwrap();
        assert_eq!(parameter, Parameter::range(3.0, 0.0, 10.0, 0.5));
        // Commas and parentheses are accepted as separators too.
        let parameter = parse_range("(3.0, 0.0, 10.0, 0.5)").unwrap();
        assert_eq!(parameter, Parameter::range(3.0, 0.0, 10.0, 0.5));
        assert!(parse_range("3.0 0.0").is_err());
        assert!(parse_range("a b c d").is_err());
    }

    #[test]
    fn test_range_text_round_trip() {
        let parameter = Parameter::range(3.0, 0.0, 10.0, 0.5);
        let text = parameter_text(&parameter);
        assert_eq!(text, "3.0 0.0 10.0 0.5");
        assert_eq!(parse_range(&text).unwrap(), parameter);
    }

    #[test]
    fn test_parse_select() {
        let parameter = parse_select(STRING, "a (a, b, c) other").unwrap();
        assert_eq!(
            parameter,
            Parameter::select(
                STRING,
                "a",
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                Some("other".to_string())
            )
        );
        // Brackets normalize to parentheses, the reference is optional.
        let parameter = parse_select(INT, "1 [1,2]").unwrap();
        assert_eq!(
            parameter,
            Parameter::select(INT, "1", vec!["1".to_string(), "2".to_string()], None)
        );
        assert!(parse_select(STRING, "no choices").is_err());
    }

    #[test]
    fn test_parse_uid() {
        let parameter = parse_uid("4 [UID:group1]").unwrap();
        assert_eq!(parameter, Parameter::unique_id(4, "group1"));
        assert_eq!(parameter_text(&parameter), "4 [UID:group1]");
        assert!(parse_uid("4 UID group1").is_err());
    }

    #[test]
    fn test_to_instance() {
        use crate::model::AttributeValue;
        assert_eq!(to_instance("7", INT), Ok(AttributeValue::Int(7)));
        assert_eq!(to_instance("0.5", DOUBLE), Ok(AttributeValue::Double(0.5)));
        assert_eq!(to_instance("true", BOOL), Ok(AttributeValue::Bool(true)));
        assert!(to_instance("x", INT).is_err());
        assert!(to_instance("1", "java.lang.Integer").is_err());
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b&c>\"d\""), "a&lt;b&amp;c&gt;&quot;d&quot;");
    }
}
