use crate::model::{AttributeValue, Attributes, Parameter};

impl Attributes {
    pub fn new() -> Attributes {
        Attributes::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.entries.get(name)
    }

    /// Set an attribute, replacing any previous value while keeping its position.
    pub fn set(&mut self, name: &str, value: AttributeValue) {
        self.entries.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.entries.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy all entries of `other` into this map (existing names are overwritten).
    pub fn extend_from(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            self.set(name, value.clone());
        }
    }

    /// Shorthand for string attributes.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(AttributeValue::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Shorthand for numeric attributes; integers widen to `f64`.
    pub fn get_double(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(AttributeValue::Double(value)) => Some(*value),
            Some(AttributeValue::Int(value)) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(AttributeValue::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(AttributeValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }
}

impl Parameter {
    /// A continuous parameter; see [Parameter::Range].
    pub fn range(default: f64, lower: f64, upper: f64, granularity: f64) -> Parameter {
        Parameter::Range {
            default,
            lower,
            upper,
            granularity,
        }
    }

    /// A discrete selection parameter; see [Parameter::Select].
    pub fn select(
        class: &str,
        default: &str,
        choices: Vec<String>,
        reference: Option<String>,
    ) -> Parameter {
        Parameter::Select {
            class: class.to_string(),
            default: default.to_string(),
            choices,
            reference,
        }
    }

    /// A unique-id parameter; see [Parameter::UniqueId].
    pub fn unique_id(default: i64, identifier: &str) -> Parameter {
        Parameter::UniqueId {
            default,
            identifier: identifier.to_string(),
        }
    }

    /// The default value rendered as the token it would carry on the wire.
    pub fn default_token(&self) -> String {
        match self {
            Parameter::Range { default, .. } => format!("{:?}", default),
            Parameter::Select { default, .. } => default.clone(),
            Parameter::UniqueId { default, .. } => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{AttributeValue, Attributes, Parameter};

    #[test]
    fn test_attribute_order_and_overwrite() {
        let mut attributes = Attributes::new();
        attributes.set("b", AttributeValue::Int(1));
        attributes.set("a", AttributeValue::Int(2));
        attributes.set("b", AttributeValue::Int(3));
        let names: Vec<&str> = attributes.names().collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(attributes.get_int("b"), Some(3));
    }

    #[test]
    fn test_typed_accessors() {
        let mut attributes = Attributes::new();
        attributes.set("w", AttributeValue::Double(0.5));
        attributes.set("n", AttributeValue::Int(4));
        attributes.set("ok", AttributeValue::Bool(true));
        attributes.set("name", AttributeValue::Str("can".to_string()));
        assert_eq!(attributes.get_double("w"), Some(0.5));
        assert_eq!(attributes.get_double("n"), Some(4.0));
        assert_eq!(attributes.get_bool("ok"), Some(true));
        assert_eq!(attributes.get_str("name"), Some("can"));
        assert_eq!(attributes.get_str("w"), None);
    }

    #[test]
    fn test_parameter_default_token() {
        assert_eq!(Parameter::range(3.0, 0.0, 10.0, 0.5).default_token(), "3.0");
        assert_eq!(Parameter::unique_id(2, "group").default_token(), "2");
    }
}
