use crate::model::{Architecture, Routings};

impl Routings {
    pub fn new() -> Routings {
        Routings::default()
    }

    /// Set the routing space of a communication, replacing any previous one.
    pub fn set(&mut self, communication: &str, routing: Architecture) {
        self.routings.insert(communication.to_string(), routing);
    }

    pub fn get(&self, communication: &str) -> Option<&Architecture> {
        self.routings.get(communication)
    }

    pub fn get_mut(&mut self, communication: &str) -> Option<&mut Architecture> {
        self.routings.get_mut(communication)
    }

    /// The routing of a communication, created empty if it does not exist yet.
    pub fn get_or_insert(&mut self, communication: &str) -> &mut Architecture {
        self.routings
            .entry(communication.to_string())
            .or_insert_with(Architecture::new)
    }

    pub fn remove(&mut self, communication: &str) -> Option<Architecture> {
        self.routings.shift_remove(communication)
    }

    pub fn contains(&self, communication: &str) -> bool {
        self.routings.contains_key(communication)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Architecture)> {
        self.routings
            .iter()
            .map(|(communication, routing)| (communication.as_str(), routing))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Architecture)> {
        self.routings
            .iter_mut()
            .map(|(communication, routing)| (communication.as_str(), routing))
    }

    pub fn len(&self) -> usize {
        self.routings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routings.is_empty()
    }
}
