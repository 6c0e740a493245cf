use crate::model::{
    Application, Architecture, Attributes, Mappings, Routings, Specification,
};

impl Specification {
    /// Aggregate the four sub-structures into a specification without routings or
    /// specification-level attributes.
    pub fn new(
        application: Application,
        architecture: Architecture,
        mappings: Mappings,
    ) -> Specification {
        Specification {
            application,
            architecture,
            mappings,
            routings: Routings::new(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_routings(
        application: Application,
        architecture: Architecture,
        mappings: Mappings,
        routings: Routings,
    ) -> Specification {
        Specification {
            application,
            architecture,
            mappings,
            routings,
            attributes: Attributes::new(),
        }
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    pub fn application_mut(&mut self) -> &mut Application {
        &mut self.application
    }

    pub fn architecture(&self) -> &Architecture {
        &self.architecture
    }

    pub fn architecture_mut(&mut self) -> &mut Architecture {
        &mut self.architecture
    }

    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }

    pub fn mappings_mut(&mut self) -> &mut Mappings {
        &mut self.mappings
    }

    pub fn routings(&self) -> &Routings {
        &self.routings
    }

    pub fn routings_mut(&mut self) -> &mut Routings {
        &mut self.routings
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}
