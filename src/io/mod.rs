//! Adds XML import/export support for [crate::model::Specification], plus a
//! line-oriented adapter for TGFF benchmark files.
//!
//! The XML wire format is part of the crate's contract: reading back a written
//! specification reproduces it exactly (identifiers, endpoints, orientations,
//! attributes and routing topology). Reproducible experiments depend on this.

/// Shared pieces of the wire format: namespace, value classes, parameter grammars.
pub mod common;

/// Contains the code for reading a specification from XML. The reader validates
/// structure and references while parsing and fails with the offending fragment.
pub mod import;

/// Contains the code for writing a specification as XML. The writer basically dumps
/// the specification into the normative document shape in insertion order.
pub mod export;

/// A best-effort adapter for TGFF benchmark files (Task Graphs For Free / E3S).
pub mod tgff;

#[cfg(test)]
mod tests {
    use crate::model::ops::tests::sample_specification;
    use crate::model::{AttributeValue, Element, ElementRef, Parameter, Specification};

    #[test]
    fn test_xml_round_trip() {
        let specification = sample_specification();
        let xml = specification.to_xml();
        let parsed = Specification::try_from_xml(&xml).unwrap();
        assert_eq!(parsed, specification);
    }

    #[test]
    fn test_xml_round_trip_with_attributes() {
        let mut specification = sample_specification();
        specification
            .attributes_mut()
            .set("name", AttributeValue::Str("demo".to_string()));
        specification
            .attributes_mut()
            .set("iterations", AttributeValue::Int(25));

        let task = specification.application_mut().task_mut("t1").unwrap();
        task.set_attribute("cost", AttributeValue::Double(2.5));
        task.set_attribute(
            "power",
            AttributeValue::Param(Parameter::range(3.0, 0.0, 10.0, 0.5)),
        );
        task.set_attribute(
            "mode",
            AttributeValue::Param(Parameter::select(
                crate::io::common::STRING,
                "slow",
                vec!["slow".to_string(), "fast".to_string()],
                None,
            )),
        );
        task.set_attribute(
            "slot",
            AttributeValue::Param(Parameter::unique_id(1, "tdma")),
        );
        task.set_attribute(
            "partner",
            AttributeValue::Ref(ElementRef {
                class: "resource".to_string(),
                id: "can".to_string(),
            }),
        );
        task.set_attribute(
            "weights",
            AttributeValue::List(vec![
                AttributeValue::Int(1),
                AttributeValue::Int(2),
                AttributeValue::Int(3),
            ]),
        );
        task.set_attribute("payload", AttributeValue::Blob(vec![0, 1, 2, 250]));

        let mut function_attributes = crate::model::Attributes::new();
        function_attributes.set("PERIOD", AttributeValue::Double(20.0));
        specification
            .application_mut()
            .set_function_attributes("t2", function_attributes);

        let xml = specification.to_xml();
        let parsed = Specification::try_from_xml(&xml).unwrap();
        assert_eq!(parsed, specification);
    }

    #[test]
    fn test_range_attribute_text_is_stable() {
        let mut specification = sample_specification();
        specification.application_mut().task_mut("t1").unwrap().set_attribute(
            "power",
            AttributeValue::Param(Parameter::range(3.0, 0.0, 10.0, 0.5)),
        );
        let xml = specification.to_xml();
        assert!(xml.contains(">3.0 0.0 10.0 0.5</attribute>"));
    }

    #[test]
    fn test_dangling_mapping_is_rejected() {
        let xml = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
            <specification xmlns="http://opendse.sf.net">
            <architecture><resource id="r1"/></architecture>
            <application><task id="t1"/></application>
            <mappings><mapping id="m1" source="t9" target="r1"/></mappings>
            </specification>"#;
        let error = Specification::try_from_xml(xml).unwrap_err();
        assert!(error.contains("t9"), "unexpected message: {}", error);
    }

    #[test]
    fn test_unknown_value_class_is_rejected() {
        let xml = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
            <specification xmlns="http://opendse.sf.net">
            <architecture><resource id="r1"><attributes>
              <attribute name="x" type="COMPLEX">1</attribute>
            </attributes></resource></architecture>
            <application/>
            <mappings/>
            </specification>"#;
        let error = Specification::try_from_xml(xml).unwrap_err();
        assert!(error.contains("COMPLEX"), "unexpected message: {}", error);
    }

    #[test]
    fn test_missing_namespace_is_rejected() {
        let xml = "<specification><architecture/><application/><mappings/></specification>";
        assert!(Specification::try_from_xml(xml).is_err());
    }

    #[test]
    fn test_malformed_parameter_is_rejected() {
        let xml = r#"<?xml version='1.0' encoding='UTF-8' standalone='no'?>
            <specification xmlns="http://opendse.sf.net">
            <architecture/>
            <application><task id="t1"><attributes>
              <attribute name="p" type="DOUBLE" parameter="RANGE">3.0 1.0</attribute>
            </attributes></task></application>
            <mappings/>
            </specification>"#;
        let error = Specification::try_from_xml(xml).unwrap_err();
        assert!(error.contains("3.0 1.0"), "unexpected message: {}", error);
    }

    #[test]
    fn test_element_reference_resolves_per_namespace() {
        let specification = {
            let mut specification = sample_specification();
            let task = specification.application_mut().task_mut("t1").unwrap();
            task.set_attribute(
                "target",
                AttributeValue::Ref(ElementRef {
                    class: "resource".to_string(),
                    id: "r1".to_string(),
                }),
            );
            specification
        };
        let parsed = Specification::try_from_xml(&specification.to_xml()).unwrap();
        let attribute = parsed
            .application()
            .task("t1")
            .unwrap()
            .attribute("target")
            .unwrap();
        match attribute {
            AttributeValue::Ref(reference) => {
                assert_eq!(reference.id, "r1");
                assert_eq!(reference.class, "resource");
            }
            other => panic!("Expected element reference, found {:?}.", other),
        }
    }
}
