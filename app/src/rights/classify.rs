use super::catalog::ObjectKind;
use super::tree::Element;

/// A root-level document or catalog instance named by an object entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ObjectKind,
    pub instance: String,
}

/// Classify an `object` entry by its `name` child.
///
/// Only names of exactly two segments (`Document.Invoice`) qualify.
/// Sub-attribute paths such as `Document.Invoice.StandardAttribute.Number`
/// and anything not starting with a known kind prefix yield `None`.
pub fn classify(object: &Element) -> Option<Classification> {
    let name = object
        .child_elements()
        .find(|child| child.name == "name" && !child.children.is_empty())?
        .text()?;

    // Document wins over Catalog; a name cannot carry both prefixes anyway.
    let kind = ObjectKind::ALL
        .into_iter()
        .find(|kind| name.starts_with(kind.prefix()))?;

    let mut segments = name.split('.');
    let _kind_segment = segments.next()?;
    let instance = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    Some(Classification {
        kind,
        instance: instance.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(name: &str) -> Element {
        let mut object = Element::new("object");
        object.push(Element::with_text("name", name));
        object
    }

    #[test]
    fn test_classify_document_and_catalog() {
        assert_eq!(
            classify(&object("Document.Invoice")),
            Some(Classification {
                kind: ObjectKind::Document,
                instance: "Invoice".to_string()
            })
        );
        assert_eq!(
            classify(&object("Catalog.Currency")),
            Some(Classification {
                kind: ObjectKind::Catalog,
                instance: "Currency".to_string()
            })
        );
    }

    #[test]
    fn test_sub_attribute_is_not_classified() {
        assert_eq!(classify(&object("Document.Invoice.StandardAttribute.Description")), None);
        assert_eq!(classify(&object("Catalog.Currency.Attribute.Code")), None);
    }

    #[test]
    fn test_other_kinds_are_ignored() {
        assert_eq!(classify(&object("Configuration.Main")), None);
        assert_eq!(classify(&object("InformationRegister.Prices")), None);
        assert_eq!(classify(&object("DocumentJournal.Sales")), None);
        assert_eq!(classify(&object("Document")), None);
    }

    #[test]
    fn test_empty_instance_still_qualifies() {
        assert_eq!(
            classify(&object("Document.")),
            Some(Classification {
                kind: ObjectKind::Document,
                instance: String::new()
            })
        );
    }

    #[test]
    fn test_malformed_entries() {
        assert_eq!(classify(&Element::new("object")), None);

        let mut without_text = Element::new("object");
        without_text.push(Element::new("name"));
        assert_eq!(classify(&without_text), None);

        let mut name_after_rights = Element::new("object");
        name_after_rights.push(Element::new("right"));
        name_after_rights.push(Element::with_text("name", "Document.Order"));
        assert_eq!(
            classify(&name_after_rights).map(|c| c.instance),
            Some("Order".to_string())
        );
    }
}
