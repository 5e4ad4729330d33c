use std::collections::HashSet;

use super::catalog::ObjectKind;
use super::reconcile::disabled_right;
use super::tree::Element;

/// Object entry for `{kind}.{instance}` with every permission of the kind disabled.
pub fn disabled_object(kind: ObjectKind, instance: &str) -> Element {
    let mut object = Element::new("object");
    object.push(Element::with_text("name", format!("{}{}", kind.prefix(), instance)));
    for permission in kind.permissions() {
        object.push(disabled_right(permission));
    }
    object
}

/// Append a disabled object entry for every inventory instance not seen in the file.
///
/// Entries are appended in inventory order. Returns the number of injected entries.
pub fn inject_missing(
    root: &mut Element, inventory: &[String], seen: &HashSet<String>, kind: ObjectKind,
) -> usize {
    let mut injected = 0;

    for instance in inventory.iter().filter(|instance| !seen.contains(*instance)) {
        log::debug!("Injecting {}{}", kind.prefix(), instance);
        root.push(disabled_object(kind, instance));
        injected += 1;
    }

    injected
}
