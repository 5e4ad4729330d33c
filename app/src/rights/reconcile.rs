use std::collections::HashSet;

use super::tree::{Element, Node};

pub const DISABLED: &str = "false";

/// Counts produced by a single [`reconcile`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Existing `right` entries whose value was forced to `false`
    pub disabled: usize,
    /// `right` entries appended for permissions the object did not list
    pub appended: usize,
}

/// `<right><name>{permission}</name><value>false</value></right>`
pub fn disabled_right(permission: &str) -> Element {
    let mut right = Element::new("right");
    right.push(Element::with_text("name", permission));
    right.push(Element::with_text("value", DISABLED));
    right
}

/// Disable every listed permission of an object entry, appending the missing ones.
///
/// Rights with a missing or empty `name`/`value` are left as they are and do
/// not count as handled.
pub fn reconcile(object: &mut Element, permissions: &[&str]) -> Reconciled {
    let mut outcome = Reconciled::default();
    let mut handled: HashSet<&str> = HashSet::new();

    for right in object
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .filter(|element| element.name == "right")
    {
        let Some(permission) = right
            .child_text("name")
            .and_then(|name| permissions.iter().copied().find(|p| *p == name))
        else {
            continue;
        };

        let Some(value) = right.child_mut("value") else {
            continue;
        };
        if value.set_text(DISABLED) {
            handled.insert(permission);
            outcome.disabled += 1;
        }
    }

    for permission in permissions {
        if !handled.contains(permission) {
            object.push(disabled_right(permission));
            outcome.appended += 1;
        }
    }

    outcome
}
