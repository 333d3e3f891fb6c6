#![forbid(unsafe_code)]

//! Document that connects and disconnects components.
//!
//! Mounting a component calls [`Component::connected`]; unmounting calls
//! [`Component::disconnected`]. The document never calls either twice in a
//! row for the same mount.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Lifecycle callbacks of a component hosted in a [`Document`].
pub trait Component {
    /// The component entered the live document.
    fn connected(&mut self);

    /// The component left the live document.
    fn disconnected(&mut self);
}

/// Shared handle to a mounted component.
pub type ComponentRef = Rc<RefCell<dyn Component>>;

/// Identifies one mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(u64);

/// The live document.
#[derive(Default)]
pub struct Document {
    next_id: u64,
    mounted: Vec<(MountId, ComponentRef)>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = self.mounted.iter().map(|(id, _)| *id).collect();
        f.debug_struct("Document").field("mounted", &ids).finish()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `component` and call its `connected` callback.
    pub fn mount(&mut self, component: ComponentRef) -> MountId {
        self.next_id += 1;
        let id = MountId(self.next_id);
        component.borrow_mut().connected();
        self.mounted.push((id, component));
        tracing::debug!(message = "document.mount", id = id.0);
        id
    }

    /// Remove the component mounted as `id` and call its `disconnected`
    /// callback. Unknown ids return `None`.
    pub fn unmount(&mut self, id: MountId) -> Option<ComponentRef> {
        let index = self.mounted.iter().position(|(m, _)| *m == id)?;
        let (_, component) = self.mounted.remove(index);
        component.borrow_mut().disconnected();
        tracing::debug!(message = "document.unmount", id = id.0);
        Some(component)
    }

    #[must_use]
    pub fn is_mounted(&self, id: MountId) -> bool {
        self.mounted.iter().any(|(m, _)| *m == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Unmount everything, most recent first.
    pub fn clear(&mut self) {
        while let Some((id, component)) = self.mounted.pop() {
            component.borrow_mut().disconnected();
            tracing::debug!(message = "document.unmount", id = id.0);
        }
    }
}
