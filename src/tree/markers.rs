use std::any::Any;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Opaque annotation attached to a tree node by a later processing stage.
pub trait Marker: Any + fmt::Debug + Send + Sync {
    fn id(&self) -> Uuid;

    fn as_any(&self) -> &dyn Any;
}

/// Ordered set of markers. Always empty when the parser produces it.
///
/// Adding or removing a marker returns a new set; the original is untouched.
#[derive(Debug, Clone, Default)]
pub struct Markers {
    entries: Vec<Arc<dyn Marker>>,
}

impl Markers {
    pub const EMPTY: Markers = Markers {
        entries: Vec::new(),
    };

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Marker>> {
        self.entries.iter()
    }

    pub fn add(&self, marker: impl Marker) -> Markers {
        let mut entries = self.entries.clone();
        entries.push(Arc::new(marker));
        Markers { entries }
    }

    /// The first marker of type `M`, if any.
    pub fn find<M: Marker>(&self) -> Option<&M> {
        self.entries
            .iter()
            .find_map(|m| m.as_any().downcast_ref::<M>())
    }

    pub fn remove(&self, id: Uuid) -> Markers {
        Markers {
            entries: self
                .entries
                .iter()
                .filter(|m| m.id() != id)
                .cloned()
                .collect(),
        }
    }
}
