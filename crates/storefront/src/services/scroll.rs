//! Scroll restoration between the listing and a product's detail view.
//!
//! Views register a handle for every rendered listing item and drop it when
//! the item goes away, so the registry only ever holds on-screen items.
//! Opening a detail view leaves a [`ReturnMarker`]; when the listing renders
//! again, [`ScrollCoordinator::restore`] brings that item back into view and
//! consumes the marker.

use std::collections::HashMap;

use bazaar_core::ProductId;

/// Where in the viewport a target should end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    Start,
    Center,
    End,
}

/// Something on screen that can be scrolled into view.
pub trait ScrollTarget {
    fn scroll_into_view(&self, align: ScrollAlign);
}

/// Remembers which item the user left the listing from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnMarker {
    product_id: ProductId,
}

impl ReturnMarker {
    #[must_use]
    pub fn new(product_id: ProductId) -> Self {
        Self { product_id }
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }
}

/// Registry of on-screen listing items, keyed by product id.
#[derive(Debug)]
pub struct ScrollCoordinator<H> {
    handles: HashMap<ProductId, H>,
}

impl<H> Default for ScrollCoordinator<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H: ScrollTarget> ScrollCoordinator<H> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handle for a rendered item, returning any handle it
    /// replaces.
    pub fn mount(&mut self, id: ProductId, handle: H) -> Option<H> {
        self.handles.insert(id, handle)
    }

    /// Forget an item that is no longer rendered.
    pub fn unmount(&mut self, id: &ProductId) -> Option<H> {
        self.handles.remove(id)
    }

    /// Record where the user is leaving from before opening `id`'s detail.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn open_detail(&self, id: &ProductId) -> ReturnMarker {
        ReturnMarker::new(id.clone())
    }

    /// Scroll the marked item to the middle of the viewport.
    ///
    /// On success the marker is cleared, so restoration happens once. If the
    /// item is not rendered (yet), nothing happens and the marker is kept for
    /// the next render.
    pub fn restore(&self, marker: &mut Option<ReturnMarker>) -> bool {
        let Some(pending) = marker.as_ref() else {
            return false;
        };
        let Some(handle) = self.handles.get(pending.product_id()) else {
            tracing::trace!(id = %pending.product_id(), "Return target not rendered");
            return false;
        };

        handle.scroll_into_view(ScrollAlign::Center);
        *marker = None;
        true
    }

    #[must_use]
    pub fn is_mounted(&self, id: &ProductId) -> bool {
        self.handles.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop every handle, e.g. when the whole listing is replaced.
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    struct Recorder {
        scrolls: Rc<RefCell<Vec<(&'static str, ScrollAlign)>>>,
    }

    struct Row {
        name: &'static str,
        recorder: Recorder,
    }

    impl ScrollTarget for Row {
        fn scroll_into_view(&self, align: ScrollAlign) {
            self.recorder.scrolls.borrow_mut().push((self.name, align));
        }
    }

    fn mounted(names: &[&'static str]) -> (ScrollCoordinator<Row>, Recorder) {
        let recorder = Recorder::default();
        let mut coordinator = ScrollCoordinator::new();
        for &name in names {
            coordinator.mount(
                ProductId::new(name),
                Row {
                    name,
                    recorder: recorder.clone(),
                },
            );
        }
        (coordinator, recorder)
    }

    #[test]
    fn test_restore_is_one_shot() {
        let (coordinator, recorder) = mounted(&["a", "b"]);
        let mut marker = Some(coordinator.open_detail(&ProductId::new("b")));

        assert!(coordinator.restore(&mut marker));
        assert!(marker.is_none());
        assert!(!coordinator.restore(&mut marker));

        assert_eq!(*recorder.scrolls.borrow(), [("b", ScrollAlign::Center)]);
    }

    #[test]
    fn test_missing_target_keeps_marker() {
        let (mut coordinator, recorder) = mounted(&["a"]);
        let mut marker = Some(coordinator.open_detail(&ProductId::new("late")));

        assert!(!coordinator.restore(&mut marker));
        assert!(marker.is_some());
        assert!(recorder.scrolls.borrow().is_empty());

        coordinator.mount(
            ProductId::new("late"),
            Row {
                name: "late",
                recorder: recorder.clone(),
            },
        );
        assert!(coordinator.restore(&mut marker));
        assert!(marker.is_none());
    }

    #[test]
    fn test_unmount_removes_handle() {
        let (mut coordinator, recorder) = mounted(&["a"]);
        let mut marker = Some(coordinator.open_detail(&ProductId::new("a")));

        assert!(coordinator.unmount(&ProductId::new("a")).is_some());
        assert!(coordinator.is_empty());
        assert!(!coordinator.restore(&mut marker));
        assert!(recorder.scrolls.borrow().is_empty());
    }
}
