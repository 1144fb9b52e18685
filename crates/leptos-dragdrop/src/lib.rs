//! Leptos DragDrop Utilities
//!
//! Mouse-driven reordering of a flat list for Leptos. Rows are addressed by
//! their index in the rendered list; a movement threshold tells a click from
//! a drag.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    /// Row being dragged
    pub dragging: RwSignal<Option<usize>>,
    /// Row under the pointer while dragging
    pub over: RwSignal<Option<usize>>,
    /// Row pressed but not yet moved past the threshold
    pending: RwSignal<Option<usize>>,
    start: RwSignal<(i32, i32)>,
    /// Set for a moment after a drop so the trailing click can be ignored
    pub just_ended: RwSignal<bool>,
}

pub fn create_dnd_signals() -> DndSignals {
    DndSignals {
        dragging: RwSignal::new(None),
        over: RwSignal::new(None),
        pending: RwSignal::new(None),
        start: RwSignal::new((0, 0)),
        just_ended: RwSignal::new(false),
    }
}

impl DndSignals {
    pub fn is_dragging(&self, index: usize) -> bool {
        self.dragging.get() == Some(index)
    }

    pub fn is_over(&self, index: usize) -> bool {
        self.over.get() == Some(index) && self.dragging.get() != Some(index)
    }
}

/// Whether the pointer travelled far enough from `start` to begin a drag
pub fn exceeds_threshold(start: (i32, i32), now: (i32, i32)) -> bool {
    (now.0 - start.0).abs() > DRAG_THRESHOLD_PX || (now.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

/// Move the element at `from` so it ends up at index `to`.
///
/// `to` past the end is clamped to the last slot. Returns `false` (and
/// leaves `items` untouched) when `from` is out of range.
pub fn move_index<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging.set(None);
    dnd.over.set(None);
    dnd.pending.set(None);
    dnd.just_ended.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.just_ended;
        let cb = Closure::once_into_js(move || clear.set(false));
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 100);
    }
}

/// Create mousedown handler for a draggable row
pub fn make_on_mousedown(dnd: DndSignals, index: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Controls inside the row keep their own click behaviour
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
            {
                return;
            }
        }
        dnd.pending.set(Some(index));
        dnd.start.set((ev.client_x(), ev.client_y()));
    }
}

/// Create mouseenter handler for a row (becomes the drop slot)
pub fn make_on_row_mouseenter(dnd: DndSignals, index: usize) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.over.set(Some(index));
        }
    }
}

/// Create mouseleave handler for the list container
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.over.set(None);
        }
    }
}

/// Document-level listeners; removed from the document when dropped
pub struct GlobalListeners {
    mousemove: Closure<dyn FnMut(web_sys::MouseEvent)>,
    mouseup: Closure<dyn FnMut(web_sys::MouseEvent)>,
}

impl Drop for GlobalListeners {
    fn drop(&mut self) {
        if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
            let _ = doc.remove_event_listener_with_callback("mousemove", self.mousemove.as_ref().unchecked_ref());
            let _ = doc.remove_event_listener_with_callback("mouseup", self.mouseup.as_ref().unchecked_ref());
        }
    }
}

/// Bind document mousemove/mouseup handlers.
///
/// `on_drop(from, to)` runs when a dragged row is released over another row.
/// Keep the returned guard alive for as long as the list is mounted.
pub fn bind_global_listeners<F>(dnd: DndSignals, on_drop: F) -> GlobalListeners
where
    F: Fn(usize, usize) + 'static,
{
    let mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending.get_untracked();
        if pending.is_some()
            && dnd.dragging.get_untracked().is_none()
            && exceeds_threshold(dnd.start.get_untracked(), (ev.client_x(), ev.client_y()))
        {
            dnd.dragging.set(pending);
        }
    });

    let mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragged = dnd.dragging.get_untracked();
        let over = dnd.over.get_untracked();
        end_drag(&dnd);
        if let (Some(from), Some(to)) = (dragged, over) {
            if from != to {
                on_drop(from, to);
            }
        }
    });

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref());
        let _ = doc.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref());
    }

    GlobalListeners { mousemove, mouseup }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        assert!(!exceeds_threshold((10, 10), (15, 15)));
        assert!(exceeds_threshold((10, 10), (16, 10)));
        assert!(exceeds_threshold((10, 10), (10, 4)));
    }

    #[test]
    fn test_move_index_down_and_up() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_index(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);

        assert!(move_index(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn test_move_index_clamps_and_rejects() {
        let mut items = vec![1, 2, 3];
        assert!(move_index(&mut items, 0, 10));
        assert_eq!(items, vec![2, 3, 1]);

        assert!(!move_index(&mut items, 3, 0));
        assert_eq!(items, vec![2, 3, 1]);
    }
}
