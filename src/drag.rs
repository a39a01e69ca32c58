//! Document-level pointer listeners for cursor dragging.
//!
//! Only one drag is live at a time. Starting a new one drops the previous
//! guard, which detaches its listeners.

use std::cell::RefCell;

use sigscope_core::cursor::{CursorTarget, DragGuard, PointerCapture};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::PointerEvent;

type PointerHandler = Closure<dyn FnMut(PointerEvent)>;

thread_local! {
    static ACTIVE_DRAG: RefCell<Option<DragGuard<DocumentPointerCapture>>> = const { RefCell::new(None) };
}

pub struct DocumentPointerCapture {
    document: web_sys::Document,
    on_move: PointerHandler,
    on_up: PointerHandler,
    attached: bool,
}

impl DocumentPointerCapture {
    pub fn new(
        on_move: impl FnMut(PointerEvent) + 'static,
        on_up: impl FnMut(PointerEvent) + 'static,
    ) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self {
            document,
            on_move: Closure::new(on_move),
            on_up: Closure::new(on_up),
            attached: false,
        })
    }
}

impl PointerCapture for DocumentPointerCapture {
    type Error = JsValue;

    fn attach(&mut self) -> Result<(), JsValue> {
        self.document
            .add_event_listener_with_callback("pointermove", self.on_move.as_ref().unchecked_ref())?;
        if let Err(e) = self
            .document
            .add_event_listener_with_callback("pointerup", self.on_up.as_ref().unchecked_ref())
        {
            if let Err(e) = self.document.remove_event_listener_with_callback(
                "pointermove",
                self.on_move.as_ref().unchecked_ref(),
            ) {
                log::warn!("removing pointermove listener failed: {:?}", e);
            }
            return Err(e);
        }
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        for (event, handler) in [("pointermove", &self.on_move), ("pointerup", &self.on_up)] {
            if let Err(e) = self
                .document
                .remove_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
            {
                log::warn!("removing {event} listener failed: {:?}", e);
            }
        }
        self.attached = false;
    }
}

/// Start dragging `target`; `on_move` receives every pointer move until the
/// pointer is released anywhere in the document.
pub fn begin(target: CursorTarget, on_move: impl FnMut(PointerEvent) + 'static) {
    let Some(capture) = DocumentPointerCapture::new(on_move, |_| end()) else {
        log::error!("No document for drag listeners");
        return;
    };
    match DragGuard::begin(target, capture) {
        Ok(guard) => {
            let previous = ACTIVE_DRAG.with(|slot| slot.borrow_mut().replace(guard));
            drop(previous);
        }
        Err(e) => log::error!("Failed to attach drag listeners: {:?}", e),
    }
}

/// Release the active drag. The guard owns the closure currently running
/// `pointerup`, so it is dropped on the next microtask instead of here.
pub fn end() {
    wasm_bindgen_futures::spawn_local(async {
        let guard = ACTIVE_DRAG.with(|slot| slot.borrow_mut().take());
        if let Some(guard) = guard {
            guard.release();
        }
    });
}
