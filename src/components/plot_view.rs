use leptos::prelude::*;
use sigscope_core::coords::PlotFrame;
use sigscope_core::cursor::{CursorAxis, CursorTarget};
use sigscope_core::session::PlotKind;
use sigscope_core::tabs::TabId;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::drag;
use crate::state::AppState;

type ResizeHandler = Closure<dyn FnMut(js_sys::Array)>;

#[component]
pub fn PlotView(tab: TabId) -> impl IntoView {
    let state = expect_context::<AppState>();
    let img_ref = NodeRef::<leptos::html::Img>::new();
    let observer = StoredValue::new_local(None::<(web_sys::ResizeObserver, ResizeHandler)>);

    // Cursor drags and resizes touch the workspace on every event; these
    // memos keep the image element from seeing those updates.
    let active_plot = Memo::new(move |_| {
        state.with_session(tab, |s| s.active_plot()).unwrap_or(PlotKind::Spectrogram)
    });
    let image = Memo::new(move |_| {
        state.with_session(tab, |s| s.plots().shared(s.active_plot())).flatten()
    });
    let image_url = Memo::new(move |_| {
        image.with(|b64| b64.as_deref().map(|b64| format!("data:image/png;base64,{b64}")))
    });
    let has_image = Memo::new(move |_| image.with(Option::is_some));
    let has_plot = move |kind: PlotKind| {
        state.with_session(tab, |s| s.plots().get(kind).is_some()).unwrap_or(false)
    };
    let on_spectrogram = move || active_plot.get() == PlotKind::Spectrogram;

    // Keep the session's frame in step with the rendered image size.
    Effect::new(move || {
        let Some(img) = img_ref.get() else { return };
        if observer.with_value(|o| o.is_some()) {
            return;
        }
        let handler = ResizeHandler::new(move |entries: js_sys::Array| {
            let Ok(entry) = entries.get(0).dyn_into::<web_sys::ResizeObserverEntry>() else {
                return;
            };
            let rect = entry.content_rect();
            state.update_session(tab, |s| s.set_frame(PlotFrame::new(rect.width(), rect.height())));
        });
        match web_sys::ResizeObserver::new(handler.as_ref().unchecked_ref()) {
            Ok(ro) => {
                ro.observe(&img);
                observer.set_value(Some((ro, handler)));
            }
            Err(e) => log::error!("ResizeObserver unavailable: {:?}", e),
        }
    });
    on_cleanup(move || {
        observer.update_value(|o| {
            if let Some((ro, _)) = o.take() {
                ro.disconnect();
            }
        });
    });

    let on_img_load = move |_| {
        let Some(img) = img_ref.get_untracked() else { return };
        let rect = img.get_bounding_client_rect();
        state.update_session(tab, |s| s.set_frame(PlotFrame::new(rect.width(), rect.height())));
    };

    let start_drag = move |target: CursorTarget, ev: web_sys::PointerEvent| {
        ev.prevent_default();
        let Some(img) = img_ref.get_untracked() else { return };
        drag::begin(target, move |ev: web_sys::PointerEvent| {
            let rect = img.get_bounding_client_rect();
            let px = match target.axis {
                CursorAxis::Vertical => ev.client_x() as f64 - rect.left(),
                CursorAxis::Horizontal => ev.client_y() as f64 - rect.top(),
            };
            state.update_session(tab, |s| s.drag_cursor(target, px));
        });
    };

    let cursor_lines = move || {
        let show = state.with_session(tab, |s| s.show_cursors()).unwrap_or(false);
        if !show || !on_spectrogram() {
            return Vec::new();
        }
        let cursors = state.with_session(tab, |s| *s.cursors()).unwrap_or_default();
        let mut lines = Vec::new();
        for (axis, slots) in [
            (CursorAxis::Vertical, cursors.vertical),
            (CursorAxis::Horizontal, cursors.horizontal),
        ] {
            for (index, pos) in slots.into_iter().enumerate() {
                let Some(px) = pos else { continue };
                let target = CursorTarget { axis, index };
                let (class, style) = match axis {
                    CursorAxis::Vertical => ("cursor-line vertical", format!("left: {px}px;")),
                    CursorAxis::Horizontal => ("cursor-line horizontal", format!("top: {px}px;")),
                };
                lines.push(view! {
                    <div
                        class=class
                        style=style
                        on:pointerdown=move |ev| start_drag(target, ev)
                    ></div>
                });
            }
        }
        lines
    };

    let overlay_boxes = move || {
        if !on_spectrogram() {
            return Vec::new();
        }
        let rects = state.with_session(tab, |s| s.overlays()).unwrap_or_default();
        rects
            .into_iter()
            .map(|r| {
                let style = format!(
                    "left: {}px; top: {}px; width: {}px; height: {}px;",
                    r.left, r.top, r.width, r.height
                );
                let title = r.label.clone();
                view! {
                    <div class="annotation-box" style=style title=title>
                        <span class="annotation-box-label">{r.label}</span>
                    </div>
                }
            })
            .collect::<Vec<_>>()
    };

    view! {
        <div class="plot-view">
            <div class="plot-tabs">
                {PlotKind::ALL.into_iter().map(|kind| view! {
                    <button
                        class="plot-tab"
                        class:active=move || active_plot.get() == kind
                        disabled=move || !has_plot(kind)
                        on:click=move |_| {
                            state.update_session(tab, |s| s.set_active_plot(kind));
                        }
                    >{kind.label()}</button>
                }).collect_view()}
            </div>
            <div class="plot-area">
                {move || (!has_image.get()).then(|| view! {
                    <div class="plot-placeholder">"No plot loaded"</div>
                })}
                <img
                    node_ref=img_ref
                    class="plot-image"
                    alt=move || active_plot.get().label()
                    src=move || image_url.get().unwrap_or_default()
                    style:display=move || if has_image.get() { "block" } else { "none" }
                    on:load=on_img_load
                    draggable="false"
                />
                {overlay_boxes}
                {cursor_lines}
            </div>
        </div>
    }
}
