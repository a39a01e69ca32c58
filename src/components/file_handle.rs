use leptos::prelude::*;
use sigscope_core::session::{
    FileRole, SessionError, SessionPhase, Status, CAPTURE_EXTENSION, METADATA_EXTENSION,
};
use sigscope_core::tabs::TabId;

use crate::actions;
use crate::browser;
use crate::components::status_line::StatusLine;
use crate::state::AppState;

/// File pickers, upload/clear controls and the tab's status line.
#[component]
pub fn FileHandle(tab: TabId) -> impl IntoView {
    let state = expect_context::<AppState>();

    // Picked files live with the component; the session only knows names.
    let capture_file = RwSignal::new_local(None::<web_sys::File>);
    let metadata_file = RwSignal::new_local(None::<web_sys::File>);
    let capture_input = NodeRef::<leptos::html::Input>::new();
    let metadata_input = NodeRef::<leptos::html::Input>::new();

    let on_pick = move |role: FileRole, ev: web_sys::Event| {
        let slot = match role {
            FileRole::Capture => capture_file,
            FileRole::Metadata => metadata_file,
        };
        let Some(file) = browser::first_file(&ev) else {
            slot.set(None);
            state.update_session(tab, |s| s.deselect(role));
            return;
        };
        let accepted = state.update_session(tab, |s| s.select_file(role, &file.name()));
        match accepted {
            Some(Ok(())) => slot.set(Some(file)),
            _ => {
                slot.set(None);
                if let Some(input) = browser::input_from_event(&ev) {
                    input.set_value("");
                }
            }
        }
    };

    let on_upload = move |_| {
        let (Some(capture), Some(metadata)) = (capture_file.get_untracked(), metadata_file.get_untracked()) else {
            log::warn!("upload requested without both files picked");
            state.update_session(tab, |s| s.set_status(Status::idle(SessionError::MissingFiles.to_string())));
            return;
        };
        actions::upload(state, tab, capture, metadata);
    };

    let on_clear = move |_| {
        state.update_session(tab, |s| s.clear());
        capture_file.set(None);
        metadata_file.set(None);
        for input in [capture_input, metadata_input] {
            if let Some(el) = input.get_untracked() {
                el.set_value("");
            }
        }
    };

    let phase = move || state.with_session(tab, |s| s.phase()).unwrap_or(SessionPhase::Empty);
    let can_upload = move || state.with_session(tab, |s| s.can_upload()).unwrap_or(false);
    let uploading = move || phase() == SessionPhase::Uploading;
    let status = Signal::derive(move || state.with_session(tab, |s| s.status().clone()));

    let on_airview = move |ev: web_sys::Event| {
        let checked = event_target_checked(&ev);
        state.config.update(|c| c.airview = checked);
        if let Err(e) = state.config.with_untracked(|c| c.save()) {
            log::warn!("{e}");
        }
    };
    let on_statistics = move |ev: web_sys::Event| {
        let checked = event_target_checked(&ev);
        state.config.update(|c| c.statistics = checked);
        if let Err(e) = state.config.with_untracked(|c| c.save()) {
            log::warn!("{e}");
        }
    };

    view! {
        <div class="file-handle">
            <div class="file-pickers">
                <label class="file-picker">
                    <span>"Capture (" {CAPTURE_EXTENSION} ")"</span>
                    <input
                        type="file"
                        accept=CAPTURE_EXTENSION
                        node_ref=capture_input
                        disabled=uploading
                        on:change=move |ev| on_pick(FileRole::Capture, ev)
                    />
                </label>
                <label class="file-picker">
                    <span>"Metadata (" {METADATA_EXTENSION} ")"</span>
                    <input
                        type="file"
                        accept=METADATA_EXTENSION
                        node_ref=metadata_input
                        disabled=uploading
                        on:change=move |ev| on_pick(FileRole::Metadata, ev)
                    />
                </label>
            </div>
            <div class="upload-options">
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || state.config.with(|c| c.airview)
                        on:change=on_airview
                    />
                    "AirVIEW detection"
                </label>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || state.config.with(|c| c.statistics)
                        on:change=on_statistics
                    />
                    "Statistics"
                </label>
            </div>
            <div class="file-actions">
                <button class="primary" disabled=move || !can_upload() on:click=on_upload>
                    "Upload"
                </button>
                <button disabled=uploading on:click=on_clear>"Clear"</button>
            </div>
            <StatusLine status=status />
        </div>
    }
}
