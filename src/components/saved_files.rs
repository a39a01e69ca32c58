use leptos::prelude::*;
use sigscope_core::library::{self, SavedFile};

use crate::actions;
use crate::browser;
use crate::components::status_line::StatusLine;
use crate::state::AppState;

/// Backend file library: search, load into the active tab, rename, delete.
#[component]
pub fn SavedFiles() -> impl IntoView {
    let state = expect_context::<AppState>();
    let search = RwSignal::new(String::new());
    let renaming: RwSignal<Option<String>> = RwSignal::new(None);

    let visible = move || {
        let needle = search.get();
        state.saved_files.with(|files| {
            library::filter(files, &needle).into_iter().cloned().collect::<Vec<_>>()
        })
    };

    let load = move |id: String| {
        let tab = state.workspace.with_untracked(|ws| ws.active_id());
        let tab = match tab {
            Some(tab) => tab,
            None => {
                let mut added = None;
                state.workspace.update(|ws| added = Some(ws.add_tab()));
                let Some(tab) = added else { return };
                tab
            }
        };
        actions::load(state, tab, id);
    };

    // Enter and the blur that follows both land here; only the first counts.
    let commit_rename = move |file: SavedFile, value: String| {
        if renaming.get_untracked().as_deref() != Some(file.id.as_str()) {
            return;
        }
        renaming.set(None);
        if let Some(name) = library::validate_rename(&file, &value) {
            actions::rename_file(state, file.id, name);
        }
    };

    let on_clear_all = move |_| {
        if browser::confirm("Delete all saved files from the server?") {
            actions::clear_all_files(state);
        }
    };

    view! {
        <aside class="saved-files">
            <div class="panel-title">"Saved Files"</div>
            <input
                type="search"
                class="saved-files-search"
                placeholder="Search files"
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            <ul class="saved-files-list">
                {move || {
                    let files = visible();
                    if files.is_empty() {
                        return view! { <li class="muted">"No files found."</li> }.into_any();
                    }
                    files.into_iter().map(|file| {
                        let id = file.id.clone();
                        let editing = {
                            let id = id.clone();
                            move || renaming.get().as_deref() == Some(id.as_str())
                        };
                        let row_file = file.clone();
                        let delete_id = id.clone();
                        let delete_name = file.filename.clone();
                        view! {
                            <li class="saved-file">
                                {move || if editing() {
                                    let on_blur_file = row_file.clone();
                                    let on_key_file = row_file.clone();
                                    view! {
                                        <input
                                            class="saved-file-rename"
                                            prop:value=row_file.filename.clone()
                                            autofocus
                                            on:blur=move |ev| commit_rename(on_blur_file.clone(), event_target_value(&ev))
                                            on:keydown=move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                                                "Enter" => commit_rename(on_key_file.clone(), event_target_value(&ev)),
                                                "Escape" => renaming.set(None),
                                                _ => {}
                                            }
                                        />
                                    }.into_any()
                                } else {
                                    let load_id = row_file.id.clone();
                                    view! {
                                        <span
                                            class="saved-file-name"
                                            title="Open in current tab"
                                            on:click=move |_| load(load_id.clone())
                                        >{row_file.filename.clone()}</span>
                                    }.into_any()
                                }}
                                <button
                                    class="small"
                                    title="Rename"
                                    on:click={
                                        let id = id.clone();
                                        move |_| renaming.set(Some(id.clone()))
                                    }
                                >"Rename"</button>
                                <button
                                    class="danger small"
                                    title="Delete"
                                    on:click=move |_| {
                                        let msg = format!("Delete {}?", delete_name);
                                        if browser::confirm(&msg) {
                                            actions::delete_file(state, delete_id.clone());
                                        }
                                    }
                                >"Delete"</button>
                            </li>
                        }
                    }).collect_view().into_any()
                }}
            </ul>
            <div class="file-actions">
                <button on:click=move |_| actions::refresh_files(state)>"Refresh"</button>
                <button class="danger" on:click=on_clear_all>"Clear All"</button>
            </div>
            <StatusLine status=state.library_status />
        </aside>
    }
}
