//! Backend round trips started from the UI.
//!
//! Each function spawns its request and applies the reply to the session of
//! the tab that asked, through that session's request ticket.

use sigscope_client::UploadFile;
use sigscope_core::api::SaveFileRequest;
use sigscope_core::library;
use sigscope_core::session::{
    PlotKind, RequestTicket, Status, MSG_DELETED, MSG_SAVE_FAILED, MSG_UPLOAD_FAILED,
};
use sigscope_core::tabs::TabId;
use wasm_bindgen_futures::spawn_local;

use crate::browser;
use crate::state::AppState;
use leptos::prelude::{GetUntracked, Set, Update, WithUntracked};

pub fn upload(state: AppState, tab: TabId, capture: web_sys::File, metadata: web_sys::File) {
    let Some(Ok(ticket)) = state.update_session(tab, |s| s.begin_upload()) else { return };
    let options = state.config.with_untracked(|c| c.upload_options());
    let client = state.client();

    spawn_local(async move {
        let files = match (browser::read_file(&capture).await, browser::read_file(&metadata).await) {
            (Ok(c), Ok(m)) => (UploadFile::new(capture.name(), c), UploadFile::new(metadata.name(), m)),
            (Err(e), _) | (_, Err(e)) => {
                log::error!("{e}");
                state.update_session(tab, |s| s.fail(&ticket, MSG_UPLOAD_FAILED));
                return;
            }
        };
        let capture_name = files.0.name.clone();
        match client.upload(files.0, files.1, &options).await {
            Ok(reply) => {
                let Some(next) = state.update_session(tab, |s| s.apply_upload(&ticket, reply)).flatten()
                else {
                    return;
                };
                if let Some(id) = next.file_id() {
                    state.saved_files.update(|files| library::push_uploaded(files, id, &capture_name));
                }
                let rest: Vec<PlotKind> =
                    PlotKind::ALL.into_iter().filter(|k| *k != PlotKind::Spectrogram).collect();
                fetch_plots(state, tab, next, &rest);
            }
            Err(e) => {
                log::error!("upload failed: {e}");
                let message = e.user_message(MSG_UPLOAD_FAILED);
                state.update_session(tab, |s| s.fail(&ticket, &message));
            }
        }
    });
}

/// Open a stored file in `tab`: bounds and annotations plus every plot.
pub fn load(state: AppState, tab: TabId, file_id: String) {
    let Some(ticket) = state.update_session(tab, |s| s.begin_load(&file_id)) else { return };
    let client = state.client();
    let data_ticket = ticket.clone();
    spawn_local(async move {
        match client.file_data(&file_id).await {
            Ok(reply) => {
                state.update_session(tab, |s| s.apply_file_data(&data_ticket, reply));
            }
            Err(e) => {
                log::error!("file data for {file_id} failed: {e}");
                let message = e.user_message("Failed to load file.");
                state.update_session(tab, |s| s.fail(&data_ticket, &message));
            }
        }
    });
    fetch_plots(state, tab, ticket, &PlotKind::ALL);
}

fn fetch_plots(state: AppState, tab: TabId, ticket: RequestTicket, kinds: &[PlotKind]) {
    let Some(file_id) = ticket.file_id().map(str::to_string) else { return };
    for &kind in kinds {
        let client = state.client();
        let ticket = ticket.clone();
        let file_id = file_id.clone();
        spawn_local(async move {
            match client.plot(&file_id, kind).await {
                Ok(image) => {
                    state.update_session(tab, |s| s.apply_plot(&ticket, kind, image));
                }
                Err(e) => log::warn!("{} plot for {file_id} failed: {e}", kind.as_str()),
            }
        });
    }
}

/// Push the full annotation list. The local change stays even on failure.
pub fn save_annotations(state: AppState, tab: TabId, request: SaveFileRequest) {
    let Some(Some(ticket)) = state.with_session_untracked(tab, |s| s.current_ticket()) else {
        return;
    };
    let client = state.client();
    spawn_local(async move {
        match client.save_annotations(&request).await {
            Ok(reply) => {
                if let Some(msg) = reply.message {
                    log::info!("{msg}");
                }
            }
            Err(e) => {
                log::error!("save-file failed: {e}");
                let status = Status::idle(e.user_message(MSG_SAVE_FAILED));
                state.update_session(tab, |s| s.report(&ticket, status));
            }
        }
    });
}

pub fn refresh_files(state: AppState) {
    let client = state.client();
    spawn_local(async move {
        match client.files().await {
            Ok(files) => state.saved_files.set(files),
            Err(e) => {
                log::error!("listing files failed: {e}");
                state.set_library_status(Status::idle(e.user_message("Failed to fetch saved files.")));
            }
        }
    });
}

pub fn delete_file(state: AppState, file_id: String) {
    let client = state.client();
    spawn_local(async move {
        match client.delete_file(&file_id).await {
            Ok(_) => {
                state.saved_files.update(|files| {
                    library::remove(files, &file_id);
                });
                state.workspace.update(|ws| {
                    ws.file_deleted(&file_id);
                });
                state.set_library_status(Status::idle(MSG_DELETED));
            }
            Err(e) => {
                log::error!("delete {file_id} failed: {e}");
                state.set_library_status(Status::idle(e.user_message("Failed to delete file.")));
            }
        }
    });
}

pub fn rename_file(state: AppState, file_id: String, filename: String) {
    let client = state.client();
    spawn_local(async move {
        match client.rename_file(&file_id, &filename).await {
            Ok(_) => state.saved_files.update(|files| {
                library::apply_rename(files, &file_id, &filename);
            }),
            Err(e) => {
                log::error!("rename {file_id} failed: {e}");
                state.set_library_status(Status::idle(e.user_message("Failed to rename file.")));
            }
        }
    });
}

/// Drop every stored file on the backend and reset tabs that showed one.
pub fn clear_all_files(state: AppState) {
    state.set_library_status(Status::busy("Clearing all saved files"));
    let client = state.client();
    spawn_local(async move {
        match client.refresh().await {
            Ok(reply) => {
                let ids: Vec<String> =
                    state.saved_files.get_untracked().into_iter().map(|f| f.id).collect();
                state.workspace.update(|ws| {
                    for id in &ids {
                        ws.file_deleted(id);
                    }
                });
                state.saved_files.set(Vec::new());
                let text = reply.message.unwrap_or_else(|| "All saved files cleared.".to_string());
                state.set_library_status(Status::idle(text));
            }
            Err(e) => {
                log::error!("refresh failed: {e}");
                state.set_library_status(Status::idle(e.user_message("Failed to clear saved files.")));
            }
        }
    });
}
