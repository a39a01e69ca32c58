use leptos::prelude::*;
use sigscope_client::ApiClient;
use sigscope_core::library::SavedFile;
use sigscope_core::session::{Session, Status};
use sigscope_core::tabs::{TabId, Workspace};

use crate::config::AppConfig;

#[derive(Clone, Copy)]
pub struct AppState {
    /// Every tab's session; tabs never share file state.
    pub workspace: RwSignal<Workspace>,
    pub saved_files: RwSignal<Vec<SavedFile>>,
    pub library_status: RwSignal<Option<Status>>,
    pub config: RwSignal<AppConfig>,
    pub generate_open: RwSignal<bool>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            workspace: RwSignal::new(Workspace::new()),
            saved_files: RwSignal::new(Vec::new()),
            library_status: RwSignal::new(None),
            config: RwSignal::new(config),
            generate_open: RwSignal::new(false),
        }
    }

    pub fn client(&self) -> ApiClient {
        self.config.with_untracked(|c| ApiClient::new(&c.api_base))
    }

    /// Read one tab's session, tracking the workspace.
    pub fn with_session<R>(&self, tab: TabId, f: impl FnOnce(&Session) -> R) -> Option<R> {
        self.workspace.with(|ws| ws.session(tab).map(f))
    }

    pub fn with_session_untracked<R>(&self, tab: TabId, f: impl FnOnce(&Session) -> R) -> Option<R> {
        self.workspace.with_untracked(|ws| ws.session(tab).map(f))
    }

    /// Mutate one tab's session. `None` if the tab was closed meanwhile.
    pub fn update_session<R>(&self, tab: TabId, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut out = None;
        self.workspace.update(|ws| {
            if let Some(session) = ws.session_mut(tab) {
                out = Some(f(session));
            }
        });
        out
    }

    pub fn set_library_status(&self, status: Status) {
        self.library_status.set(Some(status));
    }
}
