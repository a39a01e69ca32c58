use leptos::prelude::*;
use sigscope_core::tabs::TabId;

use crate::actions;
use crate::components::annotations_panel::AnnotationsPanel;
use crate::components::file_handle::FileHandle;
use crate::components::generate::{GenerateButton, GeneratePopup};
use crate::components::plot_view::PlotView;
use crate::components::saved_files::SavedFiles;
use crate::components::statistics::Statistics;
use crate::components::tab_bar::TabBar;
use crate::config::AppConfig;
use crate::state::AppState;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let state = AppState::new(config);
    provide_context(state);
    actions::refresh_files(state);

    view! {
        <div class="app">
            <header class="app-header">
                <span class="app-title">"sigscope"</span>
                <GenerateButton />
            </header>
            <div class="app-body">
                <SavedFiles />
                <MainArea />
            </div>
            <GeneratePopup />
        </div>
    }
}

#[component]
fn MainArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let tab_ids = move || state.workspace.with(|ws| ws.ids());

    view! {
        <div class="main">
            <TabBar />
            // Panels stay mounted while hidden so picked files survive tab switches.
            <For
                each=tab_ids
                key=|id| *id
                children=move |id| view! { <TabPanel tab=id /> }
            />
            <Show when=move || state.workspace.with(|ws| ws.is_empty())>
                <div class="empty-state">"No open tabs"</div>
            </Show>
        </div>
    }
}

#[component]
fn TabPanel(tab: TabId) -> impl IntoView {
    let state = expect_context::<AppState>();
    let is_active = move || state.workspace.with(|ws| ws.active_id() == Some(tab));

    view! {
        <div class="tab-panel" style:display=move || if is_active() { "flex" } else { "none" }>
            <FileHandle tab=tab />
            <div class="tab-panel-body">
                <PlotView tab=tab />
                <div class="tab-panel-side">
                    <AnnotationsPanel tab=tab />
                    <Statistics tab=tab />
                </div>
            </div>
        </div>
    }
}
