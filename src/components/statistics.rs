use leptos::prelude::*;
use sigscope_core::metadata::SigmfMetadata;
use sigscope_core::tabs::TabId;
use wasm_bindgen_futures::spawn_local;

use crate::state::AppState;

#[derive(Clone, Copy, PartialEq)]
enum Analysis {
    AirView,
    Statistics,
}

/// SigMF metadata of the loaded file plus on-demand backend analyses.
#[component]
pub fn Statistics(tab: TabId) -> impl IntoView {
    let state = expect_context::<AppState>();
    let metadata: RwSignal<Option<SigmfMetadata>> = RwSignal::new(None);
    let analysis: RwSignal<Option<(Analysis, String)>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let file_id = Memo::new(move |_| state.with_session(tab, |s| s.file_id().map(str::to_string)).flatten());
    let still_loaded = move |id: &str| file_id.get_untracked().as_deref() == Some(id);

    Effect::new(move || {
        metadata.set(None);
        analysis.set(None);
        error.set(None);
        let Some(id) = file_id.get() else { return };
        let client = state.client();
        spawn_local(async move {
            let result = client.metadata(&id).await;
            if !still_loaded(&id) {
                return;
            }
            match result {
                Ok(meta) => metadata.set(Some(meta)),
                Err(e) => {
                    log::warn!("metadata for {id} failed: {e}");
                    error.set(Some(e.user_message("Failed to load metadata.")));
                }
            }
        });
    });

    let run_analysis = move |kind: Analysis| {
        let Some(id) = file_id.get_untracked() else { return };
        let client = state.client();
        error.set(None);
        spawn_local(async move {
            let result = match kind {
                Analysis::AirView => client.airview(&id).await,
                Analysis::Statistics => client.calculated_statistics(&id).await,
            };
            if !still_loaded(&id) {
                return;
            }
            match result.map(|v| serde_json::to_string_pretty(&v)) {
                Ok(Ok(text)) => analysis.set(Some((kind, text))),
                Ok(Err(e)) => log::error!("{e}"),
                Err(e) => error.set(Some(e.user_message("Analysis request failed."))),
            }
        });
    };

    view! {
        <div class="statistics-panel">
            <div class="panel-title">"Metadata"</div>
            {move || metadata.get().map(|meta| {
                meta.sections().into_iter().map(|section| view! {
                    <div class="setting-group">
                        <div class="setting-group-title">{section.title}</div>
                        {section.items.into_iter().map(|(label, value)| view! {
                            <div class="setting-row">
                                <span class="setting-label">{label}</span>
                                <span class="setting-value">{value}</span>
                            </div>
                        }).collect_view()}
                    </div>
                }).collect_view()
            })}
            <div class="file-actions">
                <button
                    disabled=move || file_id.get().is_none()
                    on:click=move |_| run_analysis(Analysis::AirView)
                >"AirVIEW"</button>
                <button
                    disabled=move || file_id.get().is_none()
                    on:click=move |_| run_analysis(Analysis::Statistics)
                >"Calculated Statistics"</button>
            </div>
            {move || error.get().map(|e| view! { <div class="status-line error">{e}</div> })}
            {move || analysis.get().map(|(kind, text)| view! {
                <div class="analysis-output">
                    <div class="setting-group-title">
                        {match kind {
                            Analysis::AirView => "AirVIEW",
                            Analysis::Statistics => "Calculated Statistics",
                        }}
                    </div>
                    <pre>{text}</pre>
                </div>
            })}
        </div>
    }
}
