use leptos::prelude::*;
use sigscope_core::generate::{GenerateField, GenerateForm, GenerateParams, PlacementMethod};
use wasm_bindgen_futures::spawn_local;

use crate::browser;
use crate::state::AppState;

#[component]
pub fn GenerateButton() -> impl IntoView {
    let state = expect_context::<AppState>();
    view! {
        <button class="primary" on:click=move |_| state.generate_open.update(|o| *o = !*o)>
            "Generate Data"
        </button>
    }
}

#[derive(Clone)]
struct GeneratedData {
    params: GenerateParams,
    plot: Option<String>,
    csv: Option<String>,
}

/// Synthetic dataset form with the resulting plot and CSV download.
#[component]
pub fn GeneratePopup() -> impl IntoView {
    let state = expect_context::<AppState>();
    let form = RwSignal::new(GenerateForm::default());
    let result: RwSignal<Option<GeneratedData>> = RwSignal::new(None);
    let message: RwSignal<Option<String>> = RwSignal::new(None);
    let busy = RwSignal::new(false);

    let on_generate = move |_| {
        let params = match form.with_untracked(|f| f.validate()) {
            Ok(p) => p,
            Err(e) => {
                message.set(Some(e.to_string()));
                return;
            }
        };
        message.set(None);
        result.set(None);
        busy.set(true);
        let client = state.client();
        spawn_local(async move {
            match client.generate(&params).await {
                Ok(reply) => result.set(Some(GeneratedData { params, plot: reply.plot, csv: reply.csv })),
                Err(e) => {
                    log::error!("generate failed: {e}");
                    message.set(Some(e.user_message("Failed to generate data.")));
                }
            }
            busy.set(false);
        });
    };

    let on_download = move |_| {
        let Some(data) = result.get_untracked() else { return };
        let Some(csv) = data.csv else { return };
        let name = data.params.csv_download_name(browser::now_ms());
        if let Err(e) = browser::download_text(&name, &csv, "text/csv") {
            log::error!("{e}");
        }
    };

    view! {
        <Show when=move || state.generate_open.get()>
            <div class="popup-backdrop">
                <div class="popup">
                    <div class="popup-header">
                        <span class="panel-title">"Generate Data"</span>
                        <button class="small" on:click=move |_| state.generate_open.set(false)>"×"</button>
                    </div>
                    <div class="generate-form">
                        {GenerateField::ALL.into_iter().map(|field| view! {
                            <label class="setting-row">
                                <span class="setting-label">{field.label()}</span>
                                <input
                                    type="number"
                                    value=form.with_untracked(|f| f.get(field).map(|v| v.to_string()).unwrap_or_default())
                                    on:input=move |ev| {
                                        let text = event_target_value(&ev);
                                        form.update(|f| f.set_text(field, &text));
                                    }
                                />
                            </label>
                        }).collect_view()}
                        <label class="setting-row">
                            <span class="setting-label">"Placement Method"</span>
                            <select
                                on:change=move |ev| {
                                    if let Ok(method) = event_target_value(&ev).parse::<PlacementMethod>() {
                                        form.update(|f| f.placement = method);
                                    }
                                }
                            >
                                {PlacementMethod::ALL.into_iter().map(|m| view! {
                                    <option
                                        value=m.as_str()
                                        selected=move || form.with(|f| f.placement == m)
                                    >{m.label()}</option>
                                }).collect_view()}
                            </select>
                        </label>
                    </div>
                    <div class="file-actions">
                        <button class="primary" disabled=move || busy.get() on:click=on_generate>
                            {move || if busy.get() { "Generating..." } else { "Generate" }}
                        </button>
                        <button
                            disabled=move || result.with(|r| r.as_ref().and_then(|d| d.csv.as_ref()).is_none())
                            on:click=on_download
                        >"Download CSV"</button>
                    </div>
                    {move || message.get().map(|m| view! { <div class="status-line error">{m}</div> })}
                    {move || result.get().and_then(|d| d.plot).map(|b64| view! {
                        <img class="generate-plot" src=format!("data:image/png;base64,{b64}") alt="Generated data" />
                    })}
                </div>
            </div>
        </Show>
    }
}
