use leptos::prelude::*;
use sigscope_core::annotation::{Annotation, Corners};
use sigscope_core::format::{format_frequency, format_seconds};
use sigscope_core::tabs::TabId;

use crate::actions;
use crate::state::AppState;

/// Cursor readout, the create form and the annotation table.
#[component]
pub fn AnnotationsPanel(tab: TabId) -> impl IntoView {
    let state = expect_context::<AppState>();
    let label = RwSignal::new(String::new());
    let comment = RwSignal::new(String::new());
    let expanded: RwSignal<Option<String>> = RwSignal::new(None);

    // Corners the create button would store right now.
    let preview = move || {
        state
            .with_session(tab, |s| {
                let mapper = s.mapper();
                let [f1, f2] = s.cursors().frequencies(&mapper);
                let [t1, t2] = s.cursors().times(&mapper);
                match (f1, f2, t1, t2) {
                    (Some(f1), Some(f2), Some(t1), Some(t2)) if mapper.bounds().is_some() => {
                        Some(Corners::from_values(f1, f2, t1, t2))
                    }
                    _ => None,
                }
            })
            .flatten()
    };

    let has_file = move || state.with_session(tab, |s| s.file_id().is_some()).unwrap_or(false);

    let on_create = move |_| {
        let result = state.update_session(tab, |s| {
            s.create_annotation(&label.get_untracked(), &comment.get_untracked())
        });
        match result {
            Some(Ok(request)) => {
                label.set(String::new());
                comment.set(String::new());
                actions::save_annotations(state, tab, request);
            }
            Some(Err(e)) => log::info!("annotation not created: {e}"),
            None => {}
        }
    };

    let on_delete = move |id: String| {
        if let Some(Some(request)) = state.update_session(tab, |s| s.delete_annotation(&id)) {
            actions::save_annotations(state, tab, request);
        }
    };

    let rows = move || state.with_session(tab, |s| s.annotations().to_vec()).unwrap_or_default();

    view! {
        <div class="annotations-panel">
            <div class="panel-title">"Annotations"</div>
            <label class="setting-row">
                <input
                    type="checkbox"
                    prop:checked=move || state.with_session(tab, |s| s.show_cursors()).unwrap_or(true)
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        state.update_session(tab, |s| s.set_show_cursors(checked));
                    }
                />
                "Show cursors"
            </label>
            <div class="cursor-readout">
                {move || match preview() {
                    Some(c) => view! {
                        <div>"Frequency: " {format_frequency(Some(c.freq1))} " – " {format_frequency(Some(c.freq2))}
                            " (" {format_frequency(Some(c.bandwidth()))} ")"</div>
                        <div>"Time: " {format_seconds(Some(c.time1))} " s – " {format_seconds(Some(c.time2))} " s"</div>
                    }.into_any(),
                    None => view! { <div class="muted">"Load a file to place cursors"</div> }.into_any(),
                }}
            </div>
            <div class="annotation-form">
                <input
                    type="text"
                    placeholder="Label"
                    prop:value=move || label.get()
                    on:input=move |ev| label.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="Comment"
                    prop:value=move || comment.get()
                    on:input=move |ev| comment.set(event_target_value(&ev))
                ></textarea>
                <button class="primary" disabled=move || !has_file() on:click=on_create>
                    "Create Annotation"
                </button>
            </div>
            <table class="annotation-table">
                <thead>
                    <tr>
                        <th>"Show"</th>
                        <th>"Label"</th>
                        <th>"Frequency"</th>
                        <th>"Time (s)"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || rows().into_iter().map(|a| annotation_row(a, tab, expanded, on_delete)).collect_view()}
                </tbody>
            </table>
        </div>
    }
}

fn annotation_row(
    a: Annotation,
    tab: TabId,
    expanded: RwSignal<Option<String>>,
    on_delete: impl Fn(String) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let c = a.corners.normalized();
    let id = a.id.clone();
    let toggle_id = a.id.clone();
    let expand_id = a.id.clone();
    let is_open = {
        let id = a.id.clone();
        move || expanded.with(|e| e.as_deref() == Some(id.as_str()))
    };
    let has_comment = !a.comment.is_empty();
    let comment = a.comment.clone();

    view! {
        <tr>
            <td>
                <input
                    type="checkbox"
                    prop:checked=a.display
                    on:change=move |ev| {
                        let checked = event_target_checked(&ev);
                        state.update_session(tab, |s| s.toggle_annotation(&toggle_id, checked));
                    }
                />
            </td>
            <td
                class="annotation-label"
                class:expandable=has_comment
                on:click=move |_| {
                    if has_comment {
                        let id = expand_id.clone();
                        expanded.update(|e| *e = if e.as_ref() == Some(&id) { None } else { Some(id) });
                    }
                }
            >
                {a.label.clone()}
                <Show when=is_open.clone()>
                    <div class="annotation-comment">{comment.clone()}</div>
                </Show>
            </td>
            <td>{format_frequency(Some(c.freq1))} " – " {format_frequency(Some(c.freq2))}</td>
            <td>{format_seconds(Some(c.time1))} " – " {format_seconds(Some(c.time2))}</td>
            <td>
                <button class="danger small" title="Delete" on:click=move |_| on_delete(id.clone())>"Delete"</button>
            </td>
        </tr>
    }
}
