use leptos::prelude::*;
use sigscope_core::tabs::TabId;

use crate::state::AppState;

#[component]
pub fn TabBar() -> impl IntoView {
    let state = expect_context::<AppState>();
    // Tab whose label is being edited.
    let editing: RwSignal<Option<TabId>> = RwSignal::new(None);

    let tab_ids = Memo::new(move |_| state.workspace.with(|ws| ws.ids()));

    view! {
        <div class="tab-bar">
            <For
                each=move || tab_ids.get()
                key=|id| *id
                children=move |id| view! { <TabButton id=id editing=editing /> }
            />
            <button
                class="tab-add"
                on:click=move |_| {
                    state.workspace.update(|ws| {
                        ws.add_tab();
                    });
                }
            >"Add Tab"</button>
        </div>
    }
}

#[component]
fn TabButton(id: TabId, editing: RwSignal<Option<TabId>>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let label = Memo::new(move |_| {
        state.workspace.with(|ws| ws.tab(id).map(|t| t.label.clone()).unwrap_or_default())
    });
    let active = Memo::new(move |_| state.workspace.with(|ws| ws.active_id() == Some(id)));
    let is_editing = Memo::new(move |_| editing.get() == Some(id));

    let commit = move |value: String| {
        if !is_editing.get_untracked() {
            return;
        }
        state.workspace.update(|ws| {
            ws.rename_tab(id, &value);
        });
        editing.set(None);
    };

    view! {
        <div
            class="tab"
            class:active=move || active.get()
            on:click=move |_| {
                state.workspace.update(|ws| {
                    ws.select_tab(id);
                });
            }
            on:dblclick=move |_| editing.set(Some(id))
        >
            {move || if is_editing.get() {
                view! {
                    <input
                        class="tab-rename"
                        prop:value=label.get_untracked()
                        autofocus
                        on:blur=move |ev| commit(event_target_value(&ev))
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            match ev.key().as_str() {
                                "Enter" => commit(event_target_value(&ev)),
                                "Escape" => editing.set(None),
                                _ => {}
                            }
                        }
                    />
                }.into_any()
            } else {
                view! { <span class="tab-label">{move || label.get()}</span> }.into_any()
            }}
            <button
                class="tab-close"
                title="Close tab"
                on:click=move |ev| {
                    ev.stop_propagation();
                    state.workspace.update(|ws| {
                        ws.close_tab(id);
                    });
                }
            >"×"</button>
        </div>
    }
}
