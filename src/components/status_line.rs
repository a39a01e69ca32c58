use leptos::prelude::*;
use sigscope_core::session::Status;

/// Status text; busy statuses get an animated ellipsis.
#[component]
pub fn StatusLine(#[prop(into)] status: Signal<Option<Status>>) -> impl IntoView {
    move || {
        status.get().map(|Status { text, busy }| {
            view! {
                <div class="status-line" class:busy=busy>
                    {text}
                    {busy.then(|| view! {
                        <span class="ellipsis"><span>"."</span><span>"."</span><span>"."</span></span>
                    })}
                </div>
            }
        })
    }
}
