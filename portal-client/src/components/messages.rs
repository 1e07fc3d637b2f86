use leptos::*;

#[component]
pub fn ErrorMessage(cx: Scope, error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error
            .get()
            .map(|message| view! { cx, <p class="text-danger">{message}</p> })
    }
}

#[component]
pub fn LoadingMessage(cx: Scope, loading: Signal<bool>, text: &'static str) -> impl IntoView {
    move || {
        loading
            .get()
            .then(|| view! { cx, <p class="text-muted">{text}</p> })
    }
}
