use leptos::*;

/// Labelled input bound to a form field. `on_edit` receives the name of the input with its new
/// value.
#[component]
pub fn TextField<F>(
    cx: Scope,
    label: &'static str,
    name: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    value: Signal<String>,
    disabled: Signal<bool>,
    on_edit: F,
) -> impl IntoView
where
    F: Fn(&'static str, String) + 'static,
{
    view! { cx,
        <div class="form-group">
            <label for=name>{label}</label>
            <input
                class="form-control"
                type=input_type
                id=name
                name=name
                required=true
                prop:value=move || value.get()
                prop:disabled=move || disabled.get()
                on:input=move |ev| on_edit(name, event_target_value(&ev))
            />
        </div>
    }
}
