use leptos::*;
use leptos_router::*;
use portal_common::Registration;

use crate::{
    api::{AuthApi, HttpAuthApi},
    components::{
        fields::TextField,
        messages::{ErrorMessage, LoadingMessage},
    },
    form::{RegisterField, RegisterForm},
    pages::Page,
    session::BrowserSession,
};

#[component]
pub fn Register(cx: Scope, api: HttpAuthApi, session: BrowserSession) -> impl IntoView {
    let form = create_rw_signal(cx, RegisterForm::default());
    let register_action = create_action(cx, move |registration: &Registration| {
        let registration = registration.clone();
        async move {
            let outcome = api.register(&registration).await;
            match &outcome {
                Ok(profile) => log::info!("Registered {}", profile.email),
                Err(error) => log::error!("Unable to register {}: {error}", registration.email),
            }
            form.update(|f| f.complete(&outcome));
        }
    });
    let on_edit = move |name: &'static str, value: String| {
        form.update(|f| {
            if let Err(error) = f.edit(name, value) {
                log::warn!("{error}");
            }
        });
    };
    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let mut request = None;
        form.update(|f| request = f.begin_submit());
        if let Some(registration) = request {
            register_action.dispatch(registration);
        }
    };
    let disabled = Signal::derive(cx, move || form.with(RegisterForm::disabled));
    let loading = Signal::derive(cx, move || form.with(RegisterForm::loading));
    let error = Signal::derive(cx, move || form.with(|f| f.status.error().map(str::to_owned)));
    view! { cx,
        {move || {
            form.with(|f| f.redirect_target(&session))
                .map(|path| view! { cx, <Redirect path/> })
        }}
        <h3>"Register"</h3>
        {move || {
            form.with(RegisterForm::success)
                .then(|| {
                    view! { cx,
                        <p class="text-success">
                            "Registration successful! "
                            <A href=Page::Login.path()>"Login now."</A>
                        </p>
                    }
                })
        }}
        <form on:submit=on_submit>
            <TextField
                label="Name"
                name=RegisterField::Name.into()
                value=Signal::derive(cx, move || form.with(|f| f.name.clone()))
                disabled
                on_edit
            />
            <TextField
                label="Email"
                name=RegisterField::Email.into()
                input_type="email"
                value=Signal::derive(cx, move || form.with(|f| f.email.clone()))
                disabled
                on_edit
            />
            <TextField
                label="Password"
                name=RegisterField::Password.into()
                input_type="password"
                value=Signal::derive(cx, move || form.with(|f| f.password.clone()))
                disabled
                on_edit
            />
            <ErrorMessage error/>
            <LoadingMessage loading text="Creating your account..."/>
            <input
                class="btn btn-primary"
                type="submit"
                value="Register"
                prop:disabled=move || disabled.get()
            />
        </form>
    }
}
