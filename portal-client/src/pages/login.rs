use leptos::*;
use leptos_router::*;
use portal_common::{Credentials, UserInfo};

use crate::{
    api::{AuthApi, HttpAuthApi},
    components::{
        fields::TextField,
        messages::{ErrorMessage, LoadingMessage},
    },
    form::{submit_login, LoginField, LoginForm},
    pages::Page,
    session::{BrowserSession, SessionManager, SessionStore},
};

/// Run a login for the submitted `credentials`. The shared identity is updated before the form
/// flags its redirect so the dashboard mounts with the signed in user.
async fn sign_in<A, S>(
    api: &A,
    session: &SessionManager<S>,
    form: RwSignal<LoginForm>,
    user_info: RwSignal<UserInfo>,
    credentials: Credentials,
) where
    A: AuthApi,
    S: SessionStore,
{
    let result = submit_login(api, session, &credentials, || {
        user_info.set(session.user_info());
        form.update(LoginForm::authenticated);
    })
    .await;
    if let Err(error) = result {
        log::error!("Unable to login with {}: {error}", credentials.email);
        form.update(|f| f.fail(&error));
    }
}

#[component]
pub fn Login(
    cx: Scope,
    api: HttpAuthApi,
    session: BrowserSession,
    user_info: RwSignal<UserInfo>,
) -> impl IntoView {
    let form = create_rw_signal(cx, LoginForm::default());
    let login_action = create_action(cx, move |credentials: &Credentials| {
        let credentials = credentials.clone();
        async move { sign_in(&api, &session, form, user_info, credentials).await }
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
        if let Some(credentials) = request {
            login_action.dispatch(credentials);
        }
    };
    let disabled = Signal::derive(cx, move || form.with(LoginForm::disabled));
    let loading = Signal::derive(cx, move || form.with(LoginForm::loading));
    let error = Signal::derive(cx, move || form.with(|f| f.status.error().map(str::to_owned)));
    view! { cx,
        {move || {
            form.with(|f| f.redirect_target(&session))
                .map(|path| view! { cx, <Redirect path/> })
        }}
        <h3>"Login"</h3>
        <form on:submit=on_submit>
            <TextField
                label="Email"
                name=LoginField::Email.into()
                input_type="email"
                value=Signal::derive(cx, move || form.with(|f| f.email.clone()))
                disabled
                on_edit
            />
            <TextField
                label="Password"
                name=LoginField::Password.into()
                input_type="password"
                value=Signal::derive(cx, move || form.with(|f| f.password.clone()))
                disabled
                on_edit
            />
            <ErrorMessage error/>
            <LoadingMessage loading text="Signing in..."/>
            <input
                class="btn btn-primary"
                type="submit"
                value="Login"
                prop:disabled=move || disabled.get()
            />
        </form>
        <p>"No account yet? " <A href=Page::Register.path()>"Register"</A></p>
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use leptos::*;
    use portal_common::{Role, Session, UserInfo};

    use super::sign_in;
    use crate::{
        api::{self, test::FakeAuthApi},
        form::{LoginField, LoginForm},
        session::{
            test::{claims, token_for},
            MemorySessionStore, SessionManager,
        },
    };

    fn filled_login() -> LoginForm {
        let mut form = LoginForm::default();
        form.set(LoginField::Email, "jane@example.com".to_owned());
        form.set(LoginField::Password, "hunter2".to_owned());
        form
    }

    #[test]
    fn sign_in_should_publish_identity_before_redirect() {
        let runtime = create_runtime();
        let disposer = create_scope(runtime, |cx| {
            let api = FakeAuthApi::with_login(Ok(Session {
                token: token_for(&claims(Role::Admin, 3600)),
                role: Role::Admin,
            }));
            let session = SessionManager::new(MemorySessionStore::default());
            let mut initial = filled_login();
            let credentials = initial.begin_submit().expect("Form should be idle");
            let form = create_rw_signal(cx, initial);
            let user_info = create_rw_signal(cx, UserInfo::guest());
            let seen = Rc::new(RefCell::new(Vec::new()));
            let recorded = Rc::clone(&seen);
            create_effect(cx, move |_| {
                if form.with(|f| f.redirect) {
                    recorded.borrow_mut().push(user_info.get_untracked());
                }
            });

            block_on(sign_in(&api, &session, form, user_info, credentials));

            let seen = seen.borrow();
            assert_eq!(seen.len(), 1);
            assert!(!seen[0].is_guest());
            assert_eq!(seen[0].dashboard_path().as_deref(), Some("/admin/dashboard"));
            assert_eq!(
                form.with(|f| f.redirect_target(&session)).as_deref(),
                Some("/admin/dashboard")
            );
        });
        disposer.dispose();
        runtime.dispose();
    }

    #[test]
    fn sign_in_should_keep_guest_on_failure() {
        let runtime = create_runtime();
        let disposer = create_scope(runtime, |cx| {
            let api = FakeAuthApi::with_login(Err(api::Error::ApiError(
                "Invalid credentials".to_owned(),
            )));
            let session = SessionManager::new(MemorySessionStore::default());
            let mut initial = filled_login();
            let credentials = initial.begin_submit().expect("Form should be idle");
            let form = create_rw_signal(cx, initial);
            let user_info = create_rw_signal(cx, UserInfo::guest());

            block_on(sign_in(&api, &session, form, user_info, credentials));

            assert!(user_info.get_untracked().is_guest());
            assert!(!form.with(|f| f.redirect));
            assert_eq!(
                form.with(|f| f.status.error().map(str::to_owned)).as_deref(),
                Some("Invalid credentials")
            );
        });
        disposer.dispose();
        runtime.dispose();
    }
}
