use leptos::*;
use leptos_router::*;
use portal_common::UserInfo;

use crate::{
    api::HttpAuthApi, components::messages::ErrorMessage, pages::Page, session::BrowserSession,
};

/// Landing page of a signed in user. The profile is read from the API so the server validates the
/// stored token.
#[component]
pub fn Dashboard(
    cx: Scope,
    api: HttpAuthApi,
    session: BrowserSession,
    user_info: RwSignal<UserInfo>,
) -> impl IntoView {
    let location = use_location(cx);
    let profile = create_local_resource(
        cx,
        move || user_info.with(UserInfo::is_guest),
        move |is_guest| async move {
            let token = session.token().filter(|_| !is_guest)?;
            let result = api.authorized(token).current_user().await;
            Some(result.map_err(|error| {
                log::error!("Unable to read the current user. {error}");
                error.user_message()
            }))
        },
    );
    let redirect = move || match user_info.with(UserInfo::dashboard_path) {
        None => Some(Page::Login.path().to_owned()),
        Some(own) if own != location.pathname.get() => Some(own),
        Some(_) => None,
    };
    let title = move || {
        user_info.with(|info| {
            info.role
                .map(|role| format!("{role} dashboard"))
                .unwrap_or_default()
        })
    };
    view! { cx,
        {move || redirect().map(|path| view! { cx, <Redirect path/> })}
        <h2>{title}</h2>
        {move || match profile.read(cx) {
            Some(Some(Ok(profile))) => {
                view! { cx,
                    <dl>
                        <dt>"Name"</dt>
                        <dd>{profile.name}</dd>
                        <dt>"Email"</dt>
                        <dd>{profile.email}</dd>
                    </dl>
                }
                    .into_view(cx)
            }
            Some(Some(Err(message))) => {
                let error = Signal::derive(cx, move || Some(message.clone()));
                view! { cx, <ErrorMessage error/> }.into_view(cx)
            }
            _ => view! { cx, <p class="text-muted">"Loading..."</p> }.into_view(cx),
        }}
    }
}
