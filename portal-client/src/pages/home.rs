use leptos::*;
use leptos_router::*;
use portal_common::UserInfo;

use crate::pages::Page;

#[component]
pub fn Home(cx: Scope, user_info: RwSignal<UserInfo>) -> impl IntoView {
    view! { cx,
        <h2>"Account Portal"</h2>
        {move || {
            let info = user_info.get();
            match info.dashboard_path() {
                Some(dashboard) => {
                    view! { cx,
                        <p>"You are logged in as " {info.name} "."</p>
                        <A href=dashboard>"Go to your dashboard."</A>
                    }
                        .into_view(cx)
                }
                None => {
                    view! { cx,
                        <p>"You are not logged in."</p>
                        <A href=Page::Login.path()>"Login now."</A>
                    }
                        .into_view(cx)
                }
            }
        }}
    }
}
