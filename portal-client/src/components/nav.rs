use leptos::*;
use leptos_router::*;
use portal_common::UserInfo;

use crate::{pages::Page, session::BrowserSession};

#[component]
pub fn NavBar(cx: Scope, session: BrowserSession, user_info: RwSignal<UserInfo>) -> impl IntoView {
    let sign_out = move |_: ev::MouseEvent| {
        session.sign_out();
        user_info.set(UserInfo::guest());
        log::info!("Signed out");
    };
    view! { cx,
        <nav>
            <A href=Page::Home.path()>"Home"</A>
            {move || match user_info.with(UserInfo::dashboard_path) {
                Some(dashboard) => {
                    view! { cx,
                        <A href=dashboard>"Dashboard"</A>
                        <button class="btn btn-link" on:click=sign_out>"Sign out"</button>
                    }
                        .into_view(cx)
                }
                None => {
                    view! { cx,
                        <A href=Page::Login.path()>"Login"</A>
                        <A href=Page::Register.path()>"Register"</A>
                    }
                        .into_view(cx)
                }
            }}
        </nav>
    }
}
