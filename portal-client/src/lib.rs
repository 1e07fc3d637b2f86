//! Browser client of the account portal
#![allow(async_fn_in_trait)]

pub mod api;
mod components;
pub mod form;
mod pages;
pub mod session;

use leptos::*;
use leptos_router::*;

use crate::{
    api::HttpAuthApi,
    components::nav::NavBar,
    pages::{dashboard::Dashboard, home::Home, login::Login, register::Register, Page},
    session::BrowserSession,
};

#[component]
pub fn App(cx: Scope) -> impl IntoView {
    let api = HttpAuthApi::default();
    let session = BrowserSession::default();
    let user_info = create_rw_signal(cx, session.user_info());
    view! { cx,
        <Router>
            <NavBar session user_info/>
            <main>
                <Routes>
                    <Route
                        path=Page::Home.path()
                        view=move |cx| view! { cx, <Home user_info/> }
                    />
                    <Route
                        path=Page::Login.path()
                        view=move |cx| view! { cx, <Login api session user_info/> }
                    />
                    <Route
                        path=Page::Register.path()
                        view=move |cx| view! { cx, <Register api session/> }
                    />
                    <Route
                        path=Page::Dashboard.path()
                        view=move |cx| view! { cx, <Dashboard api session user_info/> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
