use leptos::*;
use portal_client::App;

fn main() {
    if let Err(error) = console_log::init_with_level(log::Level::Debug) {
        leptos::error!("Could not initialize logging. {error}");
    }
    console_error_panic_hook::set_once();
    mount_to_body(|cx| view! { cx, <App/> });
}
