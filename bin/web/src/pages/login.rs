//! Email and password login.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use vetdesk_access::{AuthOutcome, return_target};

use crate::auth::use_auth;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let query = use_query_map();
    let navigate = use_navigate();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let auth = auth.clone();
        let navigate = navigate.clone();
        let target = return_target(query.with_untracked(|q| q.get("from")).as_deref());
        let email = email.get_untracked();
        let password = password.get_untracked();

        spawn_local(async move {
            if let AuthOutcome::Success(_) = auth.login(&email, &password).await {
                set_password.set(String::new());
                navigate(&target, Default::default());
            }
        });
    };

    view! {
        <div class="login-page">
            <form class="login-box" on:submit=on_submit>
                <h1>"Log in to vetdesk"</h1>
                {move || {
                    session.with(|session| {
                        session
                            .last_error()
                            .map(|message| view! { <p class="error">{message.to_string()}</p> })
                    })
                }}
                <label>
                    "Email"
                    <input
                        type="email"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>
                <button
                    type="submit"
                    class="login-button"
                    disabled=move || session.with(|session| session.is_loading())
                >
                    "Log in"
                </button>
                <p>"No account yet? " <a href="/register">"Register"</a></p>
            </form>
        </div>
    }
}
