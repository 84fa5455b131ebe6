//! Account registration; a successful registration logs the user in.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use vetdesk_access::RegistrationRequest;

use crate::auth::use_auth;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let navigate = use_navigate();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let auth = auth.clone();
        let navigate = navigate.clone();

        let mut request = RegistrationRequest::new(
            name.get_untracked(),
            email.get_untracked(),
            password.get_untracked(),
        );
        let phone = phone.get_untracked();
        if !phone.trim().is_empty() {
            request = request.with_field("phone", phone.trim());
        }

        spawn_local(async move {
            if auth.register(request).await.is_success() {
                navigate("/", Default::default());
            }
        });
    };

    view! {
        <div class="register-page">
            <form class="login-box" on:submit=on_submit>
                <h1>"Create an account"</h1>
                {move || {
                    session.with(|session| {
                        session
                            .last_error()
                            .map(|message| view! { <p class="error">{message.to_string()}</p> })
                    })
                }}
                <label>
                    "Name"
                    <input
                        type="text"
                        required
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </label>
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
                    "Phone"
                    <input
                        type="tel"
                        prop:value=move || phone.get()
                        on:input=move |ev| set_phone.set(event_target_value(&ev))
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
                    "Register"
                </button>
                <p>"Already registered? " <a href="/login">"Log in"</a></p>
            </form>
        </div>
    }
}
