//! Shown when a logged-in user lacks a role or permission.

use leptos::prelude::*;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="unauthorized-page">
            <h1>"Access denied"</h1>
            <p>"Your account does not have access to this page."</p>
            <a href="/" class="cta-button">"Back to dashboard"</a>
        </div>
    }
}
