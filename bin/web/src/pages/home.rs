//! Dashboard shown after logging in.

use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::{Authorized, ProtectedRoute};
use crate::pages::Section;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_auth().session();

    let greeting = move || {
        session.with(|session| {
            session
                .identity()
                .map(|identity| format!("Welcome, {}!", identity.name()))
                .unwrap_or_else(|| "Welcome!".to_string())
        })
    };
    let role = move || {
        session.with(|session| {
            session
                .identity()
                .map(|identity| identity.role().to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <ProtectedRoute>
            <div class="home-page">
                <h1>{greeting}</h1>
                <p class="role-badge">{role}</p>
                <ul class="section-links">
                    {Section::ALL
                        .into_iter()
                        .map(|section| view! {
                            <Authorized requirement=section.requirement()>
                                <li><a href=section.path()>{section.title()}</a></li>
                            </Authorized>
                        })
                        .collect_view()}
                </ul>
            </div>
        </ProtectedRoute>
    }
}
