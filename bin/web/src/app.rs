//! Main Leptos application component and routing.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Route, Router, Routes},
    hooks::use_navigate,
    path,
};
use vetdesk_access::AccessConfig;

use crate::auth::{provide_auth, use_auth};
use crate::components::Authorized;
use crate::pages::{HomePage, LoginPage, RegisterPage, Section, SectionPage, UnauthorizedPage};

/// The main application component.
///
/// Reads the [`AccessConfig`] from the context, falling back to defaults.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = use_context::<AccessConfig>().unwrap_or_default();
    if let Err(report) = provide_auth(config) {
        tracing::error!(error = %report, "failed to set up the session store");
        return view! {
            <Title text="vetdesk"/>
            <main class="container">
                <p class="error">"vetdesk is misconfigured; check the API base URL."</p>
            </main>
        }
        .into_any();
    }

    view! {
        <Title text="vetdesk"/>
        <Router>
            <Header/>
            <main class="container">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/login") view=LoginPage/>
                    <Route path=path!("/register") view=RegisterPage/>
                    <Route path=path!("/unauthorized") view=UnauthorizedPage/>
                    <Route path=path!("/users") view=|| view! { <SectionPage section=Section::Users/> }/>
                    <Route path=path!("/pets") view=|| view! { <SectionPage section=Section::Pets/> }/>
                    <Route
                        path=path!("/appointments")
                        view=|| view! { <SectionPage section=Section::Appointments/> }
                    />
                    <Route
                        path=path!("/veterinaries")
                        view=|| view! { <SectionPage section=Section::Veterinaries/> }
                    />
                    <Route
                        path=path!("/permissions")
                        view=|| view! { <SectionPage section=Section::Permissions/> }
                    />
                    <Route path=path!("/logs") view=|| view! { <SectionPage section=Section::Logs/> }/>
                </Routes>
            </main>
        </Router>
    }
    .into_any()
}

/// Header with the section navigation and the user menu.
#[component]
fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <div class="header-left">
                <a href="/" class="logo">"vetdesk"</a>
                <nav class="nav">
                    {Section::ALL
                        .into_iter()
                        .map(|section| view! {
                            <Authorized requirement=section.requirement()>
                                <a href=section.path()>{section.title()}</a>
                            </Authorized>
                        })
                        .collect_view()}
                </nav>
            </div>
            <div class="header-right">
                <Authorized fallback=|| view! { <a href="/login" class="login-button">"Log in"</a> }>
                    <UserMenu/>
                </Authorized>
            </div>
        </header>
    }
}

/// Name of the logged-in user and the logout button.
#[component]
fn UserMenu() -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let navigate = use_navigate();
    let login_path = auth.config().login_path().to_string();

    let display_name = move || {
        session.with(|session| {
            session
                .identity()
                .map(|identity| identity.name().to_string())
                .unwrap_or_default()
        })
    };

    let on_logout = move |_| {
        let auth = auth.clone();
        let navigate = navigate.clone();
        let login_path = login_path.clone();
        spawn_local(async move {
            auth.logout().await;
            navigate(&login_path, Default::default());
        });
    };

    view! {
        <div class="user-menu">
            <span class="user-name">{display_name}</span>
            <button class="logout-button" on:click=on_logout>"Log out"</button>
        </div>
    }
}
