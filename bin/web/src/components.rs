//! Authorization components shared by the pages.

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;
use vetdesk_access::{
    AccessRequirement, GateDecision, GuardDecision, RenderGate, RouteGuard, login_redirect,
};

use crate::auth::use_auth;

/// Shown while the session is being determined.
#[component]
pub fn LoadingPlaceholder() -> impl IntoView {
    view! {
        <div class="loading" aria-busy="true">
            <p>"Loading..."</p>
        </div>
    }
}

/// Wraps a page that requires a logged-in user.
///
/// Anonymous visitors are redirected to the login view with the requested
/// location attached. Visitors who fail `requirement` are redirected to the
/// unauthorized view, or shown `fallback` when one is given.
#[component]
pub fn ProtectedRoute(
    #[prop(optional)] requirement: AccessRequirement,
    #[prop(optional, into)] fallback: Option<ViewFn>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_auth();
    let session = auth.session();
    let login_path = auth.config().login_path().to_string();
    let unauthorized_path = auth.config().unauthorized_path().to_string();
    let location = use_location();
    let guard = RouteGuard::new(requirement).with_fallback(fallback.is_some());

    move || {
        let here = current_location(&location.pathname.get(), &location.search.get());
        match session.with(|session| guard.evaluate(session, &here)) {
            GuardDecision::Loading => view! { <LoadingPlaceholder/> }.into_any(),
            GuardDecision::RedirectToLogin { from } => {
                view! { <Redirect path=login_redirect(&login_path, &from)/> }.into_any()
            }
            GuardDecision::RedirectUnauthorized => {
                view! { <Redirect path=unauthorized_path.clone()/> }.into_any()
            }
            GuardDecision::Fallback => match &fallback {
                Some(fallback) => fallback.run(),
                None => ().into_any(),
            },
            GuardDecision::Render => children().into_any(),
        }
    }
}

/// Renders its children only for users that satisfy `requirement`.
///
/// Never redirects. Without a logged-in user the fallback (nothing by
/// default) is rendered.
#[component]
pub fn Authorized(
    #[prop(optional)] requirement: AccessRequirement,
    #[prop(optional, into)] fallback: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let session = use_auth().session();
    let gate = RenderGate::new(requirement);

    move || match session.with(|session| gate.evaluate(session.identity())) {
        GateDecision::Show => children().into_any(),
        GateDecision::Fallback => fallback.run(),
    }
}

fn current_location(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{search}")
    }
}
