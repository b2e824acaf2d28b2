//! Top navigation bar for signed-in users.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::guard::LOGIN_PATH;

use crate::state::auth::{AuthContext, greeting};

/// Brand, dashboard link, admin link for admins, greeting and logout.
/// Renders nothing while anonymous.
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state;
    let navigate = use_navigate();

    let on_logout = move |_| {
        auth.session.logout();
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    view! {
        <Show when=move || state.with(|s| s.is_authenticated())>
            <nav class="navbar">
                <div class="navbar__content">
                    <a href="/dashboard" class="navbar__brand">"SecureAuth"</a>
                    <div class="navbar__menu">
                        <a href="/dashboard" class="btn btn-secondary">"Dashboard"</a>
                        <Show when=move || state.with(|s| s.is_admin())>
                            <a href="/admin" class="btn btn-secondary">"Admin Panel"</a>
                        </Show>
                        <div class="navbar__user">
                            <span>{move || state.with(greeting).unwrap_or_default()}</span>
                            <span class="user-role">
                                {move || state.with(|s| s.user().map(|u| u.role.to_string()).unwrap_or_default())}
                            </span>
                            <button class="btn btn-secondary" on:click=on_logout.clone()>"Logout"</button>
                        </div>
                    </div>
                </div>
            </nav>
        </Show>
    }
}
