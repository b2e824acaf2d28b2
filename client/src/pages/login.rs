//! Login page with username + password sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sign-in goes through the shared `AuthSession`; its published error is the
//! banner shown here, so backend detail text surfaces unchanged.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::{AuthContext, should_leave_auth_page};

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Trim the username and require both fields.
pub fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok((username.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state;
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let local_error = RwSignal::new(None::<&'static str>);
    let busy = RwSignal::new(false);

    auth.session.clear_error();

    Effect::new(move || {
        if state.with(should_leave_auth_page) {
            navigate(DASHBOARD_PATH, NavigateOptions::default());
        }
    });

    let session = auth.session.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (name, secret) = match validate_login_input(&username.get(), &password.get()) {
            Ok(input) => input,
            Err(message) => {
                local_error.set(Some(message));
                return;
            }
        };
        local_error.set(None);
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                if let Err(e) = session.login(&name, &secret).await {
                    log::warn!("login failed: {e}");
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&session, name, secret);
        }
    };

    let banner = move || local_error.get().map(str::to_owned).or_else(|| state.with(|s| s.error().map(str::to_owned)));

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h2 class="auth-title">"Sign In"</h2>
                <Show when=move || banner().is_some()>
                    <div class="error-message">{move || banner().unwrap_or_default()}</div>
                </Show>
                <form class="auth-form" on:submit=on_submit>
                    <label class="form-label" for="username">"Username"</label>
                    <input
                        id="username"
                        class="form-input"
                        type="text"
                        placeholder="Enter your username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <label class="form-label" for="password">"Password"</label>
                    <input
                        id="password"
                        class="form-input"
                        type="password"
                        placeholder="Enter your password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="btn btn-primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <p class="auth-link">"Don't have an account? " <a href="/register">"Sign up"</a></p>
            </div>
        </div>
    }
}
