//! Registration page with live password policy hints.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::validation::{RegistrationForm, password_issues};

use crate::pages::login::DASHBOARD_PATH;
use crate::state::auth::{AuthContext, should_leave_auth_page};

/// Policy hints shown under the password field; empty until typing starts.
pub fn password_hints(password: &str) -> Vec<String> {
    if password.is_empty() {
        return Vec::new();
    }
    password_issues(password).iter().map(ToString::to_string).collect()
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state;
    let navigate = use_navigate();

    let form = RwSignal::new(RegistrationForm::default());
    let local_error = RwSignal::new(None::<String>);
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
        let input = form.get();
        if let Err(e) = input.validate() {
            local_error.set(Some(e.to_string()));
            return;
        }
        local_error.set(None);
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                if let Err(e) = session.register(&input.username, &input.email, &input.password).await {
                    log::warn!("registration failed: {e}");
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&session, input);
        }
    };

    let banner = move || local_error.get().or_else(|| state.with(|s| s.error().map(str::to_owned)));
    let hints = move || form.with(|f| password_hints(&f.password));

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h2 class="auth-title">"Create Account"</h2>
                <Show when=move || banner().is_some()>
                    <div class="error-message">{move || banner().unwrap_or_default()}</div>
                </Show>
                <form class="auth-form" on:submit=on_submit>
                    <label class="form-label" for="username">"Username"</label>
                    <input
                        id="username"
                        class="form-input"
                        type="text"
                        placeholder="Choose a username"
                        prop:value=move || form.with(|f| f.username.clone())
                        on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                    />
                    <label class="form-label" for="email">"Email"</label>
                    <input
                        id="email"
                        class="form-input"
                        type="email"
                        placeholder="Enter your email"
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    />
                    <label class="form-label" for="password">"Password"</label>
                    <input
                        id="password"
                        class="form-input"
                        type="password"
                        placeholder="Create a password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| {
                            form.update(|f| f.password = event_target_value(&ev));
                            local_error.set(None);
                        }
                    />
                    <ul class="password-hints">
                        <For each=hints key=|hint| hint.clone() let:hint>
                            <li>{hint}</li>
                        </For>
                    </ul>
                    <label class="form-label" for="confirm-password">"Confirm Password"</label>
                    <input
                        id="confirm-password"
                        class="form-input"
                        type="password"
                        placeholder="Confirm your password"
                        prop:value=move || form.with(|f| f.confirm_password.clone())
                        on:input=move |ev| {
                            form.update(|f| f.confirm_password = event_target_value(&ev));
                            local_error.set(None);
                        }
                    />
                    <button class="btn btn-primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating Account..." } else { "Create Account" }}
                    </button>
                </form>
                <p class="auth-link">"Already have an account? " <a href="/login">"Sign in"</a></p>
            </div>
        </div>
    }
}
