//! Dashboard page showing the signed-in user's profile.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route; `ProtectedRoute` has already
//! resolved the session before it renders.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use session::User;

use crate::state::auth::AuthContext;

/// Label/value rows for the profile card.
pub fn profile_fields(user: &User) -> Vec<(&'static str, String)> {
    vec![
        ("Username", user.username.clone()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
        ("Status", user.status_label().to_owned()),
        ("Account Created", user.created_date().unwrap_or("N/A").to_owned()),
    ]
}

/// Security notes listed under the profile.
pub fn security_notes(user: &User) -> Vec<&'static str> {
    let mut notes = vec![
        "Password is securely hashed using bcrypt",
        "JWT token expires in 30 minutes",
        "Role-based access control is active",
    ];
    if user.is_admin() {
        notes.push("Admin privileges enabled");
    }
    notes
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state;

    let fields = move || state.with(|s| s.user().map(profile_fields).unwrap_or_default());
    let notes = move || state.with(|s| s.user().map(security_notes).unwrap_or_default());

    view! {
        <div class="dashboard">
            <div class="dashboard-header">
                <h1 class="dashboard-title">"Dashboard"</h1>
                <p class="dashboard-subtitle">"Welcome to your secure dashboard"</p>
            </div>
            <section class="profile-card">
                <h2>"Your Profile"</h2>
                <div class="profile-grid">
                    <For each=fields key=|(label, _)| *label let:field>
                        <div class="profile-field">
                            <h3>{field.0}</h3>
                            <p>{field.1}</p>
                        </div>
                    </For>
                </div>
            </section>
            <section class="info-card">
                <h3>"Security Information"</h3>
                <ul>
                    <For each=notes key=|note| *note let:note>
                        <li>{note}</li>
                    </For>
                </ul>
            </section>
        </div>
    }
}
