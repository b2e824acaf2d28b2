//! Admin panel: user directory with role changes and deletes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `ProtectedRoute` with `Role::Admin`. The list is fetched once
//! on mount; each confirmed change patches the live list in place. Several
//! rows may be busy at once. Banners clear themselves after
//! `NOTICE_DISMISS_MS`.

use std::sync::Arc;

use leptos::prelude::*;
use session::admin::{DELETE_FAILED, FETCH_FAILED, ROLE_UPDATE_FAILED, ROLE_UPDATED, USER_DELETED};
use session::{AuthSession, Role, User};

use crate::state::admin::{AdminState, role_label, username_cell};
#[cfg(feature = "csr")]
use crate::state::admin::{CONFIRM_DELETE, NOTICE_DISMISS_MS};
use crate::state::auth::AuthContext;

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let current_user_id = auth.state.with_untracked(|s| s.user().map(|u| u.id));
    let admin = RwSignal::new(AdminState::for_admin(current_user_id));

    load_directory(&auth.session, admin);

    let session = auth.session.clone();
    let on_role_change = Callback::new(move |(user_id, role): (i64, Role)| {
        change_role(&session, admin, user_id, role);
    });
    let session = auth.session.clone();
    let on_delete = Callback::new(move |user_id: i64| {
        delete_user(&session, admin, user_id);
    });

    let users = move || admin.with(|s| s.directory.users().to_vec());
    let stats = move || admin.with(|s| s.directory.stats());

    view! {
        <Show
            when=move || !admin.with(|s| s.loading)
            fallback=|| view! { <div class="loading"><p>"Loading users..."</p></div> }
        >
            <div class="dashboard">
                <div class="dashboard-header">
                    <h1 class="dashboard-title">"Admin Panel"</h1>
                    <p class="dashboard-subtitle">"Manage users and their roles"</p>
                </div>
                <Show when=move || admin.with(|s| s.error.is_some())>
                    <div class="error-message">{move || admin.with(|s| s.error.clone().unwrap_or_default())}</div>
                </Show>
                <Show when=move || admin.with(|s| s.notice.is_some())>
                    <div class="success-message">{move || admin.with(|s| s.notice.clone().unwrap_or_default())}</div>
                </Show>
                <table class="table">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Username"</th>
                            <th>"Email"</th>
                            <th>"Role"</th>
                            <th>"Status"</th>
                            <th>"Created"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For each=users key=|u| u.id let:user>
                            <UserRow user=user admin=admin on_role_change=on_role_change on_delete=on_delete/>
                        </For>
                    </tbody>
                </table>
                <section class="info-card">
                    <h3>"Admin Panel Information"</h3>
                    <ul>
                        <li>{move || format!("Total Users: {}", stats().total)}</li>
                        <li>{move || format!("Regular Users: {}", stats().regular)}</li>
                        <li>{move || format!("Administrators: {}", stats().admins)}</li>
                        <li>{move || format!("Active Users: {}", stats().active)}</li>
                    </ul>
                </section>
            </div>
        </Show>
    }
}

#[component]
fn UserRow(
    user: User,
    admin: RwSignal<AdminState>,
    on_role_change: Callback<(i64, Role)>,
    on_delete: Callback<i64>,
) -> impl IntoView {
    let id = user.id;
    let is_self = admin.with_untracked(|s| s.directory.is_current_user(id));
    let name = admin.with_untracked(|s| username_cell(&s.directory, &user));
    let current_role = move || admin.with(|s| s.directory.get(id).map(|u| u.role.as_str()).unwrap_or_default());

    view! {
        <tr>
            <td>{id}</td>
            <td><strong>{name}</strong></td>
            <td>{user.email.clone()}</td>
            <td>
                <select
                    class="role-select"
                    prop:value=current_role
                    disabled=move || admin.with(|s| s.role_locked(id))
                    on:change=move |ev| {
                        if let Ok(role) = event_target_value(&ev).parse::<Role>() {
                            on_role_change.run((id, role));
                        }
                    }
                >
                    <option value=Role::User.as_str()>{role_label(Role::User)}</option>
                    <option value=Role::Admin.as_str()>{role_label(Role::Admin)}</option>
                </select>
            </td>
            <td>{user.status_label()}</td>
            <td>{user.created_date().unwrap_or("N/A").to_owned()}</td>
            <td class="table-actions">
                {if is_self {
                    view! { <span class="muted">"Cannot delete self"</span> }.into_any()
                } else {
                    view! {
                        <button
                            class="btn btn-danger btn-sm"
                            disabled=move || admin.with(|s| s.is_pending(id))
                            on:click=move |_| on_delete.run(id)
                        >
                            {move || if admin.with(|s| s.is_pending(id)) { "Deleting..." } else { "Delete" }}
                        </button>
                    }
                    .into_any()
                }}
            </td>
        </tr>
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

fn load_directory(session: &Arc<AuthSession>, admin: RwSignal<AdminState>) {
    #[cfg(feature = "csr")]
    {
        let session = Arc::clone(session);
        leptos::task::spawn_local(async move {
            let mut directory = admin.get_untracked().directory;
            match directory.refresh(session.api()).await {
                Ok(()) => admin.update(|s| {
                    s.directory = directory;
                    s.loading = false;
                }),
                Err(e) => {
                    log::warn!("user directory fetch failed: {e}");
                    admin.update(|s| s.failed(None, &e, FETCH_FAILED));
                }
            }
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (session, admin);
    }
}

fn change_role(session: &Arc<AuthSession>, admin: RwSignal<AdminState>, user_id: i64, role: Role) {
    #[cfg(feature = "csr")]
    {
        admin.update(|s| s.begin(user_id));
        let session = Arc::clone(session);
        leptos::task::spawn_local(async move {
            let snapshot = admin.with_untracked(|s| s.directory.clone());
            match snapshot.request_role_change(session.api(), user_id, role).await {
                Ok(()) => admin.update(|s| s.role_changed(user_id, role, ROLE_UPDATED)),
                Err(e) => admin.update(|s| s.failed(Some(user_id), &e, ROLE_UPDATE_FAILED)),
            }
            schedule_dismiss(admin);
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (session, admin, user_id, role);
    }
}

fn delete_user(session: &Arc<AuthSession>, admin: RwSignal<AdminState>, user_id: i64) {
    #[cfg(feature = "csr")]
    {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(CONFIRM_DELETE).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        admin.update(|s| s.begin(user_id));
        let session = Arc::clone(session);
        leptos::task::spawn_local(async move {
            let snapshot = admin.with_untracked(|s| s.directory.clone());
            match snapshot.request_delete(session.api(), user_id).await {
                Ok(()) => admin.update(|s| s.user_removed(user_id, USER_DELETED)),
                Err(e) => admin.update(|s| s.failed(Some(user_id), &e, DELETE_FAILED)),
            }
            schedule_dismiss(admin);
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (session, admin, user_id);
    }
}

/// Clear whichever banner is showing now once the dismiss delay passes.
#[cfg(feature = "csr")]
fn schedule_dismiss(admin: RwSignal<AdminState>) {
    let Some(message) = admin.with_untracked(|s| s.notice.clone().or_else(|| s.error.clone())) else {
        return;
    };
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(NOTICE_DISMISS_MS).await;
        admin.update(|s| s.dismiss(&message));
    });
}
