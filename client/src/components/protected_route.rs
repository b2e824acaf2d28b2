//! Route wrapper applying the access guard.

use leptos::prelude::*;
use leptos_router::components::Redirect;
use session::Role;
use session::guard::{ACCESS_DENIED_MESSAGE, Access, LOGIN_PATH};

use crate::state::auth::AuthContext;

/// Render `children` only when the session satisfies `required`.
#[component]
pub fn ProtectedRoute(#[prop(optional)] required: Role, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    move || match auth.access(required) {
        Access::Loading => view! {
            <div class="loading">
                <p>"Loading..."</p>
            </div>
        }
        .into_any(),
        Access::RedirectToLogin => view! { <Redirect path=LOGIN_PATH/> }.into_any(),
        Access::Denied => view! {
            <div class="container">
                <div class="error-message">{ACCESS_DENIED_MESSAGE}</div>
            </div>
        }
        .into_any(),
        Access::Granted => children().into_any(),
    }
}
