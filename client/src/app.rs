//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};
use session::Role;

use crate::components::navbar::Navbar;
use crate::components::protected_route::ProtectedRoute;
use crate::pages::{
    admin::AdminPage, dashboard::DashboardPage, login::DASHBOARD_PATH, login::LoginPage, register::RegisterPage,
};
use crate::state::auth::AuthContext;
use crate::util::auth::{build_session, install_session_sync};

/// Root application component.
///
/// Builds the session stack, provides it as context and sets up client-side
/// routing. `/` and unknown paths land on the dashboard, which redirects
/// anonymous visitors to `/login`.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = match build_session() {
        Ok(session) => session,
        Err(e) => {
            return view! { <div class="error-message">{format!("Unable to start: {e}")}</div> }.into_any();
        }
    };

    let auth = AuthContext::new(session);
    install_session_sync(&auth.session, auth.state);
    provide_context(auth);

    view! {
        <Title text="SecureAuth"/>

        <Router>
            <Navbar/>
            <main class="container">
                <Routes fallback=|| view! { <Redirect path=DASHBOARD_PATH/> }>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route
                        path=StaticSegment("dashboard")
                        view=|| view! { <ProtectedRoute><DashboardPage/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment("admin")
                        view=|| view! { <ProtectedRoute required=Role::Admin><AdminPage/></ProtectedRoute> }
                    />
                    <Route path=StaticSegment("") view=|| view! { <Redirect path=DASHBOARD_PATH/> }/>
                </Routes>
            </main>
        </Router>
    }
    .into_any()
}
