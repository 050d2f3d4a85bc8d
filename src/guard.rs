use crate::auth::AuthState;

/// Navigable screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Entry point; resolves to the dashboard
    Root,
    Login,
    Register,
    Dashboard,
    Project(String),
}

impl Route {
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

/// What to do with a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Render(Route),
    Redirect(Route),
}

/// Decide whether `route` may render. Evaluated fresh on every navigation.
pub fn guard(route: Route, auth: &AuthState) -> Access {
    let route = match route {
        Route::Root => Route::Dashboard,
        other => other,
    };
    if route.is_public() || auth.is_logged_in() {
        Access::Render(route)
    } else {
        Access::Redirect(Route::Login)
    }
}
