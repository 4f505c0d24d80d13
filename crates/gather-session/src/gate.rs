//! Route-level access control, re-evaluated on every route change.

/// Routes the shell can navigate to, one per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    Events,
    Profile,
    About,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/Login",
            Self::Register => "/Register",
            Self::Dashboard => "/Home",
            Self::Events => "/Event",
            Self::Profile => "/UserProfile",
            Self::About => "/About",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Self::Home),
            "/Login" => Some(Self::Login),
            "/Register" => Some(Self::Register),
            "/Home" => Some(Self::Dashboard),
            "/Event" => Some(Self::Events),
            "/UserProfile" => Some(Self::Profile),
            "/About" => Some(Self::About),
            _ => None,
        }
    }

    /// The fixed public set; everything else requires a valid session.
    pub fn is_public(self) -> bool {
        matches!(self, Self::Home | Self::Login | Self::Register)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Render,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Render-or-redirect for a route given current session validity.
///
/// Session validity can change asynchronously while the user sits on a
/// protected route; callers re-run this on every route change and after
/// every session event rather than caching the answer.
pub fn evaluate(route: Route, authenticated: bool) -> GateDecision {
    if authenticated {
        // Logged-in users have no business on the auth forms.
        if matches!(route, Route::Login | Route::Register) {
            return GateDecision::RedirectToDashboard;
        }
        return GateDecision::Render;
    }

    if route.is_public() {
        GateDecision::Render
    } else {
        GateDecision::RedirectToLogin
    }
}
