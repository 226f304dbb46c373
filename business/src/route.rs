//! Route resolution for the console's two areas.

use serde::{Deserialize, Serialize};

/// Which area of the console to display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Login page, the only area reachable without a session.
    #[default]
    Login,
    /// The user directory.
    Directory,
}

impl Route {
    /// Canonical path of the area.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Directory => "/",
        }
    }

    /// Area a path names. Unknown paths fall back to the directory root.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "/login" | "login" => Self::Login,
            _ => Self::Directory,
        }
    }
}

/// Where a navigation to `path` actually lands, given the session state.
pub fn resolve_route(path: &str, authenticated: bool) -> Route {
    match (Route::from_path(path), authenticated) {
        (Route::Login, true) => Route::Directory,
        (Route::Directory, false) => Route::Login,
        (route, _) => route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_default_is_login() {
        assert_eq!(Route::default(), Route::Login);
    }

    #[test]
    fn test_known_paths() {
        assert_eq!(Route::from_path("/login"), Route::Login);
        assert_eq!(Route::from_path("/login/"), Route::Login);
        assert_eq!(Route::from_path("/"), Route::Directory);
        assert_eq!(Route::from_path("/users"), Route::Directory);
        assert_eq!(Route::from_path("/users?page=2"), Route::Directory);
    }

    #[test]
    fn test_unknown_path_goes_to_directory_then_guard() {
        assert_eq!(Route::from_path("/nope"), Route::Directory);
        assert_eq!(resolve_route("/nope", true), Route::Directory);
        assert_eq!(resolve_route("/nope", false), Route::Login);
    }

    #[test]
    fn test_guard_redirects() {
        assert_eq!(resolve_route("/users", false), Route::Login);
        assert_eq!(resolve_route("/login", true), Route::Directory);
        assert_eq!(resolve_route("/login", false), Route::Login);
        assert_eq!(resolve_route("/", true), Route::Directory);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [Route::Login, Route::Directory] {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }
}
