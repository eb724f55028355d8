use crate::auth::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Messages,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Messages => "/messages",
        }
    }
}

/// Where to send the user, if anywhere, given where they are now.
///
/// Nothing moves until the session has been restored, so the wrong screen
/// never flashes up.
pub fn route_for(session: &Session, in_authenticated_area: bool) -> Option<Route> {
    if !session.initialized {
        return None;
    }

    match (session.is_authenticated(), in_authenticated_area) {
        (true, false) => Some(Route::Messages),
        (false, true) => Some(Route::Login),
        _ => None,
    }
}
