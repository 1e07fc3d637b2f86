pub mod dashboard;
pub mod home;
pub mod login;
pub mod register;

/// Client side routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
    Register,
    Dashboard,
}

impl Page {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/:role/dashboard",
        }
    }
}
