use std::str::FromStr;

use portal_common::{Credentials, Registration, UserProfile};
use strum::{EnumString, IntoStaticStr};
use thiserror::Error;

use crate::{
    api::{self, AuthApi},
    pages::Page,
    session::{SessionManager, SessionStore},
};

/// Lifecycle of a single form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed(String),
}

impl FormStatus {
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Enter the submitting state. Returns false if a submission is already in flight.
    fn begin(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        *self = Self::Submitting;
        true
    }

    fn fail(&mut self, error: &api::Error) {
        *self = Self::Failed(error.user_message());
    }

    fn clear_error(&mut self) {
        if matches!(self, Self::Failed(_)) {
            *self = Self::Idle;
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown form field '{0}'")]
pub struct UnknownField(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum RegisterField {
    Name,
    Email,
    Password,
}

fn parse_field<F>(name: &str) -> Result<F, UnknownField>
where
    F: FromStr,
{
    F::from_str(name).map_err(|_| UnknownField(name.to_owned()))
}

/// State of the login form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub status: FormStatus,
    /// Set once the session has been persisted after a successful login
    pub redirect: bool,
}

impl LoginForm {
    pub fn set(&mut self, field: LoginField, value: String) {
        match field {
            LoginField::Email => self.email = value,
            LoginField::Password => self.password = value,
        }
        self.status.clear_error();
    }

    /// Update the field named `name`, as found on the input element
    /// # Errors
    /// This function will return an error if `name` is not a field of the form. The form is left
    /// unchanged.
    pub fn edit(&mut self, name: &str, value: String) -> Result<(), UnknownField> {
        self.set(parse_field(name)?, value);
        Ok(())
    }

    /// Move to the submitting state and return the request to send. Returns [None] if a request is
    /// already in flight.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if !self.status.begin() {
            return None;
        }
        Some(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// Session was persisted for the submitted credentials
    pub fn authenticated(&mut self) {
        self.email.clear();
        self.password.clear();
        self.status = FormStatus::Success;
        self.redirect = true;
    }

    pub fn fail(&mut self, error: &api::Error) {
        self.status.fail(error);
    }

    pub const fn loading(&self) -> bool {
        self.status.is_submitting()
    }

    pub const fn disabled(&self) -> bool {
        self.status.is_submitting()
    }

    /// Where the login page should navigate to, if anywhere. After a login the user lands on the
    /// dashboard of their role. A user that is already signed in is sent home.
    pub fn redirect_target<S>(&self, session: &SessionManager<S>) -> Option<String>
    where
        S: SessionStore,
    {
        if self.redirect {
            return Some(
                session
                    .user_info()
                    .dashboard_path()
                    .unwrap_or_else(|| Page::Home.path().to_owned()),
            );
        }
        session
            .is_authenticated()
            .then(|| Page::Home.path().to_owned())
    }
}

/// State of the register form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub status: FormStatus,
}

impl RegisterForm {
    pub fn set(&mut self, field: RegisterField, value: String) {
        match field {
            RegisterField::Name => self.name = value,
            RegisterField::Email => self.email = value,
            RegisterField::Password => self.password = value,
        }
        self.status.clear_error();
    }

    /// Update the field named `name`, as found on the input element
    /// # Errors
    /// This function will return an error if `name` is not a field of the form. The form is left
    /// unchanged.
    pub fn edit(&mut self, name: &str, value: String) -> Result<(), UnknownField> {
        self.set(parse_field(name)?, value);
        Ok(())
    }

    /// Move to the submitting state and return the request to send. Returns [None] if a request is
    /// already in flight.
    pub fn begin_submit(&mut self) -> Option<Registration> {
        if !self.status.begin() {
            return None;
        }
        Some(Registration {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }

    /// Apply the result of a registration request. Fields are only cleared on success.
    pub fn complete(&mut self, outcome: &Result<UserProfile, api::Error>) {
        match outcome {
            Ok(_) => {
                self.name.clear();
                self.email.clear();
                self.password.clear();
                self.status = FormStatus::Success;
            }
            Err(error) => self.status.fail(error),
        }
    }

    pub const fn loading(&self) -> bool {
        self.status.is_submitting()
    }

    pub const fn disabled(&self) -> bool {
        self.status.is_submitting()
    }

    pub fn success(&self) -> bool {
        self.status == FormStatus::Success
    }

    /// Signed in users have no business on the register page
    pub fn redirect_target<S>(&self, session: &SessionManager<S>) -> Option<String>
    where
        S: SessionStore,
    {
        session
            .is_authenticated()
            .then(|| Page::Home.path().to_owned())
    }
}

/// Send the `credentials` and persist the returned token. `on_authenticated` runs once the token
/// is stored.
/// # Errors
/// This function will return an error if the request fails or the token cannot be stored
pub async fn submit_login<A, S, F>(
    api: &A,
    session: &SessionManager<S>,
    credentials: &Credentials,
    on_authenticated: F,
) -> Result<(), api::Error>
where
    A: AuthApi,
    S: SessionStore,
    F: FnOnce(),
{
    let response = api.login(credentials).await?;
    session.authenticate(&response.token, on_authenticated)?;
    log::info!("Signed in as {}", credentials.email);
    Ok(())
}
