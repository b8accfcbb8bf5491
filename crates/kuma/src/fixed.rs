use crate::{Monitor, MonitorError, MonitorSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAttempt {
    Password { username: String },
    Token,
}

/// In-memory source with a fixed monitor list. Records every login attempt;
/// rejects logins that do not match the accepted credentials, when set.
#[derive(Debug, Default)]
pub struct FixedSource {
    monitors: Vec<Monitor>,
    accept_token: Option<String>,
    accept_password: Option<(String, String)>,
    authenticated: bool,
    pub attempts: Vec<LoginAttempt>,
}

impl FixedSource {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors,
            ..Self::default()
        }
    }

    pub fn accepting_token(mut self, token: &str) -> Self {
        self.accept_token = Some(token.to_string());
        self
    }

    pub fn accepting_password(mut self, username: &str, password: &str) -> Self {
        self.accept_password = Some((username.to_string(), password.to_string()));
        self
    }
}

impl MonitorSource for FixedSource {
    fn login(&mut self, username: &str, password: &str) -> Result<(), MonitorError> {
        self.attempts.push(LoginAttempt::Password {
            username: username.to_string(),
        });
        match &self.accept_password {
            Some((u, p)) if u != username || p != password => {
                Err(MonitorError::Auth("Incorrect username or password.".into()))
            }
            _ => {
                self.authenticated = true;
                Ok(())
            }
        }
    }

    fn login_by_token(&mut self, token: &str) -> Result<(), MonitorError> {
        self.attempts.push(LoginAttempt::Token);
        match &self.accept_token {
            Some(t) if t != token => Err(MonitorError::Auth("Invalid token".into())),
            _ => {
                self.authenticated = true;
                Ok(())
            }
        }
    }

    fn monitors(&mut self) -> Result<Vec<Monitor>, MonitorError> {
        if !self.authenticated {
            return Err(MonitorError::Auth("not logged in".into()));
        }
        Ok(self.monitors.clone())
    }
}
