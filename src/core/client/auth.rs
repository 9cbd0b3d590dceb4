//! MOEX Passport session acquisition and refresh.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::AUTHORIZATION;
use std::fmt;

use super::constants::SESSION_COOKIE;
use crate::core::{IssError, Session, SessionStatus};

/// Passport user name and password. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// `Basic base64(user:password)`.
    pub(crate) fn basic_header(&self) -> String {
        let raw = format!("{}:{}", self.user, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl super::IssClient {
    /// Logs in to MOEX Passport and stores the resulting session.
    ///
    /// Any previously held session is dropped first, so on failure the client holds none.
    ///
    /// # Errors
    ///
    /// - [`IssError::MissingCredentials`] if the client was built without credentials.
    /// - [`IssError::Http`] / [`IssError::Status`] if the passport request fails.
    /// - [`IssError::SessionCookieMissing`] if the request succeeded but no session cookie was set.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn login(&self) -> Result<Session, IssError> {
        let _guard = self.login_lock.lock().await;
        self.login_locked().await
    }

    /// Login body; the caller holds `login_lock`.
    async fn login_locked(&self) -> Result<Session, IssError> {
        let creds = self
            .credentials
            .as_deref()
            .ok_or(IssError::MissingCredentials)?;

        self.state.write().await.session = None;
        self.jar.remove(SESSION_COOKIE);

        #[cfg(feature = "tracing")]
        tracing::debug!(user = creds.user(), url = %self.passport_url, "passport login");

        let resp = self
            .http
            .get(self.passport_url.clone())
            .header(AUTHORIZATION, creds.basic_header())
            .send()
            .await?;

        if !resp.status().is_success() {
            self.jar.remove(SESSION_COOKIE);
            return Err(IssError::Status {
                status: resp.status().as_u16(),
                url: resp.url().to_string(),
            });
        }

        let cookie = self.jar.get(SESSION_COOKIE).ok_or(IssError::SessionCookieMissing {
            name: SESSION_COOKIE,
        })?;
        let session = Session::new(cookie.value, cookie.expires_at);
        self.state.write().await.session = Some(session.clone());
        Ok(session)
    }

    /// Snapshot of the held session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.reconcile_session().await
    }

    /// Whether the held session is absent, valid or expired right now.
    pub async fn session_status(&self) -> SessionStatus {
        let now = self.clock().now();
        match self.reconcile_session().await {
            None => SessionStatus::Absent,
            Some(s) if s.is_expired_at(now) => SessionStatus::Expired,
            Some(_) => SessionStatus::Valid,
        }
    }

    /// Brings the held session in line with the cookie the jar will actually send.
    ///
    /// ISS responses may delete or rotate `_passport_session`; a held session whose
    /// cookie is gone is dropped, and a rotated cookie replaces it. Nothing is adopted
    /// while no session is held, so only a successful login creates one.
    async fn reconcile_session(&self) -> Option<Session> {
        let mut state = self.state.write().await;
        let held = state.session.as_ref()?;
        let live = self
            .jar
            .get(SESSION_COOKIE)
            .filter(|c| !c.value.is_empty())
            .map(|c| Session::new(c.value, c.expires_at));
        if live.as_ref() != Some(held) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                dropped = live.is_none(),
                "passport session cookie changed by the server"
            );
            state.session = live;
        }
        state.session.clone()
    }

    /// Reports whether the client currently has real-time access.
    ///
    /// An absent or expired session triggers exactly one login attempt first. This method
    /// never fails: every login error, `SessionCookieMissing` included, reads as `false`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn is_real_time(&self) -> bool {
        if self.session_status().await == SessionStatus::Valid {
            return true;
        }
        if self.credentials.is_none() {
            return false;
        }

        let _guard = self.login_lock.lock().await;
        // Another task may have logged in while this one was waiting.
        if self.session_status().await == SessionStatus::Valid {
            return true;
        }
        if let Err(_e) = self.login_locked().await {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "passport re-login failed; real-time access unavailable");
        }
        self.session_status().await == SessionStatus::Valid
    }

    /// Forgets the held session and its cookie.
    pub async fn logout(&self) {
        let _guard = self.login_lock.lock().await;
        self.state.write().await.session = None;
        self.jar.remove(SESSION_COOKIE);
    }

    /// Precondition for real-time endpoints. Anonymous clients pass through and get
    /// delayed data.
    pub(crate) async fn ensure_session(&self) -> Result<(), IssError> {
        if !self.has_credentials() || self.is_real_time().await {
            Ok(())
        } else {
            Err(IssError::AuthUnavailable)
        }
    }
}
