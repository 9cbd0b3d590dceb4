//! Public client surface + builder.
//! Internals are split into `auth` (passport session), `jar` (cookie store) and
//! `constants` (UA + defaults).

mod auth;
mod constants;
mod jar;

pub use auth::Credentials;

use crate::core::{Clock, IssError, Session, SystemClock};
use constants::{DEFAULT_BASE_ISS, DEFAULT_PASSPORT_URL, USER_AGENT};
use jar::SessionJar;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use url::Url;

#[derive(Debug, Default)]
struct AuthState {
    session: Option<Session>,
}

/// Handle to the ISS API.
///
/// Cloning is cheap; clones share the HTTP connection pool, the cookie store and
/// the passport session.
#[derive(Debug, Clone)]
pub struct IssClient {
    http: Client,
    base_iss: Url,
    passport_url: Url,
    credentials: Option<Arc<Credentials>>,
    jar: Arc<SessionJar>,
    clock: Arc<dyn Clock>,

    state: Arc<RwLock<AuthState>>,
    login_lock: Arc<Mutex<()>>,
}

impl Default for IssClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl IssClient {
    /// Create a new builder.
    pub fn builder() -> IssClientBuilder {
        IssClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn base_iss(&self) -> &Url {
        &self.base_iss
    }
    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Whether the client was built with passport credentials.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct IssClientBuilder {
    credentials: Option<Credentials>,
    proxy: Option<String>,
    user_agent: Option<String>,
    base_iss: Option<Url>,
    passport_url: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    clock: Option<Arc<dyn Clock>>,
}

impl IssClientBuilder {
    /// MOEX Passport user and password, required for real-time data.
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(user, password));
        self
    }

    /// Route all traffic (login and data) through an HTTP proxy, e.g. `http://proxy:3128`.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the ISS API root (e.g., `https://iss.moex.com/iss/`).
    pub fn base_iss(mut self, url: Url) -> Self {
        self.base_iss = Some(url);
        self
    }

    /// Override the passport login URL.
    pub fn passport_url(mut self, url: Url) -> Self {
        self.passport_url = Some(url);
        self
    }

    /// Set a global request timeout (overall). Default: none.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Replace the wall clock used for cookie expiry and default dates.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the client without contacting any server. No session is held yet.
    pub fn build(self) -> Result<IssClient, IssError> {
        let base_iss = match self.base_iss {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_ISS)?,
        };
        let passport_url = match self.passport_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_PASSPORT_URL)?,
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let jar = Arc::new(SessionJar::new(clock.clone()));

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .cookie_provider(jar.clone());

        if let Some(p) = self.proxy.as_deref() {
            let proxy = reqwest::Proxy::all(p).map_err(|e| IssError::InvalidProxy(format!("{p}: {e}")))?;
            httpb = httpb.proxy(proxy);
        }
        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        Ok(IssClient {
            http,
            base_iss,
            passport_url,
            credentials: self.credentials.map(Arc::new),
            jar,
            clock,
            state: Arc::new(RwLock::new(AuthState::default())),
            login_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Builds the client and, when credentials are set, logs in and verifies real-time access.
    ///
    /// # Errors
    ///
    /// Login errors propagate unchanged (`SessionCookieMissing`, transport errors).
    /// If the fresh session is not usable, returns [`IssError::AuthUnavailable`].
    pub async fn connect(self) -> Result<IssClient, IssError> {
        let client = self.build()?;
        if client.has_credentials() {
            client.login().await?;
            if !client.is_real_time().await {
                return Err(IssError::AuthUnavailable);
            }
        }
        Ok(client)
    }
}
