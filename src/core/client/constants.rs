//! Centralized constants for default endpoints and UA.

/// Default UA sent with every request.
pub(crate) const USER_AGENT: &str = concat!("moex-iss-rs/", env!("CARGO_PKG_VERSION"));

/// ISS API root; endpoint templates are joined onto it.
pub(crate) const DEFAULT_BASE_ISS: &str = "https://iss.moex.com/iss/";

/// MOEX Passport login URL. Answers with the session cookie on valid credentials.
pub(crate) const DEFAULT_PASSPORT_URL: &str = "https://passport.moex.com/login";

/// Name of the cookie that proves a logged-in, real-time entitled identity.
pub(crate) const SESSION_COOKIE: &str = "_passport_session";
