//! moex-iss-rs: async client for the Moscow Exchange Information & Statistics Server.
//!
//! Every endpoint returns a [`Table`] assembled from as many `start`-offset pages as
//! the server hands out. Real-time statistics and history need a MOEX Passport
//! session, which the client obtains at [`IssClientBuilder::connect`] and refreshes
//! whenever the session cookie has expired.
//!
//! ```no_run
//! use moex_iss::{Board, IssClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), moex_iss::IssError> {
//! let client = IssClient::builder()
//!     .credentials("user", "password")
//!     .connect()
//!     .await?;
//!
//! let listing = client.history_listing(&Board::default()).await?;
//! println!("{} securities listed on TQBR", listing.len());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod history;
pub mod securities;
pub mod statistics;

pub use crate::core::{
    Clock, Credentials, IssClient, IssClientBuilder, IssError, Row, Session, SessionStatus,
    SystemClock, Table,
};
pub use history::{Board, HistoryBuilder};

#[cfg(feature = "dataframe")]
pub use crate::core::dataframe::ToDataFrame;

/// Installs a `tracing` subscriber driven by `RUST_LOG` (demos and tests only).
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing_for_tests() {
    use tracing_subscriber::{EnvFilter, fmt};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
