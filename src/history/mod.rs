//! Historical trading results: board listings, per-security price history and
//! whole-board snapshots for one trading day.

use chrono::NaiveDate;

use crate::core::endpoint::{self, DateArgs};
use crate::core::{IssClient, IssError, Table};
use crate::statistics::{DEFAULT_ENGINE, DEFAULT_MARKET};

/// Main order-book board for shares.
pub const DEFAULT_BOARD: &str = "TQBR";

/// An ISS trading board address: engine, market and board id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub engine: String,
    pub market: String,
    pub board: String,
}

impl Board {
    pub fn new(
        engine: impl Into<String>,
        market: impl Into<String>,
        board: impl Into<String>,
    ) -> Self {
        Self {
            engine: engine.into(),
            market: market.into(),
            board: board.into(),
        }
    }

    fn params<'a>(&'a self, security: Option<&'a str>) -> Vec<(&'static str, &'a str)> {
        let mut p = vec![
            ("engine", self.engine.as_str()),
            ("market", self.market.as_str()),
            ("board", self.board.as_str()),
        ];
        if let Some(s) = security {
            p.push(("security", s));
        }
        p
    }
}

/// The main T+ shares board: `stock` / `shares` / `TQBR`.
impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE, DEFAULT_MARKET, DEFAULT_BOARD)
    }
}

impl IssClient {
    /// Securities that have ever traded on `board`, with their listing periods.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn history_listing(&self, board: &Board) -> Result<Table, IssError> {
        self.ensure_session().await?;
        let ep = endpoint::HISTORY_LISTING;
        let url = ep.url(self.base_iss(), &board.params(None))?;
        let query = ep.query(DateArgs::default(), self.clock())?;
        self.fetch_table(&ep, &url, &query).await
    }

    /// Trading results of every security on `board` for one day.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn board_history(&self, date: NaiveDate, board: &Board) -> Result<Table, IssError> {
        self.ensure_session().await?;
        let ep = endpoint::BOARD_HISTORY;
        let url = ep.url(self.base_iss(), &board.params(None))?;
        let args = DateArgs {
            date: Some(date),
            ..DateArgs::default()
        };
        let query = ep.query(args, self.clock())?;
        self.fetch_table(&ep, &url, &query).await
    }

    /// Starts a daily price-history request for one security.
    pub fn share_history(&self, security: impl Into<String>) -> HistoryBuilder<'_> {
        HistoryBuilder::new(self, security)
    }
}

/// Builder for a single security's daily history.
///
/// ```no_run
/// # use moex_iss::IssClient;
/// # #[tokio::main]
/// # async fn main() -> Result<(), moex_iss::IssError> {
/// let client = IssClient::default();
/// let from = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let table = client.share_history("SBER").from(from).fetch().await?;
/// println!("{table}");
/// # Ok(())
/// # }
/// ```
pub struct HistoryBuilder<'a> {
    client: &'a IssClient,
    security: String,
    board: Board,
    from: Option<NaiveDate>,
    till: Option<NaiveDate>,
}

impl<'a> HistoryBuilder<'a> {
    pub fn new(client: &'a IssClient, security: impl Into<String>) -> Self {
        Self {
            client,
            security: security.into(),
            board: Board::default(),
            from: None,
            till: None,
        }
    }

    /// Board to read the history from. Default: `stock/shares/TQBR`.
    pub fn board(mut self, board: Board) -> Self {
        self.board = board;
        self
    }

    /// First trading day to include.
    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    /// Last trading day to include.
    pub fn till(mut self, date: NaiveDate) -> Self {
        self.till = Some(date);
        self
    }

    /// Both ends at once; `from` must not be after `till`.
    pub fn between(self, from: NaiveDate, till: NaiveDate) -> Self {
        self.from(from).till(till)
    }

    /// Runs the paged fetch.
    ///
    /// # Errors
    ///
    /// [`IssError::InvalidDates`] when `from > till` (checked before any request),
    /// [`IssError::AuthUnavailable`] or [`IssError::Fetch`] otherwise.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self), err, fields(security = %self.security))
    )]
    pub async fn fetch(self) -> Result<Table, IssError> {
        let ep = endpoint::SHARE_HISTORY;
        let args = DateArgs {
            date: None,
            from: self.from,
            till: self.till,
        };
        let query = ep.query(args, self.client.clock())?;
        self.client.ensure_session().await?;
        let url = ep.url(
            self.client.base_iss(),
            &self.board.params(Some(&self.security)),
        )?;
        self.client.fetch_table(&ep, &url, &query).await
    }
}
