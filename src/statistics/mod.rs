//! Market statistics: correlation coefficients, splits and deviation coefficients.

use chrono::NaiveDate;

use crate::core::endpoint::{self, DateArgs};
use crate::core::{IssClient, IssError, Table};

/// Engine the statistics calls are usually asked about.
pub const DEFAULT_ENGINE: &str = "stock";
/// Market of [`DEFAULT_ENGINE`] holding ordinary shares.
pub const DEFAULT_MARKET: &str = "shares";

impl IssClient {
    /// Pairwise correlation coefficients for `engine`/`market` on `date`.
    ///
    /// With `date = None` the previous calendar day is used. It is computed once, before
    /// the first page, and every page of the fetch carries the same value.
    ///
    /// # Errors
    ///
    /// [`IssError::AuthUnavailable`] if a credentialed client cannot refresh its session;
    /// [`IssError::Fetch`] if any page fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn correlations(
        &self,
        engine: &str,
        market: &str,
        date: Option<NaiveDate>,
    ) -> Result<Table, IssError> {
        self.ensure_session().await?;
        let ep = endpoint::CORRELATIONS;
        let url = ep.url(self.base_iss(), &[("engine", engine), ("market", market)])?;
        let query = ep.query(DateArgs { date, ..DateArgs::default() }, self.clock())?;
        self.fetch_table(&ep, &url, &query).await
    }

    /// Share splits and consolidations on the stock engine.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn splits(&self) -> Result<Table, IssError> {
        let ep = endpoint::SPLITS;
        let url = ep.url(self.base_iss(), &[])?;
        let query = ep.query(DateArgs::default(), self.clock())?;
        self.fetch_table(&ep, &url, &query).await
    }

    /// Deviation coefficients for `engine` on `date` (default: yesterday, fixed for the
    /// whole fetch). Securities whose six coefficients are all zero are left out.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn deviation_coeffs(
        &self,
        engine: &str,
        date: Option<NaiveDate>,
    ) -> Result<Table, IssError> {
        self.ensure_session().await?;
        let ep = endpoint::DEVIATION_COEFFS;
        let url = ep.url(self.base_iss(), &[("engine", engine)])?;
        let query = ep.query(DateArgs { date, ..DateArgs::default() }, self.clock())?;
        self.fetch_table(&ep, &url, &query).await
    }
}
