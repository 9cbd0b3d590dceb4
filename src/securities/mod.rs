//! Public reference endpoints: the ISS index, the full security list and
//! per-security descriptions. None of them need a passport session.

use std::collections::BTreeMap;

use crate::core::endpoint::{self, DateArgs};
use crate::core::{IssClient, IssError, Table};

/// Security used by [`IssClient::security_description`] callers that have no preference.
pub const DEFAULT_SECURITY: &str = "IMOEX";

impl IssClient {
    /// The ISS index: engines, markets, boards, durations and the other reference groups,
    /// keyed by group name.
    ///
    /// # Errors
    ///
    /// Transport failures, or a response member that is not a `columns`/`data` block.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn index(&self) -> Result<BTreeMap<String, Table>, IssError> {
        let ep = endpoint::INDEX;
        let url = ep.url(self.base_iss(), &[])?;
        self.fetch_groups(&ep, &url).await
    }

    /// Every security known to ISS. This walks several hundred thousand rows in pages;
    /// confirm with the user before calling it interactively.
    ///
    /// # Errors
    ///
    /// Any page failure aborts the walk with [`IssError::Fetch`].
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn securities_list(&self) -> Result<Table, IssError> {
        let ep = endpoint::SECURITIES;
        let url = ep.url(self.base_iss(), &[])?;
        let query = ep.query(DateArgs::default(), self.clock())?;
        self.fetch_table(&ep, &url, &query).await
    }

    /// Key/value description of one security (`name`, `title`, `value` rows).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn security_description(&self, security: &str) -> Result<Table, IssError> {
        let ep = endpoint::SECURITY_DESCRIPTION;
        let url = ep.url(self.base_iss(), &[("security", security)])?;
        let query = ep.query(DateArgs::default(), self.clock())?;
        self.fetch_table(&ep, &url, &query).await
    }
}
