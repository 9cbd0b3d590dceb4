//! The "fetch until exhausted" protocol shared by every ISS data endpoint.
//!
//! A fetch issues `start=0`, `start=n0`, `start=n0+n1`, ... strictly one after another and
//! stops at the first page with no rows. The terminating page contributes nothing except
//! when it is the very first page, in which case its columns describe the empty result.

use std::collections::BTreeMap;
use url::Url;

use crate::core::endpoint::{Endpoint, Envelope, Paging, Query, RowFilter};
use crate::core::wire::{self, Block};
use crate::core::{IssClient, IssError, Row, Table};

/// Accumulates pages of one fetch into a [`Table`].
#[derive(Debug)]
pub(crate) struct PageAccumulator {
    columns: Option<Vec<String>>,
    rows: Vec<Row>,
    start: u64,
    keep_row: Option<RowFilter>,
}

impl PageAccumulator {
    pub(crate) fn new(keep_row: Option<RowFilter>) -> Self {
        Self {
            columns: None,
            rows: Vec::new(),
            start: 0,
            keep_row,
        }
    }

    /// Offset of the next page to request.
    pub(crate) fn start(&self) -> u64 {
        self.start
    }

    /// Folds in one page. Returns `false` once the terminating empty page arrives.
    ///
    /// The offset advances by the rows received, not by the rows kept after filtering.
    pub(crate) fn push(&mut self, page: Block) -> bool {
        if page.data.is_empty() {
            if self.columns.is_none() {
                self.columns = Some(page.columns);
            }
            return false;
        }

        self.start += page.data.len() as u64;
        self.columns = Some(page.columns);
        match self.keep_row {
            Some(keep) => self.rows.extend(page.data.into_iter().filter(|r| keep(r))),
            None => self.rows.extend(page.data),
        }
        true
    }

    pub(crate) fn finish(self) -> Table {
        Table::new(self.columns.unwrap_or_default(), self.rows)
    }
}

fn page_url(base: &Url, start: Option<u64>, query: &Query) -> Url {
    let mut url = base.clone();
    if start.is_some() || !query.is_empty() {
        let mut qp = url.query_pairs_mut();
        if let Some(s) = start {
            qp.append_pair("start", &s.to_string());
        }
        for (k, v) in query {
            qp.append_pair(k, v);
        }
    }
    url
}

impl IssClient {
    /// GETs one URL and returns the raw body, mapping non-2xx statuses to [`IssError::Status`].
    async fn get_body(&self, url: Url) -> Result<String, IssError> {
        let resp = self.http().get(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(IssError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }

    async fn fetch_block(
        &self,
        envelope: &str,
        url: &Url,
        start: Option<u64>,
        query: &Query,
    ) -> Result<Block, IssError> {
        let body = self.get_body(page_url(url, start, query)).await?;
        wire::extract_block(&body, envelope)
    }

    /// Runs the endpoint's fetch protocol against an already-substituted URL.
    ///
    /// # Errors
    ///
    /// For paged endpoints, any transport or decode failure is wrapped in
    /// [`IssError::Fetch`] with the offset of the failing page; nothing fetched so far
    /// is returned. Single-shot endpoints return the underlying error directly.
    pub(crate) async fn fetch_table(
        &self,
        endpoint: &Endpoint,
        url: &Url,
        query: &Query,
    ) -> Result<Table, IssError> {
        let Envelope::Named(envelope) = endpoint.envelope else {
            return Err(IssError::Data(format!(
                "endpoint `{}` has no single envelope",
                endpoint.name
            )));
        };

        if endpoint.paging == Paging::Single {
            let block = self.fetch_block(envelope, url, None, query).await?;
            let mut acc = PageAccumulator::new(endpoint.keep_row);
            acc.push(block);
            return Ok(acc.finish());
        }

        let mut acc = PageAccumulator::new(endpoint.keep_row);
        loop {
            let start = acc.start();
            let page = self
                .fetch_block(envelope, url, Some(start), query)
                .await
                .map_err(|e| IssError::Fetch {
                    start,
                    source: Box::new(e),
                })?;

            #[cfg(feature = "tracing")]
            tracing::debug!(endpoint = endpoint.name, start, rows = page.data.len(), "page");

            if !acc.push(page) {
                break;
            }
        }
        Ok(acc.finish())
    }

    /// Single request whose every top-level key is a table (the ISS index).
    pub(crate) async fn fetch_groups(
        &self,
        endpoint: &Endpoint,
        url: &Url,
    ) -> Result<BTreeMap<String, Table>, IssError> {
        if endpoint.envelope != Envelope::Every {
            return Err(IssError::Data(format!(
                "endpoint `{}` is not a grouped response",
                endpoint.name
            )));
        }
        let body = self.get_body(url.clone()).await?;
        let blocks = wire::extract_all_blocks(&body)?;
        Ok(blocks.into_iter().map(|(k, b)| (k, Table::from(b))).collect())
    }
}
