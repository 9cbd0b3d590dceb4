//! Static descriptors for every ISS operation the client speaks.
//!
//! All endpoints share one pagination algorithm; they differ only in the data kept here:
//! path template, envelope key, paging mode, date parameters and an optional row filter.

use chrono::NaiveDate;
use serde_json::Value;
use url::Url;

use crate::core::{Clock, IssError};

/// Keeps a row when it returns `true`.
pub(crate) type RowFilter = fn(&[Value]) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Paging {
    /// One request, no `start` parameter.
    Single,
    /// `start`-offset pages until an empty one.
    Paged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Envelope {
    /// Rows live under this top-level key.
    Named(&'static str),
    /// Every top-level key is its own table.
    Every,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateParams {
    None,
    /// `date`, defaulting to yesterday.
    DefaultYesterday,
    /// `date`, caller must supply it.
    Required,
    /// optional `from` / `till`.
    Range,
}

/// Per-call inputs for the query string, before defaults are applied.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DateArgs {
    pub(crate) date: Option<NaiveDate>,
    pub(crate) from: Option<NaiveDate>,
    pub(crate) till: Option<NaiveDate>,
}

pub(crate) type Query = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoint {
    pub(crate) name: &'static str,
    pub(crate) path: &'static str,
    pub(crate) envelope: Envelope,
    pub(crate) paging: Paging,
    pub(crate) dates: DateParams,
    pub(crate) keep_row: Option<RowFilter>,
}

fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

impl Endpoint {
    /// Appends the path template to the ISS root, filling `{param}` placeholders.
    ///
    /// Each template segment becomes exactly one URL segment: parameter values are
    /// percent-encoded, so a `/`, `?` or `#` inside a value stays part of that segment.
    pub(crate) fn url(&self, base: &Url, params: &[(&str, &str)]) -> Result<Url, IssError> {
        let (path, fixed_query) = match self.path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (self.path, None),
        };

        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| IssError::Data(format!("base URL `{base}` cannot take a path")))?;
            segments.pop_if_empty();
            for template in path.split('/') {
                segments.push(&self.fill_segment(template, params)?);
            }
        }
        url.set_query(fixed_query);
        Ok(url)
    }

    fn fill_segment(&self, template: &str, params: &[(&str, &str)]) -> Result<String, IssError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                IssError::Data(format!("endpoint `{}`: bad template `{template}`", self.name))
            })?;
            let key = &after[..close];
            let (_, value) = params.iter().find(|(k, _)| *k == key).ok_or_else(|| {
                IssError::Data(format!(
                    "endpoint `{}`: unfilled path parameter `{key}`",
                    self.name
                ))
            })?;
            if matches!(*value, "" | "." | "..") {
                return Err(IssError::Data(format!(
                    "endpoint `{}`: invalid value `{value}` for `{key}`",
                    self.name
                )));
            }
            out.push_str(value);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Resolves the query once for the whole fetch; a defaulted date never changes between pages.
    pub(crate) fn query(&self, args: DateArgs, clock: &dyn Clock) -> Result<Query, IssError> {
        let mut q = Query::new();
        match self.dates {
            DateParams::None => {}
            DateParams::DefaultYesterday => {
                let date = args.date.unwrap_or_else(|| clock.yesterday());
                q.push(("date", iso(date)));
            }
            DateParams::Required => {
                let date = args.date.ok_or_else(|| {
                    IssError::Data(format!("endpoint `{}` requires a date", self.name))
                })?;
                q.push(("date", iso(date)));
            }
            DateParams::Range => {
                if let (Some(f), Some(t)) = (args.from, args.till)
                    && f > t
                {
                    return Err(IssError::InvalidDates);
                }
                if let Some(f) = args.from {
                    q.push(("from", iso(f)));
                }
                if let Some(t) = args.till {
                    q.push(("till", iso(t)));
                }
            }
        }
        Ok(q)
    }
}

/// Width of the coefficient tail in a deviation-coefficients row.
const COEFF_TAIL: usize = 6;

/// Drops deviation-coefficient rows whose six trailing coefficients are all zero.
pub(crate) fn has_nonzero_coeffs(row: &[Value]) -> bool {
    if row.len() < COEFF_TAIL {
        return true;
    }
    !row[row.len() - COEFF_TAIL..]
        .iter()
        .all(|v| v.as_f64() == Some(0.0))
}

/* ----------------------- Descriptor table ----------------------- */

pub(crate) const INDEX: Endpoint = Endpoint {
    name: "index",
    path: "index.json?iss.meta=off",
    envelope: Envelope::Every,
    paging: Paging::Single,
    dates: DateParams::None,
    keep_row: None,
};

pub(crate) const SECURITIES: Endpoint = Endpoint {
    name: "securities",
    path: "securities.json",
    envelope: Envelope::Named("securities"),
    paging: Paging::Paged,
    dates: DateParams::None,
    keep_row: None,
};

pub(crate) const HISTORY_LISTING: Endpoint = Endpoint {
    name: "history_listing",
    path: "history/engines/{engine}/markets/{market}/boards/{board}/listing.json",
    envelope: Envelope::Named("securities"),
    paging: Paging::Paged,
    dates: DateParams::None,
    keep_row: None,
};

pub(crate) const SECURITY_DESCRIPTION: Endpoint = Endpoint {
    name: "security_description",
    path: "securities/{security}.json",
    envelope: Envelope::Named("description"),
    paging: Paging::Single,
    dates: DateParams::None,
    keep_row: None,
};

pub(crate) const CORRELATIONS: Endpoint = Endpoint {
    name: "correlations",
    path: "statistics/engines/{engine}/markets/{market}/correlations.json",
    envelope: Envelope::Named("coefficients"),
    paging: Paging::Paged,
    dates: DateParams::DefaultYesterday,
    keep_row: None,
};

pub(crate) const SPLITS: Endpoint = Endpoint {
    name: "splits",
    path: "statistics/engines/stock/splits.json",
    envelope: Envelope::Named("splits"),
    paging: Paging::Single,
    dates: DateParams::None,
    keep_row: None,
};

pub(crate) const DEVIATION_COEFFS: Endpoint = Endpoint {
    name: "deviation_coeffs",
    path: "statistics/engines/{engine}/deviationcoeffs.json",
    envelope: Envelope::Named("securities"),
    paging: Paging::Paged,
    dates: DateParams::DefaultYesterday,
    keep_row: Some(has_nonzero_coeffs),
};

pub(crate) const SHARE_HISTORY: Endpoint = Endpoint {
    name: "share_history",
    path: "history/engines/{engine}/markets/{market}/boards/{board}/securities/{security}.json",
    envelope: Envelope::Named("history"),
    paging: Paging::Paged,
    dates: DateParams::Range,
    keep_row: None,
};

pub(crate) const BOARD_HISTORY: Endpoint = Endpoint {
    name: "board_history",
    path: "history/engines/{engine}/markets/{market}/boards/{board}/securities.json",
    envelope: Envelope::Named("history"),
    paging: Paging::Paged,
    dates: DateParams::Required,
    keep_row: None,
};
