//! The error types every fallible operation of this crate returns
//!
//! Most of these are recovered close to where they happen: a failure on a single item or a single
//! listing is logged and replaced by an explicit "unavailable" or "empty" value, so that one bad
//! fetch never voids the rest of a refresh. The one fatal case is a failed course enumeration,
//! which callers receive as-is.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never completed (transport failure, or the configured timeout elapsed)
    #[error("network error while fetching {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code
    #[error("server returned HTTP {status} for {url}")]
    Upstream { url: String, status: u16 },

    /// The response was not the JSON shape we expected
    #[error("unable to parse {context}: {detail}")]
    Parse { context: String, detail: String },

    /// A timestamp field was present but not a valid RFC 3339 date-time
    #[error("unparseable timestamp {value:?}: {source}")]
    DateParse {
        value: String,
        source: chrono::ParseError,
    },

    /// The response was well-formed but the data we needed is not in it
    #[error("missing data: {what}")]
    MissingData { what: String },
}
