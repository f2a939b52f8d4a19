//! `Link`-header pagination.

use crate::error::{CanvasError, CanvasResult};
use crate::transport::http::{append_query, HttpTransport};
use reqwest::header::LINK;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Page size requested on every list call.
pub const PER_PAGE: &str = "100";

/// Follows `rel="next"` links until upstream stops advertising one.
#[derive(Debug, Clone)]
pub struct LinkPaginator {
    transport: HttpTransport,
}

impl LinkPaginator {
    pub fn new(transport: HttpTransport) -> Self {
        Self { transport }
    }

    /// Fetch every page of a list endpoint and concatenate them in order.
    ///
    /// `query` is merged into the first URL before `per_page`. Any non-2xx
    /// page or unparseable body fails the whole call; pages already read are
    /// dropped.
    pub async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> CanvasResult<Vec<T>> {
        let mut url = self.transport.build_url(path)?;
        append_query(&mut url, query);
        append_query(&mut url, &[("per_page", PER_PAGE)]);

        let mut items = Vec::new();
        let mut next = Some(url);
        let mut page = 0usize;

        // There is no page cap: an upstream that never drops `next` keeps
        // this loop fetching. Canvas always terminates the chain.
        while let Some(url) = next.take() {
            page += 1;
            let (headers, batch): (_, Vec<T>) = self.transport.get_document(url.clone()).await?;

            let next_target = headers
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_next_link)
                .map(str::to_owned);

            debug!(path, page, count = batch.len(), "Fetched page");
            items.extend(batch);

            next = match next_target {
                Some(target) => Some(resolve_next(&url, &target)?),
                None => None,
            };
        }

        Ok(items)
    }
}

/// Resolve a `next` target against the page it came from, keeping `per_page`.
fn resolve_next(current: &Url, target: &str) -> CanvasResult<Url> {
    let mut url = current
        .join(target)
        .map_err(|e| CanvasError::InvalidResponse(format!("malformed Link header: {}", e)))?;
    if !url.query_pairs().any(|(key, _)| key == "per_page") {
        append_query(&mut url, &[("per_page", PER_PAGE)]);
    }
    Ok(url)
}

/// Extract the `rel="next"` target from a `Link` header value.
///
/// Segments look like `<URL>; rel="next"`. Relation values may be quoted or
/// bare and may list several relations separated by spaces.
pub fn parse_next_link(header: &str) -> Option<&str> {
    let mut rest = header;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let target = &after[..end];

        let tail = &after[end + 1..];
        let params_end = tail.find('<').unwrap_or(tail.len());
        if tail[..params_end].split(';').any(is_next_relation) {
            return Some(target.trim());
        }
        rest = &tail[params_end..];
    }
    None
}

fn is_next_relation(param: &str) -> bool {
    let Some((key, value)) = param.split_once('=') else {
        return false;
    };
    if !key.trim().eq_ignore_ascii_case("rel") {
        return false;
    }
    value
        .trim()
        .trim_end_matches(',')
        .trim()
        .trim_matches('"')
        .split_whitespace()
        .any(|rel| rel.eq_ignore_ascii_case("next"))
}
