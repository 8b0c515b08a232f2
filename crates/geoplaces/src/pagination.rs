//! Continuation of paginated searches.
//!
//! A search response may carry a `next_page_token`. The token is not usable
//! immediately: the service needs a short activation window before it honors
//! it, and using it early yields an `INVALID_REQUEST` envelope. The cursor
//! therefore sleeps for [`PAGE_TOKEN_DELAY`] before every continuation
//! request.

use std::time::Duration;

use crate::client::{PlacesClient, NEARBY_SEARCH_PATH, TEXT_SEARCH_PATH};
use crate::error::PlacesError;
use crate::mapper::parse_place;
use crate::params;
use crate::types::Place;

/// Activation window of a continuation token.
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

/// Which search endpoint a cursor continues. The two differ in what a
/// continuation request carries (see [`PageCursor::advance`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFamily {
    Nearby,
    Text,
}

impl EndpointFamily {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Self::Nearby => NEARBY_SEARCH_PATH,
            Self::Text => TEXT_SEARCH_PATH,
        }
    }
}

/// Lifecycle of a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorState {
    /// No page fetched through this cursor yet and no token recorded.
    Fresh,
    /// A continuation token is waiting to be spent.
    HasToken(String),
    /// The last page carried no token; the search is complete.
    Exhausted,
}

/// Cursor over the remaining pages of a search.
///
/// Obtained from [`crate::client::SearchPage`]; constructing one directly is
/// not possible, so a cursor always belongs to a search that actually ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    family: EndpointFamily,
    query: Vec<(String, String)>,
    state: CursorState,
}

impl PageCursor {
    pub(crate) fn new(family: EndpointFamily, query: Vec<(String, String)>) -> Self {
        Self {
            family,
            query,
            state: CursorState::Fresh,
        }
    }

    /// Records the token of the page just fetched. `None` exhausts the
    /// cursor.
    pub(crate) fn record_token(&mut self, token: Option<String>) {
        self.state = match token {
            Some(token) => CursorState::HasToken(token),
            None => CursorState::Exhausted,
        };
    }

    #[must_use]
    pub fn state(&self) -> &CursorState {
        &self.state
    }

    #[must_use]
    pub fn family(&self) -> EndpointFamily {
        self.family
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Fetches the next page of the search.
    ///
    /// Without a token to spend ([`CursorState::Fresh`] or
    /// [`CursorState::Exhausted`]) this returns an empty page and performs no
    /// request. Otherwise it waits out [`PAGE_TOKEN_DELAY`], then issues the
    /// continuation request: a nearby continuation carries only the token,
    /// while a text continuation resends the original parameters alongside
    /// it.
    ///
    /// The cursor state only changes after a successful page, so a caller
    /// that still hits the early-token `INVALID_REQUEST` can simply call
    /// again.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlacesClient::geocode`].
    pub async fn advance(&mut self, client: &PlacesClient) -> Result<Vec<Place>, PlacesError> {
        let token = match &self.state {
            CursorState::HasToken(token) => token.clone(),
            CursorState::Fresh | CursorState::Exhausted => return Ok(Vec::new()),
        };

        tracing::debug!(endpoint = self.family.path(), "waiting out token activation");
        tokio::time::sleep(PAGE_TOKEN_DELAY).await;

        let mut query = match self.family {
            EndpointFamily::Nearby => Vec::with_capacity(1),
            EndpointFamily::Text => self.query.clone(),
        };
        query.push((params::PAGETOKEN.to_string(), token));

        let envelope = client.fetch(self.family.path(), &query).await?;
        let next_token = envelope.next_page_token.clone();
        let places = envelope
            .into_results()?
            .into_iter()
            .map(parse_place)
            .collect::<Result<Vec<_>, _>>()?;

        self.record_token(next_token);
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_a_token_and_exhaustion() {
        let mut cursor = PageCursor::new(EndpointFamily::Nearby, Vec::new());
        assert_eq!(*cursor.state(), CursorState::Fresh);
        cursor.record_token(Some("T1".to_string()));
        assert_eq!(*cursor.state(), CursorState::HasToken("T1".to_string()));
        assert!(!cursor.is_exhausted());
        cursor.record_token(None);
        assert!(cursor.is_exhausted());
    }

    #[tokio::test]
    async fn tokenless_advance_is_an_empty_page_without_a_request() {
        // No server behind this client; a request would fail loudly.
        let client = PlacesClient::with_base_url("k", 1, "http://127.0.0.1:9/maps/api/")
            .expect("client construction should not fail");

        let mut fresh = PageCursor::new(EndpointFamily::Text, Vec::new());
        assert!(fresh.advance(&client).await.unwrap().is_empty());
        assert_eq!(*fresh.state(), CursorState::Fresh);

        let mut exhausted = PageCursor::new(EndpointFamily::Text, Vec::new());
        exhausted.record_token(None);
        assert!(exhausted.advance(&client).await.unwrap().is_empty());
        assert!(exhausted.is_exhausted());
    }

    #[test]
    fn families_map_to_their_endpoints() {
        assert_eq!(EndpointFamily::Nearby.path(), "place/nearbysearch/json");
        assert_eq!(EndpointFamily::Text.path(), "place/textsearch/json");
    }
}
