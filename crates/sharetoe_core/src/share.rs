//! Share tokens and launch links.
//!
//! A [`GameState`] travels as base64 (standard alphabet, padded) over its
//! JSON form, in the `state` query parameter. An `invite` parameter with a
//! non-empty value starts the receiver in two-player mode as O.

use crate::error::TokenError;
use crate::types::GameState;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, instrument, warn};
use url::Url;
use url::form_urlencoded;

/// Query parameter carrying the share token.
pub const STATE_PARAM: &str = "state";

/// Query parameter requesting two-player mode.
pub const INVITE_PARAM: &str = "invite";

/// Encodes a state as a share token.
#[instrument(skip(state))]
pub fn encode_token(state: &GameState) -> Result<String, TokenError> {
    let json = serde_json::to_vec(state)?;
    Ok(STANDARD.encode(json))
}

/// Decodes a share token.
///
/// Spaces are read as `+`, which form decoding turns them into when a
/// token is pasted into a query string without escaping.
#[instrument]
pub fn decode_token(token: &str) -> Result<GameState, TokenError> {
    let token = token.trim().replace(' ', "+");
    if token.is_empty() {
        return Err(TokenError::new("Empty token"));
    }
    let bytes = STANDARD.decode(token.as_bytes())?;
    let state = serde_json::from_slice(&bytes)?;
    Ok(state)
}

/// Query string (without `?`) that shares `state`.
pub fn share_query(state: &GameState) -> Result<String, TokenError> {
    let token = encode_token(state)?;
    Ok(form_urlencoded::Serializer::new(String::new())
        .append_pair(STATE_PARAM, &token)
        .finish())
}

/// How a session should start, as read from a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_new::new)]
pub struct LaunchOptions {
    state: Option<GameState>,
    invite: bool,
}

impl LaunchOptions {
    /// Reads `state` and `invite` from a query string.
    ///
    /// A token that fails to decode is dropped with a warning, leaving a
    /// fresh game.
    #[instrument]
    pub fn from_query(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut options = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                STATE_PARAM => match decode_token(&value) {
                    Ok(state) => options.state = Some(state),
                    Err(e) => {
                        warn!(error = %e, "Ignoring undecodable share token");
                        options.state = None;
                    }
                },
                INVITE_PARAM => options.invite = !value.is_empty(),
                other => debug!(param = other, "Ignoring unknown query parameter"),
            }
        }
        options
    }

    /// Reads options from a full link, or from a bare query string if the
    /// input is not an absolute URL.
    #[instrument]
    pub fn from_link(link: &str) -> Self {
        match Url::parse(link.trim()) {
            Ok(url) => Self::from_query(url.query().unwrap_or_default()),
            Err(e) => {
                debug!(error = %e, "Not an absolute URL, reading as query string");
                Self::from_query(link)
            }
        }
    }

    /// Shared state, if one decoded.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Whether two-player mode was requested.
    pub fn invite(&self) -> bool {
        self.invite
    }
}
