//! Page token codec.
//!
//! A token is the compact JSON form of the effective [`UserFilter`], a `#`
//! and the decimal offset of the next page, encoded as URL-safe base64
//! without padding. Decoding splits on the *last* `#`: the offset segment is
//! digits only, so a `#` inside a filter value never makes the split
//! ambiguous.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use users_directory_sdk::{User, UserFilter, UsersPage};

use crate::domain::error::DomainError;
use crate::domain::repo::ListWindow;

const DELIMITER: char = '#';

/// Tokens longer than this are rejected before decoding.
pub const MAX_TOKEN_LEN: usize = 4096;

/// Largest offset storage can bind as a signed 64-bit integer.
pub const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

#[derive(Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FilterWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
}

impl From<&UserFilter> for FilterWire {
    fn from(f: &UserFilter) -> Self {
        Self {
            first_name: f.first_name.clone(),
            last_name: f.last_name.clone(),
            country: f.country.clone(),
        }
    }
}

impl From<FilterWire> for UserFilter {
    fn from(w: FilterWire) -> Self {
        Self {
            first_name: w.first_name,
            last_name: w.last_name,
            country: w.country,
        }
    }
}

/// Decoded continuation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    pub filter: UserFilter,
    pub offset: u64,
}

impl PageToken {
    /// # Errors
    /// Fails only if the filter cannot be serialized.
    pub fn encode(&self) -> Result<String, DomainError> {
        let filter =
            serde_json::to_string(&FilterWire::from(&self.filter)).map_err(DomainError::PageTokenEncoding)?;
        let raw = format!("{filter}{DELIMITER}{}", self.offset);
        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// # Errors
    /// Any malformed or tampered token is [`DomainError::InvalidPageToken`].
    pub fn decode(token: &str) -> Result<Self, DomainError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(DomainError::invalid_page_token("token too long"));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| DomainError::invalid_page_token("not valid base64"))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| DomainError::invalid_page_token("not valid UTF-8"))?;

        let (filter, offset) = raw
            .rsplit_once(DELIMITER)
            .ok_or_else(|| DomainError::invalid_page_token("missing offset"))?;

        if offset.is_empty() || !offset.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_page_token(
                "offset is not a non-negative integer",
            ));
        }
        let offset = offset
            .parse::<u64>()
            .ok()
            .filter(|o| *o <= MAX_OFFSET)
            .ok_or_else(|| DomainError::invalid_page_token("offset out of range"))?;

        let filter: FilterWire = serde_json::from_str(filter)
            .map_err(|_| DomainError::invalid_page_token("malformed filter"))?;

        Ok(Self {
            filter: filter.into(),
            offset,
        })
    }
}

/// One resolved list call: effective filter, starting offset and page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub filter: UserFilter,
    pub offset: u64,
    pub size: u64,
}

impl PageRequest {
    /// Storage window: one record past the page to learn whether another page exists.
    #[must_use]
    pub fn window(&self) -> ListWindow {
        ListWindow {
            offset: self.offset,
            limit: self.size.saturating_add(1),
        }
    }

    /// Trim the over-fetched record and emit a token when it was present.
    /// A next offset past [`MAX_OFFSET`] ends the listing.
    ///
    /// # Errors
    /// Fails only if the next token cannot be encoded.
    pub fn finish(self, mut users: Vec<User>) -> Result<UsersPage, DomainError> {
        let size = usize::try_from(self.size).unwrap_or(usize::MAX);
        if users.len() <= size {
            return Ok(UsersPage {
                users,
                next_page_token: None,
            });
        }

        users.truncate(size);
        let next_page_token = match self.offset.checked_add(self.size) {
            Some(offset) if offset <= MAX_OFFSET => Some(
                PageToken {
                    filter: self.filter,
                    offset,
                }
                .encode()?,
            ),
            _ => None,
        };
        Ok(UsersPage {
            users,
            next_page_token,
        })
    }
}
