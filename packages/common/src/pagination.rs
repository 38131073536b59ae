use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;

const CURSOR_PREFIX: &str = "idx:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("cursor is not valid hex")]
    Encoding,
    #[error("cursor payload is malformed")]
    Payload,
}

/// Continuation position in a list ordered by descending internal key.
///
/// On the wire the cursor is an opaque hex token; clients pass back whatever
/// `next_cursor` they received without inspecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    idx: i32,
}

impl Cursor {
    pub fn new(idx: i32) -> Self {
        Self { idx }
    }

    /// Rows strictly below this key belong to the next page.
    pub fn idx(&self) -> i32 {
        self.idx
    }

    pub fn encode(&self) -> String {
        hex::encode(format!("{CURSOR_PREFIX}{}", self.idx))
    }

    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = hex::decode(token.trim()).map_err(|_| CursorError::Encoding)?;
        let text = String::from_utf8(bytes).map_err(|_| CursorError::Payload)?;
        let idx = text
            .strip_prefix(CURSOR_PREFIX)
            .and_then(|n| n.parse::<i32>().ok())
            .ok_or(CursorError::Payload)?;
        Ok(Self { idx })
    }
}

/// Clamp a requested page size into `1..=MAX_LIMIT`, defaulting to [`DEFAULT_LIMIT`].
pub fn clamp_limit(limit: Option<u64>) -> u64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// One page of a cursor-paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Token for the following page; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub limit: u64,
}

impl<T> CursorPage<T> {
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_token_is_opaque_hex() {
        let token = Cursor::new(42).encode();
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(Cursor::decode(&token), Ok(Cursor::new(42)));
    }

    #[test]
    fn rejects_garbage_cursors() {
        assert_eq!(Cursor::decode("zz"), Err(CursorError::Encoding));
        assert_eq!(
            Cursor::decode(&hex::encode("page:3")),
            Err(CursorError::Payload)
        );
        assert_eq!(
            Cursor::decode(&hex::encode("idx:abc")),
            Err(CursorError::Payload)
        );
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(7)), 7);
    }

    #[test]
    fn last_page_omits_next_cursor() {
        let page = CursorPage {
            items: vec![1, 2],
            next_cursor: None,
            limit: 20,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("next_cursor").is_none());
        assert!(!page.has_more());
    }
}
