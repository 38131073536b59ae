use std::collections::HashMap;

use serde::Deserialize;

use crate::store::{Identifier, Targets};

/// Query parameters accepted by every list endpoint. Documentation only;
/// handlers read the raw query map so resource filters pass through.
#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct ListQueryParams {
    /// Opaque `next_cursor` from the previous page.
    cursor: Option<String>,
    /// Page size, 1-100. Defaults to 20.
    #[param(example = 20)]
    limit: Option<u64>,
    /// Substring matched against the resource's search columns.
    search: Option<String>,
    /// Only rows with this visibility, where the resource has one.
    visible: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ListParamsError {
    #[error("limit is not a number")]
    Limit,
    #[error("visible is not a boolean")]
    Visible,
}

impl ListParamsError {
    pub fn message_key(&self) -> &'static str {
        match self {
            ListParamsError::Limit => "error.invalid_limit",
            ListParamsError::Visible => "error.invalid_visible",
        }
    }
}

/// Parsed list query. Unknown keys become equality filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub cursor: Option<String>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub visible: Option<bool>,
    pub filters: Vec<(String, String)>,
}

impl ListParams {
    /// Blank values count as absent.
    pub fn from_query(query: HashMap<String, String>) -> Result<Self, ListParamsError> {
        let mut params = ListParams::default();

        for (key, raw) in query {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "cursor" => params.cursor = Some(value.to_string()),
                "limit" => {
                    params.limit = Some(value.parse().map_err(|_| ListParamsError::Limit)?);
                }
                "search" => params.search = Some(value.to_string()),
                "visible" => {
                    params.visible = Some(match value {
                        "true" | "1" => true,
                        "false" | "0" => false,
                        _ => return Err(ListParamsError::Visible),
                    });
                }
                _ => params.filters.push((key, value.to_string())),
            }
        }

        params.filters.sort();
        Ok(params)
    }
}

/// Body of bulk mutations. Any mix of keys and uids, singular or plural.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct TargetPayload {
    /// Single row, by internal key or uid.
    #[schema(example = "42")]
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_ids")]
    pub ids: Option<Vec<String>>,
    pub uid: Option<String>,
    pub uids: Option<Vec<String>>,
}

impl TargetPayload {
    /// `id`/`ids` entries are read like path segments: digits address the
    /// internal key, anything else the uid.
    pub fn targets(&self) -> Targets {
        let mut targets = Targets::default();

        let ids = self.id.iter().chain(self.ids.iter().flatten());
        for id in ids {
            match Identifier::parse(id) {
                Identifier::Idx(idx) => targets.idx.push(idx),
                Identifier::Uid(uid) if !uid.is_empty() => targets.uids.push(uid),
                Identifier::Uid(_) => {}
            }
        }

        let uids = self.uid.iter().chain(self.uids.iter().flatten());
        targets.uids.extend(
            uids.map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        );

        targets.idx.sort_unstable();
        targets.idx.dedup();
        targets.uids.sort();
        targets.uids.dedup();
        targets
    }
}

/// Body of the status mutation.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct StatusPayload {
    #[serde(flatten)]
    pub targets: TargetPayload,
    #[schema(example = "paid")]
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Accept `"id": 42` as well as `"id": "42"`.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn lenient_ids<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<RawId>>::deserialize(deserializer)?
        .map(|ids| ids.into_iter().map(String::from).collect()))
}
