use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

const LIST: &str = "list";
const DETAIL: &str = "detail";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum KeySegment {
    Text(String),
    /// List parameters, kept sorted so equal filters give equal keys.
    Params(BTreeMap<String, String>),
}

/// Cache address of a query, e.g. `["config", "list", {"search": "mail"}]`.
///
/// Keys compare by prefix: [`QueryKey::all`] covers every list and detail key
/// of a resource, which is what mutations invalidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<KeySegment>);

impl QueryKey {
    pub fn all(resource: &str) -> Self {
        Self(vec![KeySegment::Text(resource.to_string())])
    }

    /// Prefix shared by every list key of `resource`.
    pub fn lists(resource: &str) -> Self {
        Self::all(resource).push(KeySegment::Text(LIST.to_string()))
    }

    /// Blank parameter values are dropped, matching how the server reads them.
    pub fn list<K, V, I>(resource: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        Self::lists(resource).push(KeySegment::Params(params))
    }

    pub fn detail(resource: &str, id: impl fmt::Display) -> Self {
        Self::all(resource)
            .push(KeySegment::Text(DETAIL.to_string()))
            .push(KeySegment::Text(id.to_string()))
    }

    fn push(mut self, segment: KeySegment) -> Self {
        self.0.push(segment);
        self
    }

    pub fn segments(&self) -> &[KeySegment] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Parameters of a list key.
    pub fn params(&self) -> Option<&BTreeMap<String, String>> {
        match self.0.as_slice() {
            [_, _, KeySegment::Params(params)] => Some(params),
            _ => None,
        }
    }
}
