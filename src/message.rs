/// Message module for the pulse-check batch system
///
/// This module defines the data structures exchanged between the job queue,
/// the URL check command and its report callback.
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Raw URL strings as supplied by the caller, blanks and duplicates included.
pub type UrlList = Vec<String>;

/// Reachability flag per URL, iterated in insertion (probe) order.
///
/// Keys are unique. Serializes as a JSON object whose key order matches
/// the insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlStatusMap {
    entries: Vec<(String, bool)>,
}

impl UrlStatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates a status. An existing key keeps its position.
    /// Returns the previous flag if the key was present.
    pub(crate) fn insert(&mut self, url: impl Into<String>, up: bool) -> Option<bool> {
        let url = url.into();
        match self.entries.iter_mut().find(|(key, _)| *key == url) {
            Some((_, status)) => Some(std::mem::replace(status, up)),
            None => {
                self.entries.push((url, up));
                None
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(key, _)| key == url)
            .map(|(_, up)| *up)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(url, up)| (url.as_str(), *up))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(url, _)| url.as_str())
    }

    pub fn up_count(&self) -> usize {
        self.entries.iter().filter(|(_, up)| *up).count()
    }

    pub fn down_count(&self) -> usize {
        self.len() - self.up_count()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for UrlStatusMap {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (url, up) in iter {
            map.insert(url, up);
        }
        map
    }
}

impl Serialize for UrlStatusMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (url, up) in &self.entries {
            map.serialize_entry(url, up)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for UrlStatusMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatusMapVisitor;

        impl<'de> Visitor<'de> for StatusMapVisitor {
            type Value = UrlStatusMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of url to reachability flag")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = UrlStatusMap::new();
                while let Some((url, up)) = access.next_entry::<String, bool>()? {
                    map.insert(url, up);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(StatusMapVisitor)
    }
}

/// Request handed to the URL check command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckUrls {
    pub urls: UrlList,
}

/// Result of the URL check command, and the request of its report callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUrlsResult {
    pub url_statuses: UrlStatusMap,
}

/// Handle to an enqueued background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub id: u64,
    pub ref_id: Uuid,
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.id)
    }
}

/// Caller-facing enqueue request: a newline-delimited block of URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub urls: String,
}

impl EnqueueRequest {
    pub fn new(urls: impl Into<String>) -> Self {
        Self { urls: urls.into() }
    }

    /// Splits the block on `\n`. Blank lines are kept; the batch drops them.
    pub fn into_check_urls(self) -> CheckUrls {
        CheckUrls {
            urls: self.urls.split('\n').map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnqueueResponse {
    pub job_ref: JobRef,
}
