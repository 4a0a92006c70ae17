use std::collections::BTreeMap;

use xmlrpc::Value;

/// One SearchSubtitles criterion, built fluently.
///
/// Only fields that were set are emitted. A single SearchSubtitles call
/// carries an array of criteria and the server treats each independently,
/// so several `SearchQuery` values can be sent at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    sublanguageid: Option<String>,
    moviehash: Option<String>,
    moviebytesize: Option<i64>,
    imdbid: Option<String>,
    query: Option<String>,
    season: Option<i32>,
    episode: Option<i32>,
    tag: Option<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to a comma-separated list of ISO 639-2 language ids.
    pub fn language<S: Into<String>>(mut self, sublanguageid: S) -> Self {
        self.sublanguageid = Some(sublanguageid.into());
        self
    }

    /// Match by the OpenSubtitles hash of the video file. The API requires
    /// the file size alongside the hash.
    pub fn movie_hash<S: Into<String>>(mut self, hash: S, byte_size: i64) -> Self {
        self.moviehash = Some(hash.into());
        self.moviebytesize = Some(byte_size);
        self
    }

    /// Match by IMDb id, digits only (no "tt" prefix).
    pub fn imdb_id<S: Into<String>>(mut self, imdbid: S) -> Self {
        self.imdbid = Some(imdbid.into());
        self
    }

    /// Full-text title search.
    pub fn text<S: Into<String>>(mut self, query: S) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn season(mut self, season: i32) -> Self {
        self.season = Some(season);
        self
    }

    pub fn episode(mut self, episode: i32) -> Self {
        self.episode = Some(episode);
        self
    }

    /// Match by release or file name tag.
    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Convert into the struct value SearchSubtitles expects.
    pub fn into_value(self) -> Value {
        let mut members = BTreeMap::new();
        if let Some(sublanguageid) = self.sublanguageid {
            members.insert("sublanguageid".to_string(), Value::String(sublanguageid));
        }
        if let Some(moviehash) = self.moviehash {
            members.insert("moviehash".to_string(), Value::String(moviehash));
        }
        if let Some(moviebytesize) = self.moviebytesize {
            members.insert("moviebytesize".to_string(), Value::Int64(moviebytesize));
        }
        if let Some(imdbid) = self.imdbid {
            members.insert("imdbid".to_string(), Value::String(imdbid));
        }
        if let Some(query) = self.query {
            members.insert("query".to_string(), Value::String(query));
        }
        if let Some(season) = self.season {
            members.insert("season".to_string(), Value::Int(season));
        }
        if let Some(episode) = self.episode {
            members.insert("episode".to_string(), Value::Int(episode));
        }
        if let Some(tag) = self.tag {
            members.insert("tag".to_string(), Value::String(tag));
        }
        Value::Struct(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(value: Value) -> BTreeMap<String, Value> {
        match value {
            Value::Struct(members) => members,
            other => panic!("expected struct, got {other:?}"),
        }
    }

    #[test]
    fn empty_query_emits_no_members() {
        let members = members(SearchQuery::new().into_value());
        assert!(members.is_empty());
    }

    #[test]
    fn hash_query_carries_hash_and_size() {
        let members = members(
            SearchQuery::new()
                .movie_hash("8e245d9679d31e12", 12_909_756)
                .into_value(),
        );
        assert_eq!(
            members.get("moviehash"),
            Some(&Value::String("8e245d9679d31e12".to_string()))
        );
        assert_eq!(members.get("moviebytesize"), Some(&Value::Int64(12_909_756)));
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn text_query_with_language_and_episode() {
        let members = members(
            SearchQuery::new()
                .text("the matrix")
                .language("eng,cze")
                .season(1)
                .episode(3)
                .into_value(),
        );
        assert_eq!(
            members.get("query"),
            Some(&Value::String("the matrix".to_string()))
        );
        assert_eq!(
            members.get("sublanguageid"),
            Some(&Value::String("eng,cze".to_string()))
        );
        assert_eq!(members.get("season"), Some(&Value::Int(1)));
        assert_eq!(members.get("episode"), Some(&Value::Int(3)));
    }

    #[test]
    fn imdb_and_tag_are_strings() {
        let members = members(
            SearchQuery::new()
                .imdb_id("0133093")
                .tag("the.matrix.1999.srt")
                .into_value(),
        );
        assert_eq!(
            members.get("imdbid"),
            Some(&Value::String("0133093".to_string()))
        );
        assert_eq!(
            members.get("tag"),
            Some(&Value::String("the.matrix.1999.srt".to_string()))
        );
    }
}
