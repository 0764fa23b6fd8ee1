use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TAGGER: &str = "Unknown";

pub const TAGS_QUERY: &str = r#"
query GetRepoTagsDescending($owner: String!, $repo: String!, $first: Int!) {
  repository(owner: $owner, name: $repo) {
    refs(
      refPrefix: "refs/tags/"
      first: $first
      orderBy: { field: TAG_COMMIT_DATE, direction: DESC }
    ) {
      edges {
        node {
          name
          target {
            oid
            ... on Tag {
              tagger {
                name
                date
              }
            }
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Serialize)]
pub(crate) struct TagsQueryVariables<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub first: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct GraphQLRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsData {
    pub repository: Option<TagsRepository>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsRepository {
    pub refs: TagsRefs,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsRefs {
    pub edges: Vec<TagsEdge>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsEdge {
    pub node: TagsNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsNode {
    pub name: String,
    pub target: Option<TagsTarget>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsTarget {
    pub oid: String,
    pub tagger: Option<Tagger>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Tagger {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// A tag with the metadata of its annotation, if any.
///
/// Lightweight tags carry no tagger, so `author` falls back to
/// [`UNKNOWN_TAGGER`] and `date` is empty.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub sha: Option<String>,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha: None,
            author: UNKNOWN_TAGGER.into(),
            date: None,
        }
    }
}

impl From<TagsNode> for Tag {
    fn from(node: TagsNode) -> Self {
        let sha = node.target.as_ref().map(|t| t.oid.clone());
        let tagger = node.target.and_then(|t| t.tagger);

        let (author, date) = match tagger {
            Some(Tagger { name, date }) => (name, date),
            None => (None, None),
        };

        Self {
            name: node.name,
            sha,
            author: author.unwrap_or_else(|| UNKNOWN_TAGGER.into()),
            date,
        }
    }
}
