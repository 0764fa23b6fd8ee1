use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use github::models::{
    compare::CompareCommit,
    pull_request::PullRequest,
    review::{Review, ReviewState},
    tag::Tag,
};
use serde::Serialize;
use thiserror::Error;

/// Length of the abbreviated commit ids kept in a record.
pub const SHORT_SHA_LEN: usize = 9;

/// Release records of one run, keyed by branch name.
pub type Releases = BTreeMap<String, ReleaseRecord>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchSelector {
    /// Every `release_<major>.<minor>` branch.
    ReleaseLines,
    /// A single development branch, e.g. `devel`.
    Single(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedRepo {
    pub name: String,
    pub branches: BranchSelector,
}

#[derive(Debug, Clone, Error)]
#[error("invalid repository `{0}`, expected `name` or `name:branch`")]
pub struct ParseRepoError(String);

/// Parses `tower` (release lines) or `awx:devel` (single branch).
impl FromStr for TrackedRepo {
    type Err = ParseRepoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();

        let (name, branches) = match value.split_once(':') {
            Some((name, branch)) if !branch.trim().is_empty() => {
                (name.trim(), BranchSelector::Single(branch.trim().to_string()))
            }
            Some(_) => return Err(ParseRepoError(value.to_string())),
            None => (value, BranchSelector::ReleaseLines),
        };

        if name.is_empty() || name.contains('/') {
            return Err(ParseRepoError(value.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            branches,
        })
    }
}

impl fmt::Display for TrackedRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.branches {
            BranchSelector::ReleaseLines => write!(f, "{}", self.name),
            BranchSelector::Single(branch) => write!(f, "{}:{branch}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseBranch {
    pub name: String,
    /// `<major>.<minor>` for release lines, `None` for a development branch.
    pub label: Option<String>,
    pub head_sha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenPullRequest {
    pub title: String,
    pub link: String,
    pub author: String,
    pub opened: DateTime<Utc>,
}

impl From<&PullRequest> for OpenPullRequest {
    fn from(pr: &PullRequest) -> Self {
        Self {
            title: pr.title.clone(),
            link: pr.html_url.clone(),
            author: pr.author().to_string(),
            opened: pr.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchCommit {
    pub sha: String,
    pub author: String,
    pub msg: String,
}

impl From<&CompareCommit> for BranchCommit {
    fn from(commit: &CompareCommit) -> Self {
        Self {
            sha: commit.sha.chars().take(SHORT_SHA_LEN).collect(),
            author: commit.author_login().to_string(),
            msg: commit.commit.message.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Approval {
    pub user: String,
    pub state: ReviewState,
}

impl From<&Review> for Approval {
    fn from(review: &Review) -> Self {
        Self {
            user: review.reviewer().to_string(),
            state: review.state,
        }
    }
}

/// A merged pull request reached from one of the commits ahead of the tag.
#[derive(Debug, Clone, Serialize)]
pub struct AssociatedPullRequest {
    pub number: u64,
    pub body: String,
    pub commit: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub approvals: Vec<Approval>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseRecord {
    pub repository: String,
    pub tag: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    pub opened_prs: Vec<OpenPullRequest>,
    pub opened_pr_count: usize,
    pub ahead_by: u64,
    pub commits: Vec<BranchCommit>,
    /// Keyed by pull request URL.
    pub associated_prs: BTreeMap<String, AssociatedPullRequest>,
}

impl ReleaseRecord {
    pub fn new(repository: &str, tag: &Tag) -> Self {
        Self {
            repository: repository.to_string(),
            tag: tag.name.clone(),
            author: tag.author.clone(),
            date: tag.date,
            opened_prs: Vec::new(),
            opened_pr_count: 0,
            ahead_by: 0,
            commits: Vec::new(),
            associated_prs: BTreeMap::new(),
        }
    }

    pub fn add_open_pull_request(&mut self, pr: &PullRequest) {
        self.opened_prs.push(OpenPullRequest::from(pr));
        self.opened_pr_count = self.opened_prs.len();
    }

    /// Records `pr` as reached through `sha`. Returns `false` when the pull
    /// request is unmerged or already known, so callers skip the review lookup.
    pub fn associate(&mut self, pr: &PullRequest, sha: &str) -> bool {
        if !pr.is_merged() || self.associated_prs.contains_key(&pr.html_url) {
            return false;
        }

        self.associated_prs.insert(
            pr.html_url.clone(),
            AssociatedPullRequest {
                number: pr.number,
                body: pr.body.clone().unwrap_or_default(),
                commit: sha.to_string(),
                merged_at: pr.merged_at,
                approvals: Vec::new(),
            },
        );

        true
    }

    pub fn add_reviews(&mut self, url: &str, reviews: &[Review]) {
        if let Some(associated) = self.associated_prs.get_mut(url) {
            associated
                .approvals
                .extend(reviews.iter().map(Approval::from));
        }
    }
}


#[cfg(test)]
mod test {
    use github::models::tag::Tag;

    use super::{fixtures::pull_request, *};

    #[test]
    fn parse_release_line_repo() {
        let repo: TrackedRepo = "tower".parse().unwrap();

        assert_eq!(repo.name, "tower");
        assert_eq!(repo.branches, BranchSelector::ReleaseLines);
        assert_eq!(repo.to_string(), "tower");
    }

    #[test]
    fn parse_single_branch_repo() {
        let repo: TrackedRepo = " awx:devel ".parse().unwrap();

        assert_eq!(repo.name, "awx");
        assert_eq!(repo.branches, BranchSelector::Single("devel".into()));
        assert_eq!(repo.to_string(), "awx:devel");
    }

    #[test]
    fn reject_malformed_repos() {
        assert!("".parse::<TrackedRepo>().is_err());
        assert!("awx:".parse::<TrackedRepo>().is_err());
        assert!("ansible/awx".parse::<TrackedRepo>().is_err());
    }

    #[test]
    fn associate_deduplicates_by_url() {
        let mut record = ReleaseRecord::new("tower", &Tag::new("4.2.1"));
        let pr = pull_request(3, "release_4.2", true);

        assert!(record.associate(&pr, "aaa"));
        assert!(!record.associate(&pr, "bbb"));

        assert_eq!(record.associated_prs.len(), 1);
        assert_eq!(record.associated_prs[&pr.html_url].commit, "aaa");
    }

    #[test]
    fn associate_ignores_unmerged() {
        let mut record = ReleaseRecord::new("tower", &Tag::new("4.2.1"));

        assert!(!record.associate(&pull_request(4, "release_4.2", false), "aaa"));
        assert!(record.associated_prs.is_empty());
    }

    #[test]
    fn open_pull_requests_update_the_count() {
        let mut record = ReleaseRecord::new("tower", &Tag::new("4.2.1"));

        record.add_open_pull_request(&pull_request(1, "release_4.2", false));
        record.add_open_pull_request(&pull_request(2, "release_4.2", false));

        assert_eq!(record.opened_pr_count, 2);
        assert_eq!(record.opened_prs[1].author, "dev2");
    }
}
