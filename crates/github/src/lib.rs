use errors::*;
use models::{
    branch::Branch,
    compare::Comparison,
    pull_request::{PullRequest, PullRequestState},
    review::Review,
    tag::{GraphQLRequest, GraphQLResponse, Tag, TagsData, TagsQueryVariables, TAGS_QUERY},
};
use reqwest::header::*;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub mod errors;
pub mod models;

type Result<T> = std::result::Result<T, ApiError>;

/// Page size for every paginated REST endpoint.
pub const PAGE_SIZE: usize = 100;

/// Number of most recent tags fetched per repository.
pub const TAG_LIMIT: usize = 100;

/// Hourly request limit GitHub grants to unauthenticated clients. Seeing it
/// means the token was ignored and a full run would overrun it.
pub const UNAUTHENTICATED_RATE_LIMIT: u64 = 60;

const RATE_LIMIT_HEADER: &str = "x-ratelimit-limit";
const RATE_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RATE_RESET_HEADER: &str = "x-ratelimit-reset";

fn make_client() -> Result<reqwest::Client> {
    reqwest::ClientBuilder::new()
        .default_headers(get_headers())
        .build()
        .map_err(|e| ApiError::GenericError(e.to_string()))
}

fn get_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github.v3+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("relnotify"));

    headers
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

fn check_rate_limit(headers: &HeaderMap) -> Result<()> {
    if let Some(limit) = header_number(headers, RATE_LIMIT_HEADER) {
        if limit <= UNAUTHENTICATED_RATE_LIMIT {
            return Err(ApiError::RateLimited(format!(
                "request limit is {limit}, the access token was not accepted"
            )));
        }
    }

    if header_number(headers, RATE_REMAINING_HEADER) == Some(0) {
        let reset = header_number(headers, RATE_RESET_HEADER)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".into());

        return Err(ApiError::RateLimited(format!(
            "no requests remaining, window resets at {reset}"
        )));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub enum Param {
    Page(usize),
    PerPage(usize),
    State(PullRequestState),
}

#[allow(clippy::from_over_into)]
impl Into<(String, String)> for Param {
    fn into(self) -> (String, String) {
        match self {
            Self::Page(value) => ("page".to_string(), value.to_string()),
            Self::PerPage(value) => ("per_page".to_string(), value.to_string()),
            Self::State(value) => ("state".to_string(), value.to_string()),
        }
    }
}

/// Per-run handle on the GitHub API, scoped to one repository owner.
///
/// Every run builds its own client, so nothing here is shared between
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    owner: String,
    token: SecretString,
}

impl GithubClient {
    pub fn new(base_url: &str, owner: &str, token: SecretString) -> Result<Self> {
        Ok(Self {
            http: make_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            token,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    fn make_url<I>(&self, path: &str, params: I) -> Result<reqwest::Url>
    where
        I: IntoIterator<Item = Param>,
    {
        let params: Vec<(String, String)> = params.into_iter().map(|p| p.into()).collect();
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        reqwest::Url::parse_with_params(&url, params).map_err(|_| ApiError::UrlParsing)
    }

    fn repo_path(&self, repo: &str, rest: &str) -> String {
        format!("repos/{}/{repo}/{rest}", self.owner)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| ApiError::GenericError(e.to_string()))?;

        check_rate_limit(response.headers())?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::GenericError(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::HTTP(status.as_u16(), body));
        }

        Ok(body)
    }

    pub async fn fetch<T, I>(&self, path: &str, params: I) -> Result<T>
    where
        I: IntoIterator<Item = Param>,
        T: DeserializeOwned,
    {
        let url = self.make_url(path, params)?;
        debug!(%url, "GET");

        let body = self.send(self.http.get(url)).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::unexpected(path, e))
    }

    /// Walks a list endpoint page by page. A page shorter than
    /// [`PAGE_SIZE`] is the last one.
    pub async fn fetch_all<T, I>(&self, path: &str, params: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = Param> + Clone,
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let mut page_params: Vec<Param> = params.clone().into_iter().collect();
            page_params.extend([Param::PerPage(PAGE_SIZE), Param::Page(page)]);

            let batch: Vec<T> = self.fetch(path, page_params).await?;
            let len = batch.len();
            items.extend(batch);

            if len != PAGE_SIZE {
                break;
            }

            page += 1;
        }

        Ok(items)
    }

    pub async fn post<T, P>(&self, path: &str, payload: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let url = self.make_url(path, [])?;
        debug!(%url, "POST");

        let body = self.send(self.http.post(url).json(payload)).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::unexpected(path, e))
    }

    pub async fn list_branches(&self, repo: &str) -> Result<Vec<Branch>> {
        self.fetch_all(&self.repo_path(repo, "branches"), []).await
    }

    pub async fn list_open_pull_requests(&self, repo: &str) -> Result<Vec<PullRequest>> {
        self.fetch_all(
            &self.repo_path(repo, "pulls"),
            [Param::State(PullRequestState::Open)],
        )
        .await
    }

    /// Most recent tags first, at most [`TAG_LIMIT`] of them.
    pub async fn list_tags(&self, repo: &str) -> Result<Vec<Tag>> {
        let request = GraphQLRequest {
            query: TAGS_QUERY,
            variables: TagsQueryVariables {
                owner: &self.owner,
                repo,
                first: TAG_LIMIT,
            },
        };

        let response: GraphQLResponse<TagsData> = self.post("graphql", &request).await?;

        if !response.errors.is_empty() {
            let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();

            return Err(ApiError::unexpected("graphql", messages.join("; ")));
        }

        let repository = response
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| {
                ApiError::unexpected("graphql", format!("repository `{repo}` missing"))
            })?;

        Ok(repository
            .refs
            .edges
            .into_iter()
            .map(|edge| Tag::from(edge.node))
            .collect())
    }

    /// Commits reachable from `head` but not from `base`. The commit list is
    /// paged like any other list endpoint.
    pub async fn compare(&self, repo: &str, base: &str, head: &str) -> Result<Comparison> {
        let path = self.repo_path(repo, &format!("compare/{base}...{head}"));
        let mut page = 1;

        let mut comparison: Comparison = self
            .fetch(&path, [Param::PerPage(PAGE_SIZE), Param::Page(page)])
            .await?;
        let mut len = comparison.commits.len();

        while len == PAGE_SIZE {
            page += 1;

            let next: Comparison = self
                .fetch(&path, [Param::PerPage(PAGE_SIZE), Param::Page(page)])
                .await?;
            len = next.commits.len();
            comparison.commits.extend(next.commits);
        }

        Ok(comparison)
    }

    pub async fn commit_pull_requests(&self, repo: &str, sha: &str) -> Result<Vec<PullRequest>> {
        self.fetch_all(&self.repo_path(repo, &format!("commits/{sha}/pulls")), [])
            .await
    }

    pub async fn pull_request_reviews(&self, repo: &str, number: u64) -> Result<Vec<Review>> {
        self.fetch_all(&self.repo_path(repo, &format!("pulls/{number}/reviews")), [])
            .await
    }
}
