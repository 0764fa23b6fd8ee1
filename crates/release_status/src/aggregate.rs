use github::{errors::ApiError, GithubClient};
use global_utils::print_dbg;
use tracing::{debug, info, instrument};

use crate::{
    models::{BranchCommit, ReleaseRecord, Releases, TrackedRepo},
    select::{attach_open_pull_requests, release_branches, select_releases},
};

type Result<T> = std::result::Result<T, ApiError>;

/// Builds the release records of a set of repositories from scratch.
///
/// Calls are strictly sequential and any API error aborts the whole run:
/// there is no partial result.
pub struct ReleaseAggregator<'a> {
    github: &'a GithubClient,
}

impl<'a> ReleaseAggregator<'a> {
    pub fn new(github: &'a GithubClient) -> Self {
        Self { github }
    }

    #[instrument(skip_all)]
    pub async fn run(&self, repositories: &[TrackedRepo]) -> Result<Releases> {
        let mut releases = Releases::new();

        for repository in repositories {
            releases.extend(self.collect_repository(repository).await?);
        }

        print_dbg!(&releases);

        Ok(releases)
    }

    #[instrument(skip(self), fields(owner = self.github.owner()))]
    async fn collect_repository(&self, repository: &TrackedRepo) -> Result<Releases> {
        let repo = repository.name.as_str();

        info!("Getting current versions");
        let branches = self.github.list_branches(repo).await?;
        let branches = release_branches(&repository.branches, branches);

        info!("Getting {repo} tags");
        let tags = self.github.list_tags(repo).await?;

        let mut releases = select_releases(repo, &branches, &tags);
        debug!(branches = branches.len(), tags = tags.len(), tracked = releases.len());

        info!("Finding opened PRs");
        let open = self.github.list_open_pull_requests(repo).await?;
        let dropped = attach_open_pull_requests(&mut releases, &open);
        debug!(open = open.len(), dropped, "open pull requests attached");

        for (branch, record) in releases.iter_mut() {
            info!("Finding release items for {branch}");
            self.find_release_items(repo, branch, record).await?;
        }

        Ok(releases)
    }

    /// Fills the commits the branch is ahead of its tag, and the merged pull
    /// requests (with reviews) those commits came from.
    async fn find_release_items(
        &self,
        repo: &str,
        branch: &str,
        record: &mut ReleaseRecord,
    ) -> Result<()> {
        let comparison = self.github.compare(repo, &record.tag, branch).await?;

        record.ahead_by = comparison.ahead_by;
        record.commits = comparison.commits.iter().map(BranchCommit::from).collect();

        for commit in &comparison.commits {
            let pull_requests = self.github.commit_pull_requests(repo, &commit.sha).await?;

            for pr in pull_requests {
                if !record.associate(&pr, &commit.sha) {
                    continue;
                }

                let reviews = self.github.pull_request_reviews(repo, pr.number).await?;
                record.add_reviews(&pr.html_url, &reviews);
            }
        }

        Ok(())
    }
}
