use std::sync::LazyLock;

use github::models::{branch::Branch, pull_request::PullRequest, tag::Tag};
use regex::Regex;
use semver::Version;
use tracing::debug;

use crate::models::{BranchSelector, ReleaseBranch, ReleaseRecord, Releases};

/// Tags must be strictly above this version to be selected.
pub const TAG_FLOOR: Version = Version::new(1, 0, 0);

static RELEASE_BRANCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^release_(\d+\.\d+)$").expect("release branch pattern is valid")
});

/// Keeps the branches `selector` tracks and derives their version label.
pub fn release_branches(selector: &BranchSelector, branches: Vec<Branch>) -> Vec<ReleaseBranch> {
    branches
        .into_iter()
        .filter_map(|branch| {
            let label = match selector {
                BranchSelector::ReleaseLines => {
                    Some(RELEASE_BRANCH.captures(&branch.name)?.get(1)?.as_str().to_string())
                }
                BranchSelector::Single(name) if *name == branch.name => None,
                BranchSelector::Single(_) => return None,
            };

            Some(ReleaseBranch {
                name: branch.name,
                label,
                head_sha: branch.commit.sha,
            })
        })
        .collect()
}

/// Highest semantic version among the tags prefixed by `label`. A candidate
/// only replaces the current pick when it is strictly greater, so equal or
/// lower tags never change the outcome.
pub fn select_tag<'a>(label: &str, tags: &'a [Tag]) -> Option<&'a Tag> {
    let floor = TAG_FLOOR;
    let mut selected: Option<(&Tag, Version)> = None;

    for tag in tags.iter().filter(|t| t.name.starts_with(label)) {
        let version = match Version::parse(&tag.name) {
            Ok(version) => version,
            Err(e) => {
                debug!(tag = %tag.name, error = %e, "skipping non-semver tag");
                continue;
            }
        };

        let current = selected.as_ref().map(|(_, v)| v).unwrap_or(&floor);

        if *current < version {
            selected = Some((tag, version));
        }
    }

    selected.map(|(tag, _)| tag)
}

/// Newest tag that is a semantic version. `tags` come newest first.
pub fn latest_tag(tags: &[Tag]) -> Option<&Tag> {
    tags.iter().find(|t| Version::parse(&t.name).is_ok())
}

/// One record per branch that has a qualifying tag. Release lines take the
/// highest tag of their line, a development branch the newest tag overall.
pub fn select_releases(repository: &str, branches: &[ReleaseBranch], tags: &[Tag]) -> Releases {
    branches
        .iter()
        .filter_map(|branch| {
            let tag = match &branch.label {
                Some(label) => select_tag(label, tags),
                None => latest_tag(tags),
            }?;

            Some((branch.name.clone(), ReleaseRecord::new(repository, tag)))
        })
        .collect()
}

/// Appends every pull request to the record of the branch it targets.
/// Returns how many were dropped because their base is not tracked.
pub fn attach_open_pull_requests(releases: &mut Releases, pull_requests: &[PullRequest]) -> usize {
    let mut dropped = 0;

    for pr in pull_requests {
        match releases.get_mut(&pr.base.reference) {
            Some(record) => record.add_open_pull_request(pr),
            None => dropped += 1,
        }
    }

    dropped
}

#[cfg(test)]
mod test {
    use github::models::branch::BranchCommit;

    use super::*;
    use crate::models::fixtures::pull_request;

    fn branch(name: &str) -> Branch {
        Branch {
            name: name.to_string(),
            commit: BranchCommit {
                sha: format!("sha-{name}"),
            },
        }
    }

    fn tags(names: &[&str]) -> Vec<Tag> {
        names.iter().map(|n| Tag::new(*n)).collect()
    }

    #[test]
    fn release_lines_only_match_full_names() {
        let result = release_branches(
            &BranchSelector::ReleaseLines,
            vec![
                branch("release_4.2"),
                branch("release_10.15"),
                branch("release_4.2_hotfix"),
                branch("devel"),
                branch("feature/release_4.3"),
            ],
        );

        let labels: Vec<_> = result
            .iter()
            .map(|b| (b.name.as_str(), b.label.as_deref()))
            .collect();

        assert_eq!(
            labels,
            vec![("release_4.2", Some("4.2")), ("release_10.15", Some("10.15"))]
        );
        assert_eq!(result[0].head_sha, "sha-release_4.2");
    }

    #[test]
    fn single_branch_selector() {
        let result = release_branches(
            &BranchSelector::Single("devel".into()),
            vec![branch("release_4.2"), branch("devel")],
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "devel");
        assert_eq!(result[0].label, None);
    }

    #[test]
    fn development_branch_takes_newest_tag() {
        let branches =
            release_branches(&BranchSelector::Single("devel".into()), vec![branch("devel")]);

        let releases = select_releases("awx", &branches, &tags(&["nightly", "24.6.1", "24.6.0"]));

        assert_eq!(releases["devel"].tag, "24.6.1");
        assert_eq!(releases["devel"].repository, "awx");
    }

    #[test]
    fn development_branch_without_semver_tags_has_no_record() {
        let branches =
            release_branches(&BranchSelector::Single("devel".into()), vec![branch("devel")]);

        assert!(select_releases("awx", &branches, &tags(&["nightly"])).is_empty());
    }

    #[test]
    fn selects_highest_matching_tag() {
        let tags = tags(&["4.2.0", "4.2.3", "4.3.0"]);

        assert_eq!(select_tag("4.2", &tags).map(|t| t.name.as_str()), Some("4.2.3"));
    }

    #[test]
    fn selection_ignores_tag_order() {
        let tags = tags(&["4.2.1", "4.2.10", "4.2.9"]);

        assert_eq!(select_tag("4.2", &tags).map(|t| t.name.as_str()), Some("4.2.10"));
    }

    #[test]
    fn adding_lower_or_equal_tags_keeps_selection() {
        let base = tags(&["4.2.0", "4.2.3"]);
        let before = select_tag("4.2", &base).cloned();

        let mut extended = base.clone();
        extended.extend(tags(&["4.2.1", "4.2.3", "4.2.0"]));

        assert_eq!(select_tag("4.2", &extended).cloned(), before);
    }

    #[test]
    fn floor_and_invalid_tags_are_skipped() {
        let tags = tags(&["1.0.0", "1.0.0-beta", "1.0.x"]);

        assert!(select_tag("1.0", &tags).is_none());
    }

    #[test]
    fn no_matching_tag_means_no_selection() {
        assert!(select_tag("devel", &tags(&["4.2.0"])).is_none());
    }

    #[test]
    fn records_only_for_tagged_branches() {
        let branches = release_branches(
            &BranchSelector::ReleaseLines,
            vec![branch("release_4.2"), branch("release_5.0")],
        );

        let releases = select_releases("tower", &branches, &tags(&["4.2.0", "4.2.1", "4.3.0"]));

        assert_eq!(releases.len(), 1);
        assert_eq!(releases["release_4.2"].tag, "4.2.1");
        assert_eq!(releases["release_4.2"].repository, "tower");
    }

    #[test]
    fn open_pull_requests_partition_by_base() {
        let branches = release_branches(
            &BranchSelector::ReleaseLines,
            vec![branch("release_4.2"), branch("release_4.3")],
        );
        let mut releases = select_releases("tower", &branches, &tags(&["4.2.0", "4.3.0"]));

        let dropped = attach_open_pull_requests(
            &mut releases,
            &[
                pull_request(1, "release_4.2", false),
                pull_request(2, "release_4.3", false),
                pull_request(3, "release_4.2", false),
                pull_request(4, "devel", false),
                pull_request(5, "release_4.2.1", false),
            ],
        );

        assert_eq!(dropped, 2);
        assert_eq!(releases["release_4.2"].opened_pr_count, 2);
        assert_eq!(releases["release_4.3"].opened_pr_count, 1);
    }
}
