use crate::models::{ReleaseRecord, Releases};

/// Posted instead of an empty summary, which Slack would reject.
pub const NO_RELEASES: &str = "No tagged release branches found.";

pub fn acknowledgement(user: &str) -> String {
    format!(":robot_face: <@{user}> Working on it")
}

/// Chat text for one release line: tag, open PR count and, when there are
/// any, a code block listing them.
pub fn format_release(record: &ReleaseRecord) -> String {
    let mut message = format!(
        "*{tag}:*\n*Open PRs: {count}*\n\n",
        tag = record.tag,
        count = record.opened_pr_count
    );

    if record.opened_prs.is_empty() {
        return message;
    }

    message.push_str("```\n");
    for pr in &record.opened_prs {
        message.push_str(&format!("- {}\n  {}   {}\n", pr.title, pr.author, pr.link));
    }
    message.push_str("```\n\n");

    message
}

pub fn format_releases(releases: &Releases) -> String {
    if releases.is_empty() {
        return NO_RELEASES.to_string();
    }

    releases.values().map(format_release).collect()
}
