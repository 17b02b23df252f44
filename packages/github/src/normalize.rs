//! Pure mappings from GitHub response shapes to the site schemas.

use std::collections::HashMap;

use optiblog_github_models::{
    Commit, CommitActivity, Contributor, DiscussionNode, Issue, IssueState, Label, Languages,
    Repository, UserProfile,
};
use optiblog_stats_models::{
    ActivityStats, ContributorStats, Discussion, DiscussionAuthor, DiscussionCategory,
    DiscussionReactions, IssueStats, LabelCount, LastCommit, RepositoryStats, TopContributor,
    WeeklyCommits,
};

/// Contributors returned, each enriched with a profile lookup.
pub const PROFILED_CONTRIBUTORS: usize = 10;
pub const TOP_CONTRIBUTORS: usize = 5;
pub const MAX_DISCUSSION_TAGS: usize = 5;

const WEEKS_PER_MONTH: usize = 4;

const CATEGORY_LABELS_EXCLUDED_FROM_TAGS: [&str; 6] = [
    "discussion",
    "question",
    "enhancement",
    "feature",
    "showcase",
    "featured",
];

#[must_use]
pub fn repository_stats(repo: &Repository) -> RepositoryStats {
    RepositoryStats {
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        watchers: repo.watchers_count,
        open_issues: repo.open_issues_count,
        size: repo.size,
        language: repo.language.clone(),
        license: repo.license.as_ref().map(|l| l.name.clone()),
        topics: repo.topics.clone(),
        last_updated: repo.updated_at.clone(),
        created_at: repo.created_at.clone(),
    }
}

/// Line counts are not fetched per contributor, so `additions` and
/// `deletions` stay zero and `commits` mirrors `contributions`.
#[must_use]
pub fn contributor_stats(contributor: &Contributor, profile: Option<&UserProfile>) -> ContributorStats {
    ContributorStats {
        login: contributor.login.clone(),
        avatar_url: contributor.avatar_url.clone(),
        html_url: contributor.html_url.clone(),
        contributions: contributor.contributions,
        additions: 0,
        deletions: 0,
        commits: contributor.contributions,
        name: profile.and_then(|p| p.name.clone()),
        bio: profile.and_then(|p| p.bio.clone()),
        company: profile.and_then(|p| p.company.clone()),
        location: profile.and_then(|p| p.location.clone()),
    }
}

/// Single pass over `issues`.
///
/// `total` is always `open + closed`; issues in any other state are skipped
/// by the counters but their labels are still tallied. Labels are ordered by
/// count, most frequent first, ties in first-seen order.
#[must_use]
pub fn issue_stats(issues: &[Issue]) -> IssueStats {
    let mut open = 0;
    let mut closed = 0;
    let mut labels: Vec<LabelCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for issue in issues {
        match issue.state {
            IssueState::Open => open += 1,
            IssueState::Closed => closed += 1,
            IssueState::Unknown => {}
        }

        for label in &issue.labels {
            if let Some(&i) = index.get(label.name.as_str()) {
                labels[i].count += 1;
                labels[i].color.clone_from(&label.color);
            } else {
                index.insert(label.name.as_str(), labels.len());
                labels.push(LabelCount {
                    name: label.name.clone(),
                    count: 1,
                    color: label.color.clone(),
                });
            }
        }
    }

    labels.sort_by(|a, b| b.count.cmp(&a.count));

    IssueStats {
        total: open + closed,
        open,
        closed,
        labels,
    }
}

/// Normalizes `days` to exactly seven entries, padding with zeros.
#[must_use]
pub fn weekly_commits(activity: &CommitActivity) -> WeeklyCommits {
    let mut days = [0; 7];
    for (slot, count) in days.iter_mut().zip(&activity.days) {
        *slot = *count;
    }

    WeeklyCommits {
        week: activity.week,
        total: activity.total,
        days,
    }
}

#[must_use]
pub fn activity_stats(
    activity: &[CommitActivity],
    commits: &[Commit],
    contributors: &[Contributor],
    languages: Languages,
) -> ActivityStats {
    let commit_activity: Vec<WeeklyCommits> = activity.iter().map(weekly_commits).collect();

    let weekly_commits = commit_activity.last().map_or(0, |w| w.total);
    let monthly_commits = commit_activity
        .iter()
        .rev()
        .take(WEEKS_PER_MONTH)
        .map(|w| w.total)
        .sum();

    let top_contributors = contributors
        .iter()
        .take(TOP_CONTRIBUTORS)
        .map(|c| TopContributor {
            login: c.login.clone(),
            contributions: c.contributions,
            avatar_url: c.avatar_url.clone(),
        })
        .collect();

    let last_commit = commits.first().map(last_commit).unwrap_or_default();

    ActivityStats {
        commit_activity,
        total_commits: commits.len() as u64,
        weekly_commits,
        monthly_commits,
        top_contributors,
        language_stats: languages,
        last_commit,
    }
}

fn last_commit(commit: &Commit) -> LastCommit {
    let author = commit.commit.author.as_ref();

    LastCommit {
        sha: commit.sha.clone(),
        message: commit.commit.message.clone(),
        author: author.map(|a| a.name.clone()).unwrap_or_default(),
        date: author.map(|a| a.date.clone()).unwrap_or_default(),
    }
}

/// Maps an issue labelled `discussion` onto the discussion schema.
#[must_use]
pub fn discussion_from_issue(issue: &Issue) -> Discussion {
    let user = issue.user.clone().unwrap_or_default();
    let reactions = issue.reactions.clone().unwrap_or_default();

    Discussion {
        id: issue.id.to_string(),
        title: issue.title.clone(),
        body: issue.body.clone().unwrap_or_default(),
        author: DiscussionAuthor {
            login: if user.login.is_empty() {
                "unknown".to_string()
            } else {
                user.login
            },
            avatar_url: user.avatar_url,
            html_url: user.html_url,
        },
        category: discussion_category(&issue.labels),
        created_at: issue.created_at.clone(),
        updated_at: issue.updated_at.clone(),
        comments: issue.comments,
        reactions: DiscussionReactions {
            total: reactions.total_count,
            heart: reactions.heart,
            thumbs_up: reactions.plus_one,
            rocket: reactions.rocket,
        },
        url: issue.html_url.clone(),
        tags: discussion_tags(&issue.labels),
        answered: issue.state == IssueState::Closed,
        featured: issue.labels.iter().any(|l| l.name == "featured"),
    }
}

/// Category of the first label that names one, else `General`.
#[must_use]
pub fn discussion_category(labels: &[Label]) -> DiscussionCategory {
    let category = |name: &str, emoji: &str| DiscussionCategory {
        name: name.to_string(),
        emoji: emoji.to_string(),
    };

    for label in labels {
        match label.name.to_lowercase().as_str() {
            "question" | "q&a" => return category("Q&A", "❓"),
            "enhancement" | "feature" | "idea" => return category("Ideas", "💡"),
            "showcase" | "show-and-tell" => return category("Show and tell", "🎉"),
            _ => {}
        }
    }

    category("General", "💬")
}

#[must_use]
pub fn discussion_tags(labels: &[Label]) -> Vec<String> {
    labels
        .iter()
        .filter(|l| !CATEGORY_LABELS_EXCLUDED_FROM_TAGS.contains(&l.name.to_lowercase().as_str()))
        .map(|l| l.name.clone())
        .take(MAX_DISCUSSION_TAGS)
        .collect()
}

/// Maps a GraphQL discussion node onto the discussion schema.
#[must_use]
pub fn discussion_from_node(node: &DiscussionNode) -> Discussion {
    let reaction_count = |content: &str| {
        node.reaction_groups
            .iter()
            .find(|g| g.content == content)
            .map_or(0, |g| g.users.total_count)
    };
    let author = node.author.clone().unwrap_or_default();
    let category = node.category.clone().unwrap_or_default();

    Discussion {
        id: node.id.clone(),
        title: node.title.clone(),
        body: node.body.clone(),
        author: DiscussionAuthor {
            login: if author.login.is_empty() {
                "unknown".to_string()
            } else {
                author.login
            },
            avatar_url: author.avatar_url,
            html_url: author.url,
        },
        category: if category.name.is_empty() {
            discussion_category(&[])
        } else {
            DiscussionCategory {
                name: category.name,
                emoji: category.emoji,
            }
        },
        created_at: node.created_at.clone(),
        updated_at: node.updated_at.clone(),
        comments: node.comments.total_count,
        reactions: DiscussionReactions {
            total: node.reactions.total_count,
            heart: reaction_count("HEART"),
            thumbs_up: reaction_count("THUMBS_UP"),
            rocket: reaction_count("ROCKET"),
        },
        url: node.url.clone(),
        tags: vec![],
        answered: node.answer_chosen_at.is_some(),
        featured: false,
    }
}
