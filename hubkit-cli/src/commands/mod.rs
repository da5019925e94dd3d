//! CLI command implementations

pub mod auth;
pub mod runs;
pub mod search;
pub mod social;

pub use auth::AuthArgs;
pub use runs::RunsArgs;
pub use search::SearchArgs;
pub use social::{FollowsArgs, MemberArgs, StarredArgs};

use hubkit_github::RepoAddress;

/// Parse a `--repo` value: a numeric id, `owner/repo`, or a GitHub URL
pub(crate) fn parse_repo(value: &str) -> anyhow::Result<RepoAddress> {
    if let Ok(id) = value.parse::<i64>() {
        return Ok(RepoAddress::Id(id));
    }
    RepoAddress::parse(value).map_err(|e| anyhow::anyhow!("{}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_forms() {
        assert_eq!(parse_repo("1296269").unwrap(), RepoAddress::Id(1296269));
        assert_eq!(
            parse_repo("octocat/hello-world").unwrap(),
            RepoAddress::new("octocat", "hello-world")
        );
        assert_eq!(
            parse_repo("https://github.com/octocat/hello-world.git").unwrap(),
            RepoAddress::new("octocat", "hello-world")
        );
        assert!(parse_repo("octocat").is_err());
    }
}
