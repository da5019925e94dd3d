//! Followers, organization membership and stars

use clap::{Args, Subcommand};
use hubkit_github::models::User;
use hubkit_github::{
    ApiOptions, GitHubClient, MembersRole, OrganizationMembersFilter, RepoAddress, StarredRequest,
};

use super::parse_repo;

/// Followers of users
#[derive(Args, Debug)]
pub struct FollowsArgs {
    #[command(subcommand)]
    pub command: FollowsCommand,
}

#[derive(Subcommand, Debug)]
pub enum FollowsCommand {
    /// List followers (of the authenticated user if no login is given)
    Followers { login: Option<String> },

    /// List followed users
    Following { login: Option<String> },

    /// Check whether a user follows another
    Check {
        /// User to check
        target: String,

        /// Follower (defaults to the authenticated user)
        #[arg(long)]
        from: Option<String>,
    },

    /// Follow a user
    Follow { login: String },

    /// Stop following a user
    Unfollow { login: String },
}

impl FollowsArgs {
    pub async fn execute(&self, client: &GitHubClient) -> anyhow::Result<()> {
        let followers = client.followers();
        let options = ApiOptions::default();

        match &self.command {
            FollowsCommand::Followers { login } => {
                let users = match login {
                    Some(login) => followers.get_all(login, &options).await?,
                    None => followers.get_all_for_current(&options).await?,
                };
                print_users(&users);
            }
            FollowsCommand::Following { login } => {
                let users = match login {
                    Some(login) => followers.get_all_following(login, &options).await?,
                    None => followers.get_all_following_for_current(&options).await?,
                };
                print_users(&users);
            }
            FollowsCommand::Check { target, from } => {
                let follows = match from {
                    Some(from) => followers.is_following(from, target).await?,
                    None => followers.is_following_for_current(target).await?,
                };
                let who = from.as_deref().unwrap_or("You");
                if follows {
                    println!("{} follow(s) {}", who, target);
                } else {
                    println!("{} do(es) not follow {}", who, target);
                }
            }
            FollowsCommand::Follow { login } => {
                if followers.follow(login).await? {
                    println!("Now following {}", login);
                } else {
                    println!("Could not follow {}", login);
                }
            }
            FollowsCommand::Unfollow { login } => {
                followers.unfollow(login).await?;
                println!("Unfollowed {}", login);
            }
        }

        Ok(())
    }
}

/// Organization membership
#[derive(Args, Debug)]
pub struct MemberArgs {
    #[command(subcommand)]
    pub command: MemberCommand,
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    /// Check whether a user belongs to an organization
    Check {
        org: String,
        user: String,

        /// Check public membership only
        #[arg(long)]
        public: bool,
    },

    /// List organization members
    List {
        org: String,

        /// Only public members
        #[arg(long, conflicts_with = "admins")]
        public: bool,

        /// Only owners
        #[arg(long)]
        admins: bool,
    },
}

impl MemberArgs {
    pub async fn execute(&self, client: &GitHubClient) -> anyhow::Result<()> {
        let members = client.org_members();

        match &self.command {
            MemberCommand::Check { org, user, public } => {
                let is_member = if *public {
                    members.check_member_public(org, user).await?
                } else {
                    members.check_member(org, user).await?
                };
                let scope = if *public { "a public member" } else { "a member" };
                if is_member {
                    println!("{} is {} of {}", user, scope, org);
                } else {
                    println!("{} is not {} of {}", user, scope, org);
                }
            }
            MemberCommand::List {
                org,
                public,
                admins,
            } => {
                let options = ApiOptions::default();
                let users = if *public {
                    members.get_all_public(org, &options).await?
                } else {
                    let filter = OrganizationMembersFilter {
                        role: admins.then_some(MembersRole::Admin),
                        ..Default::default()
                    };
                    members.get_all(org, &filter, &options).await?
                };
                print_users(&users);
            }
        }

        Ok(())
    }
}

/// Stars
#[derive(Args, Debug)]
pub struct StarredArgs {
    #[command(subcommand)]
    pub command: StarredCommand,
}

#[derive(Subcommand, Debug)]
pub enum StarredCommand {
    /// List starred repositories
    List { user: Option<String> },

    /// List users who starred a repository
    Stargazers { repo: String },

    /// Check whether you starred a repository (owner/repo)
    Check { repo: String },

    /// Star a repository (owner/repo)
    Star { repo: String },

    /// Remove your star from a repository (owner/repo)
    Unstar { repo: String },
}

impl StarredArgs {
    pub async fn execute(&self, client: &GitHubClient) -> anyhow::Result<()> {
        let starring = client.starring();
        let options = ApiOptions::default();

        match &self.command {
            StarredCommand::List { user } => {
                let request = StarredRequest::default();
                let repos = match user {
                    Some(user) => starring.get_all_for_user(user, &request, &options).await?,
                    None => starring.get_all_for_current(&request, &options).await?,
                };
                for repo in &repos {
                    println!("{}", repo.full_name);
                }
            }
            StarredCommand::Stargazers { repo } => {
                let users = starring
                    .get_all_stargazers(parse_repo(repo)?, &options)
                    .await?;
                print_users(&users);
            }
            StarredCommand::Check { repo } => {
                let (owner, name) = owner_and_name(repo)?;
                if starring.check_starred(&owner, &name).await? {
                    println!("You starred {}/{}", owner, name);
                } else {
                    println!("You have not starred {}/{}", owner, name);
                }
            }
            StarredCommand::Star { repo } => {
                let (owner, name) = owner_and_name(repo)?;
                starring.star_repo(&owner, &name).await?;
                println!("Starred {}/{}", owner, name);
            }
            StarredCommand::Unstar { repo } => {
                let (owner, name) = owner_and_name(repo)?;
                starring.remove_star_from_repo(&owner, &name).await?;
                println!("Removed star from {}/{}", owner, name);
            }
        }

        Ok(())
    }
}

/// Star endpoints only address repositories by owner and name
fn owner_and_name(value: &str) -> anyhow::Result<(String, String)> {
    match parse_repo(value)? {
        RepoAddress::OwnerName { owner, name } => Ok((owner, name)),
        RepoAddress::Id(_) => anyhow::bail!("Expected owner/repo, got a repository id: {}", value),
    }
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for user in users {
        println!("{}", user.login);
    }
}
