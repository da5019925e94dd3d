//! Search commands

use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use hubkit_github::models::SortDirection;
use hubkit_github::search::{
    DateRange, Language, Range, RepoSearchSort, SearchRepositoriesRequest, SearchRequest,
    SearchUsersRequest, UsersSearchSort,
};
use hubkit_github::GitHubClient;

/// Search users and repositories
#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub command: SearchCommand,
}

#[derive(Subcommand, Debug)]
pub enum SearchCommand {
    /// Search users and organizations
    Users {
        /// Free-text term
        #[arg(default_value = "")]
        term: String,

        /// Number of public repositories (e.g. ">5", "10..20")
        #[arg(long)]
        repos: Option<Range>,

        /// Number of followers
        #[arg(long)]
        followers: Option<Range>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        language: Option<String>,

        /// Only accounts created on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        created_after: Option<DateTime<FixedOffset>>,

        #[arg(long)]
        sort: Option<UserSort>,

        #[arg(long, default_value = "desc")]
        order: Order,

        #[arg(long, default_value = "30")]
        per_page: u32,
    },

    /// Search repositories
    Repos {
        #[arg(default_value = "")]
        term: String,

        /// Star count (e.g. ">=100")
        #[arg(long)]
        stars: Option<Range>,

        #[arg(long)]
        language: Option<String>,

        /// Only repositories owned by this user
        #[arg(long)]
        user: Option<String>,

        /// Only repositories owned by this organization
        #[arg(long)]
        org: Option<String>,

        #[arg(long)]
        topic: Option<String>,

        /// Only repositories pushed on or after this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        pushed_after: Option<DateTime<FixedOffset>>,

        #[arg(long)]
        sort: Option<RepoSort>,

        #[arg(long, default_value = "desc")]
        order: Order,

        #[arg(long, default_value = "30")]
        per_page: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UserSort {
    Followers,
    Repositories,
    Joined,
}

impl From<UserSort> for UsersSearchSort {
    fn from(sort: UserSort) -> Self {
        match sort {
            UserSort::Followers => UsersSearchSort::Followers,
            UserSort::Repositories => UsersSearchSort::Repositories,
            UserSort::Joined => UsersSearchSort::Joined,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepoSort {
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl From<RepoSort> for RepoSearchSort {
    fn from(sort: RepoSort) -> Self {
        match sort {
            RepoSort::Stars => RepoSearchSort::Stars,
            RepoSort::Forks => RepoSearchSort::Forks,
            RepoSort::HelpWantedIssues => RepoSearchSort::HelpWantedIssues,
            RepoSort::Updated => RepoSearchSort::Updated,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Order {
    Asc,
    Desc,
}

impl From<Order> for SortDirection {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortDirection::Asc,
            Order::Desc => SortDirection::Desc,
        }
    }
}

/// Midnight UTC at the start of a `YYYY-MM-DD` date
fn parse_date(value: &str) -> Result<DateTime<FixedOffset>, String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {}", value, e))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date '{}'", value))?;
    Ok(midnight.and_utc().fixed_offset())
}

impl SearchArgs {
    /// Execute the search command
    pub async fn execute(&self, client: &GitHubClient, verbose: bool) -> anyhow::Result<()> {
        let search = client.search();

        match &self.command {
            SearchCommand::Users {
                term,
                repos,
                followers,
                location,
                language,
                created_after,
                sort,
                order,
                per_page,
            } => {
                let mut request = SearchUsersRequest::new(term.as_str());
                request.repositories = *repos;
                request.followers = *followers;
                request.location = location.clone();
                request.language = language.as_deref().map(Language::from);
                request.created = created_after.map(DateRange::GreaterThanOrEqual);
                request.sort = sort.map(Into::into);
                request.paging.order = (*order).into();
                request.paging.per_page = *per_page;

                if verbose {
                    println!("Query: {}", request.query()?);
                }

                let results = search.search_users(&request).await?;
                for user in &results.items {
                    println!("{:<30} {}", user.login, user.html_url.as_deref().unwrap_or(""));
                }
                print_total(results.items.len(), results.total_count, results.incomplete_results);
            }
            SearchCommand::Repos {
                term,
                stars,
                language,
                user,
                org,
                topic,
                pushed_after,
                sort,
                order,
                per_page,
            } => {
                let mut request = SearchRepositoriesRequest::new(term.as_str());
                request.stars = *stars;
                request.language = language.as_deref().map(Language::from);
                request.user = user.clone();
                request.org = org.clone();
                request.topic = topic.clone();
                request.pushed = pushed_after.map(DateRange::GreaterThanOrEqual);
                request.sort = sort.map(Into::into);
                request.paging.order = (*order).into();
                request.paging.per_page = *per_page;

                if verbose {
                    println!("Query: {}", request.query()?);
                }

                let results = search.search_repositories(&request).await?;
                for repo in &results.items {
                    println!(
                        "{:<40} {:>7} stars  {}",
                        repo.full_name,
                        repo.stargazers_count,
                        repo.description.as_deref().unwrap_or("")
                    );
                }
                print_total(results.items.len(), results.total_count, results.incomplete_results);
            }
        }

        Ok(())
    }
}

fn print_total(shown: usize, total: u64, incomplete: bool) {
    println!();
    if incomplete {
        println!("Showing {} of {} results (incomplete)", shown, total);
    } else {
        println!("Showing {} of {} results", shown, total);
    }
}
