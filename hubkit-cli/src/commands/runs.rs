//! Workflow run commands

use std::path::PathBuf;

use clap::{Args, Subcommand};
use hubkit_github::{
    ApiOptions, CheckRunStatusFilter, GitHubClient, WorkflowRun, WorkflowRunsRequest,
};

use super::parse_repo;

/// GitHub Actions workflow runs
#[derive(Args, Debug)]
pub struct RunsArgs {
    #[command(subcommand)]
    pub command: RunsCommand,
}

#[derive(Subcommand, Debug)]
pub enum RunsCommand {
    /// List workflow runs
    List {
        /// Repository (owner/repo, URL, or numeric id)
        #[arg(short, long)]
        repo: String,

        /// Only runs of this workflow (id or file name)
        #[arg(short, long)]
        workflow: Option<String>,

        /// Filter by branch
        #[arg(short, long)]
        branch: Option<String>,

        /// Filter by status or conclusion (e.g. in_progress, failure)
        #[arg(short, long, value_parser = parse_status)]
        status: Option<CheckRunStatusFilter>,

        /// Filter by the user who triggered the run
        #[arg(long)]
        actor: Option<String>,

        /// Runs per page
        #[arg(long, default_value = "30")]
        per_page: u32,

        /// Maximum number of pages to fetch
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Show a single run
    Get {
        #[arg(short, long)]
        repo: String,

        /// Run id
        id: i64,
    },

    /// Approve a run from a fork
    Approve {
        #[arg(short, long)]
        repo: String,

        id: i64,
    },

    /// Download the log archive of a run
    Logs {
        #[arg(short, long)]
        repo: String,

        id: i64,

        /// Where to write the zip archive
        #[arg(short, long, default_value = "logs.zip")]
        output: PathBuf,
    },
}

fn parse_status(value: &str) -> Result<CheckRunStatusFilter, String> {
    value.parse()
}

impl RunsArgs {
    /// Execute the runs command
    pub async fn execute(&self, client: &GitHubClient, verbose: bool) -> anyhow::Result<()> {
        let actions = client.actions();

        match &self.command {
            RunsCommand::List {
                repo,
                workflow,
                branch,
                status,
                actor,
                per_page,
                pages,
            } => {
                let repo = parse_repo(repo)?;
                let request = WorkflowRunsRequest {
                    actor: actor.clone(),
                    branch: branch.clone(),
                    status: *status,
                    ..Default::default()
                };
                let options = ApiOptions::new().page_size(*per_page).page_count(*pages);

                if verbose {
                    println!("Fetching workflow runs for {}...", repo);
                }

                let runs = match workflow {
                    Some(workflow) => {
                        actions
                            .list_by_workflow(&repo, workflow, &request, &options)
                            .await?
                    }
                    None => actions.list(&repo, &request, &options).await?,
                };

                if runs.workflow_runs.is_empty() {
                    println!("No workflow runs found.");
                    return Ok(());
                }

                for run in &runs.workflow_runs {
                    print_run_line(run);
                }
                println!();
                println!(
                    "Showing {} of {} runs",
                    runs.workflow_runs.len(),
                    runs.total_count
                );
            }
            RunsCommand::Get { repo, id } => {
                let run = actions.get(parse_repo(repo)?, *id).await?;
                print_run_details(&run);
            }
            RunsCommand::Approve { repo, id } => {
                actions.approve(parse_repo(repo)?, *id).await?;
                println!("Approved run {}", id);
            }
            RunsCommand::Logs { repo, id, output } => {
                let bytes = actions.get_logs(parse_repo(repo)?, *id).await?;
                std::fs::write(output, &bytes)?;
                println!("Wrote {} bytes to {}", bytes.len(), output.display());
            }
        }

        Ok(())
    }
}

fn print_run_line(run: &WorkflowRun) {
    println!(
        "{:>12}  {:<12} {:<10} {:<20} {}",
        run.id,
        run.status.as_deref().unwrap_or("-"),
        run.conclusion.as_deref().unwrap_or("-"),
        run.head_branch.as_deref().unwrap_or("-"),
        run.name.as_deref().unwrap_or(&run.event),
    );
}

fn print_run_details(run: &WorkflowRun) {
    println!("Run #{} ({})", run.run_number, run.id);
    println!("  Workflow:   {}", run.name.as_deref().unwrap_or("(unnamed)"));
    println!("  Event:      {}", run.event);
    println!("  Branch:     {}", run.head_branch.as_deref().unwrap_or("-"));
    println!("  Commit:     {}", run.head_sha);
    println!("  Status:     {}", run.status.as_deref().unwrap_or("-"));
    println!("  Conclusion: {}", run.conclusion.as_deref().unwrap_or("-"));
    println!("  Created:    {}", run.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(url) = &run.html_url {
        println!("  URL:        {}", url);
    }
}
