//! OAuth authorization commands

use std::io::{self, BufRead, Write};

use clap::{Args, Subcommand};
use hubkit_github::{
    ApiOptions, Authorization, GitHubClient, NewAuthorization, TwoFactorChallengeResult,
    TwoFactorType,
};

/// Manage OAuth authorizations (requires login + password credentials)
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Create an authorization, prompting for a two-factor code if needed
    Create {
        /// Note describing what the token is for
        #[arg(short, long)]
        note: String,

        /// Scope to grant (repeatable)
        #[arg(short, long = "scope")]
        scopes: Vec<String>,

        /// OAuth application client id; creates an application authorization
        #[arg(long, requires = "client_secret")]
        client_id: Option<String>,

        /// OAuth application client secret
        #[arg(long, env = "HUBKIT_CLIENT_SECRET", hide_env_values = true)]
        client_secret: Option<String>,
    },

    /// List authorizations
    List,

    /// Delete an authorization
    Delete {
        id: i64,

        /// Two-factor code
        #[arg(long)]
        otp: Option<String>,
    },
}

impl AuthArgs {
    pub async fn execute(&self, client: &GitHubClient) -> anyhow::Result<()> {
        let authorizations = client.authorizations();

        match &self.command {
            AuthCommand::Create {
                note,
                scopes,
                client_id,
                client_secret,
            } => {
                let new_authorization = NewAuthorization {
                    scopes: scopes.clone(),
                    note: Some(note.clone()),
                    ..Default::default()
                };

                let authorization = match (client_id, client_secret) {
                    (Some(client_id), Some(client_secret)) => {
                        authorizations
                            .get_or_create_application_authentication_with_two_factor(
                                client_id,
                                client_secret,
                                &new_authorization,
                                prompt_for_code,
                            )
                            .await?
                    }
                    _ => {
                        authorizations
                            .create_with_two_factor(&new_authorization, prompt_for_code)
                            .await?
                    }
                };

                print_authorization(&authorization);
                if let Some(token) = &authorization.token {
                    println!();
                    println!("Token: {}", token);
                    println!("Store it now; it will not be shown again.");
                }
            }
            AuthCommand::List => {
                let all = authorizations.get_all(&ApiOptions::default()).await?;
                if all.is_empty() {
                    println!("No authorizations found.");
                }
                for authorization in &all {
                    print_authorization(authorization);
                }
            }
            AuthCommand::Delete { id, otp } => {
                authorizations.delete(*id, otp.as_deref()).await?;
                println!("Deleted authorization {}", id);
            }
        }

        Ok(())
    }
}

/// Ask on the terminal for a code; typing `resend` requests a new one
async fn prompt_for_code(kind: TwoFactorType) -> hubkit_github::Result<TwoFactorChallengeResult> {
    prompt_on_blocking_thread(kind, io::BufReader::new(io::stdin()), io::stdout()).await
}

/// Terminal reads block, so they run on tokio's blocking pool
async fn prompt_on_blocking_thread<R, W>(
    kind: TwoFactorType,
    mut input: R,
    mut output: W,
) -> hubkit_github::Result<TwoFactorChallengeResult>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    tokio::task::spawn_blocking(move || read_challenge_answer(kind, &mut input, &mut output))
        .await
        .map_err(|e| hubkit_core::Error::Other(format!("Two-factor prompt failed: {}", e)))?
}

fn read_challenge_answer(
    kind: TwoFactorType,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> hubkit_github::Result<TwoFactorChallengeResult> {
    let prompt = match kind {
        TwoFactorType::Sms => "Two-factor code sent by SMS",
        TwoFactorType::AuthenticatorApp => "Two-factor code from your authenticator app",
        TwoFactorType::Unknown => "Two-factor code",
    };
    write!(output, "{} (or 'resend'): ", prompt).map_err(hubkit_core::Error::from)?;
    output.flush().map_err(hubkit_core::Error::from)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(hubkit_core::Error::from)?;

    Ok(parse_challenge_answer(&line))
}

fn parse_challenge_answer(line: &str) -> TwoFactorChallengeResult {
    let answer = line.trim();
    if answer.eq_ignore_ascii_case("resend") {
        TwoFactorChallengeResult::RequestResendCode
    } else {
        TwoFactorChallengeResult::Code(answer.to_string())
    }
}

fn print_authorization(authorization: &Authorization) {
    let app = authorization
        .app
        .as_ref()
        .map(|app| app.name.as_str())
        .unwrap_or("-");
    println!(
        "{:>10}  {:<30} {:<20} [{}]",
        authorization.id,
        authorization.note.as_deref().unwrap_or(""),
        app,
        authorization.scopes.join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_challenge_answer() {
        assert_eq!(
            parse_challenge_answer("resend\n"),
            TwoFactorChallengeResult::RequestResendCode
        );
        assert_eq!(
            parse_challenge_answer(" 123456 \n"),
            TwoFactorChallengeResult::Code("123456".to_string())
        );
    }

    #[test]
    fn test_read_challenge_answer_prompts() {
        let mut input = io::Cursor::new(b"654321\n".to_vec());
        let mut output = Vec::new();

        let answer = read_challenge_answer(TwoFactorType::Sms, &mut input, &mut output).unwrap();

        assert_eq!(answer, TwoFactorChallengeResult::Code("654321".to_string()));
        assert!(String::from_utf8(output).unwrap().contains("sent by SMS"));
    }

    #[tokio::test]
    async fn test_prompt_runs_off_the_async_thread() {
        let input = io::Cursor::new(b"Resend\n".to_vec());

        let answer = prompt_on_blocking_thread(TwoFactorType::AuthenticatorApp, input, io::sink())
            .await
            .unwrap();

        assert_eq!(answer, TwoFactorChallengeResult::RequestResendCode);
    }
}
