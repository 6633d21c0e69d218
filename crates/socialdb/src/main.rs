//! socialdb CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use socialdb_core::social::{now, NewUser, Outcome, UserUpdate};
use socialdb_core::storage::SocialRepository;

use socialdb::cli::{Cli, Commands};
use socialdb::config::Config;
use socialdb::output::{format_outcome, format_table, format_tables};
use socialdb::service::SocialService;
use socialdb::storage::SqliteRepository;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing subscriber. Logs go to stderr so stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "socialdb=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().with_database(cli.database.clone());
    tracing::debug!(path = %config.database_path, "opening database");

    let repo = SqliteRepository::new(&config.database_path)
        .await
        .with_context(|| format!("failed to open database {}", config.database_path))?;
    let service = SocialService::new(repo);

    run(&service, cli).await
}

/// Execute one command and print its result.
async fn run<R: SocialRepository>(service: &SocialService<R>, cli: Cli) -> Result<ExitCode> {
    let format = cli.format;

    let outcome: Outcome = match cli.command {
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            role,
        } => {
            service
                .register(NewUser::new(first_name, last_name, email, password, role.into()))
                .await
        }
        Commands::Post {
            user_id,
            content,
            date,
        } => {
            service
                .add_post(user_id, &content, date.unwrap_or_else(now))
                .await
        }
        Commands::Comment {
            post_id,
            user_id,
            content,
            date,
        } => {
            service
                .add_comment(post_id, user_id, &content, date.unwrap_or_else(now))
                .await
        }
        Commands::Like {
            post_id,
            user_id,
            date,
        } => {
            service
                .add_like(post_id, user_id, date.unwrap_or_else(now))
                .await
        }
        Commands::Follow {
            user_id,
            follower_id,
            date,
        } => {
            service
                .follow(user_id, follower_id, date.unwrap_or_else(now))
                .await
        }
        Commands::UpdatePost { post_id, content } => service.update_post(post_id, &content).await,
        Commands::UpdateComment {
            comment_id,
            content,
        } => service.update_comment(comment_id, &content).await,
        Commands::UpdateUser {
            user_id,
            first_name,
            last_name,
            email,
            password,
        } => {
            let update = UserUpdate {
                first_name,
                last_name,
                email,
                password,
            };
            service.update_user(user_id, update).await
        }
        Commands::Delete { table, id } => service.delete_record(&table, id).await,
        Commands::List { table } => {
            let data = service.list_table(&table).await?;
            println!("{}", format_table(&data, format));
            return Ok(ExitCode::SUCCESS);
        }
        Commands::ListAll => {
            let tables = service.list_all().await?;
            println!("{}", format_tables(&tables, format));
            return Ok(ExitCode::SUCCESS);
        }
    };

    println!("{}", format_outcome(&outcome, format));
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
