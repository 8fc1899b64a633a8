//! Command-line front end for the book service.
//!
//! # Responsibility
//! - Resolve configuration from the environment plus global flags.
//! - Run one service operation per invocation and print its JSON result.
//! - Report failures as an error body on stderr with exit status 1.

mod args;

use args::{Cli, Command};
use bookstan_core::db::open_db;
use bookstan_core::{
    init_from_config, BookRequest, BookService, BookServiceError, BookStore, CoreConfig,
    ErrorBody, PageRequest, RepoError, SqliteBookStore,
};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(message) = init_from_config(&config) {
        eprintln!("error: {message}");
        return ExitCode::FAILURE;
    }

    if let Command::Ping = cli.command {
        println!("bookstan_core ping={}", bookstan_core::ping());
        println!("bookstan_core version={}", bookstan_core::core_version());
        return ExitCode::SUCCESS;
    }

    let path = cli.command.resource_path();
    match run(&cli.command, &config) {
        Ok(Some(output)) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(failure) => {
            let body = match failure {
                Failure::Service(err) => ErrorBody::from_service_error(&err, path),
                Failure::Payload(err) => {
                    ErrorBody::validation(vec![format!("payload: {err}")], path)
                }
                Failure::Encode(err) => {
                    eprintln!("error: failed to encode result: {err}");
                    return ExitCode::FAILURE;
                }
            };
            match serde_json::to_string_pretty(&body) {
                Ok(text) => eprintln!("{text}"),
                Err(err) => eprintln!("error: failed to encode error body: {err}"),
            }
            ExitCode::FAILURE
        }
    }
}

enum Failure {
    Service(BookServiceError),
    Payload(serde_json::Error),
    Encode(serde_json::Error),
}

impl From<BookServiceError> for Failure {
    fn from(err: BookServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<RepoError> for Failure {
    fn from(err: RepoError) -> Self {
        Self::Service(BookServiceError::from(err))
    }
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db.as_ref() {
        config.db_path = db.clone();
    }
    if let Some(level) = cli.log_level.as_ref() {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = cli.log_dir.as_ref() {
        config.log_dir = Some(log_dir.clone());
    }
    Ok(config)
}

fn run(command: &Command, config: &CoreConfig) -> Result<Option<String>, Failure> {
    let conn = open_db(&config.db_path).map_err(RepoError::from)?;
    let service = BookService::new(SqliteBookStore::try_new(&conn)?);
    info!(
        "event=cli_command module=cli status=start db_path={}",
        config.db_path.display()
    );
    dispatch(&service, command, config.default_page_size)
}

fn dispatch<S: BookStore>(
    service: &BookService<S>,
    command: &Command,
    default_page_size: u32,
) -> Result<Option<String>, Failure> {
    match command {
        Command::Ping => Ok(None),
        Command::Create { json } => {
            let request = parse_payload(json)?;
            render(&service.create(&request)?)
        }
        Command::Get { id } => render(&service.get_by_id(*id)?),
        Command::Update { id, json } => {
            let request = parse_payload(json)?;
            render(&service.update(*id, &request)?)
        }
        Command::Delete { id } => {
            service.delete(*id)?;
            Ok(None)
        }
        Command::List { page, size, sort } => {
            if page.is_none() && size.is_none() && sort.is_empty() {
                return render(&service.list()?);
            }
            let size = size
                .filter(|size| *size > 0)
                .unwrap_or(default_page_size);
            let mut request = PageRequest::of(page.unwrap_or(0), size);
            request.sort = sort.clone();
            render(&service.list_page(&request)?)
        }
    }
}

fn parse_payload(json: &str) -> Result<BookRequest, Failure> {
    serde_json::from_str(json).map_err(Failure::Payload)
}

fn render<T: Serialize>(value: &T) -> Result<Option<String>, Failure> {
    serde_json::to_string_pretty(value)
        .map(Some)
        .map_err(Failure::Encode)
}
