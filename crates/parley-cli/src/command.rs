//! REPL input parsing.

use std::path::PathBuf;

use parley_client::{AnalysisKind, DatabaseDescriptor, SummaryRequest, SummaryRole};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat(String),
    Connect(DatabaseDescriptor),
    Upload(PathBuf),
    Disconnect,
    Analyze(AnalysisKind),
    Insights,
    Search(String),
    Summarize(SummaryRequest),
    History,
    Health,
    Metadata,
    Status,
    Notices,
    Clear,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  /connect <db_type> <connection_string> <database> [username password]
  /upload <path>                 upload a document to ask questions about
  /disconnect
  /analyze <schema|quality|performance|business>
  /insights                      generate business insights
  /search <query>                look something up in the document
  /summarize [role] [note...]    role: summarizer, explainer or qa
  /history                       show the backend's record of this chat
  /metadata                      show collections, schema or document info
  /notices                       show recent notifications
  /health  /status  /clear  /help  /quit
Anything else is sent as a chat message.";

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Chat(line.to_string())));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "connect" => Command::Connect(parse_connect(args)?),
        "upload" => {
            if args.is_empty() {
                return Err("usage: /upload <path>".into());
            }
            Command::Upload(PathBuf::from(args))
        }
        "disconnect" => Command::Disconnect,
        "analyze" => Command::Analyze(args.parse()?),
        "insights" => Command::Insights,
        "search" => {
            if args.is_empty() {
                return Err("usage: /search <query>".into());
            }
            Command::Search(args.to_string())
        }
        "summarize" => Command::Summarize(parse_summarize(args)?),
        "history" => Command::History,
        "health" => Command::Health,
        "metadata" => Command::Metadata,
        "status" => Command::Status,
        "notices" | "notifications" => Command::Notices,
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '/{other}' (try /help)")),
    };
    Ok(Some(command))
}

fn parse_connect(args: &str) -> Result<DatabaseDescriptor, String> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        [db_type, connection_string, database] => {
            Ok(DatabaseDescriptor::new(*db_type, *connection_string, *database))
        }
        [db_type, connection_string, database, username, password] => Ok(
            DatabaseDescriptor::new(*db_type, *connection_string, *database)
                .with_credentials(*username, *password),
        ),
        _ => Err(
            "usage: /connect <db_type> <connection_string> <database> [username password]".into(),
        ),
    }
}

fn parse_summarize(args: &str) -> Result<SummaryRequest, String> {
    let (first, rest) = match args.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim()),
        None => (args, ""),
    };
    let (role, note) = match first.parse::<SummaryRole>() {
        Ok(role) => (role, rest),
        Err(_) if first.is_empty() => (SummaryRole::default(), ""),
        Err(_) => (SummaryRole::default(), args),
    };
    Ok(SummaryRequest {
        role,
        note: (!note.is_empty()).then(|| note.to_string()),
    })
}
