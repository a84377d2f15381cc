//! Line-based front end over the request orchestrator.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use parley_client::{
    ClientError, ConnectOutcome, ConnectionDescriptor, DocumentUpload, MessageId, MetadataSlot,
    RequestOrchestrator, Role, TurnOutcome,
};
use parley_common::NotificationLevel;
use parley_config::schema::AssistantMode;

use crate::command::{self, Command, HELP};
use crate::console::ConsoleSink;

pub struct Repl {
    orchestrator: RequestOrchestrator,
    mode: AssistantMode,
    sink: Arc<ConsoleSink>,
}

enum Flow {
    Continue,
    Quit,
}

impl Repl {
    pub fn new(
        orchestrator: RequestOrchestrator,
        mode: AssistantMode,
        sink: Arc<ConsoleSink>,
    ) -> Self {
        Self {
            orchestrator,
            mode,
            sink,
        }
    }

    /// Read commands from stdin until EOF or `/quit`.
    pub async fn run(&self) -> std::io::Result<()> {
        self.greet();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let command = match command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(usage) => {
                    eprintln!("{usage}");
                    continue;
                }
            };
            match self.dispatch(command).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => eprintln!("{err}"),
            }
        }
        self.orchestrator.disconnect();
        Ok(())
    }

    fn greet(&self) {
        match self.mode {
            AssistantMode::Database => {
                println!("Parley database assistant. Connect with /connect, /help for commands.")
            }
            AssistantMode::Document => {
                println!("Parley document assistant. Upload with /upload, /help for commands.")
            }
        }
        self.print_suggestions();
    }

    fn allowed(&self, command: &Command) -> Result<(), String> {
        let database_only = matches!(
            command,
            Command::Connect(_) | Command::Analyze(_) | Command::Insights
        );
        let document_only = matches!(
            command,
            Command::Upload(_) | Command::Search(_) | Command::Summarize(_)
        );
        match self.mode {
            AssistantMode::Database if document_only => {
                Err("that command needs document mode (--mode document)".into())
            }
            AssistantMode::Document if database_only => {
                Err("that command needs database mode (--mode database)".into())
            }
            _ => Ok(()),
        }
    }

    async fn dispatch(&self, command: Command) -> Result<Flow, ClientError> {
        if let Err(reason) = self.allowed(&command) {
            eprintln!("{reason}");
            return Ok(Flow::Continue);
        }
        debug!(?command, "dispatch");

        match command {
            Command::Chat(text) => self.chat(&text).await?,
            Command::Connect(db) => {
                self.connect(ConnectionDescriptor::Database(db)).await?;
            }
            Command::Upload(path) => self.upload(&path).await?,
            Command::Disconnect => {
                if self.orchestrator.disconnect().is_none() {
                    println!("not connected");
                }
            }
            Command::Analyze(kind) => {
                if let Some(report) = self.orchestrator.run_analysis(kind).await? {
                    if let Some(summary) = &report.summary {
                        println!("{summary}");
                    }
                    print_json(&report.details);
                }
            }
            Command::Insights => {
                if let Some(report) = self.orchestrator.generate_insights().await? {
                    if let Some(summary) = &report.executive_summary {
                        println!("{summary}");
                    }
                    for insight in &report.business_insights {
                        println!("  * {}", compact(insight));
                    }
                    for recommendation in &report.recommendations {
                        println!("  > {}", compact(recommendation));
                    }
                }
            }
            Command::Search(query) => {
                if let Some(result) = self.orchestrator.search(&query).await? {
                    println!("{result}");
                }
            }
            Command::Summarize(request) => {
                if let Some(reply) = self.orchestrator.summarize(request).await? {
                    println!("{}", reply.summary);
                }
            }
            Command::History => {
                let entries = self.orchestrator.fetch_history().await?;
                if entries.is_empty() {
                    println!("no history recorded yet");
                }
                for entry in entries {
                    let when = entry
                        .timestamp
                        .map(|t| t.format("%H:%M:%S ").to_string())
                        .unwrap_or_default();
                    println!("{when}{}: {}", speaker(entry.role), entry.content);
                }
            }
            Command::Health => {
                let report = self.orchestrator.check_health().await?;
                println!(
                    "backend {} ({})",
                    report.status,
                    if report.is_healthy() { "ok" } else { "degraded" }
                );
                if let Some(sessions) = report.active_sessions {
                    println!("active sessions: {sessions}");
                }
            }
            Command::Metadata => self.print_metadata(),
            Command::Status => self.print_status(),
            Command::Notices => self.print_notices(),
            Command::Clear => {
                self.orchestrator.clear_conversation()?;
                self.print_suggestions();
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn chat(&self, text: &str) -> Result<(), ClientError> {
        match self.orchestrator.send(text).await? {
            TurnOutcome::Replied(id) => {
                self.print_message(id);
                self.print_suggestions();
            }
            TurnOutcome::Failed(id) => self.print_message(id),
            TurnOutcome::Discarded => debug!("reply arrived after the session changed"),
        }
        Ok(())
    }

    async fn upload(&self, path: &Path) -> Result<(), ClientError> {
        let upload = match DocumentUpload::from_path(path) {
            Ok(upload) => upload,
            Err(err) => {
                eprintln!("cannot read {}: {err}", path.display());
                return Ok(());
            }
        };
        self.connect(ConnectionDescriptor::Document(upload)).await
    }

    async fn connect(&self, descriptor: ConnectionDescriptor) -> Result<(), ClientError> {
        match self.orchestrator.connect(descriptor).await? {
            ConnectOutcome::Connected(session_id) => {
                debug!(%session_id, "session ready");
                self.print_suggestions();
            }
            ConnectOutcome::Superseded => println!("connection attempt was superseded"),
        }
        Ok(())
    }

    fn print_message(&self, id: MessageId) {
        let messages = self.orchestrator.messages();
        if let Some(message) = messages.iter().find(|m| m.id == id) {
            println!("{}: {}", speaker(message.role), message.content);
        }
    }

    fn print_suggestions(&self) {
        let suggestions = self.orchestrator.suggestions();
        if suggestions.is_empty() {
            return;
        }
        println!("Try:");
        for suggestion in suggestions {
            println!("  - {suggestion}");
        }
    }

    fn print_status(&self) {
        let session = self.orchestrator.session();
        let target = session
            .descriptor
            .as_ref()
            .map(|d| d.label())
            .unwrap_or_else(|| "-".into());
        println!("status:   {}", session.status);
        println!("target:   {target}");
        if let Some(remote_id) = &session.remote_id {
            println!("backend:  {remote_id}");
        }
        println!("messages: {}", self.orchestrator.messages().len());
        println!("pending:  {}", self.orchestrator.pending_count());
    }

    fn print_notices(&self) {
        let recent = self.sink.recent();
        if recent.is_empty() {
            println!("no recent notifications");
        }
        for notice in recent {
            let tag = match notice.level {
                NotificationLevel::Success => "ok",
                NotificationLevel::Error => "error",
            };
            println!(
                "{:>3}s ago [{tag}] {}",
                notice.created_at.elapsed().as_secs(),
                notice.text
            );
        }
    }

    fn print_metadata(&self) {
        let metadata = self.orchestrator.metadata();
        match self.mode {
            AssistantMode::Database => {
                match &metadata.collections {
                    MetadataSlot::Ready(names) => println!("collections: {}", names.join(", ")),
                    MetadataSlot::Unavailable => println!("collections: unavailable"),
                    MetadataSlot::NotLoaded => println!("collections: not loaded"),
                }
                match &metadata.schema {
                    MetadataSlot::Ready(schema) => {
                        if let Some(total) = schema.total_documents {
                            println!("documents:   {total}");
                        }
                    }
                    MetadataSlot::Unavailable => println!("schema:      unavailable"),
                    MetadataSlot::NotLoaded => {}
                }
            }
            AssistantMode::Document => match &metadata.document {
                MetadataSlot::Ready(info) => {
                    print_json(&info.metadata);
                    if let Some(summary) = &info.summary {
                        println!("summary: {summary}");
                    }
                }
                MetadataSlot::Unavailable => println!("document info unavailable"),
                MetadataSlot::NotLoaded => println!("document info not loaded"),
            },
        }
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "assistant",
    }
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

fn print_json(value: &serde_json::Value) {
    if value.is_null() {
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

fn compact(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
