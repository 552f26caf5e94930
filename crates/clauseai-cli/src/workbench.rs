//! Interactive clause-review session.
//!
//! Reads one command per line from stdin and dispatches it into the store.
//! Analyses run as background tasks; their outcomes come back over a channel
//! and are reported between commands, so the prompt stays usable while a
//! request is pending.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use clauseai_client::Analyzer;
use clauseai_core::{ClauseId, Severity};
use clauseai_store::{AnalysisOutcome, ClauseStore, complete_analysis};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::display::{render_clause_list, render_report};

const HELP: &str = "\
Commands:
  new                 create an empty clause and select it
  list                show all clauses
  select <id>         switch the active clause
  delete [id]         delete a clause (default: the active one)
  text <content>      replace the active clause text (\\n for newlines)
  load <file.pdf>     extract a PDF into the active clause
  clear               empty the active clause text
  analyze             send the active clause for analysis
  show                show the active clause report
  apply               replace the clause text with the suggested rewrite
  dismiss             hide the suggested rewrite
  help                show this help
  quit                leave the workbench";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    New,
    List,
    Select(ClauseId),
    Delete(Option<ClauseId>),
    Text(String),
    Load(PathBuf),
    Clear,
    Analyze,
    Show,
    Apply,
    Dismiss,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let parse_id = |raw: &str| {
            raw.parse::<ClauseId>()
                .map_err(|_| format!("not a clause id: {raw}"))
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "new" => Command::New,
            "list" | "ls" => Command::List,
            "select" | "sel" => {
                if rest.is_empty() {
                    return Err("usage: select <id>".into());
                }
                Command::Select(parse_id(rest)?)
            }
            "delete" | "rm" => {
                if rest.is_empty() {
                    Command::Delete(None)
                } else {
                    Command::Delete(Some(parse_id(rest)?))
                }
            }
            "text" => Command::Text(rest.replace("\\n", "\n")),
            "load" => {
                if rest.is_empty() {
                    return Err("usage: load <file.pdf>".into());
                }
                Command::Load(PathBuf::from(rest))
            }
            "clear" => Command::Clear,
            "analyze" | "run" => Command::Analyze,
            "show" => Command::Show,
            "apply" => Command::Apply,
            "dismiss" => Command::Dismiss,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(Some(command))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Workbench {
    store: Arc<Mutex<ClauseStore>>,
    analyzer: Arc<dyn Analyzer>,
    /// Entries whose suggested rewrite the user has dismissed.
    dismissed: HashSet<ClauseId>,
    outcomes: mpsc::UnboundedSender<AnalysisOutcome>,
}

impl Workbench {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
    ) -> (Self, mpsc::UnboundedReceiver<AnalysisOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let workbench = Self {
            store: Arc::new(Mutex::new(ClauseStore::new())),
            analyzer,
            dismissed: HashSet::new(),
            outcomes: tx,
        };
        (workbench, rx)
    }

    #[cfg(test)]
    pub fn store(&self) -> &Arc<Mutex<ClauseStore>> {
        &self.store
    }

    /// Drive the session until `quit` or end of input.
    pub async fn run(
        mut self,
        mut outcomes: mpsc::UnboundedReceiver<AnalysisOutcome>,
    ) -> anyhow::Result<()> {
        println!("ClauseAI workbench. Type `help` for commands.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match Command::parse(&line) {
                        Ok(Some(command)) => {
                            if self.execute(command).await == Flow::Quit {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(message) => println!("{message}"),
                    }
                }
                Some(outcome) = outcomes.recv() => {
                    self.report_outcome(outcome).await;
                }
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Flow {
        match command {
            Command::New => {
                let id = self.store.lock().await.add_clause();
                println!("Created clause #{id}.");
            }
            Command::List => {
                print!("{}", render_clause_list(&*self.store.lock().await));
            }
            Command::Select(id) => {
                if let Err(e) = self.store.lock().await.set_active_id(id) {
                    println!("{e}");
                }
            }
            Command::Delete(id) => {
                let mut store = self.store.lock().await;
                let id = id.unwrap_or_else(|| store.active_id());
                if store.delete_clause(id) {
                    self.dismissed.remove(&id);
                    println!("Deleted clause #{id}; #{} is active.", store.active_id());
                }
            }
            Command::Text(text) => self.store.lock().await.update_active_text(text),
            Command::Clear => self.store.lock().await.update_active_text(""),
            Command::Load(path) => match clauseai_extract::extract_file(&path).await {
                Ok(text) => {
                    let chars = text.chars().count();
                    self.store.lock().await.load_extracted_text(text);
                    println!("Loaded {chars} characters from {}.", path.display());
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "PDF load failed");
                    println!("Failed to extract text from PDF: {e}");
                }
            },
            Command::Analyze => self.start_analysis().await,
            Command::Show => {
                let store = self.store.lock().await;
                let entry = store.active();
                print!(
                    "{}",
                    render_report(entry, !self.dismissed.contains(&entry.id))
                );
            }
            Command::Apply => {
                if self.store.lock().await.apply_rewrite() {
                    println!("Suggested rewrite applied.");
                }
            }
            Command::Dismiss => {
                let id = self.store.lock().await.active_id();
                self.dismissed.insert(id);
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Begin under the lock so the request is bound to the entry active right
    /// now, then finish in the background.
    async fn start_analysis(&self) {
        let Some(request) = self.store.lock().await.begin_analysis() else {
            debug!("analysis not started: empty text or already pending");
            return;
        };
        println!("Analyzing clause #{}...", request.id);

        let store = Arc::clone(&self.store);
        let analyzer = Arc::clone(&self.analyzer);
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = complete_analysis(&store, analyzer.as_ref(), request).await;
            // The receiver only goes away when the session has ended.
            let _ = outcomes.send(outcome);
        });
    }

    pub async fn report_outcome(&mut self, outcome: AnalysisOutcome) {
        match outcome {
            AnalysisOutcome::Applied {
                id,
                clause_type,
                risk_score,
            } => {
                self.dismissed.remove(&id);
                println!(
                    "Clause #{id} analyzed: {clause_type} ({}, {risk_score}/10).",
                    Severity::from_score(risk_score).badge()
                );
                let store = self.store.lock().await;
                if store.active_id() == id {
                    print!("{}", render_report(store.active(), true));
                }
            }
            AnalysisOutcome::Failed { id, error } => {
                println!("Analysis of clause #{id} failed: {error}");
            }
            AnalysisOutcome::Discarded { id } => {
                debug!(%id, "analysis finished for a deleted clause");
            }
        }
    }
}
