//! Interactive session: owns the grammar and the derivation view, runs
//! commands and applies check answers as they arrive

pub mod commands;

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use itertools::Itertools;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::derivation::{CheckTicket, DerivationState, DerivationView};
use crate::error_handling::{highlight, ErrorType, Field, Report};
use crate::generator;
use crate::grammar::Grammar;
use crate::parser::lexer;
use crate::render::render_tree;
use crate::service::{CheckRequest, CheckResponse, DerivationTree, GrammarService, Submission, TransportError};
use commands::Command;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Flow {
    Continue,
    Quit,
}

// Answer of a spawned check, tagged with the ticket it was issued for
struct CheckReply {
    seq: u64,
    result: Result<CheckResponse, TransportError>,
}

/// A workbench session writing its output to `W`
pub struct Session<W: Write> {
    grammar: Grammar,
    view: DerivationView,
    tree: Option<DerivationTree>,
    service: Arc<dyn GrammarService>,
    reply_tx: mpsc::UnboundedSender<CheckReply>,
    reply_rx: mpsc::UnboundedReceiver<CheckReply>,
    in_flight: Option<JoinHandle<()>>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(service: Arc<dyn GrammarService>, out: W) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Session {
            grammar: Grammar::new(),
            view: DerivationView::new(),
            tree: None,
            service,
            reply_tx,
            reply_rx,
            in_flight: None,
            out,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn view(&self) -> &DerivationView {
        &self.view
    }

    pub fn tree(&self) -> Option<&DerivationTree> {
        self.tree.as_ref()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn println(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", msg)
    }

    fn report<T: ErrorType>(&mut self, field: Field, error: T) -> io::Result<()> {
        self.println(Report::new(field, error))
    }

    /// Reads commands until `quit` or end of input, then waits for the
    /// outstanding check so its answer is shown
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> anyhow::Result<()> {
        let mut lines = input.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read command")? else {
                        break;
                    };
                    if self.execute(commands::parse(&line)).await? == Flow::Quit {
                        break;
                    }
                }
                Some(reply) = self.reply_rx.recv() => self.receive(reply)?,
            }
        }

        self.settle().await?;
        Ok(())
    }

    pub async fn settle(&mut self) -> io::Result<()> {
        if let Some(handle) = self.in_flight.take() {
            if let Err(e) = handle.await {
                log::debug!("Check task ended early: {}", e);
            }
        }
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.receive(reply)?;
        }
        Ok(())
    }

    fn receive(&mut self, reply: CheckReply) -> io::Result<()> {
        if !self.view.apply(reply.seq, reply.result) {
            return Ok(());
        }
        log::debug!("Applied answer {} for `{}`", reply.seq, self.view.query());

        if let DerivationState::Failed(error) = self.view.state() {
            let error = error.clone();
            self.report(Field::Word, error)?;
        }
        self.print_view()
    }

    fn dispatch(&mut self, ticket: CheckTicket) {
        // Superseded answers would be discarded anyway
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        let service = Arc::clone(&self.service);
        let reply_tx = self.reply_tx.clone();
        log::debug!("Checking `{}` ({})", ticket.word, ticket.seq);

        self.in_flight = Some(tokio::spawn(async move {
            let result = service.check_word(&CheckRequest { word: ticket.word }).await;
            if reply_tx.send(CheckReply { seq: ticket.seq, result }).is_err() {
                log::debug!("Session closed before answer {} arrived", ticket.seq);
            }
        }));
    }

    pub async fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Terminals(symbols) => {
                for symbol in symbols {
                    if let Err(e) = self.grammar.add_terminal(&symbol) {
                        self.report(Field::Terminals, e)?;
                    }
                }
                self.println(format!("T = {}", self.grammar.terminals()))?;
            }
            Command::Nonterminals(symbols) => {
                for symbol in symbols {
                    if let Err(e) = self.grammar.add_nonterminal(&symbol) {
                        self.report(Field::Nonterminals, e)?;
                    }
                }
                self.print_nonterminals()?;
            }
            Command::RemoveTerminals(symbols) => {
                for symbol in symbols {
                    self.grammar.remove_terminal(&symbol);
                }
                self.println(format!("T = {}", self.grammar.terminals()))?;
                self.print_invalid_rules()?;
            }
            Command::RemoveNonterminals(symbols) => {
                for symbol in symbols {
                    self.grammar.remove_nonterminal(&symbol);
                }
                self.print_nonterminals()?;
                self.print_invalid_rules()?;
            }
            Command::Axiom(symbol) => match self.grammar.set_axiom(&symbol) {
                Ok(()) => self.print_nonterminals()?,
                Err(e) => self.report(Field::Axiom, e)?,
            },
            Command::Rule(line) => self.add_rules(&line)?,
            Command::Unrule(line) => self.remove_rule(&line)?,
            Command::Levels(text) => {
                self.grammar.set_levels(&text);
                self.println(format!("levels = {}", self.grammar.levels()))?;
            }
            Command::Word(text) => match self.view.set_query(&text) {
                Ok(Some(ticket)) => self.dispatch(ticket),
                Ok(None) => {
                    if let Some(handle) = self.in_flight.take() {
                        handle.abort();
                    }
                }
                Err(e) => self.report(Field::Word, e)?,
            },
            Command::Tree => self.submit().await?,
            Command::Show => self.show()?,
            Command::Check => {
                if self.grammar.invalid_rules().is_empty() {
                    self.println("All rules match the alphabets")?;
                } else {
                    self.print_invalid_rules()?;
                }
            }
            Command::Prune => {
                for rule in self.grammar.prune_rules() {
                    self.println(format!("removed {}", rule))?;
                }
            }
            Command::Sample(amount) => self.sample(amount)?,
            Command::Save(path) => {
                if let Err(e) = save(&self.grammar.snapshot(), &path) {
                    self.println(highlight(Field::File, format!("{:#}", e)))?;
                }
            }
            Command::Load(path) => {
                if let Err(e) = self.load(&path) {
                    self.println(highlight(Field::File, format!("{:#}", e)))?;
                }
            }
            Command::Help => self.println(commands::HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Empty => {}
            Command::Unknown(what) => self.println(format!("Unknown command: {} (try `help`)", what))?,
        }

        Ok(Flow::Continue)
    }

    fn add_rules(&mut self, line: &str) -> io::Result<()> {
        let edit = match self.grammar.add_rules(line) {
            Ok(edit) => edit,
            Err(e) => return self.report(Field::Rules, e),
        };

        for error in edit.rejected {
            self.report(Field::Rules, error)?;
        }
        for rule in edit.duplicates {
            self.println(format!("{} is already a rule", rule))?;
        }
        for rule in edit.added {
            self.println(format!("+ {}", rule))?;
        }
        Ok(())
    }

    fn remove_rule(&mut self, line: &str) -> io::Result<()> {
        let result = lexer::split_line(line).and_then(|(head, bodies)| {
            // A single alternative is expected, a stray `|` stays in the body
            self.grammar.remove_rule(head, &bodies.join("|"))
        });
        match result {
            Ok(rule) => self.println(format!("- {}", rule)),
            Err(e) => self.report(Field::Rules, e),
        }
    }

    async fn submit(&mut self) -> io::Result<()> {
        let submission = match self.grammar.to_submission() {
            Ok(submission) => submission,
            Err(e) => return self.report(Field::Tree, e),
        };

        log::info!(
            "Submitting grammar with {} rules and {} levels",
            submission.production_rules.len(),
            submission.levels
        );
        match self.service.submit_grammar(&submission).await {
            Ok(tree) => {
                for line in render_tree(&tree) {
                    self.println(line)?;
                }
                self.tree = Some(tree);
            }
            Err(e) => {
                log::warn!("Grammar submission failed: {}", e);
                self.report(Field::Tree, e)?;
            }
        }
        Ok(())
    }

    fn sample(&mut self, amount: usize) -> io::Result<()> {
        match generator::sample(&self.grammar, amount, &mut rand::thread_rng()) {
            Ok(samples) => {
                for sample in samples {
                    self.println(format!("{}    ({})", sample.word, sample.forms.iter().join(" ⇒ ")))?;
                }
                Ok(())
            }
            Err(e) => self.report(Field::Levels, e),
        }
    }

    pub fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let submission: Submission =
            serde_json::from_str(&text).with_context(|| format!("{} is not a saved grammar", path.display()))?;
        self.grammar = Grammar::from_submission(&submission).with_context(|| format!("Invalid grammar in {}", path.display()))?;
        self.tree = None;

        log::info!("Loaded grammar from {}", path.display());
        self.show()?;
        Ok(())
    }

    fn print_nonterminals(&mut self) -> io::Result<()> {
        let axiom = self.grammar.axiom().unwrap_or("-").to_string();
        self.println(format!("N = {}, axiom = {}", self.grammar.nonterminals(), axiom))
    }

    fn print_invalid_rules(&mut self) -> io::Result<()> {
        let lines = self
            .grammar
            .invalid_rules()
            .into_iter()
            .map(|(rule, error)| format!("! {}: {}", rule, error))
            .collect_vec();
        for line in lines {
            self.println(line)?;
        }
        Ok(())
    }

    fn print_view(&mut self) -> io::Result<()> {
        for line in self.view.render() {
            self.println(line)?;
        }
        Ok(())
    }

    fn show(&mut self) -> io::Result<()> {
        self.println(format!("T = {}", self.grammar.terminals()))?;
        self.print_nonterminals()?;

        let rules = self.grammar.rules().iter().map(|rule| format!("  {}", rule)).collect_vec();
        self.println("P =")?;
        for rule in rules {
            self.println(rule)?;
        }
        self.println(format!("levels = {}", self.grammar.levels()))?;

        match self.grammar.to_submission() {
            Ok(_) => self.println("ready to submit")?,
            Err(e) => self.println(format!("not ready: {}", e))?,
        }
        self.print_invalid_rules()
    }
}

fn save(submission: &Submission, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(submission)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved grammar to {}", path.display());
    Ok(())
}
