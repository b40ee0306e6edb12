//! Rule-level trace events and the sinks that consume them.
//!
//! The engine reports every step of a rule activation (entry, cache
//! lookups, left-recursion detection, seed retries, exit) as a
//! [`TraceEvent`] to the sinks registered with
//! [`ParseContext::add_sink`](crate::ParseContext::add_sink). Sinks run in
//! registration order. A sink that returns an error is logged and skipped
//! for that event; parsing continues.
//!
//! Built-in sinks:
//!
//! - [`TracingSink`]: forwards events to `tracing` at `TRACE` level
//! - [`WriterSink`]: indented human-readable trace, with a source excerpt
//!   whenever the position moves
//! - [`EventLog`]: records owned copies of all events for later inspection

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::io;
use std::rc::Rc;

use pegrat_diagnostic::{LineIndex, PositionInfo, Underline};

use crate::rule::{RuleArg, RuleId};

/// What happened to a rule activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceEventKind {
    Entering,
    /// The activation produced a value.
    Leaving,
    Failed,
    /// A seed grew; the body runs again from the start state.
    Retrying,
    /// The activation re-entered itself at the same state.
    Recursive,
    CacheChecked {
        hit: bool,
    },
    CachePut,
}

impl TraceEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceEventKind::Entering => "entering",
            TraceEventKind::Leaving => "leaving",
            TraceEventKind::Failed => "failed",
            TraceEventKind::Retrying => "retrying",
            TraceEventKind::Recursive => "recursive",
            TraceEventKind::CacheChecked { hit: true } => "cache hit",
            TraceEventKind::CacheChecked { hit: false } => "cache miss",
            TraceEventKind::CachePut => "cache put",
        }
    }
}

impl fmt::Display for TraceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One engine event, borrowed from the running activation.
#[derive(Clone, Copy, Debug)]
pub struct TraceEvent<'a> {
    pub kind: TraceEventKind,
    pub rule: RuleId,
    pub args: &'a [RuleArg],
    /// The produced value, for [`TraceEventKind::Leaving`].
    pub result: Option<&'a dyn Debug>,
    /// Input index when the event fired.
    pub index: usize,
}

impl TraceEvent<'_> {
    /// Type names of the rule arguments, in order.
    pub fn arg_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.args.iter().map(RuleArg::type_name)
    }
}

/// Error reported by a sink. Never aborts a parse.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("trace output failed: {0}")]
    Io(#[from] io::Error),

    #[error("trace sink rejected event: {0}")]
    Rejected(String),
}

/// Consumer of engine events.
pub trait TraceSink {
    /// A new input was bound to the context.
    fn input_bound(&mut self, _input: &str) -> Result<(), SinkError> {
        Ok(())
    }

    fn on_event(&mut self, event: &TraceEvent<'_>) -> Result<(), SinkError>;

    /// An unmet expectation was registered at `index`.
    fn expectation_registered(&mut self, _index: usize, _label: &str) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Forwards events to `tracing` under the `pegrat::trace` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn input_bound(&mut self, input: &str) -> Result<(), SinkError> {
        tracing::trace!(target: "pegrat::trace", len = input.len(), "input bound");
        Ok(())
    }

    fn on_event(&mut self, event: &TraceEvent<'_>) -> Result<(), SinkError> {
        match event.result {
            Some(result) => tracing::trace!(
                target: "pegrat::trace",
                kind = event.kind.as_str(),
                rule = %event.rule,
                index = event.index,
                ?result,
                "rule event"
            ),
            None => tracing::trace!(
                target: "pegrat::trace",
                kind = event.kind.as_str(),
                rule = %event.rule,
                index = event.index,
                "rule event"
            ),
        }
        Ok(())
    }

    fn expectation_registered(&mut self, index: usize, label: &str) -> Result<(), SinkError> {
        tracing::trace!(target: "pegrat::trace", index, label, "unmet expectation");
        Ok(())
    }
}

/// Writes an indented text trace to any [`io::Write`].
///
/// ```text
/// index 0 line 1
/// 1+2
/// ^
/// calc::expr Entering, index: 0
///   calc::expr recursive, index: 0
/// ```
///
/// Nesting follows rule activations. A three-line source excerpt is
/// printed before an event whenever the index differs from the one of
/// the last excerpt.
pub struct WriterSink<W: io::Write> {
    out: W,
    depth: usize,
    last_index: Option<usize>,
    source: String,
    lines: LineIndex,
}

impl<W: io::Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        WriterSink {
            out,
            depth: 0,
            last_index: None,
            source: String::new(),
            lines: LineIndex::build(""),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, depth: usize, index: usize, text: fmt::Arguments<'_>) -> io::Result<()> {
        let indent = "  ".repeat(depth);
        if self.last_index != Some(index) {
            let info = PositionInfo::with_index(&self.source, &self.lines, index);
            writeln!(
                self.out,
                "{indent}index {index} line {}\n{indent}{}\n{indent}{}",
                info.line_number(),
                info.line(),
                info.underline(Underline::default()),
            )?;
            self.last_index = Some(index);
        }
        writeln!(self.out, "{indent}{text}")?;
        self.out.flush()
    }
}

impl<W: io::Write> TraceSink for WriterSink<W> {
    fn input_bound(&mut self, input: &str) -> Result<(), SinkError> {
        self.source = input.to_owned();
        self.lines = LineIndex::build(input);
        self.depth = 0;
        self.last_index = None;
        Ok(())
    }

    fn on_event(&mut self, event: &TraceEvent<'_>) -> Result<(), SinkError> {
        let (rule, index) = (event.rule, event.index);
        match event.kind {
            TraceEventKind::Entering => {
                self.line(self.depth, index, format_args!("{rule} Entering, index: {index}"))?;
                self.depth += 1;
            }
            TraceEventKind::Leaving => {
                self.depth = self.depth.saturating_sub(1);
                match event.result {
                    Some(result) => self.line(
                        self.depth,
                        index,
                        format_args!("{rule} Leaving, index: {index} -> {result:?}"),
                    )?,
                    None => self.line(self.depth, index, format_args!("{rule} Leaving, index: {index}"))?,
                }
            }
            TraceEventKind::Failed => {
                self.depth = self.depth.saturating_sub(1);
                self.line(self.depth, index, format_args!("{rule} Failed, index: {index}"))?;
            }
            TraceEventKind::Retrying => {
                self.line(
                    self.depth.saturating_sub(1),
                    index,
                    format_args!("{rule} Retrying, was at index: {index}"),
                )?;
            }
            TraceEventKind::Recursive => {
                self.line(self.depth, index, format_args!("{rule} recursive, index: {index}"))?;
            }
            TraceEventKind::CacheChecked { hit: true } => {
                self.line(self.depth, index, format_args!("{rule} cache hit, index: {index}"))?;
            }
            // Misses are the common case and would double the trace length.
            TraceEventKind::CacheChecked { hit: false } | TraceEventKind::CachePut => {}
        }
        Ok(())
    }

    fn expectation_registered(&mut self, index: usize, label: &str) -> Result<(), SinkError> {
        self.line(self.depth, index, format_args!("index {index} unmet expectation: {label}"))?;
        Ok(())
    }
}

/// Owned copy of a [`TraceEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedEvent {
    pub kind: TraceEventKind,
    pub rule: RuleId,
    pub args: Vec<RuleArg>,
    /// `Debug` rendering of the produced value.
    pub result: Option<String>,
    pub index: usize,
}

#[derive(Debug, Default)]
struct LogData {
    events: Vec<RecordedEvent>,
    expectations: Vec<(usize, String)>,
    inputs: usize,
}

/// Records every event in memory.
///
/// Cloning shares the log, so one handle can be registered with the
/// context while another is kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    data: Rc<RefCell<LogData>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.data.borrow().events.clone()
    }

    /// Registered expectations as `(index, label)`.
    pub fn expectations(&self) -> Vec<(usize, String)> {
        self.data.borrow().expectations.clone()
    }

    /// Number of inputs bound while the log was registered.
    pub fn inputs_bound(&self) -> usize {
        self.data.borrow().inputs
    }

    /// Number of events of `kind` for the rule called `rule_name`.
    pub fn count(&self, kind: TraceEventKind, rule_name: &str) -> usize {
        self.data
            .borrow()
            .events
            .iter()
            .filter(|e| e.kind == kind && e.rule.name() == rule_name)
            .count()
    }

    pub fn clear(&self) {
        let mut data = self.data.borrow_mut();
        data.events.clear();
        data.expectations.clear();
    }
}

impl TraceSink for EventLog {
    fn input_bound(&mut self, _input: &str) -> Result<(), SinkError> {
        self.data.borrow_mut().inputs += 1;
        Ok(())
    }

    fn on_event(&mut self, event: &TraceEvent<'_>) -> Result<(), SinkError> {
        let recorded = RecordedEvent {
            kind: event.kind,
            rule: event.rule,
            args: event.args.to_vec(),
            result: event.result.map(|r| format!("{r:?}")),
            index: event.index,
        };
        self.data.borrow_mut().events.push(recorded);
        Ok(())
    }

    fn expectation_registered(&mut self, index: usize, label: &str) -> Result<(), SinkError> {
        self.data
            .borrow_mut()
            .expectations
            .push((index, label.to_owned()));
        Ok(())
    }
}
