//! The match/replace pipeline
//!
//! [`compute_match_state`] is a pure function from the current inputs to
//! what the tool should display. [`Workbench`] holds those inputs for an
//! interactive front end, recomputes on every change and keeps the compiled
//! pattern between changes that do not affect compilation.

use crate::engine::Regex;
use crate::error::RegexError;
use crate::flags::{Flag, FlagSet};
use crate::highlight::{self, HighlightSegment};
use crate::matches::{self, MatchList};
use crate::replace;

/// A pattern together with its flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PatternSpec {
    pub pattern: String,
    pub flags: FlagSet,
}

impl PatternSpec {
    pub fn new(pattern: impl Into<String>, flags: FlagSet) -> Self {
        PatternSpec {
            pattern: pattern.into(),
            flags,
        }
    }
}

/// What the tool computes from the inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Match,
    Replace,
}

/// Everything the displayed state is derived from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    pub spec: PatternSpec,
    pub subject: String,
    pub template: String,
    pub mode: ViewMode,
}

/// A compile error as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileFailure {
    /// The engine's diagnostic, verbatim
    pub message: String,
    /// Character position in the pattern, when the error has one
    pub position: Option<usize>,
}

impl From<&RegexError> for CompileFailure {
    fn from(err: &RegexError) -> Self {
        CompileFailure {
            message: err.to_string(),
            position: err.position(),
        }
    }
}

/// Match mode output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchViewState {
    pub matches: MatchList,
    pub segments: Vec<HighlightSegment>,
}

impl MatchViewState {
    /// The pattern compiled but found nothing
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Replace mode output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceViewState {
    pub output: String,
    /// Number of matches substituted
    pub replaced: usize,
}

impl ReplaceViewState {
    /// Nothing matched, so the output equals the subject
    pub fn is_unchanged(&self) -> bool {
        self.replaced == 0
    }
}

/// What the tool displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// The pattern is empty; nothing was compiled
    Idle,
    /// The pattern failed to compile; no derived state survives
    Error(CompileFailure),
    Match(MatchViewState),
    Replace(ReplaceViewState),
}

impl ViewState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    pub fn error(&self) -> Option<&CompileFailure> {
        match self {
            ViewState::Error(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Compute the displayed state from `inputs`. Pure: the same inputs always
/// give the same state.
pub fn compute_match_state(inputs: &Inputs) -> ViewState {
    if inputs.spec.pattern.is_empty() {
        return ViewState::Idle;
    }
    match Regex::new(&inputs.spec.pattern, inputs.spec.flags) {
        Ok(regex) => derive(&regex, inputs),
        Err(err) => ViewState::Error(CompileFailure::from(&err)),
    }
}

/// Derive the mode output from a compiled pattern. The global bit comes
/// from `inputs`, not from the pattern's own flags.
fn derive(regex: &Regex, inputs: &Inputs) -> ViewState {
    let global = inputs.spec.flags.global;
    match inputs.mode {
        ViewMode::Match => {
            let matches = matches::enumerate(regex, &inputs.subject, global);
            let segments = highlight::segments(&inputs.subject, &matches.matches);
            ViewState::Match(MatchViewState { matches, segments })
        }
        ViewMode::Replace => {
            let rendered = replace::render(regex, &inputs.subject, &inputs.template, global);
            ViewState::Replace(ReplaceViewState {
                output: rendered.output,
                replaced: rendered.replaced,
            })
        }
    }
}

/// Compiled pattern cache entry
#[derive(Debug)]
struct Compiled {
    key: PatternSpec,
    result: Result<Regex, CompileFailure>,
}

/// Holder of the current inputs for an interactive front end.
///
/// Every setter recomputes [`Workbench::state`] synchronously. The compiled
/// pattern is cached by pattern and flags without `g`, since the global bit
/// only selects the enumeration mode.
#[derive(Debug)]
pub struct Workbench {
    inputs: Inputs,
    compiled: Option<Compiled>,
    compile_count: usize,
    state: ViewState,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbench {
    pub fn new() -> Self {
        Self::with_inputs(Inputs::default())
    }

    pub fn with_inputs(inputs: Inputs) -> Self {
        let mut workbench = Workbench {
            inputs,
            compiled: None,
            compile_count: 0,
            state: ViewState::Idle,
        };
        workbench.recompute();
        workbench
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// How many times a pattern has been compiled
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> &ViewState {
        self.inputs.spec.pattern = pattern.into();
        self.recompute()
    }

    pub fn set_flags(&mut self, flags: FlagSet) -> &ViewState {
        self.inputs.spec.flags = flags;
        self.recompute()
    }

    pub fn set_flag(&mut self, flag: Flag, enabled: bool) -> &ViewState {
        self.inputs.spec.flags.set(flag, enabled);
        self.recompute()
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) -> &ViewState {
        self.inputs.subject = subject.into();
        self.recompute()
    }

    pub fn set_template(&mut self, template: impl Into<String>) -> &ViewState {
        self.inputs.template = template.into();
        self.recompute()
    }

    pub fn set_mode(&mut self, mode: ViewMode) -> &ViewState {
        self.inputs.mode = mode;
        self.recompute()
    }

    fn recompute(&mut self) -> &ViewState {
        self.state = if self.inputs.spec.pattern.is_empty() {
            self.compiled = None;
            ViewState::Idle
        } else {
            let key = PatternSpec::new(
                self.inputs.spec.pattern.clone(),
                self.inputs.spec.flags.without_global(),
            );
            let stale = match &self.compiled {
                Some(compiled) => compiled.key != key,
                None => true,
            };
            if stale {
                self.compile_count += 1;
                let result = Regex::new(&key.pattern, key.flags)
                    .map_err(|err| CompileFailure::from(&err));
                self.compiled = Some(Compiled { key, result });
            }
            match self.compiled.as_ref().map(|c| &c.result) {
                Some(Ok(regex)) => derive(regex, &self.inputs),
                Some(Err(failure)) => ViewState::Error(failure.clone()),
                None => ViewState::Idle,
            }
        };
        &self.state
    }
}
