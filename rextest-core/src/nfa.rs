//! NFA (Nondeterministic Finite Automaton) construction
//!
//! This module implements Thompson's construction algorithm to build an NFA
//! from a regex AST. Each state keeps its transitions in priority order, so
//! a backtracking executor that tries them first to last yields
//! leftmost-first (greedy/lazy, first alternative wins) semantics.
//!
//! `*`, `+` and `?` are unrolled into at most two copies of their atom.
//! Any other `{n,m}` compiles its atom once, inside a loop driven by a
//! counter slot, so the automaton does not grow with the bounds. Optional
//! iterations are wrapped in `RepeatEnter` and a check that rejects an
//! iteration that consumed nothing, and groups declared inside a repeated
//! atom are cleared at the start of each iteration.

use crate::ast::{ClassItem, Expr, Quantifier};
use crate::error::{RegexError, Result};
use crate::groups::GroupRegistry;

/// An NFA state ID
pub type StateId = usize;

/// Largest automaton the compiler will build
pub const MAX_STATES: usize = 250_000;

/// Kind of a lookaround assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookKind {
    Ahead,
    NegativeAhead,
    Behind,
    NegativeBehind,
}

impl LookKind {
    pub fn is_negative(self) -> bool {
        matches!(self, LookKind::NegativeAhead | LookKind::NegativeBehind)
    }

    pub fn is_behind(self) -> bool {
        matches!(self, LookKind::Behind | LookKind::NegativeBehind)
    }
}

/// A transition in the NFA
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Transition on a specific character
    Char(char),
    /// Transition on any character (dot)
    Any,
    /// Epsilon transition (no input consumed)
    Epsilon,
    /// Transition matching a character class
    CharClass {
        negated: bool,
        items: Vec<ClassItem>,
    },
    /// Start of a capture group
    GroupStart(u32),
    /// End of a capture group
    GroupEnd(u32),
    /// Backreference transition (absolute group index)
    Backref(u32),
    /// Start of input or line anchor
    StartAnchor,
    /// End of input or line anchor
    EndAnchor,
    /// Word boundary assertion
    WordBoundary,
    /// Non-word boundary assertion
    NonWordBoundary,
    /// Run the sub-automaton `start..accept` as an assertion
    Look {
        kind: LookKind,
        start: StateId,
        accept: StateId,
    },
    /// Clear captures `lo..=hi` before an iteration of a repeated atom
    ResetGroups(u32, u32),
    /// Record the position an optional iteration starts at
    RepeatEnter(usize),
    /// Fail if the iteration started in `slot` consumed nothing
    RepeatCheck(usize),
    /// Enter a counted loop with counter `.0` at zero
    CounterInit(usize),
    /// Pass while counter `.0` is below `.1`; `None` is unbounded
    CounterBelow(usize, Option<u32>),
    /// Pass once counter `.0` has reached `.1`
    CounterAtLeast(usize, u32),
    /// Count one more iteration on counter `.0`
    CounterIncrement(usize),
    /// End of a counted iteration that started in repeat `slot`. Iterations
    /// past the first `min` must consume input.
    CounterCheck { counter: usize, slot: usize, min: u32 },
}

/// An NFA state
#[derive(Debug, Clone, Default)]
pub struct State {
    /// Transitions from this state, highest priority first
    pub transitions: Vec<(Transition, StateId)>,
}

/// An NFA (Nondeterministic Finite Automaton)
#[derive(Debug, Clone)]
pub struct Nfa {
    /// All states in the NFA
    pub states: Vec<State>,
    /// The start state
    pub start: StateId,
    /// The accepting state
    pub accept: StateId,
    /// Number of capture groups
    pub group_count: usize,
    /// Number of repeat slots used by `RepeatEnter`/`RepeatCheck`
    pub loop_slots: usize,
    /// Number of counted loops
    pub counters: usize,
}

impl Nfa {
    fn empty(group_count: usize) -> Self {
        Nfa {
            states: Vec::new(),
            start: 0,
            accept: 0,
            group_count,
            loop_slots: 0,
            counters: 0,
        }
    }

    /// Build an NFA from an AST expression.
    ///
    /// Named backreferences are resolved through `registry`.
    pub fn from_expr(expr: &Expr, registry: &GroupRegistry) -> Result<Self> {
        let estimate = estimate_states(expr);
        if estimate > MAX_STATES {
            return Err(RegexError::Compile(format!(
                "pattern too large ({} states, limit {})",
                estimate, MAX_STATES
            )));
        }

        let mut builder = Builder {
            nfa: Nfa::empty(registry.group_count()),
            registry,
        };
        let (start, accept) = builder.compile_expr(expr);
        let mut nfa = builder.nfa;
        nfa.start = start;
        nfa.accept = accept;
        Ok(nfa)
    }

    /// Total number of transitions, for diagnostics
    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }
}

/// Upper bound on the states `expr` compiles to
fn estimate_states(expr: &Expr) -> usize {
    match expr {
        Expr::Sequence(exprs) => exprs
            .iter()
            .fold(2, |acc, e| acc.saturating_add(estimate_states(e))),
        Expr::Alternation(exprs) => exprs
            .iter()
            .fold(2, |acc, e| acc.saturating_add(estimate_states(e))),
        Expr::Quantified { expr, quantifier } => {
            let copies = if is_counted(*quantifier) { 1 } else { 2 };
            let per_copy = estimate_states(expr).saturating_add(6);
            per_copy.saturating_mul(copies).saturating_add(3)
        }
        Expr::Group { expr, .. } | Expr::NamedGroup { pattern: expr, .. } => {
            estimate_states(expr).saturating_add(2)
        }
        Expr::NonCapturingGroup(expr) => estimate_states(expr),
        Expr::Lookahead(expr)
        | Expr::NegativeLookahead(expr)
        | Expr::Lookbehind(expr)
        | Expr::NegativeLookbehind(expr) => estimate_states(expr).saturating_add(3),
        _ => 2,
    }
}

/// Whether `quantifier` compiles to a counted loop rather than copies
fn is_counted(quantifier: Quantifier) -> bool {
    quantifier.min > 1 || quantifier.max.is_some_and(|max| max > 1)
}

struct Builder<'r> {
    nfa: Nfa,
    registry: &'r GroupRegistry,
}

impl Builder<'_> {
    /// Allocate a new state and return its ID
    fn new_state(&mut self) -> StateId {
        self.nfa.states.push(State::default());
        self.nfa.states.len() - 1
    }

    /// Add a transition between states
    fn add_transition(&mut self, from: StateId, transition: Transition, to: StateId) {
        self.nfa.states[from].transitions.push((transition, to));
    }

    /// A single-transition fragment
    fn compile_single(&mut self, transition: Transition) -> (StateId, StateId) {
        let start = self.new_state();
        let accept = self.new_state();
        self.add_transition(start, transition, accept);
        (start, accept)
    }

    /// Compile an expression and return (start, accept) state IDs
    fn compile_expr(&mut self, expr: &Expr) -> (StateId, StateId) {
        match expr {
            Expr::Empty => self.compile_single(Transition::Epsilon),
            Expr::Literal(c) => self.compile_single(Transition::Char(*c)),
            Expr::Any => self.compile_single(Transition::Any),
            Expr::Sequence(exprs) => self.compile_sequence(exprs),
            Expr::Alternation(exprs) => self.compile_alternation(exprs),
            Expr::CharacterClass(cc) => self.compile_single(Transition::CharClass {
                negated: cc.negated,
                items: cc.items.clone(),
            }),
            Expr::Quantified { expr, quantifier } => self.compile_quantified(expr, *quantifier),
            Expr::Group { index, expr } => self.compile_group(*index, expr),
            Expr::NamedGroup { index, pattern, .. } => self.compile_group(*index, pattern),
            Expr::NonCapturingGroup(expr) => self.compile_expr(expr),
            Expr::StartAnchor => self.compile_single(Transition::StartAnchor),
            Expr::EndAnchor => self.compile_single(Transition::EndAnchor),
            Expr::Backreference(n) => self.compile_single(Transition::Backref(*n)),
            Expr::NamedBackreference(name) => {
                // Validated by the group collector; 0 never participates
                let index = self.registry.get_by_name(name).unwrap_or(0);
                self.compile_single(Transition::Backref(index))
            }
            Expr::Shorthand(c) => self.compile_shorthand(*c),
            Expr::WordBoundary => self.compile_single(Transition::WordBoundary),
            Expr::NonWordBoundary => self.compile_single(Transition::NonWordBoundary),
            Expr::Lookahead(expr) => self.compile_look(LookKind::Ahead, expr),
            Expr::NegativeLookahead(expr) => self.compile_look(LookKind::NegativeAhead, expr),
            Expr::Lookbehind(expr) => self.compile_look(LookKind::Behind, expr),
            Expr::NegativeLookbehind(expr) => self.compile_look(LookKind::NegativeBehind, expr),
        }
    }

    /// Compile a sequence
    fn compile_sequence(&mut self, exprs: &[Expr]) -> (StateId, StateId) {
        let start = self.new_state();
        let mut prev_accept = start;

        for expr in exprs {
            let (s, a) = self.compile_expr(expr);
            self.add_transition(prev_accept, Transition::Epsilon, s);
            prev_accept = a;
        }

        (start, prev_accept)
    }

    /// Compile alternation (a|b|c); earlier alternatives take priority
    fn compile_alternation(&mut self, exprs: &[Expr]) -> (StateId, StateId) {
        let start = self.new_state();
        let accept = self.new_state();

        for expr in exprs {
            let (s, a) = self.compile_expr(expr);
            self.add_transition(start, Transition::Epsilon, s);
            self.add_transition(a, Transition::Epsilon, accept);
        }

        (start, accept)
    }

    /// Compile a quantified expression.
    ///
    /// `*`, `+`, `?` and `{0}`/`{1}` are unrolled: the mandatory iteration
    /// first, then a loop (unbounded) or one optional iteration. Greedy
    /// quantifiers try another iteration before leaving, lazy ones leave
    /// first.
    fn compile_quantified(&mut self, expr: &Expr, quantifier: Quantifier) -> (StateId, StateId) {
        if is_counted(quantifier) {
            return self.compile_counted(expr, quantifier);
        }
        let start = self.new_state();
        let mut tail = start;

        for _ in 0..quantifier.min {
            let (s, a) = self.compile_iteration(expr, false);
            self.add_transition(tail, Transition::Epsilon, s);
            tail = a;
        }

        let accept = self.new_state();
        match quantifier.max {
            None => {
                let (s, a) = self.compile_iteration(expr, true);
                self.add_choice(tail, s, accept, quantifier.greedy);
                self.add_transition(a, Transition::Epsilon, tail);
            }
            Some(max) => {
                for _ in quantifier.min..max {
                    let (s, a) = self.compile_iteration(expr, true);
                    self.add_choice(tail, s, accept, quantifier.greedy);
                    tail = a;
                }
                self.add_transition(tail, Transition::Epsilon, accept);
            }
        }

        (start, accept)
    }

    /// A loop around a single copy of `expr`, counting its iterations.
    ///
    /// ```text
    /// start -CounterInit-> head
    /// head  -CounterBelow(max)-> CounterIncrement -> RepeatEnter
    ///       -> [ResetGroups] -> expr -CounterCheck-> head
    /// head  -CounterAtLeast(min)-> accept
    /// ```
    fn compile_counted(&mut self, expr: &Expr, quantifier: Quantifier) -> (StateId, StateId) {
        let counter = self.nfa.counters;
        self.nfa.counters += 1;
        let slot = self.nfa.loop_slots;
        self.nfa.loop_slots += 1;

        let start = self.new_state();
        let head = self.new_state();
        let accept = self.new_state();
        self.add_transition(start, Transition::CounterInit(counter), head);

        let iteration = self.new_state();
        let entered = self.new_state();
        let mut cursor = self.new_state();
        self.add_transition(iteration, Transition::CounterIncrement(counter), entered);
        self.add_transition(entered, Transition::RepeatEnter(slot), cursor);
        if let Some((lo, hi)) = expr.capture_range() {
            let next = self.new_state();
            self.add_transition(cursor, Transition::ResetGroups(lo, hi), next);
            cursor = next;
        }
        let (inner_start, inner_accept) = self.compile_expr(expr);
        self.add_transition(cursor, Transition::Epsilon, inner_start);
        self.add_transition(
            inner_accept,
            Transition::CounterCheck {
                counter,
                slot,
                min: quantifier.min,
            },
            head,
        );

        let more = (Transition::CounterBelow(counter, quantifier.max), iteration);
        let done = (Transition::CounterAtLeast(counter, quantifier.min), accept);
        let (first, second) = if quantifier.greedy {
            (more, done)
        } else {
            (done, more)
        };
        self.add_transition(head, first.0, first.1);
        self.add_transition(head, second.0, second.1);

        (start, accept)
    }

    /// Two epsilon exits from `from`, ordered by greediness
    fn add_choice(&mut self, from: StateId, more: StateId, done: StateId, greedy: bool) {
        let (first, second) = if greedy { (more, done) } else { (done, more) };
        self.add_transition(from, Transition::Epsilon, first);
        self.add_transition(from, Transition::Epsilon, second);
    }

    /// One iteration of a repeated atom. Optional iterations are `checked`:
    /// they must consume input.
    fn compile_iteration(&mut self, expr: &Expr, checked: bool) -> (StateId, StateId) {
        let start = self.new_state();
        let mut cursor = start;

        let slot = checked.then(|| {
            let slot = self.nfa.loop_slots;
            self.nfa.loop_slots += 1;
            slot
        });
        if let Some(slot) = slot {
            let next = self.new_state();
            self.add_transition(cursor, Transition::RepeatEnter(slot), next);
            cursor = next;
        }
        if let Some((lo, hi)) = expr.capture_range() {
            let next = self.new_state();
            self.add_transition(cursor, Transition::ResetGroups(lo, hi), next);
            cursor = next;
        }

        let (inner_start, inner_accept) = self.compile_expr(expr);
        self.add_transition(cursor, Transition::Epsilon, inner_start);

        let accept = self.new_state();
        let exit = match slot {
            Some(slot) => Transition::RepeatCheck(slot),
            None => Transition::Epsilon,
        };
        self.add_transition(inner_accept, exit, accept);
        (start, accept)
    }

    /// Compile a capturing group
    fn compile_group(&mut self, index: u32, expr: &Expr) -> (StateId, StateId) {
        let start = self.new_state();
        let (inner_start, inner_accept) = self.compile_expr(expr);
        let accept = self.new_state();

        self.add_transition(start, Transition::GroupStart(index), inner_start);
        self.add_transition(inner_accept, Transition::GroupEnd(index), accept);

        (start, accept)
    }

    /// Compile shorthand character class (\w, \d, \s, etc.)
    fn compile_shorthand(&mut self, c: char) -> (StateId, StateId) {
        self.compile_single(Transition::CharClass {
            negated: c.is_ascii_uppercase(), // \W, \D, \S are negated
            items: vec![ClassItem::Shorthand(c.to_ascii_lowercase())],
        })
    }

    /// Compile a lookaround; its body lives in the same state table but is
    /// only entered through the `Look` transition
    fn compile_look(&mut self, kind: LookKind, expr: &Expr) -> (StateId, StateId) {
        let (body_start, body_accept) = self.compile_expr(expr);
        self.compile_single(Transition::Look {
            kind,
            start: body_start,
            accept: body_accept,
        })
    }
}
