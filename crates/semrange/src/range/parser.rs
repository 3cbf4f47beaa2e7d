//! Range string parsing
//!
//! The parser is a small state machine. Each state inspects the current
//! input character, pushes the states that should follow it onto a stack and
//! then hands control to whatever is on top of that stack. Sub-steps such as
//! collecting the current comparator set can therefore be shared between the
//! `||` operator and the end of input without recursion.

use std::mem;
use std::str::CharIndices;
use thiserror::Error;

use super::{Comparator, Operator, VersionRange};
use crate::validate::is_version_char;
use crate::version::Version;
use crate::version_parser::{ParseMode, VersionError};

/// Error type for range parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("The version range string cannot be empty or composed entirely of whitespace")]
    Empty,
    #[error("The version range string contains an invalid character at position {position}")]
    InvalidCharacter { position: usize },
    #[error("A version range string cannot contain a set with no comparators")]
    EmptySet,
    #[error("The operator \"{0}\" has no associated version (check whitespace)")]
    OrphanedOperator(Operator),
    #[error("The version range string contains an invalid version \"{version}\"")]
    InvalidVersion {
        version: String,
        #[source]
        source: VersionError,
    },
}

/// The kind of a [`RangeError`], without any of its details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeErrorKind {
    Empty,
    InvalidCharacter,
    EmptySet,
    OrphanedOperator,
    InvalidVersion,
}

impl RangeError {
    pub fn kind(&self) -> RangeErrorKind {
        match self {
            RangeError::Empty => RangeErrorKind::Empty,
            RangeError::InvalidCharacter { .. } => RangeErrorKind::InvalidCharacter,
            RangeError::EmptySet => RangeErrorKind::EmptySet,
            RangeError::OrphanedOperator(_) => RangeErrorKind::OrphanedOperator,
            RangeError::InvalidVersion { .. } => RangeErrorKind::InvalidVersion,
        }
    }

    /// The version parsing failure behind an `InvalidVersion` error
    pub fn version_error(&self) -> Option<&VersionError> {
        match self {
            RangeError::InvalidVersion { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Parse a range string such as `>=1.2.3 <2.0.0 || 3.0.0`
pub fn parse_range(input: &str) -> Result<VersionRange, RangeError> {
    let result = Parser::new(input).run();
    if let Err(ref err) = result {
        log::debug!("Rejected version range {:?}: {}", input, err);
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,

    Consume,
    Identify,
    CollapseWhitespace,

    UnarySimple,
    UnaryComplex,
    LogicalOr,

    VersionString,

    CollectSet,

    Terminate,
}

const LEFT_CHEVRON: char = '<';
const RIGHT_CHEVRON: char = '>';
const EQUAL_SIGN: char = '=';
const VERTICAL_BAR: char = '|';

struct Parser<'a> {
    source: &'a str,
    chars: CharIndices<'a>,
    /// Current character, `None` once the input is exhausted
    input: Option<char>,
    position: usize,
    stack: Vec<State>,

    sets: Vec<Vec<Comparator>>,
    current: Vec<Comparator>,
    operator: Option<Operator>,
    builder: String,
    error: Option<RangeError>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Parser {
            source,
            chars: source.char_indices(),
            input: None,
            position: 0,
            stack: Vec::new(),
            sets: Vec::new(),
            current: Vec::new(),
            operator: None,
            builder: String::new(),
            error: None,
        }
    }

    /// Queue states. The last state given runs first.
    fn push(&mut self, states: &[State]) {
        self.stack.extend_from_slice(states);
    }

    fn pop(&mut self) -> State {
        // Every path through the machine queues Terminate before the stack
        // can run dry.
        self.stack.pop().unwrap_or(State::Terminate)
    }

    fn fail(&mut self, error: RangeError) {
        self.error = Some(error);
        self.push(&[State::Terminate]);
    }

    fn invalid_character(&mut self) {
        let position = self.position;
        self.fail(RangeError::InvalidCharacter { position });
    }

    fn run(mut self) -> Result<VersionRange, RangeError> {
        if self.source.trim().is_empty() {
            return Err(RangeError::Empty);
        }

        let mut state = State::Start;
        while state != State::Terminate {
            log::trace!("range parser: {:?} at {} ({:?})", state, self.position, self.input);
            self.step(state);
            state = self.pop();
        }

        match self.error {
            Some(error) => Err(error),
            None => Ok(VersionRange::from_validated(self.sets)),
        }
    }

    fn step(&mut self, state: State) {
        match state {
            State::Start => self.push(&[State::Identify, State::Consume]),
            State::Consume => self.consume(),
            State::CollapseWhitespace => {
                if self.input.is_some_and(char::is_whitespace) {
                    self.push(&[State::CollapseWhitespace, State::Consume]);
                }
            }
            State::Identify => self.identify(),
            State::UnarySimple => self.unary_simple(),
            State::UnaryComplex => self.unary_complex(),
            State::LogicalOr => {
                // The first bar has already been consumed
                if self.input == Some(VERTICAL_BAR) {
                    self.push(&[State::Identify, State::Consume, State::CollectSet]);
                } else {
                    self.invalid_character();
                }
            }
            State::VersionString => self.version_string(),
            State::CollectSet => {
                if self.current.is_empty() {
                    self.fail(RangeError::EmptySet);
                } else {
                    let set = mem::take(&mut self.current);
                    self.sets.push(set);
                }
            }
            State::Terminate => {}
        }
    }

    fn consume(&mut self) {
        match self.chars.next() {
            Some((position, c)) => {
                self.position = position;
                self.input = Some(c);
            }
            None => {
                self.position = self.source.len();
                self.input = None;
            }
        }
    }

    fn identify(&mut self) {
        match self.input {
            None => self.push(&[State::Terminate, State::CollectSet]),
            Some(c) if c.is_whitespace() => self.push(&[State::Identify, State::CollapseWhitespace]),
            Some(EQUAL_SIGN) => self.push(&[State::UnarySimple]),
            Some(LEFT_CHEVRON | RIGHT_CHEVRON) => self.push(&[State::UnaryComplex]),
            Some(VERTICAL_BAR) => self.push(&[State::LogicalOr, State::Consume]),
            Some(_) => self.push(&[State::VersionString]),
        }
    }

    /// Single-character operators
    fn unary_simple(&mut self) {
        match self.operator {
            None => {
                let mut buf = [0; 4];
                let operator = self.input.and_then(|c| Operator::from_symbol(c.encode_utf8(&mut buf)));
                match operator {
                    Some(operator) => {
                        self.operator = Some(operator);
                        self.push(&[State::UnarySimple, State::Consume]);
                    }
                    None => self.invalid_character(),
                }
            }
            Some(operator) => match self.input {
                None => self.fail(RangeError::OrphanedOperator(operator)),
                Some(c) if c.is_whitespace() => self.fail(RangeError::OrphanedOperator(operator)),
                Some(_) => self.push(&[State::VersionString]),
            },
        }
    }

    /// Operators that are, or may be, two characters long. Two characters
    /// are accumulated and looked up first, falling back to just the first.
    fn unary_complex(&mut self) {
        match self.builder.chars().count() {
            0 => {
                if let Some(c) = self.input {
                    self.builder.push(c);
                }
                self.push(&[State::UnaryComplex, State::Consume]);
            }
            1 => match self.input {
                Some(c) if !c.is_whitespace() => {
                    // Not consumed, it may turn out to start the version
                    self.builder.push(c);
                    self.push(&[State::UnaryComplex]);
                }
                _ => match Operator::from_symbol(&self.builder) {
                    Some(operator) => self.fail(RangeError::OrphanedOperator(operator)),
                    None => self.invalid_character(),
                },
            },
            _ => {
                if let Some(operator) = Operator::from_symbol(&self.builder) {
                    self.operator = Some(operator);
                    self.builder.clear();
                    self.push(&[State::VersionString, State::Consume]);
                    return;
                }

                self.builder.pop();
                match Operator::from_symbol(&self.builder) {
                    Some(operator) => {
                        self.operator = Some(operator);
                        self.builder.clear();
                        self.push(&[State::VersionString]);
                    }
                    None => self.invalid_character(),
                }
            }
        }
    }

    fn version_string(&mut self) {
        match self.input {
            Some(c) if !c.is_whitespace() => {
                if is_version_char(c) {
                    self.builder.push(c);
                    self.push(&[State::VersionString, State::Consume]);
                } else {
                    self.invalid_character();
                }
            }
            // Whitespace or the end of input finishes the version
            _ if self.builder.is_empty() => match self.operator {
                Some(operator) => self.fail(RangeError::OrphanedOperator(operator)),
                None => self.invalid_character(),
            },
            _ => {
                let operator = self.operator.take().unwrap_or(Operator::Equal);
                let version = mem::take(&mut self.builder);
                match Version::parse_with(&version, ParseMode::AllowPrefix) {
                    Ok(parsed) => {
                        self.current.push(Comparator::new(operator, parsed));
                        // The current character is left for Identify, which
                        // also handles the end of input.
                        self.push(&[State::Identify]);
                    }
                    Err(source) => self.fail(RangeError::InvalidVersion { version, source }),
                }
            }
        }
    }
}
