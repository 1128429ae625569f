//! A tiny Brainfuck interpreter library with a transliteration sidecar.
//!
//! This crate provides a minimal Brainfuck interpreter that operates on a
//! growable memory tape (default 30,000 cells) with a single data pointer,
//! plus a [`Mapping`] type that converts programs to and from an opaque
//! fixed-width token alphabet (the へ/ヘ encoding).
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cells wrap around at the byte boundary.
//! - Lenient pointer bounds: the tape grows to the right on demand, and
//!   moving left from cell 0 is a no-op (kept for compatibility with the
//!   older implementation this replaces).
//! - Input `,` consumes from a caller-supplied string; on EOF the current
//!   cell is set to 0.
//! - Output `.` accumulates bytes; [`Brainfuck::run`] returns them as text.
//! - Properly handles nested loops `[]`; unmatched brackets are reported
//!   before execution starts, with the offending instruction index.
//! - Any non-Brainfuck character is treated as a comment and ignored.
//!
//! Quick start:
//!
//! ```
//! use hehehe::Brainfuck;
//!
//! let mut bf = Brainfuck::with_input(",.,.,.", "abc");
//! assert_eq!(bf.run().expect("program should run"), "abc");
//! ```

use std::fmt;

pub mod cli_util;
mod mapping;

pub use mapping::{Mapping, MappingError};

/// Default number of tape cells, matching the classic machine size.
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// Errors that can occur while preparing Brainfuck code for execution.
///
/// The step loop itself never fails: stray characters are filtered out by
/// [`sanitize`] and bracket pairing is validated up front, so the only
/// failure mode is an unbalanced loop.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("unmatched {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: BracketKind },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

/// One Brainfuck instruction.
///
/// Source text is mapped onto this enum once, ahead of execution, so the
/// interpreter loop dispatches on a tag instead of re-comparing characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// `>`: move the data pointer right, growing the tape if needed.
    Right,
    /// `<`: move the data pointer left, clamping at cell 0.
    Left,
    /// `+`: increment the current cell (wrapping).
    Incr,
    /// `-`: decrement the current cell (wrapping).
    Decr,
    /// `.`: append the current cell to the output.
    Output,
    /// `,`: read the next input byte into the current cell (0 on EOF).
    Input,
    /// `[`: jump past the matching `]` when the current cell is 0.
    LoopOpen,
    /// `]`: jump back to the matching `[` when the current cell is not 0.
    LoopClose,
}

impl Opcode {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '>' => Some(Opcode::Right),
            '<' => Some(Opcode::Left),
            '+' => Some(Opcode::Incr),
            '-' => Some(Opcode::Decr),
            '.' => Some(Opcode::Output),
            ',' => Some(Opcode::Input),
            '[' => Some(Opcode::LoopOpen),
            ']' => Some(Opcode::LoopClose),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Opcode::Right => '>',
            Opcode::Left => '<',
            Opcode::Incr => '+',
            Opcode::Decr => '-',
            Opcode::Output => '.',
            Opcode::Input => ',',
            Opcode::LoopOpen => '[',
            Opcode::LoopClose => ']',
        }
    }
}

/// Keep only Brainfuck instruction characters, preserving their order.
///
/// Everything else (whitespace, comments, decoration) is dropped silently.
/// Later stages rely on index-for-index correspondence with this output,
/// so no reordering or collapsing is performed.
pub fn sanitize(source: &str) -> String {
    source.chars().filter(|c| Opcode::from_char(*c).is_some()).collect()
}

/// Precompute matching bracket positions for O(1) jumps and early validation.
///
/// `jump_table[i]` holds the matching index for `[` or `]` at index `i`;
/// for non-bracket positions it is `None`. The map is bidirectional: if
/// `jump_table[i] == Some(j)` then `jump_table[j] == Some(i)`.
fn build_jump_table(code: &[Opcode]) -> Result<Vec<Option<usize>>, BrainfuckError> {
    let mut jump_table: Vec<Option<usize>> = vec![None; code.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, op) in code.iter().enumerate() {
        match op {
            Opcode::LoopOpen => stack.push(i),
            Opcode::LoopClose => {
                let Some(open_index) = stack.pop() else {
                    return Err(BrainfuckError::UnmatchedBracket {
                        ip: i,
                        kind: BracketKind::Close,
                    });
                };
                jump_table[open_index] = Some(i);
                jump_table[i] = Some(open_index);
            }
            _ => {}
        }
    }

    // Report the innermost pending open, i.e. the most recently pushed.
    if let Some(unmatched_open) = stack.last().copied() {
        return Err(BrainfuckError::UnmatchedBracket {
            ip: unmatched_open,
            kind: BracketKind::Open,
        });
    }

    Ok(jump_table)
}

/// The memory tape: a growable run of byte-wrapped cells.
///
/// Growth is monotonic and rightward only; the tape never shrinks and
/// never extends left of address 0.
struct Tape {
    cells: Vec<u8>,
}

impl Tape {
    fn new(size: usize) -> Self {
        // At least one cell so the data pointer always addresses something.
        Self { cells: vec![0; size.max(1)] }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    fn grow(&mut self) {
        self.cells.push(0);
    }

    fn get(&self, dp: usize) -> u8 {
        self.cells[dp]
    }

    fn set(&mut self, dp: usize, value: u8) {
        self.cells[dp] = value;
    }

    fn incr(&mut self, dp: usize) {
        self.cells[dp] = self.cells[dp].wrapping_add(1);
    }

    fn decr(&mut self, dp: usize) {
        self.cells[dp] = self.cells[dp].wrapping_sub(1);
    }
}

/// A finite, read-once input source with EOF-as-zero semantics.
struct InputStream {
    chars: Vec<char>,
    pos: usize,
}

impl InputStream {
    fn new(input: &str) -> Self {
        Self { chars: input.chars().collect(), pos: 0 }
    }

    /// Next character's code (mod 256), or 0 forever once exhausted.
    /// The cursor does not advance past the end.
    fn next_byte(&mut self) -> u8 {
        if self.pos < self.chars.len() {
            let b = (self.chars[self.pos] as u32 % 256) as u8;
            self.pos += 1;
            b
        } else {
            0
        }
    }
}

/// A simple Brainfuck interpreter.
///
/// The interpreter maintains:
/// - the sanitized program as a vector of [`Opcode`]s,
/// - a growable memory tape initialized to zeros (30,000 cells by default),
/// - a data pointer indexing into that tape,
/// - the input cursor and the accumulated output.
///
/// All state is private to one instance, so separate instances may run on
/// separate threads without any coordination.
pub struct Brainfuck {
    code: Vec<Opcode>,
    tape: Tape,
    dp: usize,
    ip: usize,
    input: InputStream,
    output: Vec<u8>,
}

impl Brainfuck {
    /// Create a new interpreter from Brainfuck `code` with no input.
    ///
    /// The memory tape is initialized to 30,000 zeroed cells.
    pub fn new(code: &str) -> Self {
        Self::new_with_memory(code, "", DEFAULT_TAPE_SIZE)
    }

    /// Create a new interpreter from Brainfuck `code` with an input string.
    pub fn with_input(code: &str, input: &str) -> Self {
        Self::new_with_memory(code, input, DEFAULT_TAPE_SIZE)
    }

    /// Create a new interpreter with a custom initial tape size.
    ///
    /// The tape still grows past `tape_size` on demand; the size only sets
    /// the initial allocation.
    pub fn new_with_memory(code: &str, input: &str, tape_size: usize) -> Self {
        Self {
            code: code.chars().filter_map(Opcode::from_char).collect(),
            tape: Tape::new(tape_size),
            dp: 0,
            ip: 0,
            input: InputStream::new(input),
            output: Vec::new(),
        }
    }

    /// Internal executor shared by `run` and `run_bounded`.
    fn execute(&mut self, max_steps: Option<usize>) -> Result<String, BrainfuckError> {
        let jump_table = build_jump_table(&self.code)?;

        let mut steps: usize = 0;
        while self.ip < self.code.len() {
            if let Some(max) = max_steps {
                if steps >= max {
                    break;
                }
            }

            match self.code[self.ip] {
                Opcode::Right => {
                    self.dp += 1;
                    if self.dp == self.tape.len() {
                        self.tape.grow();
                    }
                }
                Opcode::Left => {
                    // Stay at cell 0 (compatibility with the older
                    // implementation, which never errored here).
                    if self.dp > 0 {
                        self.dp -= 1;
                    }
                }
                Opcode::Incr => self.tape.incr(self.dp),
                Opcode::Decr => self.tape.decr(self.dp),
                Opcode::Output => self.output.push(self.tape.get(self.dp)),
                Opcode::Input => {
                    let b = self.input.next_byte();
                    self.tape.set(self.dp, b);
                }
                Opcode::LoopOpen => {
                    if self.tape.get(self.dp) == 0 {
                        // Jump to the matching ']'; the uniform advance
                        // below then moves past it.
                        self.ip = jump_table[self.ip].expect("validated bracket");
                    }
                }
                Opcode::LoopClose => {
                    if self.tape.get(self.dp) != 0 {
                        // Jump to the matching '['; the uniform advance
                        // below re-evaluates the loop body.
                        self.ip = jump_table[self.ip].expect("validated bracket");
                    }
                }
            }

            // Move to the next instruction
            self.ip += 1;
            steps += 1;
        }

        Ok(self.output.iter().map(|&b| char::from(b)).collect())
    }

    /// Execute the Brainfuck program until completion.
    ///
    /// Returns the accumulated output as text, or a [`BrainfuckError`] if
    /// the program's loops are unbalanced. Output characters map 1:1 to
    /// cell values; values above 127 come out as the corresponding
    /// U+0080..U+00FF code points.
    pub fn run(&mut self) -> Result<String, BrainfuckError> {
        self.execute(None)
    }

    /// Execute at most `max_steps` instructions.
    ///
    /// If the budget runs out the interpreter simply stops, leaving the
    /// run state as-is, and returns the output accumulated so far. This is
    /// the cooperative cancellation point for sandboxed execution.
    pub fn run_bounded(&mut self, max_steps: usize) -> Result<String, BrainfuckError> {
        self.execute(Some(max_steps))
    }

    /// Current data pointer, for inspection after a (possibly bounded) run.
    pub fn data_pointer(&self) -> usize {
        self.dp
    }

    /// Value of the tape cell at `index` (0 if the tape never grew there).
    pub fn cell(&self, index: usize) -> u8 {
        if index < self.tape.len() { self.tape.get(index) } else { 0 }
    }
}
