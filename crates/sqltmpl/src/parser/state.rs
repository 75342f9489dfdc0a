use crate::value::Value;

/// Scanner position within the template grammar.
///
/// Exactly one state is active at a time. Conditional-block membership is
/// tracked separately (see [`Block`]) since at most one block can be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    /// Plain SQL text.
    General,
    /// Inside `'...'`; `start` is the byte offset of the opening quote.
    StringLiteral { start: usize },
    /// A `?` was seen and its typed suffix (if any) is still pending.
    Placeholder,
}

/// An open `{ ... }` conditional block.
///
/// Output is buffered here instead of the main output until the block closes,
/// together with every raw value consumed by placeholders inside it.
#[derive(Debug)]
pub(crate) struct Block<'p> {
    /// Byte offset of the opening `{`.
    pub start: usize,
    pub buf: String,
    pub values: Vec<&'p Value>,
}

impl<'p> Block<'p> {
    pub fn open(start: usize) -> Self {
        Self {
            start,
            buf: String::new(),
            values: Vec::new(),
        }
    }

    /// A block is kept unless one of its values strictly equals `skip`.
    pub fn is_included(&self, skip: &Value) -> bool {
        !self.values.iter().any(|v| *v == skip)
    }
}
