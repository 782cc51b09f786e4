use std::fmt;

/// Permission to issue exactly one request now.
///
/// The sequence number is for diagnostics only; all workers hit the
/// currently configured URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchToken {
    pub seq: u64,
}

impl DispatchToken {
    pub fn new(seq: u64) -> Self {
        Self { seq }
    }
}

impl fmt::Display for DispatchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.seq)
    }
}
