//! Fixed-capacity history of the most recently scanned tokens.

use super::tokens::Token;

/// Number of tokens remembered. Must stay a power of two.
pub const MAX_TOKENBUF_SZ: usize = 16;

pub struct TokenBuffer {
    buf: [Option<Token>; MAX_TOKENBUF_SZ],
    head: usize,
}

impl TokenBuffer {
    pub fn new() -> Self {
        TokenBuffer {
            buf: std::array::from_fn(|_| None),
            head: 0,
        }
    }

    /// Records a scanned token, overwriting the oldest one once full.
    pub fn push(&mut self, token: Token) {
        self.buf[self.head] = Some(token);
        self.head = (self.head + 1) & (MAX_TOKENBUF_SZ - 1);
    }

    /// Looks `n` tokens back; `0` is the token scanned last.
    ///
    /// Returns `None` when `n` reaches past the buffer or past the first token pushed.
    pub fn lookbehind(&self, n: usize) -> Option<&Token> {
        if n >= MAX_TOKENBUF_SZ {
            return None;
        }

        let index = (self.head + MAX_TOKENBUF_SZ - 1 - n) & (MAX_TOKENBUF_SZ - 1);
        self.buf[index].as_ref()
    }
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new()
    }
}
