//! Edit-script tokenizer: `#` starts a line comment; tokens are separated
//! by whitespace, newlines, or `;`.

use std::collections::VecDeque;

use crate::script::errors::ScriptError;

/// Token stream over an edit script.
#[derive(Debug)]
pub struct Tokens {
    queue: VecDeque<String>,
}

impl Tokens {
    pub fn lex(text: &str) -> Self {
        let queue = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ';'))
            .filter(|tok| !tok.is_empty())
            .map(str::to_string)
            .collect();
        Self { queue }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Next token, or a script-syntax error if the stream ended where one
    /// was required.
    pub fn next_tok(&mut self) -> Result<String, ScriptError> {
        self.queue.pop_front().ok_or(ScriptError::UnexpectedEnd)
    }

    pub fn peek(&self) -> Option<&str> {
        self.queue.front().map(String::as_str)
    }

    /// Consume the next token, which must equal `keyword`.
    pub fn expect(&mut self, keyword: &'static str) -> Result<(), ScriptError> {
        let tok = self.next_tok()?;
        if tok == keyword {
            Ok(())
        } else {
            Err(ScriptError::UnexpectedToken {
                expected: keyword,
                found: tok,
            })
        }
    }
}
