//! Line reassembly across arbitrary chunk boundaries.

/// Accumulates raw chunks and hands back complete lines.
///
/// Holds two kinds of leftovers between chunks: bytes of a UTF-8 sequence
/// that was cut in half, and decoded text not yet terminated by `\n`. After
/// every [`push`](Self::push) the text part is exactly the unterminated tail
/// of everything decoded so far.
#[derive(Debug, Default)]
pub struct LineBuffer {
    /// Undecoded bytes of an incomplete trailing UTF-8 sequence.
    pending: Vec<u8>,
    /// Decoded text after the last newline.
    text: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the lines it completed, without their `\n`.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.decode(chunk);

        let Some(last_newline) = self.text.rfind('\n') else {
            return Vec::new();
        };

        let rest = self.text.split_off(last_newline + 1);
        let mut complete = std::mem::replace(&mut self.text, rest);
        complete.pop();

        complete.split('\n').map(str::to_string).collect()
    }

    /// Text received after the last newline.
    pub fn remainder(&self) -> &str {
        &self.text
    }

    /// True if anything is buffered that did not end in a newline.
    pub fn has_partial(&self) -> bool {
        !self.text.is_empty() || !self.pending.is_empty()
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.text.clear();
    }

    /// Decode as much of `pending + chunk` as forms complete characters.
    ///
    /// Invalid sequences become U+FFFD. An incomplete sequence at the very end
    /// stays in `pending` for the next chunk.
    fn decode(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);

        let mut consumed = 0;
        while consumed < self.pending.len() {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    consumed = self.pending.len();
                }
                Err(err) => {
                    let valid_end = consumed + err.valid_up_to();
                    self.text
                        .push_str(&String::from_utf8_lossy(&self.pending[consumed..valid_end]));
                    consumed = valid_end;

                    match err.error_len() {
                        Some(invalid_len) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            consumed += invalid_len;
                        }
                        None => break,
                    }
                }
            }
        }

        self.pending.drain(..consumed);
    }
}
