// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal JSON scanner
//!
//! Finds value boundaries inside a raw byte buffer without building a tree.
//! The scanner trusts its input to be well-formed JSON and does not validate
//! it. On anything else the result is unspecified, but every read is bounds
//! checked: a scan that runs off the end of the buffer yields `None`.

/// A position inside a JSON byte buffer
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Create a cursor at `pos`, clamped to the end of `buf`
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    /// Absolute offset into the underlying buffer
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes from the cursor to the end of the buffer
    pub fn rest(&self) -> &'a [u8] {
        self.buf.get(self.pos..).unwrap_or_default()
    }

    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    fn advance(&mut self, n: usize) -> Option<()> {
        let next = self.pos.checked_add(n)?;
        if next > self.buf.len() {
            return None;
        }
        self.pos = next;
        Some(())
    }

    /// Consume `byte` if it is next
    pub fn eat(&mut self, byte: u8) -> Option<()> {
        if self.peek()? != byte {
            return None;
        }
        self.pos += 1;
        Some(())
    }

    /// Advance past space, tab, newline and carriage return
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Consume one of `{ } [ ] : ,` and any whitespace after it
    pub fn skip_separator(&mut self, byte: u8) -> Option<()> {
        self.eat(byte)?;
        self.skip_whitespace();
        Some(())
    }

    /// Advance past the value starting at the cursor
    pub fn skip_value(&mut self) -> Option<()> {
        match self.peek()? {
            b'{' => self.skip_object(),
            b'[' => self.skip_array(),
            b'"' => self.skip_string(),
            b't' | b'n' => self.advance(4),
            b'f' => self.advance(5),
            _ => self.skip_number(),
        }
    }

    pub fn skip_object(&mut self) -> Option<()> {
        self.skip_container(b'{', b'}')
    }

    pub fn skip_array(&mut self) -> Option<()> {
        self.skip_container(b'[', b']')
    }

    /// Jump between brackets of one kind, counting depth.
    ///
    /// Strings are skipped whole so brackets inside them are never counted.
    /// Brackets of the other kind are irrelevant to the depth and ignored.
    fn skip_container(&mut self, open: u8, close: u8) -> Option<()> {
        self.eat(open)?;
        let mut depth = 1usize;
        while depth > 0 {
            let offset = self
                .rest()
                .iter()
                .position(|&b| b == open || b == close || b == b'"')?;
            self.pos += offset;
            match self.peek()? {
                b'"' => self.skip_string()?,
                b if b == open => {
                    depth += 1;
                    self.pos += 1;
                }
                _ => {
                    depth -= 1;
                    self.pos += 1;
                }
            }
        }
        Some(())
    }

    /// Advance past a string, including both quotes.
    ///
    /// Escapes are not decoded. A quote terminates the string unless it is
    /// preceded by an odd run of backslashes.
    pub fn skip_string(&mut self) -> Option<()> {
        self.eat(b'"')?;
        loop {
            let start = self.pos;
            let quote = start + self.rest().iter().position(|&b| b == b'"')?;
            let backslashes = self.buf[start..quote]
                .iter()
                .rev()
                .take_while(|&&b| b == b'\\')
                .count();
            self.pos = quote + 1;
            if backslashes % 2 == 0 {
                return Some(());
            }
        }
    }

    /// Advance past a string and return its raw contents between the quotes
    pub fn read_string(&mut self) -> Option<&'a [u8]> {
        let start = self.pos + 1;
        self.skip_string()?;
        self.buf.get(start..self.pos - 1)
    }

    /// Advance past `-? digits (. digits)? ([eE] [+-]? digits)?`
    pub fn skip_number(&mut self) -> Option<()> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.skip_digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            self.skip_digits();
        }
        // An empty number means the leading byte started no value at all
        (self.pos > start).then_some(())
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }
}

/// Skip the value at the start of `buf`, returning the bytes after it
pub fn skip_value(buf: &[u8]) -> Option<&[u8]> {
    let mut cursor = Cursor::new(buf);
    cursor.skip_value()?;
    Some(cursor.rest())
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
