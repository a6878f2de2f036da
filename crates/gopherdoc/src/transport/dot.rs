//! Dot-stuffed text framing for responses.
//!
//! Bare line feeds become CRLF, a line starting with `.` gets a second `.`,
//! and the body is closed by a line holding a single `.`.

use std::io::{self, Write};

const TERMINATOR: &[u8] = b".\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing written yet.
    Begin,
    /// At the start of a line.
    BeginLine,
    /// Inside a line.
    Data,
    /// Just wrote a carriage return.
    Cr,
}

/// Writer that frames everything written through it as a dot-terminated
/// text body.
///
/// The terminator is written by [`DotWriter::finish`], or by `Drop` if the
/// writer is abandoned part-way through, so every response that starts also
/// ends.
pub(crate) struct DotWriter<W: Write> {
    inner: W,
    state: State,
    finished: bool,
}

impl<W: Write> DotWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            state: State::Begin,
            finished: false,
        }
    }

    /// Ends the current line if needed, writes the terminator and flushes.
    ///
    /// Calling it more than once has no further effect.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        match self.state {
            State::Begin | State::BeginLine => {}
            State::Data => self.inner.write_all(b"\r\n")?,
            State::Cr => self.inner.write_all(b"\n")?,
        }
        self.state = State::BeginLine;
        self.inner.write_all(TERMINATOR)?;
        self.inner.flush()
    }

    /// Closes the writer without writing anything further, not even the
    /// terminator.
    pub(crate) fn abandon(&mut self) {
        self.finished = true;
    }

    fn encode(&mut self, buf: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(buf.len() + buf.len() / 16 + 2);
        for &byte in buf {
            match self.state {
                State::Begin | State::BeginLine => {
                    if byte == b'.' {
                        out.push(b'.');
                    }
                    self.state = line_state(byte, &mut out);
                }
                State::Data => self.state = line_state(byte, &mut out),
                State::Cr => {
                    self.state = if byte == b'\n' {
                        State::BeginLine
                    } else {
                        line_state(byte, &mut out)
                    };
                }
            }
            out.push(byte);
        }
        out
    }
}

fn line_state(byte: u8, out: &mut Vec<u8>) -> State {
    match byte {
        b'\r' => State::Cr,
        b'\n' => {
            out.push(b'\r');
            State::BeginLine
        }
        _ => State::Data,
    }
}

impl<W: Write> Write for DotWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "response already terminated",
            ));
        }
        let encoded = self.encode(buf);
        self.inner.write_all(&encoded)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: Write> Drop for DotWriter<W> {
    fn drop(&mut self) {
        // Errors here mean the peer is gone; there is nobody left to tell.
        let _ = self.finish();
    }
}
