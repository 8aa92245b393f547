use std::io::{self, Read, Write};

use native_messaging::host::{self, NmError};
use serde::Serialize;

use crate::error::FrameError;

const HEADER_LEN: usize = 4;

/// Largest request the host accepts. The header is checked before any
/// payload buffer exists.
pub const MAX_REQUEST_LEN: usize = 64 * 1024 * 1024;

// Counts what the decoder pulls for one frame so a failed decode can be
// told apart: clean EOF, cut-off frame, or oversized header.
struct Tally<R> {
    inner: R,
    header: [u8; HEADER_LEN],
    seen: usize,
}

impl<R> Tally<R> {
    fn new(inner: R) -> Self {
        Tally {
            inner,
            header: [0; HEADER_LEN],
            seen: 0,
        }
    }

    fn declared_len(&self) -> Option<usize> {
        (self.seen >= HEADER_LEN).then(|| u32::from_ne_bytes(self.header) as usize)
    }

    fn failure(&self, err: Option<NmError>) -> FrameError {
        let native = || FrameError::Native(err.map(|e| e.to_string()).unwrap_or_default());
        if self.seen == 0 {
            return native();
        }
        match self.declared_len() {
            None => FrameError::Truncated {
                read: self.seen,
                expected: HEADER_LEN,
            },
            Some(len) if len > MAX_REQUEST_LEN => FrameError::TooLarge(len),
            Some(len) if self.seen - HEADER_LEN < len => FrameError::Truncated {
                read: self.seen - HEADER_LEN,
                expected: len,
            },
            Some(_) => native(),
        }
    }
}

impl<R: Read> Read for Tally<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        let before = self.seen;
        if before < HEADER_LEN {
            let take = n.min(HEADER_LEN - before);
            self.header[before..before + take].copy_from_slice(&buf[..take]);
        }
        self.seen += n;

        // Refuse on the read that completes the header, before the decoder
        // sizes its buffer from it.
        if before < HEADER_LEN && self.declared_len().is_some_and(|len| len > MAX_REQUEST_LEN) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "declared frame length over limit",
            ));
        }
        Ok(n)
    }
}

/// Reads one frame. `Ok(None)` means the browser closed the pipe before a
/// new header started.
pub fn read_frame(reader: &mut impl Read) -> Result<Option<Vec<u8>>, FrameError> {
    let mut tally = Tally::new(reader);
    let decoded = host::decode_message_opt(&mut tally, host::MAX_FROM_BROWSER);
    match decoded {
        Ok(Some(payload)) => Ok(Some(payload.into_bytes())),
        Ok(None) | Err(NmError::Disconnected) if tally.seen == 0 => Ok(None),
        Ok(None) => Err(tally.failure(None)),
        Err(e) => Err(tally.failure(Some(e))),
    }
}

pub fn write_frame(writer: &mut impl Write, message: &impl Serialize) -> Result<(), FrameError> {
    host::send_json(writer, message).map_err(|e| FrameError::Native(e.to_string()))?;
    writer.flush()?;
    Ok(())
}
