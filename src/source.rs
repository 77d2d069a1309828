use std::io::{ErrorKind, Read};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::SourceError;

/// Supplies the bytes the driver rolls through, one buffer at a time.
pub trait ByteSource {
    /// Overwrite the whole of `buf` with fresh input.
    ///
    /// A source that cannot fill the buffer returns
    /// [`SourceError::EndOfSource`] with the number of leading bytes it did write.
    fn refill(&mut self, buf: &mut [u8]) -> Result<(), SourceError>;
}

/// Endless pseudo-random bytes.
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seeded from operating system entropy; every run differs.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same stream.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ByteSource for RandomSource {
    fn refill(&mut self, buf: &mut [u8]) -> Result<(), SourceError> {
        self.rng.fill_bytes(buf);
        Ok(())
    }
}

/// Bytes read from any [`Read`] implementation, such as a file or a device.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn refill(&mut self, buf: &mut [u8]) -> Result<(), SourceError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => return Err(SourceError::EndOfSource { filled }),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SourceError::Io(e)),
            }
        }
        Ok(())
    }
}
