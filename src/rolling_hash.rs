use std::fmt;
use std::str::FromStr;

use crate::adler32::Adler32;
use crate::buzhash::{Buzhash32, Buzhash64};
use crate::error::{ConfigError, HashError};
use crate::rabinkarp::RabinKarp32;

/// Window size of the reference configuration.
pub const DEFAULT_WINDOW_SIZE: usize = 64;

/// A checksum over a fixed-length window that can slide one byte at a time.
///
/// Rolling a byte must leave the hasher in the same observable state as
/// initializing it from scratch on the shifted window.
pub trait RollingHash {
    /// Window length in bytes, fixed at construction.
    fn window_size(&self) -> usize;

    /// Native output width in bits.
    fn width(&self) -> u32;

    /// Reset the state from a full window.
    fn initialize(&mut self, window: &[u8]) -> Result<(), HashError>;

    /// Evict the oldest window byte and admit `byte`.
    fn roll(&mut self, byte: u8);

    /// Current checksum, zero-extended to 64 bits.
    fn value(&self) -> u64;

    /// Append the checksum's native-width bytes, most significant first.
    fn sum_bytes(&self, out: &mut Vec<u8>) {
        let bytes = self.value().to_be_bytes();
        let len = (self.width() / 8) as usize;
        out.extend_from_slice(&bytes[bytes.len() - len..]);
    }
}

/// Ring buffer holding the bytes currently covered by a rolling hash.
#[derive(Debug, Clone)]
pub(crate) struct Window {
    bytes: Vec<u8>,
    head: usize,
}

impl Window {
    pub(crate) fn zeroed(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        Ok(Self {
            bytes: vec![0; size],
            head: 0,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn load(&mut self, data: &[u8]) -> Result<(), HashError> {
        if data.len() != self.bytes.len() {
            return Err(HashError::InvalidWindowSize {
                expected: self.bytes.len(),
                actual: data.len(),
            });
        }
        self.bytes.copy_from_slice(data);
        self.head = 0;
        Ok(())
    }

    /// Admit `byte` at the trailing edge and return the evicted leading byte.
    pub(crate) fn slide(&mut self, byte: u8) -> u8 {
        let old = std::mem::replace(&mut self.bytes[self.head], byte);
        self.head += 1;
        if self.head == self.bytes.len() {
            self.head = 0;
        }
        old
    }

    /// Bytes oldest to newest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        let (newer, older) = self.bytes.split_at(self.head);
        older.iter().chain(newer).copied()
    }
}

/// Registered rolling checksums, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Adler32,
    RabinKarp32,
    Buzhash32,
    Buzhash64,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Adler32,
        Algorithm::RabinKarp32,
        Algorithm::Buzhash32,
        Algorithm::Buzhash64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Adler32 => "adler32",
            Algorithm::RabinKarp32 => "rabinkarp32",
            Algorithm::Buzhash32 => "buzhash32",
            Algorithm::Buzhash64 => "buzhash64",
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "bozo32" is the name older builds of the tool used.
        if s == "bozo32" {
            return Ok(Algorithm::RabinKarp32);
        }
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| ConfigError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One hasher of whichever algorithm was selected.
#[derive(Debug, Clone)]
pub enum Roller {
    Adler32(Adler32),
    RabinKarp32(RabinKarp32),
    Buzhash32(Buzhash32),
    Buzhash64(Buzhash64),
}

impl Roller {
    pub fn new(algorithm: Algorithm, window_size: usize) -> Result<Self, ConfigError> {
        Ok(match algorithm {
            Algorithm::Adler32 => Roller::Adler32(Adler32::new(window_size)?),
            Algorithm::RabinKarp32 => Roller::RabinKarp32(RabinKarp32::new(window_size)?),
            Algorithm::Buzhash32 => Roller::Buzhash32(Buzhash32::new(window_size)?),
            Algorithm::Buzhash64 => Roller::Buzhash64(Buzhash64::new(window_size)?),
        })
    }
}

macro_rules! dispatch {
    ($self:ident, $h:ident => $body:expr) => {
        match $self {
            Roller::Adler32($h) => $body,
            Roller::RabinKarp32($h) => $body,
            Roller::Buzhash32($h) => $body,
            Roller::Buzhash64($h) => $body,
        }
    };
}

impl RollingHash for Roller {
    fn window_size(&self) -> usize {
        dispatch!(self, h => h.window_size())
    }

    fn width(&self) -> u32 {
        dispatch!(self, h => h.width())
    }

    fn initialize(&mut self, window: &[u8]) -> Result<(), HashError> {
        dispatch!(self, h => h.initialize(window))
    }

    #[inline]
    fn roll(&mut self, byte: u8) {
        dispatch!(self, h => h.roll(byte))
    }

    #[inline]
    fn value(&self) -> u64 {
        dispatch!(self, h => h.value())
    }
}
