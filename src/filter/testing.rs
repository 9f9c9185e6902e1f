use std::io::{self, Read};

/// Generates one log line per second of 2025-01-01 without holding them.
pub(crate) struct SyntheticLog {
    second: u32,
    pending: Vec<u8>,
    offset: usize,
}

impl SyntheticLog {
    pub(crate) const SECONDS: u32 = 86_400;

    pub(crate) fn new() -> Self {
        Self {
            second: 0,
            pending: Vec::new(),
            offset: 0,
        }
    }
}

impl Read for SyntheticLog {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.offset == self.pending.len() {
            if self.second == Self::SECONDS {
                return Ok(0);
            }
            let s = self.second;
            self.pending = format!(
                "2025-01-01T{:02}:{:02}:{:02}.000000Z [net] tick {}\n",
                s / 3600,
                (s / 60) % 60,
                s % 60,
                s
            )
            .into_bytes();
            self.offset = 0;
            self.second += 1;
        }

        let n = buf.len().min(self.pending.len() - self.offset);
        buf[..n].copy_from_slice(&self.pending[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}
