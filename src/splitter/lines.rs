use std::io::{self, BufRead};

/// Reads raw lines ending in `\n`, `\r\n` or a lone `\r`
///
/// Terminators are stripped. A final line without a terminator is still
/// returned; an empty input yields no lines.
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader { inner }
    }

    /// Read the next line into `buf`, returning `false` at end of input
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<bool> {
        buf.clear();
        let mut read_any = false;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read_any);
            }
            read_any = true;

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    let terminator = available[pos];
                    buf.extend_from_slice(&available[..pos]);
                    self.inner.consume(pos + 1);
                    if terminator == b'\r' {
                        self.skip_line_feed()?;
                    }
                    return Ok(true);
                }
                None => {
                    let len = available.len();
                    buf.extend_from_slice(available);
                    self.inner.consume(len);
                }
            }
        }
    }

    // \r\n may straddle two buffer fills.
    fn skip_line_feed(&mut self) -> io::Result<()> {
        loop {
            match self.inner.fill_buf() {
                Ok(available) => {
                    if available.first() == Some(&b'\n') {
                        self.inner.consume(1);
                    }
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
