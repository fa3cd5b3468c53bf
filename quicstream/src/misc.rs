use std::fmt;

/// Debug formatting of byte strings for log lines.
pub struct BsDebug<'a>(pub &'a [u8]);

fn fmt_b(b: u8, f: &mut fmt::Formatter) -> fmt::Result {
    // ASCII printable
    if b >= 0x20 && b < 0x7f {
        write!(f, "{}", b as char)
    } else {
        write!(f, "\\x{:02x}", b)
    }
}

impl<'a> fmt::Debug for BsDebug<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.0.len() > 20 && self.0.iter().all(|&b| b == self.0[0]) {
            write!(fmt, "{}*b\"", self.0.len())?;
            fmt_b(self.0[0], fmt)?;
            write!(fmt, "\"")?;
            return Ok(());
        }

        write!(fmt, "b\"")?;
        for &c in self.0 {
            fmt_b(c, fmt)?;
        }
        write!(fmt, "\"")?;
        Ok(())
    }
}
