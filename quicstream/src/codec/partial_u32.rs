/// Little-endian `u32` which may arrive split across several buffers.
#[derive(Default, Debug, Clone)]
pub struct PartialU32 {
    buf: [u8; 4],
    len: usize,
}

impl PartialU32 {
    pub fn new() -> PartialU32 {
        Default::default()
    }

    /// Bytes still needed to complete the value.
    pub fn bytes_needed(&self) -> usize {
        4 - self.len
    }

    /// Take bytes from `data`.
    ///
    /// Returns number of bytes taken, and the value once all four bytes
    /// are there. After the value is returned the parser is reset.
    pub fn feed(&mut self, data: &[u8]) -> (usize, Option<u32>) {
        let take = std::cmp::min(self.bytes_needed(), data.len());
        self.buf[self.len..self.len + take].copy_from_slice(&data[..take]);
        self.len += take;
        if self.len < 4 {
            return (take, None);
        }
        self.len = 0;
        (take, Some(u32::from_le_bytes(self.buf)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn whole() {
        let mut p = PartialU32::new();
        assert_eq!((4, Some(0x04030201)), p.feed(&[1, 2, 3, 4, 5]));
        assert_eq!(4, p.bytes_needed());
    }

    #[test]
    fn split() {
        let mut p = PartialU32::new();
        assert_eq!((1, None), p.feed(&[7]));
        assert_eq!(3, p.bytes_needed());
        assert_eq!((0, None), p.feed(&[]));
        assert_eq!((2, None), p.feed(&[0, 0]));
        assert_eq!((1, Some(7)), p.feed(&[0, 9, 9]));
    }
}
