//! Builds small TIFF buffers for tests.
//!
//! Directories are appended in call order, so a block must be built before
//! anything that points at it.

use tiff_meta_types::Endianness;

/// The payload of one test entry.
#[derive(Clone, Debug)]
pub enum Payload {
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    Bytes { ty: u16, bytes: Vec<u8> },
}

#[derive(Clone, Debug)]
pub struct TestEntry {
    pub tag: u16,
    pub payload: Payload,
}

pub fn short(tag: u16, value: u16) -> TestEntry {
    TestEntry {
        tag,
        payload: Payload::Shorts(vec![value]),
    }
}

pub fn long(tag: u16, value: u32) -> TestEntry {
    TestEntry {
        tag,
        payload: Payload::Longs(vec![value]),
    }
}

pub fn rationals(tag: u16, values: &[(u32, u32)]) -> TestEntry {
    TestEntry {
        tag,
        payload: Payload::Rationals(values.to_vec()),
    }
}

/// A NUL-terminated ASCII entry.
pub fn ascii(tag: u16, text: &str) -> TestEntry {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    TestEntry {
        tag,
        payload: Payload::Bytes { ty: 2, bytes },
    }
}

pub fn undefined(tag: u16, bytes: &[u8]) -> TestEntry {
    TestEntry {
        tag,
        payload: Payload::Bytes {
            ty: 7,
            bytes: bytes.to_vec(),
        },
    }
}

pub struct TiffBuilder {
    endianness: Endianness,
    buf: Vec<u8>,
}

impl TiffBuilder {
    pub fn new(endianness: Endianness) -> Self {
        let mut buf = match endianness {
            Endianness::Little => b"II\x2a\x00".to_vec(),
            Endianness::Big => b"MM\x00\x2a".to_vec(),
        };
        buf.extend_from_slice([0_u8; 4].as_slice());
        Self { endianness, buf }
    }

    /// Where the next directory (or data) will land.
    pub fn next_offset(&self) -> u32 {
        self.buf.len() as u32
    }

    /// Appends raw bytes, returning their offset.
    pub fn data(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.next_offset();
        self.buf.extend_from_slice(bytes);
        offset
    }

    /// Appends a directory, plus any out-of-line values after it, returning
    /// the directory's offset. Its next pointer is zero.
    pub fn directory(&mut self, entries: &[TestEntry]) -> u32 {
        let offset = self.next_offset();
        let dir_len = 2 + entries.len() * 12 + 4;
        let mut overflow_at = offset as usize + dir_len;
        let mut overflow: Vec<u8> = Vec::new();

        let mut dir: Vec<u8> = Vec::with_capacity(dir_len);
        dir.extend(self.u16_bytes(entries.len() as u16));

        for entry in entries {
            let (ty, count, bytes) = self.encode(&entry.payload);
            dir.extend(self.u16_bytes(entry.tag));
            dir.extend(self.u16_bytes(ty));
            dir.extend(self.u32_bytes(count));

            if bytes.len() <= 4 {
                let mut inline = bytes;
                inline.resize(4, 0);
                dir.extend(inline);
            } else {
                dir.extend(self.u32_bytes(overflow_at as u32));
                overflow_at += bytes.len();
                overflow.extend(bytes);
            }
        }

        dir.extend(self.u32_bytes(0));
        self.buf.extend(dir);
        self.buf.extend(overflow);
        offset
    }

    /// Sets the "next IFD" pointer of the directory at `from`.
    pub fn link(&mut self, from: u32, to: u32) {
        let from = from as usize;
        let count_bytes = [self.buf[from], self.buf[from + 1]];
        let count = match self.endianness {
            Endianness::Little => u16::from_le_bytes(count_bytes),
            Endianness::Big => u16::from_be_bytes(count_bytes),
        };
        let at = from + 2 + usize::from(count) * 12;
        let bytes = self.u32_bytes(to);
        self.buf[at..at + 4].copy_from_slice(bytes.as_slice());
    }

    pub fn set_ifd0(&mut self, offset: u32) {
        let bytes = self.u32_bytes(offset);
        self.buf[4..8].copy_from_slice(bytes.as_slice());
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    fn encode(&self, payload: &Payload) -> (u16, u32, Vec<u8>) {
        match payload {
            Payload::Shorts(v) => (
                3,
                v.len() as u32,
                v.iter().flat_map(|s| self.u16_bytes(*s)).collect(),
            ),
            Payload::Longs(v) => (
                4,
                v.len() as u32,
                v.iter().flat_map(|l| self.u32_bytes(*l)).collect(),
            ),
            Payload::Rationals(v) => (
                5,
                v.len() as u32,
                v.iter()
                    .flat_map(|(n, d)| {
                        let mut b = self.u32_bytes(*n);
                        b.extend(self.u32_bytes(*d));
                        b
                    })
                    .collect(),
            ),
            Payload::Bytes { ty, bytes } => (*ty, bytes.len() as u32, bytes.clone()),
        }
    }

    fn u16_bytes(&self, v: u16) -> Vec<u8> {
        match self.endianness {
            Endianness::Little => v.to_le_bytes().to_vec(),
            Endianness::Big => v.to_be_bytes().to_vec(),
        }
    }

    fn u32_bytes(&self, v: u32) -> Vec<u8> {
        match self.endianness {
            Endianness::Little => v.to_le_bytes().to_vec(),
            Endianness::Big => v.to_be_bytes().to_vec(),
        }
    }
}
