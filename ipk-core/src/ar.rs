//! Minimal `ar` container writer: global magic, 60-byte member headers, 2-byte alignment.
//!
//! Only the subset opkg/dpkg need for a package: no symbol table, no GNU/BSD
//! long names. Values that do not fit their column are rejected instead of
//! being truncated.

use crate::error::{PackageError, Result};
use std::io::Write;

/// Global header at the start of every archive.
pub const MAGIC: &[u8; 8] = b"!<arch>\n";
/// Terminates each member header.
pub const TERMINATOR: &[u8; 2] = b"`\n";
pub const HEADER_LEN: usize = 60;
/// Regular file, rw-r--r--.
pub const DEFAULT_MODE: u32 = 0o100644;

// Column widths, in header order (16 + 12 + 6 + 6 + 8 + 10 + 2 = 60)
const NAME_W: usize = 16;
const MTIME_W: usize = 12;
const UID_W: usize = 6;
const GID_W: usize = 6;
const MODE_W: usize = 8;
const SIZE_W: usize = 10;

/// Member content before it is resolved to bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryData {
    Text(String),
    Binary(Vec<u8>),
}

impl EntryData {
    fn into_bytes(self) -> Vec<u8> {
        match self {
            EntryData::Text(s) => s.into_bytes(),
            EntryData::Binary(b) => b,
        }
    }
}

impl From<&str> for EntryData {
    fn from(s: &str) -> Self {
        EntryData::Text(s.to_string())
    }
}

impl From<String> for EntryData {
    fn from(s: String) -> Self {
        EntryData::Text(s)
    }
}

impl From<Vec<u8>> for EntryData {
    fn from(b: Vec<u8>) -> Self {
        EntryData::Binary(b)
    }
}

/// One archive member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub mtime: u64,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
}

impl FileEntry {
    /// Member with mtime/uid/gid 0 and mode `0o100644`.
    pub fn new(name: impl Into<String>, data: impl Into<EntryData>) -> Self {
        Self {
            name: name.into(),
            data: data.into().into_bytes(),
            mtime: 0,
            uid: 0,
            gid: 0,
            mode: DEFAULT_MODE,
        }
    }

    pub fn with_mtime(mut self, mtime: u64) -> Self {
        self.mtime = mtime;
        self
    }

    pub fn with_uid(mut self, uid: u32) -> Self {
        self.uid = uid;
        self
    }

    pub fn with_gid(mut self, gid: u32) -> Self {
        self.gid = gid;
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Render the 60-byte header for this member.
    pub fn header(&self) -> Result<[u8; HEADER_LEN]> {
        if self.name.is_empty() || !self.name.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(PackageError::InvalidMemberName(self.name.clone()));
        }
        let mut hdr = [b' '; HEADER_LEN];
        let mut off = 0;
        for (field, value, width) in [
            ("name", self.name.clone(), NAME_W),
            ("mtime", self.mtime.to_string(), MTIME_W),
            ("uid", self.uid.to_string(), UID_W),
            ("gid", self.gid.to_string(), GID_W),
            ("mode", format!("{:o}", self.mode), MODE_W),
            ("size", self.data.len().to_string(), SIZE_W),
        ] {
            if value.len() > width {
                return Err(PackageError::FieldOverflow { field, value, width });
            }
            hdr[off..off + value.len()].copy_from_slice(value.as_bytes());
            off += width;
        }
        hdr[off..].copy_from_slice(TERMINATOR);
        Ok(hdr)
    }
}

/// Encode `entries`, in order, into a complete archive.
pub fn encode(entries: &[FileEntry]) -> Result<Vec<u8>> {
    let cap = MAGIC.len()
        + entries.iter().map(|e| HEADER_LEN + e.data.len() + 1).sum::<usize>();
    let mut out = Vec::with_capacity(cap);
    write_archive(&mut out, entries)?;
    Ok(out)
}

/// Stream the archive into `w`. All headers are rendered before the first byte
/// is written, so a rejected entry leaves `w` untouched.
pub fn write_archive<W: Write>(mut w: W, entries: &[FileEntry]) -> Result<()> {
    let headers = entries.iter().map(FileEntry::header).collect::<Result<Vec<_>>>()?;
    w.write_all(MAGIC)?;
    for (hdr, entry) in headers.iter().zip(entries) {
        w.write_all(hdr)?;
        w.write_all(&entry.data)?;
        // members start on even offsets
        if (HEADER_LEN + entry.data.len()) % 2 != 0 {
            w.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// An ordered, immutable list of members.
#[derive(Clone, Debug, Default)]
pub struct ArArchive {
    entries: Vec<FileEntry>,
}

impl ArArchive {
    pub fn new(entries: Vec<FileEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        encode(&self.entries)
    }

    pub fn write_to<W: Write>(&self, w: W) -> Result<()> {
        write_archive(w, &self.entries)
    }
}

impl FromIterator<FileEntry> for ArArchive {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
