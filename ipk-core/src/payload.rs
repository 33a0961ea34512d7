use crate::manifest::VirtualFile;
use flate2::{Compression, GzBuilder};
use std::io::{self, Write};
use tar::{Builder, Header};

/// Turns virtual files into the compressed payloads of a package.
pub trait PayloadBackend {
    /// Pack files, in order, into an uncompressed tar stream.
    fn tar(&self, files: &[VirtualFile]) -> io::Result<Vec<u8>>;

    fn gzip(&self, bytes: &[u8]) -> io::Result<Vec<u8>>;

    /// Default implementation is `gzip(tar(files))`.
    fn tar_gz(&self, files: &[VirtualFile]) -> io::Result<Vec<u8>> {
        let raw = self.tar(files)?;
        self.gzip(&raw)
    }
}

/// Reproducible tar + gzip: GNU headers, root ownership, gzip header without a
/// timestamp or source OS.
#[derive(Clone, Copy, Debug)]
pub struct DeterministicTarGz {
    pub level: u32,
}

impl Default for DeterministicTarGz {
    fn default() -> Self {
        Self { level: Compression::best().level() }
    }
}

impl DeterministicTarGz {
    pub fn new(level: u32) -> Self {
        Self { level: level.min(9) }
    }
}

impl PayloadBackend for DeterministicTarGz {
    fn tar(&self, files: &[VirtualFile]) -> io::Result<Vec<u8>> {
        let mut tar = Builder::new(Vec::new());
        for f in files {
            let mut header = Header::new_gnu();
            header.set_size(f.content.len() as u64);
            header.set_mode(f.mode);
            header.set_uid(0);
            header.set_gid(0);
            header.set_mtime(f.mtime);
            header.set_username("root")?;
            header.set_groupname("root")?;
            // writes a GNU long-name record for paths over 100 bytes
            tar.append_data(&mut header, &f.path, f.content.as_slice())?;
        }
        tar.into_inner()
    }

    fn gzip(&self, bytes: &[u8]) -> io::Result<Vec<u8>> {
        let mut enc = GzBuilder::new()
            .mtime(0)
            .operating_system(255)
            .write(Vec::new(), Compression::new(self.level));
        enc.write_all(bytes)?;
        enc.finish()
    }
}
