use crate::ar::{self, FileEntry};
use crate::error::Result;
use crate::manifest;
use crate::package::PackageSpec;
use crate::payload::{DeterministicTarGz, PayloadBackend};
use tracing::{debug, info};

/// Content of the `debian-binary` member.
pub const DEBIAN_BINARY: &str = "2.0\n";
/// MIME type to hand the finished package to a downloader with.
pub const PACKAGE_MIME_TYPE: &str = "application/octet-stream";

/// Builds `.ipk` packages with a given tar/gzip backend.
pub struct Assembler<B = DeterministicTarGz> {
    backend: B,
}

impl Default for Assembler<DeterministicTarGz> {
    fn default() -> Self {
        Self::new(DeterministicTarGz::default())
    }
}

impl<B: PayloadBackend> Assembler<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Build the complete package: `debian-binary`, `control.tar.gz`,
    /// `data.tar.gz`, in that order. Nothing is returned on failure.
    pub fn assemble(&self, spec: &PackageSpec) -> Result<Vec<u8>> {
        let set = manifest::build(spec)?;

        let data_blob = self.backend.tar_gz(&set.data_files)?;
        debug!(files = set.data_files.len(), bytes = data_blob.len(), "data.tar.gz");
        let control_blob = self.backend.tar_gz(&set.control_files)?;
        debug!(files = set.control_files.len(), bytes = control_blob.len(), "control.tar.gz");

        let entries = [
            FileEntry::new("debian-binary", DEBIAN_BINARY),
            FileEntry::new("control.tar.gz", control_blob),
            FileEntry::new("data.tar.gz", data_blob),
        ]
        .map(|e| e.with_mtime(spec.mtime));
        let pkg = ar::encode(&entries)?;
        info!(app_id = %spec.app_id, version = %spec.version, bytes = pkg.len(), "assembled package");
        Ok(pkg)
    }
}

/// [`Assembler::assemble`] with the default backend.
pub fn assemble(spec: &PackageSpec) -> Result<Vec<u8>> {
    Assembler::<DeterministicTarGz>::default().assemble(spec)
}

/// Suggested file name for delivery: `<appId>_<version>.ipk`.
pub fn package_file_name(spec: &PackageSpec) -> String {
    format!("{}_{}.ipk", spec.app_id, spec.version)
}
