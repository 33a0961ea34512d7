//! Build webOS `.ipk` stub packages: an `ar` container holding `debian-binary`,
//! `control.tar.gz` and `data.tar.gz`.

pub mod ar;
pub mod assemble;
pub mod error;
pub mod manifest;
pub mod package;
pub mod payload;
pub mod validate;

pub use assemble::{assemble, package_file_name, Assembler};
pub use error::{PackageError, Result};
pub use package::{Launch, LaunchIndicator, PackageSpec};
