//! Zip-backed verifier.

use crate::archive::{ArchiveError, Outcome, Verifier, VerifierFactory};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

/// Index of the entry we attack: the first one in the central directory.
const TARGET_ENTRY: usize = 0;

/// A validated archive and the entry inside it whose password is wanted.
#[derive(Debug, Clone)]
pub struct ZipTarget {
    path: PathBuf,
    entry_name: String,
    entry_path: PathBuf,
    extract_dir: Option<PathBuf>,
}

impl ZipTarget {
    /// Open the archive once and check that it is something we can attack.
    pub fn probe(path: &Path) -> Result<Self, ArchiveError> {
        let mut archive = open_archive(path)?;

        if archive.len() == 0 {
            return Err(ArchiveError::NoEntries);
        }

        let entry = archive
            .by_index_raw(TARGET_ENTRY)
            .map_err(|e| ArchiveError::NotAnArchive {
                reason: e.to_string(),
            })?;
        let entry_name = entry.name().to_string();

        if !entry.encrypted() {
            return Err(ArchiveError::NotEncrypted { entry: entry_name });
        }

        let entry_path = entry
            .enclosed_name()
            .unwrap_or_else(|| flatten_name(&entry_name));
        debug!(archive = %path.display(), entry = %entry_name, "probed archive");

        Ok(Self {
            path: path.to_path_buf(),
            entry_name,
            entry_path,
            extract_dir: None,
        })
    }

    /// Write the plaintext under `dir` once the password is found.
    pub fn with_extract_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.extract_dir = dir;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Where a recovered plaintext will be written, if extraction is enabled.
    pub fn destination(&self) -> Option<PathBuf> {
        self.extract_dir
            .as_ref()
            .map(|dir| dir.join(&self.entry_path))
    }
}

impl VerifierFactory for ZipTarget {
    type Verifier = ZipVerifier;

    fn open(&self) -> Result<ZipVerifier, ArchiveError> {
        Ok(ZipVerifier {
            archive: open_archive(&self.path)?,
            entry_name: self.entry_name.clone(),
            destination: self.destination(),
            plaintext: Vec::new(),
        })
    }
}

/// One worker's private handle on the archive.
pub struct ZipVerifier {
    archive: ZipArchive<BufReader<File>>,
    entry_name: String,
    destination: Option<PathBuf>,
    plaintext: Vec<u8>,
}

impl Verifier for ZipVerifier {
    fn verify(&mut self, candidate: &str) -> Outcome {
        self.plaintext.clear();

        let read = match self
            .archive
            .by_index_decrypt(TARGET_ENTRY, candidate.as_bytes())
        {
            Ok(mut file) => file.read_to_end(&mut self.plaintext),
            Err(ZipError::InvalidPassword) => return Outcome::Mismatch,
            Err(e) => {
                return Outcome::Corrupt(ArchiveError::EntryCorrupt {
                    entry: self.entry_name.clone(),
                    reason: e.to_string(),
                });
            }
        };

        match read {
            // ZipCrypto's check byte lets ~1/256 wrong passwords through;
            // those fail here on CRC or inflate.
            Err(_) => Outcome::Mismatch,
            // Zero bytes always pass the CRC, so an empty read proves nothing.
            Ok(0) => Outcome::Mismatch,
            Ok(_) => Outcome::Match,
        }
    }

    fn materialize(&self) -> Option<PathBuf> {
        let destination = self.destination.as_ref()?;

        let written = destination
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::write(destination, &self.plaintext));

        match written {
            Ok(()) => Some(destination.clone()),
            Err(e) => {
                warn!(
                    path = %destination.display(),
                    error = %e,
                    "password found but plaintext could not be written"
                );
                None
            }
        }
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, ArchiveError> {
    if !path.exists() {
        return Err(ArchiveError::Missing {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| ArchiveError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    ZipArchive::new(BufReader::new(file)).map_err(|e| match e {
        ZipError::Io(io) => ArchiveError::Unreadable {
            path: path.to_path_buf(),
            reason: io.to_string(),
        },
        other => ArchiveError::NotAnArchive {
            reason: other.to_string(),
        },
    })
}

/// Fallback for entry names that would escape the extraction directory:
/// keep only the normal path components.
fn flatten_name(name: &str) -> PathBuf {
    let flattened: PathBuf = Path::new(name)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    if flattened.as_os_str().is_empty() {
        PathBuf::from("recovered.bin")
    } else {
        flattened
    }
}
