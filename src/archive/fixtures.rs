//! Archive builders for tests.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::unstable::write::FileOptionsExt;
use zip::write::{FileOptions, SimpleFileOptions};
use zip::{AesMode, CompressionMethod, ZipWriter};

fn write_single_entry(path: PathBuf, entry: &str, contents: &[u8], options: FileOptions<'_, ()>) -> PathBuf {
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    zip.start_file(entry, options).unwrap();
    zip.write_all(contents).unwrap();
    zip.finish().unwrap();
    path
}

/// Write `target.zip` under `dir` holding one ZipCrypto-encrypted entry.
pub fn write_encrypted_archive(dir: &Path, entry: &str, contents: &[u8], password: &str) -> PathBuf {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .with_deprecated_encryption(password.as_bytes());
    write_single_entry(dir.join("target.zip"), entry, contents, options)
}

/// Like [`write_encrypted_archive`], but the entry is stored uncompressed, so
/// nothing but the CRC guards a decryption with the wrong key.
pub fn write_stored_encrypted_archive(dir: &Path, entry: &str, contents: &[u8], password: &str) -> PathBuf {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .with_deprecated_encryption(password.as_bytes());
    write_single_entry(dir.join("stored.zip"), entry, contents, options)
}

/// Write `aes.zip` under `dir` holding one WinZip AES-256 entry.
pub fn write_aes_archive(dir: &Path, entry: &str, contents: &[u8], password: &str) -> PathBuf {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .with_aes_encryption(AesMode::Aes256, password);
    write_single_entry(dir.join("aes.zip"), entry, contents, options)
}

/// Write `plain.zip` under `dir` holding one unencrypted entry.
pub fn write_plain_archive(dir: &Path, entry: &str, contents: &[u8]) -> PathBuf {
    write_single_entry(dir.join("plain.zip"), entry, contents, SimpleFileOptions::default())
}

/// Write `empty.zip` under `dir`: a valid archive with no entries.
pub fn write_empty_archive(dir: &Path) -> PathBuf {
    let path = dir.join("empty.zip");
    ZipWriter::new(File::create(&path).unwrap()).finish().unwrap();
    path
}

/// Overwrite the signature of the first local file header. The central
/// directory stays intact, so the archive still opens.
pub fn corrupt_local_header(path: &Path) {
    let mut bytes = std::fs::read(path).unwrap();
    bytes[0] = b'X';
    std::fs::write(path, bytes).unwrap();
}
