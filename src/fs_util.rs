use std::fs;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::GzDecoder;

use crate::error::PrepError;

/// Lists the non-directory entries of `dir`, sorted by path.
///
/// Entries whose names are not valid UTF-8 are skipped.
pub fn list_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, PrepError> {
    let entries = fs::read_dir(dir.as_std_path())
        .map_err(|err| PrepError::Filesystem(format!("read dir {dir}: {err}")))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| PrepError::Filesystem(err.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        match Utf8PathBuf::from_path_buf(path) {
            Ok(path) => files.push(path),
            Err(path) => {
                tracing::debug!(path = %path.display(), "skipping non UTF-8 file name");
            }
        }
    }
    files.sort();
    Ok(files)
}

/// True when `dir` exists and holds at least one non-directory entry.
pub fn exists_and_has_files(dir: &Utf8Path) -> bool {
    if !dir.as_std_path().is_dir() {
        return false;
    }
    match fs::read_dir(dir.as_std_path()) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .any(|entry| !entry.path().is_dir()),
        Err(err) => {
            tracing::debug!(%dir, %err, "unable to list directory");
            false
        }
    }
}

/// True when `path` is gzip data that decompresses to at least one byte.
pub fn is_nonempty_gz_file(path: &Utf8Path) -> bool {
    let file = match fs::File::open(path.as_std_path()) {
        Ok(file) => file,
        Err(err) => {
            tracing::debug!(%path, %err, "unable to open sequence file");
            return false;
        }
    };
    let mut decoder = GzDecoder::new(file);
    let mut first = [0u8; 1];
    loop {
        match decoder.read(&mut first) {
            Ok(read) => return read > 0,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => {
                tracing::debug!(%path, %err, "not a readable gzip file");
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    fn utf8_dir(temp: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn gz_with_content_is_nonempty() {
        let temp = tempfile::tempdir().unwrap();
        let path = utf8_dir(&temp).join("reads.fastq.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"@r1\nACGT\n+\nIIII\n").unwrap();
        encoder.finish().unwrap();

        assert!(is_nonempty_gz_file(&path));
    }

    #[test]
    fn empty_gz_and_plain_text_are_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let dir = utf8_dir(&temp);

        let empty = dir.join("empty.fastq.gz");
        GzEncoder::new(fs::File::create(&empty).unwrap(), Compression::default())
            .finish()
            .unwrap();
        assert!(!is_nonempty_gz_file(&empty));

        let plain = dir.join("plain.fastq.gz");
        fs::write(&plain, b"@r1\nACGT\n+\nIIII\n").unwrap();
        assert!(!is_nonempty_gz_file(&plain));

        assert!(!is_nonempty_gz_file(&dir.join("missing.fastq.gz")));
    }

    #[test]
    fn directory_with_only_subdirectories_has_no_files() {
        let temp = tempfile::tempdir().unwrap();
        let dir = utf8_dir(&temp);
        fs::create_dir(dir.join("nested")).unwrap();

        assert!(!exists_and_has_files(&dir));
        assert!(!exists_and_has_files(&dir.join("absent")));

        fs::write(dir.join("nested").join("file.txt"), b"x").unwrap();
        assert!(exists_and_has_files(&dir.join("nested")));
        assert_eq!(list_files(&dir).unwrap(), Vec::<Utf8PathBuf>::new());
    }

    #[cfg(unix)]
    #[test]
    fn list_files_skips_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::tempdir().unwrap();
        let dir = utf8_dir(&temp);
        fs::write(dir.join("a_R1_001.fastq.gz"), b"x").unwrap();
        fs::write(temp.path().join(OsStr::from_bytes(b"notes_\xff.txt")), b"x").unwrap();

        assert_eq!(list_files(&dir).unwrap(), vec![dir.join("a_R1_001.fastq.gz")]);
    }
}
