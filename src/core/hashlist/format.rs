//! Plain-text hash list format.
//!
//! ```text
//! <root folder>
//! <filename pattern>
//! true|false
//! <fingerprint>\t<file path>
//! ...
//! ```
//!
//! UTF-8, one record per `\n`-terminated line. Bytes that are not valid
//! UTF-8 are read as U+FFFD.

use super::{HashEntry, HashList};
use crate::core::fingerprint::Fingerprint;
use crate::error::HashListError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

const HEADER_LINES: usize = 3;

/// Read a hash list from any buffered source.
///
/// `source` names the input in log messages and errors. Malformed data
/// lines are logged and skipped; fewer than three header lines is an error.
pub fn parse_hash_list<R: BufRead>(
    mut reader: R,
    source: &Path,
) -> Result<HashList, HashListError> {
    let mut header: Vec<String> = Vec::with_capacity(HEADER_LINES);
    let mut entries = Vec::new();
    let mut buffer = Vec::new();
    let mut number = 0;

    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|e| HashListError::Io {
                path: source.to_path_buf(),
                source: e,
            })?;
        if read == 0 {
            break;
        }
        number += 1;

        let line = decode_line(&buffer);
        if header.len() < HEADER_LINES {
            header.push(line);
            continue;
        }

        match parse_entry(&line) {
            Some(entry) => entries.push(entry),
            None => warn!(
                "Incorrect line in '{}': {} -> {}",
                source.display(),
                number,
                line
            ),
        }
    }

    if header.len() < HEADER_LINES {
        return Err(HashListError::MissingHeader {
            path: source.to_path_buf(),
            found: header.len(),
        });
    }

    let recursive = header[2].trim().eq_ignore_ascii_case("true");
    let mut header = header.into_iter();
    let root_folder = header.next().unwrap_or_default();
    let name_pattern = header.next().unwrap_or_default();

    Ok(HashList::with_entries(
        root_folder,
        name_pattern,
        recursive,
        entries,
    ))
}

/// Text of one raw line without its terminator
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

fn parse_entry(line: &str) -> Option<HashEntry> {
    let mut parts = line.split('\t');
    let fingerprint = parts.next().filter(|part| !part.is_empty())?;
    let file = parts.next().filter(|part| !part.is_empty())?;
    if parts.next().is_some() {
        return None;
    }
    Some(HashEntry::new(Fingerprint::from(fingerprint), file))
}

/// Load a hash list file
pub fn read_hash_list(path: &Path) -> Result<HashList, HashListError> {
    let file = File::open(path).map_err(|e| HashListError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_hash_list(BufReader::new(file), path)
}

/// Serialize a hash list into any sink, flushing after every line
pub fn format_hash_list<W: Write>(list: &HashList, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", list.root_folder())?;
    writeln!(writer, "{}", list.name_pattern())?;
    writeln!(writer, "{}", list.is_recursive())?;
    writer.flush()?;

    for entry in list.entries() {
        writeln!(writer, "{}\t{}", entry.fingerprint(), entry.file())?;
        writer.flush()?;
    }

    Ok(())
}

/// Write a hash list file, replacing any existing file
pub fn write_hash_list(list: &HashList, path: &Path) -> Result<(), HashListError> {
    info!("Writing hash list to file: {}", path.display());

    let io_error = |e| HashListError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(io_error)?;
    format_hash_list(list, BufWriter::new(file)).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn sample_list() -> HashList {
        HashList::with_entries(
            "/photos/",
            "(?:*\\.png)",
            true,
            vec![
                HashEntry::new(Fingerprint::from("AA"), "/photos/a.png"),
                HashEntry::new(Fingerprint::from("BB"), "/photos/sub/b.png"),
            ],
        )
    }

    #[test]
    fn written_layout_matches_format() {
        let mut buffer = Vec::new();
        format_hash_list(&sample_list(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "/photos/\n(?:*\\.png)\ntrue\nAA\t/photos/a.png\nBB\t/photos/sub/b.png\n"
        );
    }

    #[test]
    fn file_round_trip_preserves_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ImageHashes-0.txt");

        write_hash_list(&sample_list(), &path).unwrap();
        let loaded = read_hash_list(&path).unwrap();

        assert_eq!(loaded, sample_list());
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "stale content that is much longer than the new list\n".repeat(20))
            .unwrap();

        let list = HashList::new("/r/", ".*", false);
        write_hash_list(&list, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/r/\n.*\nfalse\n");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = "/photos/\n.*\nfalse\nAA\t/photos/a.png\nno tab here\nBB\t/x\textra\n\nCC\t/photos/c.png\n";
        let list = parse_hash_list(Cursor::new(text), Path::new("mem")).unwrap();

        let files: Vec<_> = list.entries().iter().map(|e| e.file()).collect();
        assert_eq!(files, vec!["/photos/a.png", "/photos/c.png"]);
        assert!(!list.is_recursive());
    }

    #[test]
    fn invalid_utf8_lines_are_read_lossily() {
        let mut bytes = b"/photos/\r\n.*\r\ntrue\r\nAA\t/photos/a.png\r\nBB\t/photos/caf".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b".png\nCC\t/photos/c.png");

        let list = parse_hash_list(Cursor::new(bytes), Path::new("latin1.txt")).unwrap();

        let files: Vec<_> = list.entries().iter().map(|e| e.file()).collect();
        assert_eq!(files, vec!["/photos/a.png", "/photos/caf\u{FFFD}.png", "/photos/c.png"]);
        assert_eq!(list.root_folder(), "/photos/");
        assert!(list.is_recursive());
    }

    #[test]
    fn recursive_flag_is_case_insensitive() {
        let list = parse_hash_list(Cursor::new("/r\n.*\nTRUE\n"), Path::new("mem")).unwrap();
        assert!(list.is_recursive());
        assert!(list.is_empty());
    }

    #[test]
    fn missing_header_is_an_error() {
        let result = parse_hash_list(Cursor::new("/photos/\n.*\n"), Path::new("short.txt"));
        match result {
            Err(HashListError::MissingHeader { found, .. }) => assert_eq!(found, 2),
            other => panic!("Expected MissingHeader, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = read_hash_list(Path::new("/nonexistent/ImageHashes-9.txt"));
        assert!(matches!(result, Err(HashListError::Io { .. })));
    }
}
