//! Plain text duplicate report.

use super::ReportLayout;
use crate::core::comparator::DuplicateGroup;
use crate::core::pipeline::CancellationToken;
use crate::error::ReportError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Report file written when the caller names none
pub const DEFAULT_REPORT_FILE: &str = "Duplicates.txt";

/// Write one block per group to `writer`.
///
/// The writer is flushed after every group. When the token is cancelled
/// the report ends after the group being written. Returns the number of
/// groups written.
pub fn write_report<W: Write>(
    groups: &[DuplicateGroup],
    layout: ReportLayout,
    baselines: &[String],
    cancel: &CancellationToken,
    mut writer: W,
) -> io::Result<usize> {
    let mut written = 0;

    for group in groups {
        if cancel.is_cancelled() {
            info!("Report cancelled after {} groups", written);
            break;
        }

        match layout {
            ReportLayout::Files => {
                write_header(&mut writer, group, baselines)?;
                for file in group.files() {
                    writeln!(writer, "\t\"{}\"", file)?;
                }
            }
            ReportLayout::FoldersOnly { header } => {
                if header {
                    write_header(&mut writer, group, baselines)?;
                }
                for folder in group.folders() {
                    writeln!(writer, "\t{}", folder)?;
                }
            }
            ReportLayout::Reverse => {
                if let Some(first) = group.files().first() {
                    writeln!(writer, "{}\t{}", group.fingerprint(), first)?;
                }
            }
        }

        writer.flush()?;
        written += 1;
    }

    Ok(written)
}

fn write_header<W: Write>(
    writer: &mut W,
    group: &DuplicateGroup,
    baselines: &[String],
) -> io::Result<()> {
    write!(writer, "Duplicates Found ({}):", group.fingerprint())?;
    if !group.is_same_relative_folder(baselines) {
        write!(writer, " RelativeFolderDifference!")?;
    }
    if !group.is_same_filename() {
        write!(writer, " FilenameDifference!")?;
    }
    writeln!(writer)
}

/// Write the report to `path`, replacing any existing file
pub fn write_report_file(
    path: &Path,
    groups: &[DuplicateGroup],
    layout: ReportLayout,
    baselines: &[String],
    cancel: &CancellationToken,
) -> Result<usize, ReportError> {
    let io_error = |source: io::Error| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let written = write_report(groups, layout, baselines, cancel, BufWriter::new(file))
        .map_err(io_error)?;

    info!("Wrote {} duplicate groups to {}", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::Fingerprint;
    use tempfile::TempDir;

    fn group(fingerprint: &str, files: &[&str]) -> DuplicateGroup {
        let mut group = DuplicateGroup::new(Fingerprint::from(fingerprint), files[0]);
        for file in &files[1..] {
            group.add_file(file);
        }
        group
    }

    fn render(groups: &[DuplicateGroup], layout: ReportLayout) -> String {
        let mut out = Vec::new();
        write_report(groups, layout, &[], &CancellationToken::new(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn files_layout_lists_quoted_files() {
        let groups = vec![group("AB", &["/a/x.jpg", "/a/x2.jpg"])];

        assert_eq!(
            render(&groups, ReportLayout::Files),
            "Duplicates Found (AB): FilenameDifference!\n\t\"/a/x.jpg\"\n\t\"/a/x2.jpg\"\n"
        );
    }

    #[test]
    fn header_flags_folder_and_name_differences() {
        let groups = vec![
            group("H1", &["/a/x.jpg", "/b/x.jpg"]),
            group("H2", &["/a/x.jpg", "/b/y.jpg"]),
            group("H3", &["/a/x.jpg", "/a/sub/../x.jpg"]),
        ];

        let text = render(&groups, ReportLayout::Files);
        let headers: Vec<_> = text.lines().filter(|l| !l.starts_with('\t')).collect();

        assert_eq!(
            headers,
            vec![
                "Duplicates Found (H1): RelativeFolderDifference!",
                "Duplicates Found (H2): RelativeFolderDifference! FilenameDifference!",
                "Duplicates Found (H3): RelativeFolderDifference!",
            ]
        );
    }

    #[test]
    fn baselines_hide_mirrored_folders() {
        let groups = vec![group("H1", &["/one/2020/x.jpg", "/two/2020/x.jpg"])];
        let baselines = vec!["/one/".to_string(), "/two/".to_string()];
        let mut out = Vec::new();

        write_report(&groups, ReportLayout::Files, &baselines, &CancellationToken::new(), &mut out)
            .unwrap();

        assert!(String::from_utf8(out).unwrap().starts_with("Duplicates Found (H1):\n"));
    }

    #[test]
    fn folders_layout_lists_folders() {
        let groups = vec![group("H1", &["/b/x.jpg", "/a/x.jpg", "/b/y.jpg"])];

        assert_eq!(
            render(&groups, ReportLayout::FoldersOnly { header: true }),
            "Duplicates Found (H1): RelativeFolderDifference! FilenameDifference!\n\t/a\n\t/b\n"
        );
        assert_eq!(
            render(&groups, ReportLayout::FoldersOnly { header: false }),
            "\t/a\n\t/b\n"
        );
    }

    #[test]
    fn reverse_layout_writes_one_line_per_group() {
        let groups = vec![group("H1", &["/a/x.jpg"]), group("H2", &["/b/z.jpg"])];

        assert_eq!(
            render(&groups, ReportLayout::Reverse),
            "H1\t/a/x.jpg\nH2\t/b/z.jpg\n"
        );
    }

    #[test]
    fn cancelled_report_stops_early() {
        let groups = vec![group("H1", &["/a/x.jpg", "/b/x.jpg"])];
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut out = Vec::new();

        let written = write_report(&groups, ReportLayout::Files, &[], &cancel, &mut out).unwrap();

        assert_eq!(written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn report_file_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_REPORT_FILE);
        std::fs::write(&path, "stale content\n").unwrap();

        let groups = vec![group("H1", &["/a/x.jpg"])];
        let written = write_report_file(
            &path,
            &groups,
            ReportLayout::Reverse,
            &[],
            &CancellationToken::new(),
        )
        .unwrap();

        assert_eq!(written, 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "H1\t/a/x.jpg\n");
    }

    #[test]
    fn unwritable_report_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join(DEFAULT_REPORT_FILE);

        let result = write_report_file(
            &path,
            &[],
            ReportLayout::Files,
            &[],
            &CancellationToken::new(),
        );

        assert!(matches!(result, Err(ReportError::Io { .. })));
    }
}
