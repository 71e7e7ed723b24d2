//! Reading hand-history files and zip archives from disk.

use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::parser::{parse_hand_text, ParseOptions, ParseOutcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub files_read: usize,
    pub files_failed: usize,
    pub blocks_seen: usize,
    pub hands_parsed: usize,
    pub blocks_skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Text,
    Zip,
}

fn input_kind(path: &Path) -> Option<InputKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "txt" => Some(InputKind::Text),
        "zip" => Some(InputKind::Zip),
        _ => None,
    }
}

/// Decode bytes as UTF-8, dropping invalid sequences.
pub fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).replace('\u{FFFD}', "")
}

pub fn read_text_file(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| format!("Failed to read file {}: {}", path.display(), e))?;
    Ok(decode_lossy(&bytes))
}

/// Contents of every `.txt` entry in a zip archive, as `(entry name, text)`.
pub fn extract_txt_from_zip<R: Read + Seek>(reader: R) -> Result<Vec<(String, String)>, String> {
    let mut archive =
        zip::ZipArchive::new(reader).map_err(|e| format!("Failed to open zip archive: {}", e))?;

    let mut texts = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| format!("Failed to read zip entry {}: {}", i, e))?;
        let name = entry.name().to_string();
        if entry.is_dir() || !name.to_lowercase().ends_with(".txt") {
            debug!("zip entry {} ignored", name);
            continue;
        }

        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| format!("Failed to extract {}: {}", name, e))?;
        texts.push((name, decode_lossy(&bytes)));
    }
    Ok(texts)
}

/// Parse one `.txt` file or `.zip` archive.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<ParseOutcome, String> {
    match input_kind(path) {
        Some(InputKind::Text) => {
            let text = read_text_file(path)?;
            Ok(parse_hand_text(&text, options))
        }
        Some(InputKind::Zip) => {
            let file = File::open(path)
                .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
            let mut outcome = ParseOutcome::default();
            for (name, text) in extract_txt_from_zip(file)? {
                debug!("parsing {} from {}", name, path.display());
                outcome.merge(parse_hand_text(&text, options));
            }
            Ok(outcome)
        }
        None => Err(format!("Unsupported file type: {}", path.display())),
    }
}

/// Expand directories (one level) into the `.txt`/`.zip` files they hold.
pub fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut inputs = Vec::new();
    for path in paths {
        if !path.is_dir() {
            inputs.push(path.clone());
            continue;
        }
        match fs::read_dir(path) {
            Ok(entries) => {
                let mut found: Vec<PathBuf> = entries
                    .flatten()
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && input_kind(p).is_some())
                    .collect();
                found.sort();
                inputs.extend(found);
            }
            Err(e) => warn!("cannot list {}: {}", path.display(), e),
        }
    }
    inputs
}

/// Parse every input path. A file that cannot be read contributes nothing
/// and does not stop the batch.
pub fn parse_paths(paths: &[PathBuf], options: &ParseOptions) -> (ParseOutcome, ImportReport) {
    let mut outcome = ParseOutcome::default();
    let mut report = ImportReport::default();

    for path in collect_inputs(paths) {
        match parse_file(&path, options) {
            Ok(file_outcome) => {
                report.files_read += 1;
                outcome.merge(file_outcome);
            }
            Err(e) => {
                error!("{}", e);
                report.files_failed += 1;
            }
        }
    }

    report.blocks_seen = outcome.blocks_seen;
    report.hands_parsed = outcome.records.len();
    report.blocks_skipped = outcome.skipped.len();
    info!(
        "import: {} files read, {} failed, {} hands parsed",
        report.files_read, report.files_failed, report.hands_parsed
    );
    (outcome, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const HAND: &str = "Poker Hand #HD300: Hold'em No Limit ($0.05/$0.10) - 2024/06/01 08:00:00
Table 'T' 6-max Seat #2 is the button
Seat 2: Hero ($10.00 in chips)
Seat 3: V1 ($10.00 in chips)
*** HOLE CARDS ***
Dealt to Hero [2c 7d]
Hero: folds
*** SUMMARY ***
Total pot $0.15 | Rake $0";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("handvault-ingest-{}-{}", std::process::id(), name))
    }

    fn zip_bytes() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zw = zip::ZipWriter::new(&mut buf);
            let opts = zip::write::SimpleFileOptions::default();
            zw.start_file("day1/hands.TXT", opts).unwrap();
            zw.write_all(HAND.as_bytes()).unwrap();
            zw.start_file("readme.md", opts).unwrap();
            zw.write_all(b"not hands").unwrap();
            zw.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        assert_eq!(decode_lossy(b"Hero\xff: folds"), "Hero: folds");
    }

    #[test]
    fn test_extract_txt_from_zip() {
        let texts = extract_txt_from_zip(Cursor::new(zip_bytes())).unwrap();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].0, "day1/hands.TXT");
        assert!(texts[0].1.contains("HD300"));
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        assert!(extract_txt_from_zip(Cursor::new(b"plain text".to_vec())).is_err());
    }

    #[test]
    fn test_parse_paths_isolates_failures() {
        let txt = temp_path("a.txt");
        let zip = temp_path("b.zip");
        let broken = temp_path("c.zip");
        let missing = temp_path("missing.txt");
        fs::write(&txt, HAND).unwrap();
        fs::write(&zip, zip_bytes()).unwrap();
        fs::write(&broken, b"definitely not a zip").unwrap();

        let options = ParseOptions::default();
        let (outcome, report) =
            parse_paths(&[txt.clone(), zip.clone(), broken.clone(), missing], &options);

        assert_eq!(report.files_read, 2);
        assert_eq!(report.files_failed, 2);
        assert_eq!(report.hands_parsed, 2);
        assert_eq!(outcome.records.len(), 2);

        for p in [txt, zip, broken] {
            let _ = fs::remove_file(p);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let err = parse_file(Path::new("hands.csv"), &ParseOptions::default()).unwrap_err();
        assert!(err.contains("Unsupported"));
    }
}
