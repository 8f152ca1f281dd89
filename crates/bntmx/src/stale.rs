//! Modification-time based skip logic

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Modification time of a file, or the epoch when it can't be read
fn modified(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .unwrap_or(UNIX_EPOCH)
}

/// Whether every output is strictly newer than every input
///
/// Unreadable inputs count as infinitely old. Unreadable outputs count as
/// infinitely old too, so a missing output always forces a rebuild.
pub fn is_up_to_date(inputs: &[PathBuf], outputs: &[PathBuf]) -> bool {
    let newest_input = inputs.iter().map(|path| modified(path)).max();
    let oldest_output = outputs.iter().map(|path| modified(path)).min();

    match (newest_input, oldest_output) {
        (Some(input), Some(output)) => input < output,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(path: &Path, seconds: u64) {
        if !path.exists() {
            fs::write(path, "").unwrap();
        }
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(seconds))
            .unwrap();
    }

    #[test]
    fn test_newer_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.tmx");
        let output = dir.path().join("map.bmp");
        touch(&input, 1_000);
        touch(&output, 2_000);

        assert!(is_up_to_date(&[input], &[output]));
    }

    #[test]
    fn test_touched_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.tmx");
        let output = dir.path().join("map.bmp");
        touch(&input, 3_000);
        touch(&output, 2_000);

        assert!(!is_up_to_date(&[input], &[output]));
    }

    #[test]
    fn test_equal_times_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.tmx");
        let output = dir.path().join("map.bmp");
        touch(&input, 2_000);
        touch(&output, 2_000);

        assert!(!is_up_to_date(&[input], &[output]));
    }

    #[test]
    fn test_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.tmx");
        let output = dir.path().join("map.bmp");
        touch(&input, 1_000);
        touch(&output, 2_000);

        let missing = dir.path().join("map.json");
        assert!(!is_up_to_date(&[input], &[output, missing]));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("map.tmx");
        let output = dir.path().join("map.bmp");
        touch(&input, 1_000);
        touch(&output, 2_000);

        let missing = dir.path().join("tiles.png");
        assert!(is_up_to_date(&[input, missing], &[output]));
    }

    #[test]
    fn test_no_outputs() {
        assert!(!is_up_to_date(&[PathBuf::from("map.tmx")], &[]));
    }
}
