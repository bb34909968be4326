use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;

/// Writes `value` as pretty JSON to `output_path`, or to stdout when `None`.
///
/// Missing parent directories of `output_path` are created.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let Some(path) = output_path else {
        return write_json(io::stdout().lock(), value, "stdout");
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    write_json(BufWriter::new(file), value, &path.display().to_string())
}

fn write_json<W, T>(mut writer: W, value: &T, target: &str) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer).with_context(|| format!("Failed to write newline to {target}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {target}"))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_save_and_read_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("value.json");
        let value = BTreeMap::from([("score", 2048), ("rounds", 940)]);

        save_json(&value, Some(&path)).unwrap();
        let read: BTreeMap<String, u32> = read_json_file("test", &path).unwrap();
        assert_eq!(read["score"], 2048);
        assert_eq!(read["rounds"], 940);
    }

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[1, 2], "buffer").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("]\n"));
        assert_eq!(serde_json::from_str::<Vec<u32>>(&text).unwrap(), [1, 2]);
    }

    #[test]
    fn test_save_json_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let err = save_json(&1, Some(&blocker.join("value.json"))).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create"));
    }

    #[test]
    fn test_read_missing_file_reports_kind() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json_file::<u32, _>("recording", dir.path().join("missing.json"))
            .unwrap_err();
        assert!(err.to_string().contains("recording"));
    }

    #[test]
    fn test_read_invalid_json_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_json_file::<u32, _>("report", &path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse report"));
    }
}
