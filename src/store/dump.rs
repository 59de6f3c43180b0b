use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const URL_LOG_FILE: &str = "urls.log";
pub const RESPONSE_FILE: &str = "response.json";

/// Keeps a trail of provider traffic for debugging: every request URL is
/// appended to `urls.log` and the last decoded response overwrites
/// `response.json`. A disabled dump writes nothing.
#[derive(Debug, Clone, Default)]
pub struct DebugDump {
    dir: Option<PathBuf>,
}

impl DebugDump {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    fn ensure_dir(&self) -> Result<Option<&Path>> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(None);
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        Ok(Some(dir))
    }

    pub fn log_url(&self, url: &str) -> Result<()> {
        let Some(dir) = self.ensure_dir()? else {
            return Ok(());
        };
        let path = dir.join(URL_LOG_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writeln!(file, "{url}").with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn write_response(&self, body: &serde_json::Value) -> Result<()> {
        let Some(dir) = self.ensure_dir()? else {
            return Ok(());
        };
        let path = dir.join(RESPONSE_FILE);
        let pretty = serde_json::to_string_pretty(body)?;
        fs::write(&path, pretty).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_urls_are_appended() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let dump = DebugDump::new(temp_dir.path().join("temp"));

        dump.log_url("http://a")?;
        dump.log_url("http://b")?;

        let log = fs::read_to_string(temp_dir.path().join("temp").join(URL_LOG_FILE))?;
        assert_eq!(log, "http://a\nhttp://b\n");
        Ok(())
    }

    #[test]
    fn test_response_is_overwritten() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let dump = DebugDump::new(temp_dir.path());

        dump.write_response(&serde_json::json!({"USD": 1.0}))?;
        dump.write_response(&serde_json::json!({"EUR": 0.9}))?;

        let body: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(temp_dir.path().join(RESPONSE_FILE))?)?;
        assert_eq!(body, serde_json::json!({"EUR": 0.9}));
        Ok(())
    }

    #[test]
    fn test_disabled_dump_writes_nothing() -> Result<()> {
        let dump = DebugDump::disabled();
        dump.log_url("http://a")?;
        dump.write_response(&serde_json::json!({}))?;

        assert!(!Path::new(URL_LOG_FILE).exists());
        assert!(!Path::new(RESPONSE_FILE).exists());
        Ok(())
    }
}
