//! Exporting the currently presented result.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::presenter::ResultPresenter;

pub const DEFAULT_EXPORT_FILENAME: &str = "battery_sim_result.json";

/// Destination for downloadable artifacts.
pub trait ArtifactSink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes artifacts into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    last_saved: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            last_saved: None,
        }
    }

    /// Split a full output path into a sink for its directory and the file
    /// name to save under.
    pub fn for_path(path: &Path) -> AppResult<(Self, String)> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::Export(format!("not a file path: {}", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok((Self::new(dir), filename.to_string()))
    }

    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        self.last_saved = Some(path);
        Ok(())
    }
}

/// Pretty-printed JSON for a result document.
pub fn render_export(result: &Value) -> AppResult<String> {
    serde_json::to_string_pretty(result).map_err(|e| AppError::Export(e.to_string()))
}

/// Save the data part of the current result. Returns `Ok(false)` without
/// touching the sink when nothing has been shown yet.
pub fn export_current(
    presenter: &ResultPresenter,
    sink: &mut dyn ArtifactSink,
    filename: &str,
) -> AppResult<bool> {
    let Some(current) = presenter.current() else {
        tracing::debug!("export requested with no result shown");
        return Ok(false);
    };

    let content = render_export(&current.result)?;
    sink.save(filename, content.as_bytes())
        .map_err(|e| AppError::Export(format!("{}: {}", filename, e)))?;
    tracing::info!(filename, bytes = content.len(), "exported result");
    Ok(true)
}

/// Save the current plot image as raw PNG bytes. Returns `Ok(false)` when
/// there is no current result or it has no image.
pub fn export_plot(
    presenter: &ResultPresenter,
    sink: &mut dyn ArtifactSink,
    filename: &str,
) -> AppResult<bool> {
    let Some(image) = presenter.plot_image() else {
        return Ok(false);
    };

    let bytes = decode_data_uri(image)?;
    sink.save(filename, &bytes)
        .map_err(|e| AppError::Export(format!("{}: {}", filename, e)))?;
    tracing::info!(filename, bytes = bytes.len(), "exported plot image");
    Ok(true)
}

/// Plot file name paired with the result export name:
/// `battery_sim_result.json` becomes `battery_sim_result.png`.
pub fn plot_filename_for(export_filename: &str) -> String {
    Path::new(export_filename)
        .with_extension("png")
        .to_string_lossy()
        .into_owned()
}

/// Decode a base64 `data:` URI. Bare base64 text is accepted as well.
pub fn decode_data_uri(uri: &str) -> AppResult<Vec<u8>> {
    let encoded = match uri.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| AppError::Export("data URI has no payload".to_string()))?;
            if !header.ends_with(";base64") {
                return Err(AppError::Export(format!(
                    "unsupported data URI encoding: {}",
                    header
                )));
            }
            data
        }
        None => uri,
    };

    STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::Export(format!("invalid image data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history_view::HistoryListing;
    use crate::status::RunStatus;
    use crate::view::ResultView;
    use cr_history::RunPayload;
    use serde_json::json;

    #[derive(Default)]
    struct CapturingSink {
        saved: Vec<(String, Vec<u8>)>,
    }

    impl ArtifactSink for CapturingSink {
        fn save(&mut self, filename: &str, bytes: &[u8]) -> io::Result<()> {
            self.saved.push((filename.to_string(), bytes.to_vec()));
            Ok(())
        }
    }

    struct NoView;

    impl ResultView for NoView {
        fn render_empty(&mut self) {}
        fn render_result(&mut self, _payload: &RunPayload) {}
        fn render_history_list(&mut self, _listing: &HistoryListing) {}
        fn render_status(&mut self, _status: &RunStatus) {}
    }

    #[test]
    fn export_before_any_result_saves_nothing() {
        let presenter = ResultPresenter::new();
        let mut sink = CapturingSink::default();
        assert!(!export_current(&presenter, &mut sink, DEFAULT_EXPORT_FILENAME).unwrap());
        assert!(!export_plot(&presenter, &mut sink, "plot.png").unwrap());
        assert!(sink.saved.is_empty());
    }

    #[test]
    fn export_writes_pretty_result_without_image() {
        let mut presenter = ResultPresenter::new();
        let result = json!({"meta": {"model": "SPM"}, "series": {"voltage_v": [4.0, 3.5]}});
        presenter.show(
            RunPayload {
                result: result.clone(),
                plot_image: Some("data:image/png;base64,AA==".to_string()),
            },
            &mut NoView,
        );

        let mut sink = CapturingSink::default();
        assert!(export_current(&presenter, &mut sink, "out.json").unwrap());
        assert_eq!(sink.saved.len(), 1);

        let (name, bytes) = &sink.saved[0];
        assert_eq!(name, "out.json");
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains('\n'));
        assert!(!text.contains("plotImage"));
        assert!(!text.contains("base64"));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn export_follows_latest_show() {
        let mut presenter = ResultPresenter::new();
        presenter.show(
            RunPayload {
                result: json!({"n": 1}),
                plot_image: None,
            },
            &mut NoView,
        );
        presenter.show(
            RunPayload {
                result: json!({"n": 2}),
                plot_image: None,
            },
            &mut NoView,
        );

        let mut sink = CapturingSink::default();
        export_current(&presenter, &mut sink, "out.json").unwrap();
        let parsed: Value = serde_json::from_slice(&sink.saved[0].1).unwrap();
        assert_eq!(parsed, json!({"n": 2}));
    }

    #[test]
    fn plot_export_decodes_png_bytes() {
        let mut presenter = ResultPresenter::new();
        presenter.show(
            RunPayload {
                result: json!({}),
                plot_image: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
            },
            &mut NoView,
        );

        let mut sink = CapturingSink::default();
        assert!(export_plot(&presenter, &mut sink, "plot.png").unwrap());
        assert_eq!(
            sink.saved[0].1,
            vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]
        );
    }

    #[test]
    fn data_uri_decoding() {
        assert_eq!(decode_data_uri("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_data_uri("AQID").unwrap(), vec![1, 2, 3]);
        assert!(decode_data_uri("data:image/png,raw").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn sink_for_path_splits_directory() {
        let (sink, name) = DirectorySink::for_path(Path::new("out/run.json")).unwrap();
        assert_eq!(name, "run.json");
        assert_eq!(sink.dir, PathBuf::from("out"));

        let (sink, name) = DirectorySink::for_path(Path::new("run.json")).unwrap();
        assert_eq!(name, "run.json");
        assert_eq!(sink.dir, PathBuf::from("."));
    }

    #[test]
    fn plot_name_follows_export_name() {
        assert_eq!(plot_filename_for(DEFAULT_EXPORT_FILENAME), "battery_sim_result.png");
        assert_eq!(plot_filename_for("run"), "run.png");
        assert_eq!(plot_filename_for("out/run.v2.json"), "out/run.v2.png");
    }
}
