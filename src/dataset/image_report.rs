use crate::annotations::bounding_box::PixelBox;
use crate::config::ReportParameters;
use crate::dataset::flat_row::FlatRow;
use crate::error::CollaboratorError;
use image::RgbImage;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The external image-quality reporter.
///
/// It receives the photo and, when people or bikes were found, the pixel region enclosing
/// them, and returns a flat fragment keyed by report field name.
pub trait ImageReporter {
    fn report(
        &self,
        photo_id: &str,
        image: &RgbImage,
        salient_region: Option<PixelBox>,
        parameters: &ReportParameters,
    ) -> Result<FlatRow, CollaboratorError>;
}

/// Replays reports saved as json, keyed by photo id: `{"7": {"sharpness": 0.8, ...}}`.
#[derive(Clone, Debug, Default)]
pub struct RecordedReportService {
    reports: HashMap<String, FlatRow>,
}

impl RecordedReportService {
    pub fn from_json_file(filepath: &Path) -> Result<Self, CollaboratorError> {
        let file = File::open(filepath).map_err(|source| CollaboratorError::Io {
            path: filepath.to_path_buf(),
            source,
        })?;
        let reports = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            CollaboratorError::Json { path: filepath.to_path_buf(), source }
        })?;
        Ok(RecordedReportService { reports })
    }

    pub fn insert(&mut self, photo_id: &str, report: FlatRow) {
        self.reports.insert(photo_id.to_string(), report);
    }
}

impl ImageReporter for RecordedReportService {
    fn report(
        &self,
        photo_id: &str,
        _image: &RgbImage,
        _salient_region: Option<PixelBox>,
        _parameters: &ReportParameters,
    ) -> Result<FlatRow, CollaboratorError> {
        let report = self.reports.get(photo_id).ok_or_else(|| CollaboratorError::NotFound {
            kind: "report",
            photo_id: photo_id.to_string(),
        })?;
        let nested = report
            .iter()
            .find(|(_, v)| matches!(v, Value::Array(_) | Value::Object(_)));
        if let Some((key, _)) = nested {
            return Err(CollaboratorError::Service(format!(
                "report for photo {} has nested field `{}`",
                photo_id, key
            )));
        }
        Ok(report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn replays_flat_reports() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"7": {{"sharpness": 0.8, "palette": "warm"}}, "8": {{"colors": [1, 2]}}}}"#).unwrap();
        let service = RecordedReportService::from_json_file(file.path()).unwrap();
        let image = RgbImage::new(1, 1);
        let params = ReportParameters::default();

        let report = service.report("7", &image, None, &params).unwrap();
        assert_eq!(report["sharpness"], json!(0.8));
        assert_eq!(report["palette"], json!("warm"));
        assert!(matches!(
            service.report("8", &image, None, &params),
            Err(CollaboratorError::Service(_))
        ));
        assert!(matches!(
            service.report("9", &image, None, &params),
            Err(CollaboratorError::NotFound { kind: "report", .. })
        ));
    }
}
