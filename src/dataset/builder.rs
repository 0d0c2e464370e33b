use crate::annotations::bounding_box::PixelBox;
use crate::annotations::box_geometry::enclosing_box;
use crate::config::{DatasetConfig, RecordErrorPolicy};
use crate::dataset::flat_row::{DatabaseRecord, FlatRow, normalize_database_record, photo_id_of};
use crate::dataset::image_report::ImageReporter;
use crate::dataset::row_packer::pack_fragments;
use crate::dataset::table::Dataset;
use crate::detection::face_flattening::FaceFlattener;
use crate::detection::label_aggregation::{LabelAggregation, LabelAggregator};
use crate::detection::vision_service::{VisionService, fetch_detections};
use crate::error::{CollaboratorError, DatasetError, EmptyBoxSetError, RecordError};
use crate::image_utils::image_io::write_rgb8_image;
use crate::image_utils::overlay::draw_detection_overlay;
use crate::image_utils::photo_source::PhotoSource;
use image::RgbImage;

/// Turns a stream of database records into a dataset, one row per photo.
///
/// Records are processed one at a time. Rows are collected and the schema check runs once at
/// the end; if any row disagrees with the first, nothing is returned.
pub struct DatasetBuilder<'a, V: VisionService, P: PhotoSource, R: ImageReporter> {
    config: DatasetConfig,
    vision: &'a V,
    photos: &'a P,
    reporter: &'a R,
    aggregator: LabelAggregator,
    flattener: FaceFlattener,
}

impl<'a, V: VisionService, P: PhotoSource, R: ImageReporter> DatasetBuilder<'a, V, P, R> {
    pub fn new(
        config: DatasetConfig,
        vision: &'a V,
        photos: &'a P,
        reporter: &'a R,
    ) -> Result<Self, DatasetError> {
        config.validate()?;
        let aggregator = LabelAggregator::from_config(&config);
        let flattener = FaceFlattener::from_config(&config);
        Ok(DatasetBuilder { config, vision, photos, reporter, aggregator, flattener })
    }

    pub fn build<I>(&self, records: I) -> Result<Dataset, DatasetError>
    where
        I: IntoIterator<Item = DatabaseRecord>,
    {
        let mut rows: Vec<FlatRow> = Vec::new();
        let mut skipped = 0;
        for (record_index, record) in records.into_iter().enumerate() {
            match self.build_row(&record) {
                Ok(row) => rows.push(row),
                Err(err) => match self.config.record_error_policy {
                    RecordErrorPolicy::Skip => {
                        log::warn!("skipping record {}: {}", record_index, err);
                        skipped += 1;
                    }
                    RecordErrorPolicy::Abort => {
                        return Err(DatasetError::RecordAborted { record_index, source: err });
                    }
                },
            }
        }
        log::info!("assembled {} rows ({} skipped), verifying schema", rows.len(), skipped);
        Ok(Dataset::from_rows(rows)?)
    }

    /// Builds the row for one record: database columns, then the report, then faces, then
    /// the people/bike summary.
    pub fn build_row(&self, record: &DatabaseRecord) -> Result<FlatRow, RecordError> {
        let photo_id = photo_id_of(record, &self.config.photo_id_column).ok_or_else(|| {
            RecordError::MissingPhotoId { column: self.config.photo_id_column.clone() }
        })?;
        let collaborator = |source: CollaboratorError| RecordError::Collaborator {
            photo_id: photo_id.clone(),
            source,
        };

        let detections = fetch_detections(
            self.vision,
            &photo_id,
            self.config.max_labels,
            self.config.max_faces,
        )
        .map_err(&collaborator)?;
        let aggregation = self
            .aggregator
            .aggregate(&detections.people_and_bikes)
            .map_err(|source| RecordError::Geometry { photo_id: photo_id.clone(), source })?;
        let face_fragment = self.flattener.flatten(&detections.faces);

        let image = self.photos.fetch(&photo_id).map_err(&collaborator)?;
        let region = region_of_interest(&photo_id, &aggregation, &image);
        let report = self
            .reporter
            .report(&photo_id, &image, region, &self.config.report)
            .map_err(&collaborator)?;
        self.write_overlay(&photo_id, &aggregation, &image, region);

        Ok(pack_fragments([
            normalize_database_record(record),
            report,
            face_fragment,
            aggregation.summary.to_fragment(),
        ]))
    }

    fn write_overlay(
        &self,
        photo_id: &str,
        aggregation: &LabelAggregation,
        image: &RgbImage,
        region: Option<PixelBox>,
    ) {
        let Some(dir) = &self.config.debug_overlay_dir else {
            return;
        };
        let overlay = draw_detection_overlay(image, &aggregation.boxes, region);
        let path = dir.join(format!("overlay_{}.png", photo_id));
        if let Err(err) = write_rgb8_image(&overlay, &path) {
            log::warn!("could not write debug overlay: {}", err);
        }
    }
}

/// The pixel region around every reconciled box, or None when there are no boxes.
fn region_of_interest(
    photo_id: &str,
    aggregation: &LabelAggregation,
    image: &RgbImage,
) -> Option<PixelBox> {
    let (width, height) = image.dimensions();
    match enclosing_box(&aggregation.boxes) {
        Ok(region) => Some(region.to_pixels(width, height)),
        Err(EmptyBoxSetError) => {
            log::debug!("photo {}: no people or bikes, reporting on the whole image", photo_id);
            None
        }
    }
}
