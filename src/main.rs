use photo_dataset::dataset::flat_row::read_database_records;
use photo_dataset::dataset::image_report::RecordedReportService;
use photo_dataset::detection::vision_service::RecordedVisionService;
use photo_dataset::image_utils::photo_source::DirectoryPhotoSource;
use photo_dataset::{DatasetBuilder, DatasetConfig};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = Path::new("./data/config.json");
    let records_path = Path::new("./data/records.json");
    let vision_path = Path::new("./data/vision.json");
    let reports_path = Path::new("./data/reports.json");
    let photos_path = Path::new("./data/photos");
    let output_path = Path::new("./data/dataset.json");

    for required in [records_path, vision_path, reports_path, photos_path] {
        if !required.exists() {
            return Err(
                format!("Input path does not exist, or cannot be read: {:?}", required).into()
            );
        }
    }
    let config = if config_path.exists() {
        DatasetConfig::from_json_file(config_path)?
    } else {
        log::info!("no config at {:?}, using defaults", config_path);
        DatasetConfig::default()
    };

    let records = read_database_records(records_path)?;
    let vision = RecordedVisionService::from_json_file(vision_path)?;
    let reports = RecordedReportService::from_json_file(reports_path)?;
    let photos = DirectoryPhotoSource::new(photos_path)?;

    let builder = DatasetBuilder::new(config, &vision, &photos, &reports)?;
    let dataset = builder.build(records)?;
    let matrix = dataset.to_numeric_matrix();
    let non_numeric = dataset.non_numeric_columns();
    log::info!(
        "dataset matrix is {:?} (rows, columns), {} columns not fully numeric",
        matrix.dim(),
        non_numeric.len()
    );
    log::debug!("non-numeric columns: {}", non_numeric.join(", "));
    dataset.write_json(BufWriter::new(File::create(output_path)?))?;
    log::info!("wrote {:?}", output_path);
    Ok(())
}
