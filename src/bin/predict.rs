//! One-shot inference entry point.
//!
//! Loads the persisted model and scaler, scores the first ten rows of the
//! feature table against their recorded prices, then scores a single JSON
//! example record. Exits early if the artifacts cannot be loaded; rows or
//! records whose prediction is unavailable are skipped.

use std::path::Path;

use serde_json::json;
use tarifa::dataset::read_listings;
use tarifa::inference::load_artifacts;
use tarifa::train::{DEFAULT_DATA_PATH, DEFAULT_MODEL_DIR, MODEL_FILE, SCALER_FILE};

fn main() {
    tracing_subscriber::fmt().init();

    let model_dir = Path::new(DEFAULT_MODEL_DIR);
    let Some(predictor) = load_artifacts(model_dir.join(MODEL_FILE), model_dir.join(SCALER_FILE))
    else {
        eprintln!("could not load model or scaler; run the trainer first");
        std::process::exit(1);
    };

    let listings = match read_listings(DEFAULT_DATA_PATH) {
        Ok(listings) => listings,
        Err(e) => {
            eprintln!("could not read {DEFAULT_DATA_PATH}: {e}");
            std::process::exit(1);
        }
    };

    let sample = &listings[..listings.len().min(10)];
    match predictor.predict_batch(sample) {
        Some(predictions) => {
            for (i, (listing, prediction)) in sample.iter().zip(&predictions).enumerate() {
                match listing.price {
                    Some(actual) => println!(
                        "listing {} (csv): predicted = {prediction}, actual = {actual}",
                        i + 1
                    ),
                    None => println!("listing {} (csv): predicted = {prediction}", i + 1),
                }
            }
        }
        None => eprintln!("batch prediction unavailable"),
    }

    let record = json!({
        "id": 2595,
        "nome": "Skylit Midtown Castle",
        "host_id": 2845,
        "host_name": "Jennifer",
        "bairro_group": "Manhattan",
        "bairro": "Midtown",
        "latitude": 40.75362,
        "longitude": -73.98377,
        "room_type": "Entire home/apt",
        "minimo_noites": 1,
        "numero_de_reviews": 45,
        "ultima_review": "2019-05-21",
        "reviews_por_mes": 0.38,
        "calculado_host_listings_count": 2,
        "disponibilidade_365": 355
    });
    let record = record.as_object().expect("json! object literal");
    match predictor.predict_record(record) {
        Some(prediction) => println!("\npredicted price for the JSON record: {prediction}"),
        None => eprintln!("record prediction unavailable"),
    }
}
