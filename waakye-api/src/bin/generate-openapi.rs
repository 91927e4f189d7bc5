//! OpenAPI Specification Generator Binary
//!
//! Prints the Waakye OpenAPI specification as JSON to stdout.
//!
//! Usage:
//!   cargo run -p waakye-api --bin generate-openapi > openapi.json

use utoipa::OpenApi;
use waakye_api::ApiDoc;

fn main() {
    let spec = ApiDoc::openapi();

    match serde_json::to_string_pretty(&spec) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI spec: {}", e);
            std::process::exit(1);
        }
    }
}
