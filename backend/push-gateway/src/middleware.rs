/// Request middleware built from configuration
use actix_cors::Cors;

use crate::config::Config;

/// CORS policy for the configured origins. A `*` anywhere in the list
/// allows every origin and the other entries are ignored.
pub fn build_cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    let origins = config.cors_origins();
    if origins.contains(&"*") {
        return cors.allow_any_origin();
    }

    origins
        .into_iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
