#[path = "integration/minify.rs"]
mod minify;
#[path = "integration/comments.rs"]
mod comments;
#[path = "integration/output.rs"]
mod output;
#[path = "integration/source_maps.rs"]
mod source_maps;
#[path = "integration/errors.rs"]
mod errors;
#[path = "integration/properties.rs"]
mod properties;
