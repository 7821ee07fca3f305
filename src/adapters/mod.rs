// Adapters layer: concrete sources for the match pipeline besides the REST client.

pub mod json_source;

pub use json_source::JsonFileSource;
