// Configuration for the command line front end

pub mod data_file;

pub use data_file::{apply_overrides, load_data_file, parse_assignment, DataLoader, JsonLoader, YamlLoader};
