pub mod archive_service;
pub mod demo_tree_service;
pub mod exif;
pub mod history_service;
pub mod image_service;
pub mod seed_service;
pub mod synth_service;
