//! Input validation and secure file handling shared by the vault stores

pub mod input_validation;
pub mod secure_file_ops;

pub use input_validation::{PIN_LENGTH, validate_attachment_name, validate_pin, validate_record};
pub use secure_file_ops::{atomic_replace, create_private_dir, mark_hidden};
