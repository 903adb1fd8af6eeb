//! File I/O for the MABAS registration tools: NIfTI volumes, displacement
//! fields and elastix parameter files.

pub mod affine;
pub mod nifti_io;
pub mod parameter_file;
pub mod parameter_library;

pub use nifti_io::{read_displacement_field, read_image, write_displacement_field, write_image};
pub use parameter_file::{read_parameter_file, write_parameter_file};
pub use parameter_library::{LibraryError, ParameterLibrary, Resolved};
