//! Command builders.
//!
//! Controllers turn a member's intent ("make this a bullet list", "insert
//! this picture") into a batch of operations and hand it to a [`Session`].
//! They never touch the document directly.
//!
//! [`Session`]: crate::Session

mod image;
mod list;

pub use image::{file_extension, ContentSize, ImageController, PIXELS_PER_CM};
pub use list::ListController;
