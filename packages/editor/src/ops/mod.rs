//! Concrete operations.
//!
//! Each operation pairs a serializable `*Spec` payload with a type that
//! validates it at `init` and applies it in `execute`.

mod add_style;
mod create_list;
mod cursor;
mod insert_image;
mod set_blob;

pub use add_style::{AddStyle, AddStyleSpec};
pub use create_list::{CreateList, CreateListSpec};
pub use cursor::{AddCursor, AddCursorSpec, MoveCursor, MoveCursorSpec};
pub use insert_image::{InsertImage, InsertImageSpec};
pub use set_blob::{SetBlob, SetBlobSpec};
