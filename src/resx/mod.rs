/*!
 * Reading and writing structured resource documents (`.resx`).
 */

mod document;
mod splice;
mod template;

pub use document::{ResxDocument, ResxEntry};
pub use template::RESX_TEMPLATE;

pub(crate) use splice::splice_before_end;
