//! Data types for the grid model and its wire format.

mod attributes;
mod cell;
mod selection;
mod sheet;
mod update;

pub use attributes::*;
pub use cell::*;
pub use selection::*;
pub use sheet::*;
pub use update::*;
