//! av-core: shared foundation for amrviz.
//!
//! Contains:
//! - field (canonical field identifiers + normalisation of user input)
//! - units (unit expressions, CGS conversions, physical constants)
//! - numeric (Real + tolerances + small vector helpers)
//! - error (shared error types)

pub mod error;
pub mod field;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use field::{FieldId, FieldSpec, normalize_field, normalize_weight_field};
pub use numeric::*;
pub use units::{Dimension, UnitError, UnitExpr, parse_unit, to_code_length};
