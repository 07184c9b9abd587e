//! Form values and the weakly typed decoder that turns them into request shapes

mod de;
mod values;

pub use de::from_form_values;
pub use values::{FormValues, DEFAULT_MAX_FORM_BYTES};
