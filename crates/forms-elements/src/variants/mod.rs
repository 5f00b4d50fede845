//! Built-in element types.
//!
//! One module per field kind. Each type owns its settings schema and
//! validation rules; shared checks live in `crate::common`.

mod checkbox;
mod choice;
mod content;
mod range;
mod textarea;
mod textfield;
mod upload;

pub use checkbox::Checkbox;
pub use choice::{Dropdown, MultipleChoice, OneChoice};
pub use content::StaticContent;
pub use range::NumericRange;
pub use textarea::TextArea;
pub use textfield::TextField;
pub use upload::FileUpload;
