pub mod contact;
pub mod history;
pub mod intent;
pub mod record;
pub mod response;

pub use contact::*;
pub use history::*;
pub use intent::*;
pub use record::{clean_value, RawRecord};
pub use response::*;
