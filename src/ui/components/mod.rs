mod command_input;
mod filter_panel;
mod input;
mod key_result;
mod profile_form;
mod search_input;

pub use command_input::{CommandEvent, CommandInput};
pub use filter_panel::{FilterEvent, FilterPanel};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use profile_form::{ProfileEditor, ProfileFormEvent};
pub use search_input::{SearchEvent, SearchInput};
