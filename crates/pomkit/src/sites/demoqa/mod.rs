//! Widget showcase: text box form, checkbox tree and click buttons.

mod buttons;
mod check_box;
mod text_box;

pub use buttons::{
    ButtonsLocators, ButtonsPage, DOUBLE_CLICK_MESSAGE, DYNAMIC_CLICK_MESSAGE, RIGHT_CLICK_MESSAGE,
};
pub use check_box::{CheckBoxLocators, CheckBoxPage, NOTES_SELECTED};
pub use text_box::{TextBoxLocators, TextBoxPage};
