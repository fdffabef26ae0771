pub mod recite_button;

pub use recite_button::ReciteButton;
