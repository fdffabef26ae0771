pub mod family_tree;
pub mod guide;
pub mod home;
pub mod settings;
pub mod silsila;

pub use family_tree::FamilyTreeView;
pub use guide::GuideView;
pub use home::HomeView;
pub use settings::SettingsView;
pub use silsila::SilsilaView;
