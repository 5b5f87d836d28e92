pub mod editor;
pub mod help;
pub mod palette;
pub mod quick_access;
pub mod settings;
pub mod status_bar;
pub mod tabs;
pub mod tree;
