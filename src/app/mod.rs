pub mod design_settings;

pub use design_settings::{Collaborators, DesignSettings};
