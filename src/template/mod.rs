//! HTML template rendering.

pub mod renderer;

pub use renderer::{render, render_settings_form, rules_for, SubstitutionRule};
