pub mod bundles;
pub mod components;
pub mod plugin;
pub mod systems;
