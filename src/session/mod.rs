pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;
