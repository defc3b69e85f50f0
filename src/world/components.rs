//! Components used by the world module.
use bevy::prelude::*;

/// Marker component identifying the main directional light (the "sun").
#[derive(Component, Default)]
pub struct PrimarySun;

/// Static wall segment of the demo gallery.
#[derive(Component, Default)]
pub struct GalleryWall;
