//! Pens and brushes of the map overlay.

use image::Rgba;
use planetmap_draw::Stroke;

const fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

pub const BLACK: Rgba<u8> = rgb(0, 0, 0);
pub const WHITE: Rgba<u8> = rgb(255, 255, 255);
pub const DARK_RED: Rgba<u8> = rgb(139, 0, 0);

/// Chart frame and graticule.
pub const GRID: Stroke = Stroke::new(Rgba([0, 0, 0, 64]), 1.0);

/// Travel legs during odd minutes.
pub const TRAVEL: Stroke = Stroke::new(rgb(0, 0, 255), 2.0);
/// Travel legs during even minutes.
pub const TRAVEL_EVEN: Stroke = Stroke::new(BLACK, 2.0);
pub const PROXIMITY: Stroke = Stroke::new(rgb(32, 32, 64), 1.0);
pub const AUXILIARY: Stroke = Stroke::new(DARK_RED, 2.0);
pub const PROJECTILE: Stroke = Stroke::new(rgb(255, 69, 0), 1.0);
pub const BOT: Stroke = Stroke::new(rgb(192, 64, 0), 2.0);

pub const POI_PRIMARY: Rgba<u8> = rgb(148, 0, 211);
pub const POI_SECONDARY: Rgba<u8> = rgb(0, 100, 0);
pub const POI_BOT: Rgba<u8> = DARK_RED;
pub const TICK: Rgba<u8> = rgb(224, 255, 255);

pub const LABEL_TEXT: Rgba<u8> = BLACK;
pub const LABEL_BOT_TEXT: Rgba<u8> = DARK_RED;
pub const LABEL_OUTLINE: Stroke = Stroke::new(WHITE, 4.0);

/// Marker radius for circular points of interest.
pub const MARKER_RADIUS: f64 = 3.5;
/// Half-size of the `[Base]` triangle.
pub const BASE_MARKER_SIZE: f64 = 4.5;
/// Half-size of the `[Empl]` triangle.
pub const EMPLACEMENT_MARKER_SIZE: f64 = 3.5;
pub const TICK_RADIUS: f64 = 2.0;
