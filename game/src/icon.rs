use engine::IconImage;

use crate::scene::{BACKGROUND, FOOD_COLOR, SNAKE_COLOR};

pub const ICON_SIZE: u32 = 16;

// Inner edge of the frame, measured from either side.
const BORDER: u32 = 3;
const EMPTY_TILE_SHADE: f32 = 0.7;

fn to_rgba8(c: [f32; 3]) -> [u8; 4] {
    [
        (c[0] * 255.0) as u8,
        (c[1] * 255.0) as u8,
        (c[2] * 255.0) as u8,
        255,
    ]
}

/// Colour of one icon pixel: a snake-coloured square inside a background ring, with a snake and a
/// food bar on the left and right margins.
pub fn icon_pixel(x: u32, y: u32) -> [u8; 4] {
    let far = ICON_SIZE - 1 - BORDER;
    let background = [BACKGROUND[0], BACKGROUND[1], BACKGROUND[2]];

    if x == BORDER || y == BORDER || x == far || y == far {
        return to_rgba8(background);
    }

    let in_margin = x < BORDER || y < BORDER || x > far || y > far;
    if !in_margin {
        return to_rgba8(SNAKE_COLOR);
    }

    let beside_square = y > BORDER && y < far;
    if x < BORDER && beside_square {
        to_rgba8(SNAKE_COLOR)
    } else if x > far && beside_square {
        to_rgba8(FOOD_COLOR)
    } else {
        to_rgba8(background.map(|c| c * EMPTY_TILE_SHADE))
    }
}

pub fn window_icon() -> IconImage {
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            rgba.extend_from_slice(&icon_pixel(x, y));
        }
    }
    IconImage {
        rgba,
        width: ICON_SIZE,
        height: ICON_SIZE,
    }
}
