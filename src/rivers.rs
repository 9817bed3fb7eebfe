//! Реки
//!
//! Истоки выбираются случайно с вероятностью, растущей с осадками. Река течёт по
//! наискорейшему спуску и превращает пройденные тайлы в воду.

use rand::Rng;

use crate::biome::Biome;
use crate::config::RiverSettings;
use crate::geometry::Point;
use crate::grid::WorldGrid;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Вероятность истока реки на тайле с данными осадками
#[must_use]
pub fn source_chance(rainfall: f32, settings: &RiverSettings) -> f64 {
    let chance = if rainfall > settings.rain_threshold {
        ((rainfall - settings.rain_threshold) * settings.chance_per_rain).min(settings.max_chance)
    } else {
        settings.base_chance
    };
    f64::from(chance.clamp(0.0, 1.0))
}

/// Самый низкий сосед, ещё не ставший рекой; x замкнут, y ограничен
fn lowest_neighbour(grid: &WorldGrid, (x, y): Point) -> Option<Point> {
    let mut lowest: Option<(Point, f32)> = None;
    for (dx, dy) in DIRECTIONS {
        let Some(tile) = grid.tile(x + dx, y + dy) else {
            continue;
        };
        if tile.biome == Some(Biome::River) {
            continue;
        }
        if lowest.is_none_or(|(_, elevation)| tile.elevation < elevation) {
            lowest = Some(((tile.x as i32, tile.y as i32), tile.elevation));
        }
    }
    lowest.map(|(point, _)| point)
}

/// Прокладывает реку от `start` по наискорейшему спуску
///
/// Каждый шаг превращает тайл в реку и переходит к самому низкому соседу, который ещё
/// не река. Река заканчивается, дойдя до воды, упёршись в тупик или набрав `max_length`
/// тайлов. Возвращает длину реки.
pub fn trace_river(grid: &mut WorldGrid, start: Point, max_length: usize) -> usize {
    let mut current = start;
    let mut length = 0;

    while length < max_length {
        let Some(tile) = grid.tile_mut(current.0, current.1) else {
            break;
        };
        tile.biome = Some(Biome::River);
        tile.is_land = false;
        length += 1;

        let Some(next) = lowest_neighbour(grid, current) else {
            break;
        };
        if !grid.tile(next.0, next.1).is_some_and(|tile| tile.is_land) {
            break;
        }
        current = next;
    }

    length
}

/// Случайно запускает реки с тайлов суши в строке `y`; возвращает число новых рек
pub fn river_row<R: Rng + ?Sized>(
    grid: &mut WorldGrid,
    y: u32,
    settings: &RiverSettings,
    rng: &mut R,
) -> usize {
    let mut started = 0;
    for x in 0..grid.width() {
        let point = (x as i32, y as i32);
        let Some(tile) = grid.tile(point.0, point.1) else {
            continue;
        };
        if !tile.is_land {
            continue;
        }
        if rng.gen_bool(source_chance(tile.rainfall, settings)) {
            trace_river(grid, point, settings.max_length);
            started += 1;
        }
    }
    started
}
