//! Преобладающие ветра и осадки
//!
//! Для каждого тайла суши просматриваются все тайлы треугольного конуса с наветренной стороны.
//! Вода в конусе приносит влагу, возвышенности и лёд её отнимают; вклад делится на
//! квадрат расстояния.

use crate::biome::{Biome, Terrain};
use crate::config::RainSettings;
use crate::grid::{Tile, WorldGrid};

/// Направление по компасу; `dy` растёт к югу
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Compass::North => (0, -1),
            Compass::NorthEast => (1, -1),
            Compass::East => (1, 0),
            Compass::SouthEast => (1, 1),
            Compass::South => (0, 1),
            Compass::SouthWest => (-1, 1),
            Compass::West => (-1, 0),
            Compass::NorthWest => (-1, -1),
        }
    }
}

/// Куда дует ветер в широтных поясах от северного полюса к южному:
/// полярные восточные, западные, пассаты и зеркально для южного полушария
const WIND_BANDS: [Compass; 6] = [
    Compass::SouthWest,
    Compass::NorthEast,
    Compass::SouthWest,
    Compass::NorthWest,
    Compass::SouthEast,
    Compass::NorthWest,
];

/// Преобладающий ветер на широте `latitude ∈ [0, 1]`
#[must_use]
pub fn prevailing_wind(latitude: f32) -> Compass {
    let band = (latitude.clamp(0.0, 1.0) * WIND_BANDS.len() as f32) as usize;
    WIND_BANDS[band.min(WIND_BANDS.len() - 1)]
}

/// Вклад одного наветренного тайла в осадки до деления на расстояние
fn moisture(tile: &Tile) -> f32 {
    let terrain = match tile.terrain {
        Terrain::Ocean => 1.0,
        Terrain::Coast => 0.7,
        Terrain::Lake => 0.4,
        Terrain::Flat => 0.0,
        Terrain::Hill => -0.3,
        Terrain::Mountain => -0.8,
    };
    let biome = match tile.biome {
        Some(Biome::Snow | Biome::Glacier) => -0.5,
        _ => 0.0,
    };
    terrain + biome
}

/// Попадает ли смещение `(dx, dy)` в наветренный конус
///
/// `upwind` смотрит против ветра. Поперечное отклонение не больше `along * spread`
/// плюс полтайла, чтобы диагональный конус захватывал и соседей по осям.
/// Глубину ограничивает вызывающий.
fn in_cone(dx: i32, dy: i32, upwind: (i32, i32), spread: f32) -> bool {
    let (ux, uy) = upwind;
    let norm = ((ux * ux + uy * uy) as f32).sqrt();
    let along = (dx * ux + dy * uy) as f32 / norm;
    let across = (dx * uy - dy * ux).abs() as f32 / norm;
    along > 0.0 && across <= along * spread + 0.5
}

/// Осадки тайла `(x, y)`; не отрицательны
#[must_use]
pub fn rainfall_at(grid: &WorldGrid, x: i32, y: i32, settings: &RainSettings) -> f32 {
    let Some(tile) = grid.tile(x, y) else {
        return 0.0;
    };
    let (wx, wy) = prevailing_wind(tile.latitude).delta();
    let upwind = (-wx, -wy);
    let reach = settings.cone_depth as i32;

    let mut total = 0.0;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if !in_cone(dx, dy, upwind, settings.cone_spread) {
                continue;
            }
            if let Some(source) = grid.tile(x + dx, y + dy) {
                total += moisture(source) / (dx * dx + dy * dy) as f32;
            }
        }
    }

    (settings.base + settings.scale * total).max(0.0)
}

pub fn rainfall_row(grid: &mut WorldGrid, y: u32, settings: &RainSettings) {
    for x in 0..grid.width() {
        let (x, y) = (x as i32, y as i32);
        let is_land = grid.tile(x, y).is_some_and(|tile| tile.is_land);
        let rainfall = if is_land {
            rainfall_at(grid, x, y, settings)
        } else {
            0.0
        };
        if let Some(tile) = grid.tile_mut(x, y) {
            tile.rainfall = rainfall;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn land_grid(width: u32, height: u32) -> WorldGrid {
        let mut grid = WorldGrid::blank(width, height);
        for y in 0..height {
            for tile in grid.row_mut(y) {
                tile.terrain = Terrain::Flat;
                tile.is_land = true;
            }
        }
        grid
    }

    #[test]
    fn wind_bands_cover_all_latitudes() {
        assert_eq!(prevailing_wind(0.0), Compass::SouthWest);
        assert_eq!(prevailing_wind(0.2), Compass::NorthEast);
        assert_eq!(prevailing_wind(0.45), Compass::SouthWest);
        assert_eq!(prevailing_wind(0.55), Compass::NorthWest);
        assert_eq!(prevailing_wind(1.0), Compass::NorthWest);
    }

    #[test]
    fn dry_land_gets_no_rain() {
        let grid = land_grid(16, 12);
        assert_eq!(rainfall_at(&grid, 8, 6, &RainSettings::default()), 0.0);
    }

    #[test]
    fn rain_is_never_negative() {
        let mut grid = land_grid(16, 12);
        for y in 0..12 {
            for tile in grid.row_mut(y) {
                tile.terrain = Terrain::Mountain;
            }
        }
        assert_eq!(rainfall_at(&grid, 8, 6, &RainSettings::default()), 0.0);
    }

    #[test]
    fn upwind_sea_brings_rain_and_downwind_does_not() {
        // y = 6 из 12 → широта ≈ 0.54, ветер на северо-запад, наветренная сторона на юго-востоке
        let mut grid = land_grid(16, 12);
        grid.tile_mut(9, 7).unwrap().terrain = Terrain::Ocean;
        let settings = RainSettings::default();
        let wet = rainfall_at(&grid, 8, 6, &settings);
        assert!((wet - 0.5).abs() < 1e-6);

        let mut grid = land_grid(16, 12);
        grid.tile_mut(7, 5).unwrap().terrain = Terrain::Ocean;
        assert_eq!(rainfall_at(&grid, 8, 6, &settings), 0.0);
    }

    #[test]
    fn axis_adjacent_sea_upwind_brings_rain() {
        // Ветер на северо-запад: соседи справа и снизу лежат с наветренной стороны
        let settings = RainSettings::default();
        for (sx, sy) in [(9, 6), (8, 7)] {
            let mut grid = land_grid(16, 12);
            grid.tile_mut(sx, sy).unwrap().terrain = Terrain::Ocean;
            assert!((rainfall_at(&grid, 8, 6, &settings) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn cone_covers_every_cell_between_its_edges() {
        let upwind = (1, 1);
        let cells: Vec<_> = (-3..=3)
            .flat_map(|dy| (-3..=3).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| in_cone(dx, dy, upwind, 0.5))
            .collect();
        for cell in [(1, 0), (0, 1), (1, 1), (2, 1), (1, 2), (2, 2), (3, 3)] {
            assert!(cells.contains(&cell), "{cell:?}");
        }
        for cell in [(0, 0), (-1, -1), (1, -1), (3, -1)] {
            assert!(!cells.contains(&cell), "{cell:?}");
        }
    }

    #[test]
    fn snow_and_ice_upwind_dry_the_air() {
        let settings = RainSettings {
            base: 1.0,
            ..RainSettings::default()
        };
        let mut grid = land_grid(16, 12);
        grid.tile_mut(9, 7).unwrap().terrain = Terrain::Ocean;
        let open = rainfall_at(&grid, 8, 6, &settings);
        assert!((open - 1.5).abs() < 1e-6);

        grid.tile_mut(9, 6).unwrap().biome = Some(Biome::Glacier);
        let iced = rainfall_at(&grid, 8, 6, &settings);
        assert!((iced - 1.0).abs() < 1e-6);

        grid.tile_mut(9, 6).unwrap().biome = Some(Biome::Snow);
        assert!((rainfall_at(&grid, 8, 6, &settings) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rainfall_row_leaves_water_dry() {
        let mut grid = land_grid(8, 4);
        {
            let tile = grid.tile_mut(2, 1).unwrap();
            tile.terrain = Terrain::Ocean;
            tile.is_land = false;
        }
        rainfall_row(&mut grid, 1, &RainSettings::default());
        assert_eq!(grid.tile(2, 1).unwrap().rainfall, 0.0);
    }
}
