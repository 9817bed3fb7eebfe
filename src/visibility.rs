//! Поле зрения с учётом высот и биомов
//!
//! Из исходного тайла лучи трассируются к каждой точке кольца радиуса `radius`.
//! Луч идёт дальше тайла, только если тот не выше глаза наблюдателя: равные и более
//! низкие тайлы не заслоняют обзор, более высокие видны, но закрывают всё за собой.

use std::collections::HashSet;

use crate::biome::{Biome, Terrain};
use crate::geometry::{Point, visit_range_bounds, visit_ray_trace};
use crate::grid::{Tile, TileLookup};

fn terrain_sight(terrain: Terrain) -> i32 {
    match terrain {
        Terrain::Ocean | Terrain::Coast | Terrain::Lake => -1,
        Terrain::Flat => 0,
        Terrain::Hill => 1,
        Terrain::Mountain => 2,
    }
}

/// Поправка биома к высоте наблюдателя, стоящего на тайле
fn biome_sight_from(biome: Option<Biome>) -> i32 {
    match biome {
        Some(Biome::River | Biome::Marsh) => -1,
        Some(
            Biome::Forest | Biome::Taiga | Biome::Jungle | Biome::Glacier | Biome::Snow,
        )
        | None => 0,
    }
}

/// Поправка биома к тайлу, сквозь который смотрят
fn biome_sight_through(biome: Option<Biome>) -> i32 {
    match biome {
        Some(Biome::Forest | Biome::Taiga | Biome::Jungle | Biome::Glacier) => 1,
        Some(Biome::River) => -1,
        Some(Biome::Marsh | Biome::Snow) | None => 0,
    }
}

/// Высота глаза наблюдателя на тайле
#[must_use]
pub fn sight_elevation_from(tile: &Tile) -> i32 {
    terrain_sight(tile.terrain) + biome_sight_from(tile.biome)
}

/// Высота тайла как препятствия для взгляда
#[must_use]
pub fn sight_elevation_through(tile: &Tile) -> i32 {
    terrain_sight(tile.terrain) + biome_sight_through(tile.biome)
}

/// Обходит все тайлы, видимые из `origin` в радиусе `radius`, каждый ровно один раз
///
/// Сетка не меняется. Луч, вышедший за полюс, просто обрывается.
pub fn sight_from<'a, L>(
    lookup: &'a L,
    origin: Point,
    radius: u32,
    mut visit: impl FnMut(&'a Tile),
) where
    L: TileLookup + ?Sized,
{
    let Some(origin_tile) = lookup.tile(origin.0, origin.1) else {
        return;
    };
    let eye = sight_elevation_from(origin_tile);
    let origin_key = origin_tile.position();

    let mut seen = HashSet::new();
    seen.insert(origin_key);
    visit(origin_tile);
    if radius == 0 {
        return;
    }

    visit_range_bounds(origin, radius as i32, |target| {
        visit_ray_trace(origin, target, |(x, y)| {
            let Some(tile) = lookup.tile(x, y) else {
                return false;
            };
            if seen.insert(tile.position()) {
                visit(tile);
            }
            tile.position() == origin_key || sight_elevation_through(tile) <= eye
        });
        true
    });
}

/// Собирает координаты видимых тайлов
#[must_use]
pub fn visible_tiles<L: TileLookup + ?Sized>(
    lookup: &L,
    origin: Point,
    radius: u32,
) -> HashSet<(u32, u32)> {
    let mut visible = HashSet::new();
    sight_from(lookup, origin, radius, |tile| {
        visible.insert(tile.position());
    });
    visible
}
