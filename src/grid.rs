//! Тайловая сетка мира
//!
//! Сетка замкнута по горизонтали (x берётся по модулю ширины) и ограничена по вертикали
//! полюсами. После генерации сетка только читается: все изменения тайлов доступны лишь
//! проходам генератора внутри крейта.

use std::collections::HashMap;

use image::{ImageBuffer, Rgba};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::biome::{Biome, Terrain};
use crate::geometry::{Point, visit_random_walk};

/// Одна клетка мира
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    /// `[0, 1)`, замкнута
    pub longitude: f32,
    /// `[0, 1]`, от северного полюса к южному
    pub latitude: f32,
    /// `0` на экваторе, `1` на полюсе
    pub equatorial_distance: f32,
    pub base_height: f32,
    /// Всегда `base_height + fault_level * 0.5`
    pub elevation: f32,
    pub fault_level: f32,
    pub ruggedness: f32,
    pub terrain: Terrain,
    pub biome: Option<Biome>,
    pub is_land: bool,
    pub rainfall: f32,
}

impl Tile {
    fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        let latitude = (y as f32 + 0.5) / height as f32;
        Self {
            x,
            y,
            longitude: x as f32 / width as f32,
            latitude,
            equatorial_distance: (latitude - 0.5).abs() * 2.0,
            base_height: 0.0,
            elevation: 0.0,
            fault_level: 0.0,
            ruggedness: 0.0,
            terrain: Terrain::Ocean,
            biome: None,
            is_land: false,
            rainfall: 0.0,
        }
    }

    #[must_use]
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        self.biome.map_or_else(|| self.terrain.to_rgb(), Biome::to_rgb)
    }
}

/// Поиск тайла по координатам, которым пользуется движок видимости
pub trait TileLookup {
    /// `None` для y вне карты; x замыкается по ширине
    fn tile(&self, x: i32, y: i32) -> Option<&Tile>;
}

/// Плотный массив тайлов `width × height`
#[derive(Debug, Clone, Serialize)]
pub struct WorldGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    /// Пустая сетка: только координаты, остальное заполнено океаном с нулевыми полями
    pub(crate) fn blank(width: u32, height: u32) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(x, y, width, height)))
            .collect();
        Self {
            width,
            height,
            tiles,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if y < 0 || y >= self.height as i32 {
            return None;
        }
        let x = x.rem_euclid(self.width as i32) as usize;
        Some(y as usize * self.width as usize + x)
    }

    #[must_use]
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).map(|idx| &self.tiles[idx])
    }

    pub(crate) fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).map(|idx| &mut self.tiles[idx])
    }

    /// Строка `y`; `None` за пределами карты, как у [`WorldGrid::tile`]
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Tile]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        self.tiles.get(start..start + self.width as usize)
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [Tile] {
        let start = (y * self.width) as usize;
        &mut self.tiles[start..start + self.width as usize]
    }

    /// Ищет поблизости тайл, подходящий под условие, случайным блужданием
    ///
    /// Просматривается не более `max_tiles` различных клеток. Так игровая логика
    /// подбирает место для поселенца или столицы рядом с желаемой точкой.
    pub fn find_tile_near<R: Rng>(
        &self,
        x: i32,
        y: i32,
        max_tiles: usize,
        rng: &mut R,
        mut predicate: impl FnMut(&Tile) -> bool,
    ) -> Option<&Tile> {
        let mut found: Option<Point> = None;
        visit_random_walk((x, y), max_tiles, rng, |(px, py)| {
            match self.tile(px, py) {
                Some(tile) if predicate(tile) => {
                    found = Some((px, py));
                    false
                }
                _ => true,
            }
        });
        found.and_then(|(px, py)| self.tile(px, py))
    }

    /// Сводка по типам рельефа
    #[must_use]
    pub fn summary(&self) -> TerrainSummary {
        let mut terrain: HashMap<Terrain, usize> = HashMap::new();
        let mut river_tiles = 0;
        let mut land_tiles = 0;
        for tile in &self.tiles {
            *terrain.entry(tile.terrain).or_insert(0) += 1;
            if tile.biome == Some(Biome::River) {
                river_tiles += 1;
            }
            if tile.is_land {
                land_tiles += 1;
            }
        }

        TerrainSummary {
            width: self.width,
            height: self.height,
            terrain,
            river_tiles,
            land_ratio: land_tiles as f32 / self.tiles.len() as f32,
        }
    }

    pub fn to_rgba_image(&self) -> Vec<u8> {
        self.tiles
            .iter()
            .flat_map(|tile| {
                let rgb = tile.to_rgb();
                [rgb[0], rgb[1], rgb[2], 255] // RGBA
            })
            .collect()
    }

    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, self.to_rgba_image())
                .ok_or("Failed to create image buffer")?;
        img.save(path)?;
        Ok(())
    }
}

impl TileLookup for WorldGrid {
    fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        WorldGrid::tile(self, x, y)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TerrainSummary {
    pub width: u32,
    pub height: u32,
    pub terrain: HashMap<Terrain, usize>,
    pub river_tiles: usize,
    pub land_ratio: f32,
}
