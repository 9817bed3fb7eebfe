//! Типы рельефа и биомов, классификация тайлов
//!
//! Рельеф определяется по высоте, разломам и неровности. Поверх него ложатся
//! ледники и снег, затем растительность по осадкам и широте.

use serde::{Deserialize, Serialize};

use crate::config::{BiomeSettings, TerrainSettings};
use crate::grid::WorldGrid;

/// Основной тип рельефа тайла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Ocean,
    Coast,
    Flat,
    Hill,
    Mountain,
    Lake,
}

impl Terrain {
    pub const ALL: [Terrain; 6] = [
        Terrain::Ocean,
        Terrain::Coast,
        Terrain::Flat,
        Terrain::Hill,
        Terrain::Mountain,
        Terrain::Lake,
    ];

    /// Суша ли это по типу рельефа (без учёта рек)
    #[must_use]
    pub fn is_land(self) -> bool {
        matches!(self, Terrain::Flat | Terrain::Hill | Terrain::Mountain)
    }

    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Terrain::Ocean => [0, 64, 128],
            Terrain::Coast => [40, 110, 170],
            Terrain::Flat => [150, 200, 100],
            Terrain::Hill => [170, 160, 90],
            Terrain::Mountain => [150, 150, 150],
            Terrain::Lake => [60, 140, 200],
        }
    }
}

/// Оверлей поверх рельефа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    River,
    Forest,
    Taiga,
    Jungle,
    Marsh,
    Glacier,
    Snow,
}

impl Biome {
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Biome::River => [30, 90, 220],
            Biome::Forest => [60, 120, 60],
            Biome::Taiga => [100, 150, 100],
            Biome::Jungle => [30, 100, 30],
            Biome::Marsh => [80, 100, 60],
            Biome::Glacier => [220, 220, 255],
            Biome::Snow => [245, 245, 250],
        }
    }
}

/// Классифицирует тайл по высоте, разлому и неровности
///
/// Дерево решений полное: любой вход получает ровно один тип рельефа.
#[must_use]
pub fn classify(
    base_height: f32,
    elevation: f32,
    fault_level: f32,
    ruggedness: f32,
    settings: &TerrainSettings,
) -> Terrain {
    if elevation < settings.ocean_level + settings.coast_threshold {
        return if settings.ocean_level - base_height > settings.coast_threshold {
            Terrain::Ocean
        } else {
            Terrain::Coast
        };
    }

    if ruggedness > settings.mountain_ruggedness || fault_level > settings.mountain_fault {
        Terrain::Mountain
    } else if ruggedness + fault_level > settings.hill_threshold {
        // Разлом сильнее неровности: провал, заполненный водой
        if ruggedness > fault_level {
            Terrain::Hill
        } else {
            Terrain::Lake
        }
    } else {
        Terrain::Flat
    }
}

pub fn classification_row(grid: &mut WorldGrid, y: u32, settings: &TerrainSettings) {
    for tile in grid.row_mut(y) {
        tile.terrain = classify(
            tile.base_height,
            tile.elevation,
            tile.fault_level,
            tile.ruggedness,
            settings,
        );
        tile.is_land = tile.terrain.is_land();
    }
}

/// Ледники у полюсов и снег на дальних от экватора горах
pub fn frost_row(grid: &mut WorldGrid, y: u32, settings: &BiomeSettings) {
    for tile in grid.row_mut(y) {
        if !tile.is_land {
            continue;
        }
        if tile.equatorial_distance > settings.glacier_latitude {
            tile.biome = Some(Biome::Glacier);
        } else if tile.terrain == Terrain::Mountain
            && tile.equatorial_distance > settings.snow_latitude
        {
            tile.biome = Some(Biome::Snow);
        }
    }
}

/// Растительность на суше без оверлея; выполняется после рек
pub fn vegetation_row(grid: &mut WorldGrid, y: u32, settings: &BiomeSettings) {
    for tile in grid.row_mut(y) {
        if !tile.is_land || tile.biome.is_some() {
            continue;
        }
        tile.biome = vegetation(
            tile.terrain,
            tile.rainfall,
            tile.equatorial_distance,
            settings,
        );
    }
}

fn vegetation(
    terrain: Terrain,
    rainfall: f32,
    equatorial_distance: f32,
    settings: &BiomeSettings,
) -> Option<Biome> {
    if terrain == Terrain::Flat && rainfall > settings.marsh_rainfall {
        Some(Biome::Marsh)
    } else if equatorial_distance < settings.jungle_latitude && rainfall > settings.jungle_rainfall
    {
        Some(Biome::Jungle)
    } else if rainfall > settings.forest_rainfall {
        if equatorial_distance > settings.taiga_latitude {
            Some(Biome::Taiga)
        } else {
            Some(Biome::Forest)
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TerrainSettings {
        TerrainSettings {
            ocean_level: 0.5,
            coast_threshold: 0.05,
            mountain_ruggedness: 0.6,
            mountain_fault: 0.3,
            hill_threshold: 0.4,
        }
    }

    #[test]
    fn deep_water_is_ocean() {
        assert_eq!(classify(0.2, 0.2, 0.0, 0.0, &settings()), Terrain::Ocean);
    }

    #[test]
    fn shallow_water_is_coast() {
        // Высота ниже уровня+полоса, но базовая высота близко к уровню
        assert_eq!(classify(0.47, 0.52, 0.1, 0.9, &settings()), Terrain::Coast);
    }

    #[test]
    fn rugged_or_faulted_land_is_mountain() {
        assert_eq!(classify(0.7, 0.7, 0.0, 0.7, &settings()), Terrain::Mountain);
        assert_eq!(classify(0.7, 0.9, 0.4, 0.0, &settings()), Terrain::Mountain);
    }

    #[test]
    fn hill_or_lake_depends_on_dominant_term() {
        assert_eq!(classify(0.7, 0.7, 0.0, 0.45, &settings()), Terrain::Hill);
        assert_eq!(classify(0.7, 0.8, 0.25, 0.2, &settings()), Terrain::Lake);
    }

    #[test]
    fn quiet_land_is_flat() {
        assert_eq!(classify(0.7, 0.7, 0.0, 0.1, &settings()), Terrain::Flat);
    }

    #[test]
    fn only_flat_hill_mountain_are_land() {
        let land: Vec<_> = Terrain::ALL.into_iter().filter(|t| t.is_land()).collect();
        assert_eq!(land, vec![Terrain::Flat, Terrain::Hill, Terrain::Mountain]);
    }

    /// Суша на всей карте, колонка 0 в горах, колонка 1 под водой
    fn frost_grid() -> WorldGrid {
        let mut grid = WorldGrid::blank(4, 20);
        for y in 0..20 {
            for tile in grid.row_mut(y) {
                tile.terrain = match tile.x {
                    0 => Terrain::Mountain,
                    1 => Terrain::Ocean,
                    _ => Terrain::Flat,
                };
                tile.is_land = tile.terrain.is_land();
            }
        }
        grid
    }

    #[test]
    fn polar_land_becomes_glacier() {
        let mut grid = frost_grid();
        // y = 0 из 20: расстояние от экватора 0.95
        frost_row(&mut grid, 0, &BiomeSettings::default());
        let biomes: Vec<_> = grid.row(0).unwrap().iter().map(|t| t.biome).collect();
        assert_eq!(
            biomes,
            vec![Some(Biome::Glacier), None, Some(Biome::Glacier), Some(Biome::Glacier)]
        );
    }

    #[test]
    fn only_mountains_get_snow_below_glacier_latitude() {
        let mut grid = frost_grid();
        // y = 3 из 20: расстояние от экватора 0.65
        frost_row(&mut grid, 3, &BiomeSettings::default());
        let biomes: Vec<_> = grid.row(3).unwrap().iter().map(|t| t.biome).collect();
        assert_eq!(biomes, vec![Some(Biome::Snow), None, None, None]);
    }

    #[test]
    fn temperate_rows_stay_bare() {
        let mut grid = frost_grid();
        frost_row(&mut grid, 10, &BiomeSettings::default());
        assert!(grid.row(10).unwrap().iter().all(|t| t.biome.is_none()));
    }

    #[test]
    fn frost_is_kept_by_vegetation() {
        let mut grid = frost_grid();
        frost_row(&mut grid, 0, &BiomeSettings::default());
        for tile in grid.row_mut(0) {
            tile.rainfall = 5.0;
        }
        vegetation_row(&mut grid, 0, &BiomeSettings::default());
        assert_eq!(grid.tile(2, 0).unwrap().biome, Some(Biome::Glacier));
        assert_eq!(grid.tile(1, 0).unwrap().biome, None);
    }

    #[test]
    fn wet_flats_become_marsh_and_wet_tropics_jungle() {
        let s = BiomeSettings::default();
        assert_eq!(vegetation(Terrain::Flat, 2.0, 0.1, &s), Some(Biome::Marsh));
        assert_eq!(vegetation(Terrain::Hill, 1.0, 0.1, &s), Some(Biome::Jungle));
        assert_eq!(vegetation(Terrain::Hill, 0.7, 0.4, &s), Some(Biome::Forest));
        assert_eq!(vegetation(Terrain::Flat, 0.7, 0.8, &s), Some(Biome::Taiga));
        assert_eq!(vegetation(Terrain::Flat, 0.1, 0.4, &s), None);
    }
}
