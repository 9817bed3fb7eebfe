//! Карта высот: базовая высота, разломы и неровность
//!
//! Каждый проход заполняет одну строку сетки из шумовых полей. Итоговая высота
//! всегда равна базовой плюс половина уровня разлома.

use crate::config::{ElevationSettings, FaultSettings};
use crate::grid::WorldGrid;
use crate::noise::NoiseField;

/// Логарифмическое подавление высоты к полюсам: `1.0` на экваторе, `0.0` у самого полюса
///
/// Снижает сушу в высоких широтах, чтобы полюса чаще оказывались морем.
#[must_use]
pub fn pole_damping(equatorial_distance: f32, strength: f32) -> f32 {
    let remaining = (1.0 - equatorial_distance).max(1e-3);
    (1.0 + strength * remaining.ln()).max(0.0)
}

/// Уровень разлома из выборок шума разломов и эрозии
///
/// Линии разломов проходят там, где шум разломов близок к нулю. Ниже порога `threshold`
/// вклад нулевой, выше растёт квадратично, так что отсечка мягкая. Знак задаёт эрозия:
/// положительный даёт поднятие, отрицательный провал.
#[must_use]
pub fn fault_level(fault: f32, erosion: f32, settings: &FaultSettings) -> f32 {
    let ridge = 1.0 - fault.abs();
    if ridge <= settings.threshold {
        return 0.0;
    }
    let t = (ridge - settings.threshold) / (1.0 - settings.threshold);
    t * t * erosion * settings.strength
}

pub fn elevation_row(
    grid: &mut WorldGrid,
    y: u32,
    field: &NoiseField,
    settings: &ElevationSettings,
) {
    for tile in grid.row_mut(y) {
        let value = field.sample(tile.longitude, tile.latitude) * 0.5 + 0.5;
        tile.base_height = value * pole_damping(tile.equatorial_distance, settings.pole_damping);
        tile.fault_level = 0.0;
        tile.elevation = tile.base_height;
    }
}

pub fn faulting_row(
    grid: &mut WorldGrid,
    y: u32,
    fault: &NoiseField,
    erosion: &NoiseField,
    settings: &FaultSettings,
) {
    for tile in grid.row_mut(y) {
        let f = fault.sample(tile.longitude, tile.latitude);
        let e = erosion.sample(tile.longitude, tile.latitude);
        tile.fault_level = fault_level(f, e, settings);
        tile.elevation = tile.base_height + tile.fault_level * 0.5;
    }
}

pub fn ruggedness_row(grid: &mut WorldGrid, y: u32, field: &NoiseField) {
    for tile in grid.row_mut(y) {
        tile.ruggedness = field.sample(tile.longitude, tile.latitude).abs();
    }
}
