// src/config.rs
//! Конфигурация генерации мира
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией тайловой карты:
//! - Параметры шумовых полей (высота, разломы, эрозия, неровность)
//! - Пороги классификации рельефа
//! - Ветер, осадки и реки
//! - Широты и пороги оверлейных биомов
//!
//! Все структуры поддерживают сериализацию в TOML/JSON. Конфигурация неизменяема
//! на протяжении одного прогона генерации и проверяется через [`GenerationConfig::validate`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GenError, Result};

/// Параметры одного фрактального шумового поля
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoiseSettings {
    /// Длина окружности, на которую проецируется долгота (больше = мельче детали)
    pub scale: f32,

    /// Количество октав FBM
    pub octaves: u8,

    /// Множитель амплитуды каждой следующей октавы
    pub persistence: f32,

    /// Множитель частоты каждой следующей октавы
    pub lacunarity: f32,

    /// Сдвиг сида относительно общего сида мира (у каждого поля свой)
    #[serde(default)]
    pub seed_offset: u64,
}

impl NoiseSettings {
    #[must_use]
    pub fn new(scale: f32, octaves: u8, seed_offset: u64) -> Self {
        Self {
            scale,
            octaves,
            persistence: 0.5,
            lacunarity: 2.0,
            seed_offset,
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        let invalid = |reason: &str| GenError::InvalidNoise {
            field,
            reason: reason.to_string(),
        };
        if self.octaves == 0 {
            return Err(invalid("octaves must be at least 1"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid("scale must be a positive finite number"));
        }
        if !(self.persistence > 0.0 && self.persistence <= 1.0) {
            return Err(invalid("persistence must lie in (0, 1]"));
        }
        if !self.lacunarity.is_finite() || self.lacunarity < 1.0 {
            return Err(invalid("lacunarity must be at least 1"));
        }
        Ok(())
    }
}

fn default_elevation_noise() -> NoiseSettings {
    NoiseSettings::new(4.0, 6, 0)
}
fn default_fault_noise() -> NoiseSettings {
    NoiseSettings::new(3.0, 3, 1_000_000)
}
fn default_erosion_noise() -> NoiseSettings {
    NoiseSettings::new(6.0, 4, 2_000_000)
}
fn default_ruggedness_noise() -> NoiseSettings {
    NoiseSettings::new(8.0, 4, 3_000_000)
}

/// Форма карты высот
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationSettings {
    /// Сила логарифмического подавления высоты к полюсам (0 = без подавления)
    #[serde(default = "default_pole_damping")]
    pub pole_damping: f32,
}

fn default_pole_damping() -> f32 {
    0.15
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            pole_damping: default_pole_damping(),
        }
    }
}

/// Тектонические разломы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultSettings {
    /// Мягкий порог: ниже него разлом почти не влияет на высоту. Допустимо [0, 1)
    #[serde(default = "default_fault_threshold")]
    pub threshold: f32,

    /// Множитель амплитуды разлома
    #[serde(default = "default_fault_strength")]
    pub strength: f32,
}

fn default_fault_threshold() -> f32 {
    0.7
}
fn default_fault_strength() -> f32 {
    1.0
}

impl Default for FaultSettings {
    fn default() -> Self {
        Self {
            threshold: default_fault_threshold(),
            strength: default_fault_strength(),
        }
    }
}

/// Пороги классификации рельефа
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerrainSettings {
    /// Уровень океана в единицах высоты
    #[serde(default = "default_ocean_level")]
    pub ocean_level: f32,

    /// Ширина прибрежной полосы над и под уровнем океана
    #[serde(default = "default_coast_threshold")]
    pub coast_threshold: f32,

    /// Неровность, начиная с которой суша становится горами
    #[serde(default = "default_mountain_ruggedness")]
    pub mountain_ruggedness: f32,

    /// Уровень разлома, начиная с которого суша становится горами
    #[serde(default = "default_mountain_fault")]
    pub mountain_fault: f32,

    /// Порог суммы неровности и разлома для холмов и озёр
    #[serde(default = "default_hill_threshold")]
    pub hill_threshold: f32,
}

fn default_ocean_level() -> f32 {
    0.5
}
fn default_coast_threshold() -> f32 {
    0.03
}
fn default_mountain_ruggedness() -> f32 {
    0.55
}
fn default_mountain_fault() -> f32 {
    0.25
}
fn default_hill_threshold() -> f32 {
    0.35
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            ocean_level: default_ocean_level(),
            coast_threshold: default_coast_threshold(),
            mountain_ruggedness: default_mountain_ruggedness(),
            mountain_fault: default_mountain_fault(),
            hill_threshold: default_hill_threshold(),
        }
    }
}

/// Ветер и осадки
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainSettings {
    /// Глубина наветренного конуса в тайлах
    #[serde(default = "default_cone_depth")]
    pub cone_depth: u32,

    /// Расширение конуса: поперечный полуразмах на единицу глубины
    #[serde(default = "default_cone_spread")]
    pub cone_spread: f32,

    /// Базовые осадки до учёта конуса
    #[serde(default)]
    pub base: f32,

    /// Множитель суммарного вклада конуса
    #[serde(default = "default_rain_scale")]
    pub scale: f32,
}

fn default_cone_depth() -> u32 {
    6
}
fn default_cone_spread() -> f32 {
    0.5
}
fn default_rain_scale() -> f32 {
    1.0
}

impl Default for RainSettings {
    fn default() -> Self {
        Self {
            cone_depth: default_cone_depth(),
            cone_spread: default_cone_spread(),
            base: 0.0,
            scale: default_rain_scale(),
        }
    }
}

/// Истоки и длина рек
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiverSettings {
    /// Осадки, выше которых вероятность истока растёт
    #[serde(default = "default_rain_threshold")]
    pub rain_threshold: f32,

    /// Прирост вероятности истока на единицу осадков сверх порога
    #[serde(default = "default_chance_per_rain")]
    pub chance_per_rain: f32,

    /// Верхняя граница вероятности истока
    #[serde(default = "default_max_chance")]
    pub max_chance: f32,

    /// Вероятность истока для сухих тайлов
    #[serde(default = "default_base_chance")]
    pub base_chance: f32,

    /// Максимальная длина одной реки в тайлах
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_rain_threshold() -> f32 {
    1.0
}
fn default_chance_per_rain() -> f32 {
    0.01
}
fn default_max_chance() -> f32 {
    0.02
}
fn default_base_chance() -> f32 {
    0.001
}
fn default_max_length() -> usize {
    256
}

impl Default for RiverSettings {
    fn default() -> Self {
        Self {
            rain_threshold: default_rain_threshold(),
            chance_per_rain: default_chance_per_rain(),
            max_chance: default_max_chance(),
            base_chance: default_base_chance(),
            max_length: default_max_length(),
        }
    }
}

/// Оверлейные биомы (лёд, снег, растительность)
///
/// Широты задаются как расстояние от экватора: `0.0` на экваторе, `1.0` на полюсе.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeSettings {
    #[serde(default = "default_glacier_latitude")]
    pub glacier_latitude: f32,

    /// Горы дальше этой широты покрываются снегом
    #[serde(default = "default_snow_latitude")]
    pub snow_latitude: f32,

    #[serde(default = "default_taiga_latitude")]
    pub taiga_latitude: f32,

    #[serde(default = "default_jungle_latitude")]
    pub jungle_latitude: f32,

    #[serde(default = "default_forest_rainfall")]
    pub forest_rainfall: f32,

    #[serde(default = "default_jungle_rainfall")]
    pub jungle_rainfall: f32,

    /// Только для равнин
    #[serde(default = "default_marsh_rainfall")]
    pub marsh_rainfall: f32,
}

fn default_glacier_latitude() -> f32 {
    0.9
}
fn default_snow_latitude() -> f32 {
    0.6
}
fn default_taiga_latitude() -> f32 {
    0.65
}
fn default_jungle_latitude() -> f32 {
    0.25
}
fn default_forest_rainfall() -> f32 {
    0.6
}
fn default_jungle_rainfall() -> f32 {
    0.9
}
fn default_marsh_rainfall() -> f32 {
    1.6
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            glacier_latitude: default_glacier_latitude(),
            snow_latitude: default_snow_latitude(),
            taiga_latitude: default_taiga_latitude(),
            jungle_latitude: default_jungle_latitude(),
            forest_rainfall: default_forest_rainfall(),
            jungle_rainfall: default_jungle_rainfall(),
            marsh_rainfall: default_marsh_rainfall(),
        }
    }
}

/// Основные параметры генерации мира
///
/// Полная конфигурация для генерации одного мира. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Сид генератора (детерминированная генерация, включая реки)
    pub seed: u64,

    /// Ширина карты в тайлах (карта замкнута по горизонтали)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в тайлах (от полюса до полюса)
    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_elevation_noise")]
    pub elevation_noise: NoiseSettings,

    #[serde(default = "default_fault_noise")]
    pub fault_noise: NoiseSettings,

    #[serde(default = "default_erosion_noise")]
    pub erosion_noise: NoiseSettings,

    #[serde(default = "default_ruggedness_noise")]
    pub ruggedness_noise: NoiseSettings,

    #[serde(default)]
    pub elevation: ElevationSettings,

    #[serde(default)]
    pub faulting: FaultSettings,

    #[serde(default)]
    pub terrain: TerrainSettings,

    #[serde(default)]
    pub rain: RainSettings,

    #[serde(default)]
    pub rivers: RiverSettings,

    #[serde(default)]
    pub biomes: BiomeSettings,
}

impl GenerationConfig {
    /// Создаёт конфигурацию по умолчанию с заданным сидом и размером
    #[must_use]
    pub fn new(seed: u64, width: u32, height: u32) -> Self {
        Self {
            seed,
            width,
            height,
            ..Self::default()
        }
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Ошибки
    /// Возвращает ошибку, если файл не найден, содержит недопустимый формат
    /// или не проходит [`GenerationConfig::validate`].
    ///
    /// # Пример
    /// ```toml
    /// # world.toml
    /// seed = 42
    /// width = 160
    /// height = 80
    ///
    /// [terrain]
    /// ocean_level = 0.45
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Отношение высоты карты к ширине; нужно шумовым полям, чтобы детали не растягивались
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Проверяет конфигурацию до начала генерации
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GenError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        self.elevation_noise.validate("elevation_noise")?;
        self.fault_noise.validate("fault_noise")?;
        self.erosion_noise.validate("erosion_noise")?;
        self.ruggedness_noise.validate("ruggedness_noise")?;

        if !(0.0..1.0).contains(&self.faulting.threshold) {
            return Err(GenError::InvalidParameter {
                name: "faulting.threshold",
                reason: format!("{} is outside [0, 1)", self.faulting.threshold),
            });
        }

        for (name, chance) in [
            ("rivers.max_chance", self.rivers.max_chance),
            ("rivers.base_chance", self.rivers.base_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(GenError::InvalidParameter {
                    name,
                    reason: format!("{chance} is not a probability"),
                });
            }
        }

        for (name, value) in [
            ("rain.cone_spread", self.rain.cone_spread),
            ("rain.base", self.rain.base),
            ("rain.scale", self.rain.scale),
        ] {
            if !value.is_finite() {
                return Err(GenError::InvalidParameter {
                    name,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        if self.rain.cone_spread < 0.0 {
            return Err(GenError::InvalidParameter {
                name: "rain.cone_spread",
                reason: "must not be negative".to_string(),
            });
        }

        Ok(())
    }
}

fn default_width() -> u32 {
    256
}
fn default_height() -> u32 {
    128
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: default_width(),
            height: default_height(),
            elevation_noise: default_elevation_noise(),
            fault_noise: default_fault_noise(),
            erosion_noise: default_erosion_noise(),
            ruggedness_noise: default_ruggedness_noise(),
            elevation: ElevationSettings::default(),
            faulting: FaultSettings::default(),
            terrain: TerrainSettings::default(),
            rain: RainSettings::default(),
            rivers: RiverSettings::default(),
            biomes: BiomeSettings::default(),
        }
    }
}
