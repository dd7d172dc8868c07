//! Tile provider configuration
//!
//! Providers can be picked from presets through [`TileProviderProfile`] or
//! described in JSON and loaded with [`TileProvider::from_json`].

use crate::core::constants::{MAX_PROVIDER_ZOOM, TILE_SIZE};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

const STAMEN_ATTRIBUTION: &str = "Maps (C) Stamen, Data (C) OpenStreetMap.org contributors";
const CARTO_ATTRIBUTION: &str = "Maps (C) CARTO (C) OpenStreetMap.org contributors";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TileProviderProfile {
    #[default]
    OpenStreetMap,
    StamenTerrain,
    StamenToner,
    StamenTonerLite,
    ArcGisWorldImagery,
    CartoNoLabels,
    CartoDarkNoLabels,
    /// No background tiles at all
    None,
    Custom(TileProvider),
}

impl TileProviderProfile {
    pub fn resolve(&self) -> TileProvider {
        let abcd = || Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        match self {
            Self::OpenStreetMap => TileProvider::new(
                "osm",
                "https://$s.tile.openstreetmap.org/$z/$x/$y.png",
                Some(vec!["a".into(), "b".into(), "c".into()]),
                Some("Maps & Data (C) OpenStreetMap.org contributors"),
                19,
            ),
            Self::StamenTerrain => TileProvider::new(
                "stamen-terrain",
                "http://$s.tile.stamen.com/terrain/$z/$x/$y.png",
                abcd(),
                Some(STAMEN_ATTRIBUTION),
                18,
            ),
            Self::StamenToner => TileProvider::new(
                "stamen-toner",
                "http://$s.tile.stamen.com/toner/$z/$x/$y.png",
                abcd(),
                Some(STAMEN_ATTRIBUTION),
                20,
            ),
            Self::StamenTonerLite => TileProvider::new(
                "stamen-toner-lite",
                "http://$s.tile.stamen.com/toner-lite/$z/$x/$y.png",
                abcd(),
                Some(STAMEN_ATTRIBUTION),
                20,
            ),
            Self::ArcGisWorldImagery => TileProvider::new(
                "arcgis-worldimagery",
                "https://server.arcgisonline.com/arcgis/rest/services/World_Imagery/MapServer/tile/$z/$y/$x",
                None,
                Some(
                    "Source: Esri, Maxar, GeoEye, Earthstar Geographics, \
                     CNES/Airbus DS, USDA, USGS, AeroGRID, IGN, and the GIS User Community",
                ),
                24,
            ),
            Self::CartoNoLabels => TileProvider::new(
                "carto-nolabels",
                "http://$s.basemaps.cartocdn.com/rastertiles/light_nolabels/$z/$x/$y.png",
                abcd(),
                Some(CARTO_ATTRIBUTION),
                20,
            ),
            Self::CartoDarkNoLabels => TileProvider::new(
                "carto-darknolabels",
                "http://$s.basemaps.cartocdn.com/rastertiles/dark_nolabels/$z/$x/$y.png",
                abcd(),
                Some(CARTO_ATTRIBUTION),
                20,
            ),
            Self::None => TileProvider::new("none", "", None, None, 99),
            Self::Custom(provider) => provider.clone(),
        }
    }

    /// Looks a preset up by the provider name it resolves to, e.g. `"osm"`.
    pub fn by_name(name: &str) -> Option<TileProviderProfile> {
        [
            Self::OpenStreetMap,
            Self::StamenTerrain,
            Self::StamenToner,
            Self::StamenTonerLite,
            Self::ArcGisWorldImagery,
            Self::CartoNoLabels,
            Self::CartoDarkNoLabels,
            Self::None,
        ]
        .into_iter()
        .find(|profile| profile.resolve().name() == name)
    }
}

/// A raster tile provider: URL scheme, attribution and zoom range.
///
/// The URL pattern understands `$s` (shard), `$z`, `$x`, `$y` and `$k`
/// (API key).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileProvider {
    name: String,
    url_pattern: String,
    #[serde(default)]
    shards: Option<Vec<String>>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    attribution: Option<String>,
    #[serde(default = "default_max_zoom", deserialize_with = "deserialize_max_zoom")]
    max_zoom: u8,
}

fn default_max_zoom() -> u8 {
    MAX_PROVIDER_ZOOM
}

fn deserialize_max_zoom<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = u32::deserialize(deserializer)?;
    Ok(raw.min(MAX_PROVIDER_ZOOM as u32) as u8)
}

impl TileProvider {
    /// Creates a provider; `max_zoom` is capped at 20.
    pub fn new(
        name: &str,
        url_pattern: &str,
        shards: Option<Vec<String>>,
        attribution: Option<&str>,
        max_zoom: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            url_pattern: url_pattern.to_string(),
            shards,
            api_key: None,
            attribution: attribution.map(str::to_string),
            max_zoom: max_zoom.min(MAX_PROVIDER_ZOOM as u32) as u8,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let provider: TileProvider = serde_json::from_str(json)?;
        provider.validate()?;
        Ok(provider)
    }

    /// Checks that a non-empty URL pattern addresses tiles and that shards
    /// exist when the pattern asks for one.
    pub fn validate(&self) -> Result<()> {
        if self.url_pattern.is_empty() {
            return Ok(());
        }
        if let Some(missing) = ["$z", "$x", "$y"]
            .into_iter()
            .find(|p| !self.url_pattern.contains(p))
        {
            return Err(MapError::Tile(format!(
                "url pattern of provider \"{}\" lacks {}",
                self.name, missing
            )));
        }
        let has_shards = self.shards.as_ref().is_some_and(|s| !s.is_empty());
        if self.url_pattern.contains("$s") && !has_shards {
            return Err(MapError::Tile(format!(
                "url pattern of provider \"{}\" uses $s but no shards are configured",
                self.name
            )));
        }
        Ok(())
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn set_api_key(&mut self, key: &str) {
        self.api_key = Some(key.to_string());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }

    pub fn tile_size(&self) -> u32 {
        TILE_SIZE
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    /// URL of tile `(zoom, x, y)`, or `None` if the provider has no URL
    /// pattern or the zoom is out of range.
    pub fn url(&self, zoom: u8, x: u32, y: u32) -> Option<String> {
        if self.url_pattern.is_empty() || zoom > self.max_zoom {
            return None;
        }
        let shard = match &self.shards {
            Some(shards) if !shards.is_empty() => {
                let idx = ((x as u64 + y as u64) % shards.len() as u64) as usize;
                shards[idx].as_str()
            }
            _ => "",
        };
        Some(
            self.url_pattern
                .replace("$s", shard)
                .replace("$z", &zoom.to_string())
                .replace("$x", &x.to_string())
                .replace("$y", &y.to_string())
                .replace("$k", self.api_key.as_deref().unwrap_or("")),
        )
    }
}

impl Default for TileProvider {
    fn default() -> Self {
        TileProviderProfile::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharding_is_balanced() {
        let t = TileProvider::new(
            "test",
            "$s/$z/$x/$y",
            Some(vec!["0".into(), "1".into(), "2".into()]),
            None,
            20,
        );
        let mut counts = [0usize; 3];
        for x in 0..100 {
            for y in 0..100 {
                let url = t.url(0, x, y).unwrap();
                for (s, count) in counts.iter_mut().enumerate() {
                    if url == format!("{}/0/{}/{}", s, x, y) {
                        *count += 1;
                    }
                }
            }
        }
        assert_eq!(counts.iter().sum::<usize>(), 100 * 100);
        let third = (100 * 100) / 3;
        for count in counts {
            assert!((third as f64 * 0.9) < count as f64);
            assert!((count as f64) < third as f64 * 1.1);
        }
    }

    #[test]
    fn test_presets() {
        let osm = TileProviderProfile::OpenStreetMap.resolve();
        assert_eq!(osm.name(), "osm");
        assert_eq!(osm.max_zoom(), 19);
        assert_eq!(osm.tile_size(), 256);
        assert!(osm.attribution().is_some());

        // advertised zoom is capped
        assert_eq!(TileProviderProfile::ArcGisWorldImagery.resolve().max_zoom(), 20);
        assert_eq!(TileProviderProfile::None.resolve().max_zoom(), 20);
        assert_eq!(TileProviderProfile::None.resolve().url(1, 0, 0), None);

        assert_eq!(
            TileProviderProfile::by_name("carto-nolabels"),
            Some(TileProviderProfile::CartoNoLabels)
        );
        assert_eq!(TileProviderProfile::by_name("nope"), None);
    }

    #[test]
    fn test_url_zoom_range_and_api_key() {
        let t = TileProvider::new("k", "https://tiles/$z/$x/$y.png?key=$k", None, None, 5)
            .with_api_key("0123");
        assert_eq!(t.url(5, 1, 2).as_deref(), Some("https://tiles/5/1/2.png?key=0123"));
        assert_eq!(t.url(6, 1, 2), None);
    }

    #[test]
    fn test_provider_from_json() {
        let json = r#"{
            "name": "jawg-light",
            "url_pattern": "https://$s.tile.jawg.io/jawg-light/$z/$x/$y.png?access-token=$k",
            "shards": ["a", "b", "c", "d"],
            "attribution": "Maps (C) Jawg Maps (C) OpenStreetMap.org contributors",
            "max_zoom": 22
        }"#;
        let mut t = TileProvider::from_json(json).unwrap();
        t.set_api_key("0123456789876543210");
        assert_eq!(t.name(), "jawg-light");
        assert_eq!(t.max_zoom(), 20);
        assert_eq!(
            t.url(1, 1, 0).as_deref(),
            Some("https://b.tile.jawg.io/jawg-light/1/1/0.png?access-token=0123456789876543210")
        );

        assert!(TileProvider::from_json("{\"name\": 3}").is_err());
    }

    #[test]
    fn test_provider_validation() {
        let no_x = r#"{"name": "broken", "url_pattern": "https://tiles/$z/$y.png"}"#;
        assert!(matches!(TileProvider::from_json(no_x), Err(MapError::Tile(_))));

        let no_shards = r#"{"name": "broken", "url_pattern": "https://$s.tiles/$z/$x/$y.png"}"#;
        assert!(matches!(TileProvider::from_json(no_shards), Err(MapError::Tile(_))));

        for profile in [
            TileProviderProfile::OpenStreetMap,
            TileProviderProfile::ArcGisWorldImagery,
            TileProviderProfile::CartoDarkNoLabels,
            TileProviderProfile::None,
        ] {
            assert!(profile.resolve().validate().is_ok());
        }
    }

    #[test]
    fn test_custom_profile() {
        let custom = TileProvider::new("mine", "$z/$x/$y", None, None, 12);
        let profile = TileProviderProfile::Custom(custom.clone());
        assert_eq!(profile.resolve(), custom);
    }
}
