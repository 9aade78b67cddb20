mod document;
mod reader;
mod writer;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PersistenceError, Result};
use crate::math::{Point2, Transform, Vector2};
use crate::motif::Motif;
use crate::operations::transform::GeneralTransform;
use crate::topology::Map;

use document::{Document, Header, FORMAT_VERSION};

/// Canvas settings stored alongside the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
    /// RGBA.
    pub background: [u8; 4],
    /// The map point shown at the middle of the canvas.
    pub center: Point2,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            zoom: 1.0,
            background: [255, 255, 255, 255],
            center: Point2::origin(),
        }
    }
}

/// The range of lattice repeats a mosaic is drawn over, inclusive on both
/// ends, along the two translation vectors of its tiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRegion {
    pub min: [i32; 2],
    pub max: [i32; 2],
}

impl Default for FillRegion {
    fn default() -> Self {
        Self {
            min: [-1, -1],
            max: [1, 1],
        }
    }
}

impl FillRegion {
    /// Every repeat offset `i * t1 + j * t2` in the region, row by row.
    #[must_use]
    pub fn translations(&self, t1: &Vector2, t2: &Vector2) -> Vec<Vector2> {
        (self.min[1]..=self.max[1])
            .flat_map(|j| (self.min[0]..=self.max[0]).map(move |i| (i, j)))
            .map(|(i, j)| t1 * f64::from(i) + t2 * f64::from(j))
            .collect()
    }
}

/// A named map with its view, fill region and, optionally, the motif
/// recipe it was built from.
#[derive(Debug, Clone)]
pub struct Mosaic {
    pub name: String,
    pub view: ViewSettings,
    pub fill: FillRegion,
    pub motif: Option<Motif>,
    pub map: Map,
}

impl Mosaic {
    #[must_use]
    pub fn new(name: impl Into<String>, map: Map) -> Self {
        Self {
            name: name.into(),
            view: ViewSettings::default(),
            fill: FillRegion::default(),
            motif: None,
            map,
        }
    }

    /// Builds `motif` and keeps its recipe with the map.
    ///
    /// # Errors
    ///
    /// Returns the construction error if the motif cannot be built.
    pub fn from_motif(name: impl Into<String>, motif: &Motif) -> Result<Self> {
        let mut mosaic = Self::new(name, motif.build()?);
        mosaic.motif = Some(motif.clone());
        Ok(mosaic)
    }

    /// Replaces the map with a fresh build of the stored recipe. Returns
    /// `false` when there is no recipe.
    ///
    /// # Errors
    ///
    /// Returns the construction error if the recipe cannot be built; the
    /// current map is kept.
    pub fn rebuild(&mut self) -> Result<bool> {
        let Some(motif) = &self.motif else {
            return Ok(false);
        };
        self.map = motif.build()?;
        Ok(true)
    }

    /// Moves the whole map by a tile placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement collapses the map.
    pub fn place(&mut self, placement: Transform) -> Result<()> {
        GeneralTransform::new(placement).execute(&mut self.map)
    }
}

/// Serializes a mosaic to pretty-printed JSON.
///
/// Edge endpoints are written inline (`{"id", "x", "y"}`) the first time
/// and as `{"reference"}` afterwards, so a shared vertex reads back as one.
/// Vertices without edges follow the edge list.
///
/// # Errors
///
/// Returns an error if the map fails verification.
pub fn to_json(mosaic: &Mosaic) -> Result<String> {
    let doc = writer::to_document(mosaic)?;
    Ok(serde_json::to_string_pretty(&doc).map_err(PersistenceError::from)?)
}

/// Parses a mosaic from JSON.
///
/// # Errors
///
/// Returns an error for malformed JSON, an unsupported version, or an
/// unresolvable vertex id.
pub fn from_json(text: &str) -> Result<Mosaic> {
    let header: Header = serde_json::from_str(text).map_err(PersistenceError::from)?;
    if header.version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(header.version).into());
    }
    let doc: Document = serde_json::from_str(text).map_err(PersistenceError::from)?;
    reader::from_document(doc)
}

/// Writes a mosaic to a file.
///
/// # Errors
///
/// See [`to_json`]; also fails on I/O errors.
pub fn save(path: impl AsRef<Path>, mosaic: &Mosaic) -> Result<()> {
    let path = path.as_ref();
    let text = to_json(mosaic)?;
    fs::write(path, text).map_err(PersistenceError::from)?;
    debug!(path = %path.display(), name = %mosaic.name, "mosaic saved");
    Ok(())
}

/// Reads a mosaic from a file.
///
/// # Errors
///
/// See [`from_json`]; also fails on I/O errors.
pub fn load(path: impl AsRef<Path>) -> Result<Mosaic> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(PersistenceError::from)?;
    let mosaic = from_json(&text)?;
    debug!(path = %path.display(), name = %mosaic.name, "mosaic loaded");
    Ok(mosaic)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::RosaceError;
    use crate::motif::StarParams;

    #[test]
    fn fill_region_covers_every_repeat() {
        let fill = FillRegion {
            min: [0, -1],
            max: [1, 1],
        };
        let offsets = fill.translations(&Vector2::new(2.0, 0.0), &Vector2::new(0.0, 3.0));
        assert_eq!(offsets.len(), 6);
        assert_abs_diff_eq!(offsets[0].y, -3.0);
        assert_abs_diff_eq!(offsets[5].x, 2.0);
    }

    #[test]
    fn recipe_and_settings_survive_json() {
        let motif = Motif::Star(StarParams::new(8, 3.0, 2));
        let mut mosaic = Mosaic::from_motif("octagram", &motif).unwrap();
        mosaic.view.zoom = 2.5;
        mosaic.fill.max = [3, 2];
        let back = from_json(&to_json(&mosaic).unwrap()).unwrap();
        assert_eq!(back.name, "octagram");
        assert_eq!(back.view, mosaic.view);
        assert_eq!(back.fill, mosaic.fill);
        assert_eq!(back.motif, Some(motif));
        assert_eq!(back.map.vertex_count(), mosaic.map.vertex_count());
        assert_eq!(back.map.edge_count(), mosaic.map.edge_count());
    }

    #[test]
    fn other_versions_are_rejected() {
        let text = r#"{"version": 9, "name": "x"}"#;
        let err = from_json(text).unwrap_err();
        assert!(matches!(
            err,
            RosaceError::Persistence(PersistenceError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn placement_moves_the_map() {
        let mut mosaic = Mosaic::from_motif("hexagram", &Motif::Star(StarParams::new(6, 2.0, 1)))
            .unwrap();
        let placement = Transform::rotation_about(&Point2::origin(), FRAC_PI_2)
            .then(&Transform::translation(&Vector2::new(10.0, 0.0)));
        mosaic.place(placement).unwrap();
        let tip = mosaic
            .map
            .nearest_vertex(&Point2::new(10.0, 1.0), 1e-9)
            .unwrap();
        assert_eq!(mosaic.map.degree(tip).unwrap(), 2);
        assert!(mosaic.map.verify().is_ok());
    }

    #[test]
    fn rebuild_needs_a_recipe() {
        let mut mosaic = Mosaic::new("empty", Map::new());
        assert!(!mosaic.rebuild().unwrap());
        mosaic.motif = Some(Motif::Star(StarParams::new(5, 2.0, 1)));
        assert!(mosaic.rebuild().unwrap());
        assert_eq!(mosaic.map.vertex_count(), 10);
    }
}
