mod connect;
mod extend;
mod replicate;

pub use connect::{Connect, ConnectReport};
pub use extend::Extend;
pub use replicate::{Replicate, UnitCopy};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConstructionError, Result};
use crate::math::{Point2, MERGE_TOLERANCE};
use crate::motif::{Motif, UnitMotif};
use crate::operations::modification::CleanseLevel;
use crate::topology::Map;

/// Construction stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildStage {
    Empty,
    UnitBuilt,
    Replicated,
    Connected,
    Final,
}

impl BuildStage {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::UnitBuilt => "unit built",
            Self::Replicated => "replicated",
            Self::Connected => "connected",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the connected figure is scaled about its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Normalization {
    /// Leave the unit-radius construction as it is.
    None,
    /// Scale so the farthest vertex lies at this distance.
    TipRadius(f64),
    /// Scale so the first edge of the unit has this length.
    EdgeLength(f64),
}

impl Default for Normalization {
    fn default() -> Self {
        Self::TipRadius(1.0)
    }
}

/// Options for the connect stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectOptions {
    /// Seam merge distance.
    pub tolerance: f64,
    pub normalization: Normalization,
    pub cleanse_level: CleanseLevel,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            tolerance: MERGE_TOLERANCE,
            normalization: Normalization::default(),
            cleanse_level: CleanseLevel::default(),
        }
    }
}

/// Builds a motif stage by stage.
///
/// `Empty -> UnitBuilt -> Replicated -> Connected -> Final`. Each stage
/// method fails with [`ConstructionError::InvalidStage`] when called out of
/// order; [`RadialBuilder::build`] runs whatever stages remain.
#[derive(Debug)]
pub struct RadialBuilder {
    motif: Motif,
    center: Point2,
    options: ConnectOptions,
    stage: BuildStage,
    unit: Option<UnitMotif>,
    copies: Vec<UnitCopy>,
    map: Map,
}

impl RadialBuilder {
    /// Creates a builder for `motif`, clamping its parameters.
    #[must_use]
    pub fn new(motif: &Motif) -> Self {
        let options = ConnectOptions::default();
        Self {
            motif: motif.clamped(),
            center: Point2::origin(),
            options,
            stage: BuildStage::Empty,
            unit: None,
            copies: Vec::new(),
            map: Map::with_tolerance(options.tolerance),
        }
    }

    /// Places the motif about `center` instead of the origin.
    #[must_use]
    pub fn with_center(mut self, center: Point2) -> Self {
        self.center = center;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ConnectOptions) -> Self {
        self.options = options;
        self.map = Map::with_tolerance(options.tolerance);
        self
    }

    /// The clamped motif being built.
    #[must_use]
    pub fn motif(&self) -> &Motif {
        &self.motif
    }

    #[must_use]
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    #[must_use]
    pub fn unit(&self) -> Option<&UnitMotif> {
        self.unit.as_ref()
    }

    /// The working map of the current stage.
    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// `Empty -> UnitBuilt`: builds the unit geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or a branch point cannot be
    /// located.
    pub fn build_unit(&mut self) -> Result<&UnitMotif> {
        self.require_stage(BuildStage::Empty)?;
        let unit = self.motif.build_unit()?;
        self.advance(BuildStage::UnitBuilt);
        Ok(self.unit.insert(unit))
    }

    /// `UnitBuilt -> Replicated`: places every copy of the unit, returning
    /// the number of copies.
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order.
    pub fn replicate(&mut self) -> Result<usize> {
        self.require_stage(BuildStage::UnitBuilt)?;
        let unit = self.unit.as_ref().ok_or(ConstructionError::InvalidStage {
            expected: BuildStage::UnitBuilt.name(),
            found: self.stage.name(),
        })?;
        self.copies = Replicate::new(&unit.map, self.center, unit.folds, unit.reflective)
            .execute(&mut self.map)?;
        self.advance(BuildStage::Replicated);
        Ok(self.copies.len())
    }

    /// `Replicated -> Connected`: reflects, normalizes, merges and cleanses.
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order or the cleanse leaves
    /// defects; the working map stays available for inspection.
    pub fn connect(&mut self) -> Result<ConnectReport> {
        self.require_stage(BuildStage::Replicated)?;
        let mut options = self.options;
        if !self.motif.is_reflective() {
            // Irregular stars keep the size of their tile.
            options.normalization = Normalization::None;
        }
        let report = Connect::new(&self.copies, self.center, self.motif.folds(), options)
            .execute(&mut self.map)?;
        self.advance(BuildStage::Connected);
        Ok(report)
    }

    /// `Connected -> Final`: applies the extension of extended families and
    /// verifies the result. Returns the number of rays extended.
    ///
    /// # Errors
    ///
    /// Returns an error if called out of order, the extension fails, or the
    /// final map is invalid.
    pub fn finish(&mut self) -> Result<usize> {
        self.require_stage(BuildStage::Connected)?;
        let extended = match self.motif.extension() {
            Some(extension) => {
                Extend::new(extension, self.center, self.options.tolerance).execute(&mut self.map)?
            }
            None => 0,
        };
        self.map.verify()?;
        self.advance(BuildStage::Final);
        Ok(extended)
    }

    /// Runs the remaining stages and returns the finished map.
    ///
    /// # Errors
    ///
    /// Returns the first stage error.
    pub fn build(mut self) -> Result<Map> {
        if self.stage == BuildStage::Empty {
            self.build_unit()?;
        }
        if self.stage == BuildStage::UnitBuilt {
            self.replicate()?;
        }
        if self.stage == BuildStage::Replicated {
            self.connect()?;
        }
        if self.stage == BuildStage::Connected {
            self.finish()?;
        }
        self.into_map()
    }

    /// Takes the finished map.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::InvalidStage`] before the final stage.
    pub fn into_map(self) -> Result<Map> {
        self.require_stage(BuildStage::Final)?;
        Ok(self.map)
    }

    fn require_stage(&self, expected: BuildStage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ConstructionError::InvalidStage {
                expected: expected.name(),
                found: self.stage.name(),
            }
            .into())
        }
    }

    fn advance(&mut self, to: BuildStage) {
        debug!(motif = self.motif.name(), from = %self.stage, %to, "stage transition");
        self.stage = to;
    }
}

impl Motif {
    /// Builds the finished map of this motif about the origin with default
    /// options.
    ///
    /// # Errors
    ///
    /// Returns the first construction error.
    pub fn build(&self) -> Result<Map> {
        RadialBuilder::new(self).build()
    }
}
