//! Serde model of the `icon.json` manifest.
//!
//! The on-disk fill is an object whose keys are mutually exclusive by
//! convention (`solid`, `linear-gradient` + `orientation`, or nothing at all).
//! [`FillSpec`] mirrors that shape for round-tripping; [`Fill`] is the resolved
//! sum type the renderer works with, so the fallback policy lives in one place.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "fill": { "solid": "srgb:1.00000,0.00000,0.00000,1.00000" },
//!   "groups": [
//!     {
//!       "layers": [
//!         {
//!           "image-name": "foreground.png",
//!           "name": "foreground",
//!           "position": { "scale": 1.0, "translation-in-points": [0.0, 0.0] }
//!         }
//!       ]
//!     }
//!   ],
//!   "supported-platforms": { "squares": "shared" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::color::{IconColor, parse_color};
use crate::error::Result;

/// Appearance tag of the dark-mode fill specialization.
pub const DARK_APPEARANCE: &str = "dark";

// ============================================================================
// Geometry
// ============================================================================

/// A point in canvas-fraction coordinates: (0, 0) is top-left, (1, 1) bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitPoint {
    pub x: f64,
    pub y: f64,
}

impl UnitPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Direction of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub start: UnitPoint,
    pub stop: UnitPoint,
}

// ============================================================================
// Fill (wire form)
// ============================================================================

/// A fill object as written in the manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FillDefinition {
    /// Gradient stop colors, evenly spaced.
    #[serde(rename = "linear-gradient", skip_serializing_if = "Option::is_none")]
    pub linear_gradient: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub solid: Option<String>,

    /// Older manifests spell the solid color as `color`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FillDefinition {
    /// A solid fill holding a manifest color string.
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            solid: Some(color.into()),
            ..Self::default()
        }
    }
}

/// The value of a `fill` key.
///
/// Icon Composer also writes keyword fills such as `"automatic"`; those carry
/// no color information and resolve to [`Fill::Absent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillSpec {
    Definition(FillDefinition),
    Keyword(String),
}

impl From<FillDefinition> for FillSpec {
    fn from(definition: FillDefinition) -> Self {
        Self::Definition(definition)
    }
}

/// An appearance-specific fill. A missing appearance means light/default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillSpecialization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    pub value: FillSpec,
}

// ============================================================================
// Fill (resolved)
// ============================================================================

/// A resolved background fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(IconColor),
    Gradient {
        stops: Vec<IconColor>,
        orientation: Orientation,
    },
    /// No usable fill; renders as opaque white.
    Absent,
}

impl TryFrom<&FillSpec> for Fill {
    type Error = crate::error::IconError;

    fn try_from(spec: &FillSpec) -> Result<Self> {
        let FillSpec::Definition(def) = spec else {
            return Ok(Fill::Absent);
        };

        if let (Some(stops), Some(orientation)) = (&def.linear_gradient, def.orientation) {
            if !stops.is_empty() {
                let stops = stops
                    .iter()
                    .map(|s| parse_color(s))
                    .collect::<Result<Vec<_>>>()?;
                return Ok(Fill::Gradient { stops, orientation });
            }
        }

        match def.solid.as_deref().or(def.color.as_deref()) {
            Some(color) => Ok(Fill::Solid(parse_color(color)?)),
            None => Ok(Fill::Absent),
        }
    }
}

// ============================================================================
// Layers and Groups
// ============================================================================

/// Placement of a layer: a scale relative to the asset's pixel size and a
/// pixel offset from the canvas center (positive y moves down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub scale: f64,
    #[serde(rename = "translation-in-points")]
    pub translation: [f64; 2],
}

impl Default for Position {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: [0.0, 0.0],
        }
    }
}

/// One image asset placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// File name inside the bundle's `Assets/` directory.
    #[serde(rename = "image-name")]
    pub image_name: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub position: Position,
}

impl Layer {
    /// A layer drawn at its natural size, centered.
    pub fn new(image_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            name: name.into(),
            position: Position::default(),
        }
    }
}

/// Parsed for completeness; not used when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub kind: String,
    pub opacity: f64,
}

/// Parsed for completeness; not used when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translucency {
    pub enabled: bool,
    pub value: f64,
}

/// An ordered set of layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub layers: Vec<Layer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub translucency: Option<Translucency>,
}

// ============================================================================
// Manifest
// ============================================================================

/// The `icon.json` document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillSpec>,

    #[serde(
        rename = "fill-specializations",
        skip_serializing_if = "Option::is_none"
    )]
    pub fill_specializations: Option<Vec<FillSpecialization>>,

    #[serde(default)]
    pub groups: Vec<Group>,

    #[serde(
        rename = "supported-platforms",
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_platforms: Option<serde_json::Value>,
}

impl Manifest {
    /// Creates a manifest with a single group and no fill.
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            groups: vec![Group {
                layers,
                ..Group::default()
            }],
            ..Self::default()
        }
    }

    /// Sets a single top-level solid fill, removing any specializations.
    pub fn with_solid_fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(FillDefinition::solid(color).into());
        self.fill_specializations = None;
        self
    }

    /// Sets light and dark solid fills as specializations, removing any
    /// top-level fill. The light entry comes first and carries no appearance.
    pub fn with_appearance_fills(
        mut self,
        light: impl Into<String>,
        dark: impl Into<String>,
    ) -> Self {
        self.fill = None;
        self.fill_specializations = Some(vec![
            FillSpecialization {
                appearance: None,
                value: FillDefinition::solid(light).into(),
            },
            FillSpecialization {
                appearance: Some(DARK_APPEARANCE.to_string()),
                value: FillDefinition::solid(dark).into(),
            },
        ]);
        self
    }

    /// Sets `supported-platforms`.
    pub fn with_supported_platforms(mut self, platforms: serde_json::Value) -> Self {
        self.supported_platforms = Some(platforms);
        self
    }

    /// Resolves the background fill.
    ///
    /// A top-level `fill` wins. Otherwise the first specialization without an
    /// appearance is used, then the first specialization of any appearance.
    /// With none of these the fill is [`Fill::Absent`].
    pub fn resolve_fill(&self) -> Result<Fill> {
        let specializations = self.fill_specializations.as_deref().unwrap_or_default();

        let spec = self
            .fill
            .as_ref()
            .or_else(|| {
                specializations
                    .iter()
                    .find(|s| s.appearance.is_none())
                    .map(|s| &s.value)
            })
            .or_else(|| specializations.first().map(|s| &s.value));

        match spec {
            Some(spec) => Fill::try_from(spec),
            None => Ok(Fill::Absent),
        }
    }

    /// Iterates all layers in draw order: groups in order, layers in order.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.groups.iter().flat_map(|g| g.layers.iter())
    }

    /// Serializes to pretty-printed JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Deserializes a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconError;
    use palette::Srgb;

    const GRADIENT_MANIFEST: &str = r#"{
        "fill": {
            "linear-gradient": [
                "display-p3:0.00000,0.67451,0.92941,1.00000",
                "display-p3:0.03529,0.08235,0.20000,1.00000"
            ],
            "orientation": { "start": { "x": 0.5, "y": 0 }, "stop": { "x": 0.5, "y": 0.7 } }
        },
        "groups": [
            {
                "layers": [
                    {
                        "image-name": "layer.png",
                        "name": "layer",
                        "position": { "scale": 0.5, "translation-in-points": [10, -20] }
                    }
                ],
                "shadow": { "kind": "neutral", "opacity": 0.5 },
                "translucency": { "enabled": true, "value": 0.4 }
            }
        ],
        "supported-platforms": { "circles": ["watchOS"], "squares": "shared" }
    }"#;

    #[test]
    fn parses_gradient_manifest() {
        let manifest = Manifest::from_json(GRADIENT_MANIFEST).unwrap();

        let Fill::Gradient { stops, orientation } = manifest.resolve_fill().unwrap() else {
            panic!("expected gradient fill");
        };
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].to_hex(), "#00ACED");
        assert_eq!(orientation.stop, UnitPoint::new(0.5, 0.7));

        let layer = manifest.layers().next().unwrap();
        assert_eq!(layer.image_name, "layer.png");
        assert_eq!(layer.position.scale, 0.5);
        assert_eq!(layer.position.translation, [10.0, -20.0]);

        let group = &manifest.groups[0];
        assert_eq!(group.shadow.as_ref().unwrap().kind, "neutral");
        assert!(group.translucency.as_ref().unwrap().enabled);
    }

    #[test]
    fn empty_fill_object_is_absent() {
        let manifest = Manifest::from_json(r#"{ "fill": {}, "groups": [] }"#).unwrap();
        assert_eq!(manifest.resolve_fill().unwrap(), Fill::Absent);
    }

    #[test]
    fn missing_fill_and_groups_is_absent() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert_eq!(manifest.resolve_fill().unwrap(), Fill::Absent);
        assert_eq!(manifest.layers().count(), 0);
    }

    #[test]
    fn keyword_fill_is_absent() {
        let manifest = Manifest::from_json(r#"{ "fill": "automatic", "groups": [] }"#).unwrap();
        assert_eq!(manifest.resolve_fill().unwrap(), Fill::Absent);
    }

    #[test]
    fn gradient_without_orientation_falls_back_to_solid() {
        let manifest = Manifest::from_json(
            r#"{ "fill": { "linear-gradient": ["srgb:0,0,0,1"], "solid": "srgb:0,1,0,1" } }"#,
        )
        .unwrap();
        let Fill::Solid(color) = manifest.resolve_fill().unwrap() else {
            panic!("expected solid fill");
        };
        assert_eq!(color.rgb, Srgb::new(0, 255, 0));
    }

    #[test]
    fn legacy_color_key_is_solid() {
        let manifest =
            Manifest::from_json(r#"{ "fill": { "color": "srgb:0,0,1,1" } }"#).unwrap();
        assert!(matches!(manifest.resolve_fill().unwrap(), Fill::Solid(_)));
    }

    #[test]
    fn specialization_prefers_untagged_entry() {
        let manifest = Manifest::from_json(
            r#"{ "fill-specializations": [
                { "appearance": "dark", "value": { "solid": "srgb:0,0,0,1" } },
                { "value": { "solid": "srgb:1,1,1,1" } }
            ] }"#,
        )
        .unwrap();
        let Fill::Solid(color) = manifest.resolve_fill().unwrap() else {
            panic!("expected solid fill");
        };
        assert_eq!(color.to_hex(), "#FFFFFF");
    }

    #[test]
    fn specialization_falls_back_to_first_entry() {
        let manifest = Manifest::from_json(
            r#"{ "fill-specializations": [
                { "appearance": "dark", "value": { "solid": "srgb:0,0,0,1" } },
                { "appearance": "tinted", "value": { "solid": "srgb:1,1,1,1" } }
            ] }"#,
        )
        .unwrap();
        let Fill::Solid(color) = manifest.resolve_fill().unwrap() else {
            panic!("expected solid fill");
        };
        assert_eq!(color.to_hex(), "#000000");
    }

    #[test]
    fn top_level_fill_wins_over_specializations() {
        let manifest = Manifest::from_json(
            r#"{
                "fill": { "solid": "srgb:1,0,0,1" },
                "fill-specializations": [ { "value": { "solid": "srgb:0,0,1,1" } } ]
            }"#,
        )
        .unwrap();
        let Fill::Solid(color) = manifest.resolve_fill().unwrap() else {
            panic!("expected solid fill");
        };
        assert_eq!(color.to_hex(), "#FF0000");
    }

    #[test]
    fn malformed_fill_color_is_a_format_error() {
        let manifest =
            Manifest::from_json(r#"{ "fill": { "solid": "red" } }"#).unwrap();
        assert!(matches!(manifest.resolve_fill(), Err(IconError::Format(_))));
    }

    #[test]
    fn layer_position_defaults() {
        let manifest =
            Manifest::from_json(r#"{ "groups": [ { "layers": [ { "image-name": "a.png" } ] } ] }"#)
                .unwrap();
        let layer = manifest.layers().next().unwrap();
        assert_eq!(layer.position, Position::default());
        assert_eq!(layer.name, "");
    }

    #[test]
    fn solid_manifest_serializes_without_specializations() {
        let manifest = Manifest::new(vec![Layer::new("foreground.png", "foreground")])
            .with_solid_fill("srgb:1.00000,0.00000,0.00000,1.00000");
        let value: serde_json::Value =
            serde_json::from_str(&manifest.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["fill"]["solid"], "srgb:1.00000,0.00000,0.00000,1.00000");
        assert!(value.get("fill-specializations").is_none());
        assert!(value.get("supported-platforms").is_none());
        assert_eq!(value["groups"][0]["layers"][0]["image-name"], "foreground.png");
        assert_eq!(
            value["groups"][0]["layers"][0]["position"]["translation-in-points"],
            serde_json::json!([0.0, 0.0])
        );
        assert!(value["groups"][0].get("shadow").is_none());
    }

    #[test]
    fn appearance_fills_replace_top_level_fill() {
        let manifest = Manifest::new(Vec::new())
            .with_solid_fill("srgb:1,1,1,1")
            .with_appearance_fills("srgb:1,1,1,1", "srgb:0,0,0,1");
        let json = manifest.to_json_pretty().unwrap();
        assert!(json.ends_with("}\n"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("fill").is_none());
        let specs = value["fill-specializations"].as_array().unwrap();
        assert_eq!(specs.len(), 2);
        assert!(specs[0].get("appearance").is_none());
        assert_eq!(specs[1]["appearance"], "dark");
    }

    #[test]
    fn json_round_trip_preserves_manifest() {
        let manifest = Manifest::from_json(GRADIENT_MANIFEST).unwrap();
        let restored = Manifest::from_json(&manifest.to_json_pretty().unwrap()).unwrap();
        assert_eq!(restored, manifest);
    }
}
