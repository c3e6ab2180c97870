//! Material.

use serde::{Deserialize, Serialize};

/// Phong material record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    /// Identity: persistent unique id or synthesized fingerprint.
    pub uuid: String,
    /// Name, only known for authored materials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Material type, always `"MeshPhongMaterial"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Packed 24-bit RGB.
    pub color: u32,
    /// Ambient.
    pub ambient: u32,
    /// Emissive.
    pub emissive: u32,
    /// Specular.
    pub specular: u32,
    /// Shininess.
    pub shininess: u32,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f64,
    /// Whether the material is transparent.
    pub transparent: bool,
    /// Wireframe.
    pub wireframe: bool,
}

impl MaterialRecord {
    /// Creates a new phong material.
    ///
    /// Ambient and specular follow the diffuse color. `transparent` comes
    /// from the source transparency, not from `opacity`, which may round to
    /// `1.0` for tiny transparencies.
    pub fn phong(
        uuid: impl Into<String>,
        name: Option<String>,
        color: u32,
        opacity: f64,
        transparent: bool,
        shininess: u32,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name,
            kind: "MeshPhongMaterial".to_owned(),
            color,
            ambient: color,
            emissive: 0,
            specular: color,
            shininess,
            opacity,
            transparent,
            wireframe: false,
        }
    }
}
