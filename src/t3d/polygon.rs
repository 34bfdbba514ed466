use std::fmt;

use crate::math::Vec3;

use super::primitives::Point;

/// Polygon flags written for every brush face.
pub const POLY_FLAGS: u32 = 3584;

/// One planar brush face in export space.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub origin: Vec3,
    pub normal: Vec3,
    pub texture_u: Vec3,
    pub texture_v: Vec3,
    /// Winding already reversed for the engine.
    pub vertices: Vec<Vec3>,
    /// Fully qualified material path.
    pub texture: Option<String>,
    /// Brush-local group index for faces without an explicit texture.
    pub link: Option<u32>,
    pub flags: u32,
}

impl Polygon {
    pub fn new(origin: Vec3, normal: Vec3, texture_u: Vec3, texture_v: Vec3, vertices: Vec<Vec3>) -> Self {
        Polygon {
            origin,
            normal,
            texture_u,
            texture_v,
            vertices,
            texture: None,
            link: None,
            flags: POLY_FLAGS,
        }
    }
}

impl fmt::Display for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Begin Polygon")?;
        if let Some(texture) = &self.texture {
            write!(f, " Texture={texture}")?;
        }
        write!(f, " Flags={}", self.flags)?;
        if let Some(link) = self.link {
            write!(f, " Link={link}")?;
        }
        f.write_str("\n")?;

        writeln!(f, "\tOrigin   {}", Point(self.origin))?;
        writeln!(f, "\tNormal   {}", Point(self.normal))?;
        writeln!(f, "\tTextureU {}", Point(self.texture_u))?;
        writeln!(f, "\tTextureV {}", Point(self.texture_v))?;
        for v in &self.vertices {
            writeln!(f, "\tVertex   {}", Point(*v))?;
        }
        f.write_str("End Polygon\n")
    }
}

/// Number untextured polygons 0, 1, 2... in list order; textured ones get no link.
pub fn assign_links(polygons: &mut [Polygon]) {
    let mut link = 0;
    for poly in polygons.iter_mut() {
        if poly.texture.is_some() {
            poly.link = None;
        } else {
            poly.link = Some(link);
            link += 1;
        }
    }
}
