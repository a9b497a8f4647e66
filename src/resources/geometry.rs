//! CPU-side geometry data.
//!
//! Model assets use a small packed binary format (little-endian):
//!
//! ```text
//! int32   vertex_byte_length
//! f32[]   vertex data       (8 floats per vertex: xyz, uv, normal xyz)
//! u16[]   index data        (the rest of the buffer)
//! ```
//!
//! [`GeometryKind`] names each distinct geometry so GPU uploads can be shared
//! between every shape of that kind; [`GeometryKey`] extends this to
//! composites by the ordered list of their children's keys.

use crate::errors::{FolioError, Result};
use crate::renderer::settings::AssetPaths;

/// Floats per vertex: position (3), uv (2), normal (3).
pub const FLOATS_PER_VERTEX: usize = 8;

/// Bytes per vertex.
pub const VERTEX_STRIDE: i32 = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as i32;

const HEADER_LEN: usize = 4;

// ============================================================================
// GeometryCounts
// ============================================================================

/// Element counts of an uploaded geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeometryCounts {
    /// Number of vertices (not floats).
    pub vertices: usize,
    pub indices: usize,
}

impl GeometryCounts {
    /// How far a sibling's index range starts after this one in a shared buffer.
    #[inline]
    #[must_use]
    pub fn advance(&self) -> usize {
        if self.indices > 0 { self.indices } else { self.vertices }
    }
}

impl std::ops::Add for GeometryCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            vertices: self.vertices + rhs.vertices,
            indices: self.indices + rhs.indices,
        }
    }
}

// ============================================================================
// GeometryData
// ============================================================================

/// Interleaved vertices plus a u16 index list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl GeometryData {
    /// Decodes the packed binary format.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header: [u8; HEADER_LEN] = bytes
            .get(..HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| FolioError::GeometryDecode("missing length header".into()))?;
        let vertex_len = i32::from_le_bytes(header);
        let vertex_len = usize::try_from(vertex_len).map_err(|_| {
            FolioError::GeometryDecode(format!("negative vertex length {vertex_len}"))
        })?;

        let body = &bytes[HEADER_LEN..];
        if vertex_len > body.len() {
            return Err(FolioError::GeometryDecode(format!(
                "vertex length {vertex_len} exceeds payload of {} bytes",
                body.len()
            )));
        }
        if vertex_len % 4 != 0 {
            return Err(FolioError::GeometryDecode(format!(
                "vertex length {vertex_len} is not a multiple of 4"
            )));
        }

        let (vertex_bytes, index_bytes) = body.split_at(vertex_len);
        if index_bytes.len() % 2 != 0 {
            return Err(FolioError::GeometryDecode(format!(
                "index data of {} bytes is not a multiple of 2",
                index_bytes.len()
            )));
        }

        let vertices = vertex_bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let indices = index_bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();

        Ok(Self { vertices, indices })
    }

    /// Encodes into the packed binary format.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let vertex_len = self.vertices.len() * std::mem::size_of::<f32>();
        let mut out = Vec::with_capacity(HEADER_LEN + vertex_len + self.indices.len() * 2);
        out.extend_from_slice(&(vertex_len as i32).to_le_bytes());
        for v in &self.vertices {
            out.extend_from_slice(&v.to_le_bytes());
        }
        for i in &self.indices {
            out.extend_from_slice(&i.to_le_bytes());
        }
        out
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    #[inline]
    #[must_use]
    pub fn counts(&self) -> GeometryCounts {
        GeometryCounts {
            vertices: self.vertex_count(),
            indices: self.indices.len(),
        }
    }

    /// Joins `parts` into one buffer, rebasing each part's indices by the
    /// number of vertices that precede it.
    pub fn concat(parts: &[GeometryData]) -> Result<Self> {
        let mut out = GeometryData {
            vertices: Vec::with_capacity(parts.iter().map(|p| p.vertices.len()).sum()),
            indices: Vec::with_capacity(parts.iter().map(|p| p.indices.len()).sum()),
        };

        for part in parts {
            let base = out.vertex_count();
            for &index in &part.indices {
                let rebased = u16::try_from(base + usize::from(index)).map_err(|_| {
                    FolioError::GeometryDecode(format!(
                        "rebased index {} overflows u16",
                        base + usize::from(index)
                    ))
                })?;
                out.indices.push(rebased);
            }
            out.vertices.extend_from_slice(&part.vertices);
        }

        Ok(out)
    }

    /// Line-list grid on the y = 0 plane spanning `[-x_max, x_max] × [-y_max, y_max]`.
    ///
    /// The line spacing is `x_max / y_max / step`. Indices are `0..N`.
    /// Fails when `N` exceeds what a `u16` index list can address.
    pub fn grid(x_max: f32, y_max: f32, step: f32) -> Result<Self> {
        let (x_max, y_max) = (f64::from(x_max), f64::from(y_max));
        let step = x_max / y_max / f64::from(step);
        let mut vertices = Vec::new();

        if step > 0.0 && step.is_finite() {
            let mut x = -x_max;
            while x <= x_max {
                push_grid_vertex(&mut vertices, x, -y_max);
                push_grid_vertex(&mut vertices, x, y_max);
                x += step;
            }
            let mut y = -y_max;
            while y <= y_max {
                push_grid_vertex(&mut vertices, -x_max, y);
                push_grid_vertex(&mut vertices, x_max, y);
                y += step;
            }
        }

        let count = vertices.len() / FLOATS_PER_VERTEX;
        if count > usize::from(u16::MAX) + 1 {
            return Err(FolioError::GeometryDecode(format!(
                "grid has {count} vertices, more than u16 indices can address"
            )));
        }
        let indices = (0..count).map(|i| i as u16).collect();
        Ok(Self { vertices, indices })
    }

    /// Single red-facing test triangle.
    #[must_use]
    pub fn triangle() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            // x,    y,   z,   u,   v,   nx,  ny,  nz
             0.0,  0.5, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
            -0.5, -0.5, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
             0.5, -0.5, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        ];
        Self {
            vertices,
            indices: vec![0, 1, 2],
        }
    }
}

fn push_grid_vertex(out: &mut Vec<f32>, x: f64, z: f64) {
    // xyz uv nxnynz
    out.extend_from_slice(&[x as f32, 0.0, z as f32, 0.0, 0.0, 0.6, 1.0, 1.0]);
}

// ============================================================================
// GeometryKind / GeometryKey
// ============================================================================

/// Every distinct leaf geometry. Shapes of the same kind share one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Sphere,
    Root,
    Circle,
    Background,
    Line,
    Plane,
    Triangle,
    /// Generated grid; parameters stored as `f32` bit patterns.
    Grid { x_max: u32, y_max: u32, step: u32 },
}

impl GeometryKind {
    #[must_use]
    pub fn grid(x_max: f32, y_max: f32, step: f32) -> Self {
        Self::Grid {
            x_max: x_max.to_bits(),
            y_max: y_max.to_bits(),
            step: step.to_bits(),
        }
    }

    /// Where this kind's vertex data comes from. Generated kinds are built
    /// here, so call it only when the data is actually needed.
    pub fn source(&self, paths: &AssetPaths) -> Result<GeometrySource> {
        Ok(match *self {
            Self::Sphere => GeometrySource::Url(paths.sphere.clone()),
            Self::Root => GeometrySource::Url(paths.root.clone()),
            Self::Circle | Self::Background => GeometrySource::Url(paths.circle.clone()),
            Self::Line => GeometrySource::Url(paths.line.clone()),
            Self::Plane => GeometrySource::Url(paths.plane.clone()),
            Self::Triangle => GeometrySource::Inline(GeometryData::triangle()),
            Self::Grid { x_max, y_max, step } => GeometrySource::Inline(GeometryData::grid(
                f32::from_bits(x_max),
                f32::from_bits(y_max),
                f32::from_bits(step),
            )?),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySource {
    /// Packed binary asset to fetch.
    Url(String),
    /// Generated on the CPU.
    Inline(GeometryData),
}

/// Cache key of an uploaded buffer pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GeometryKey {
    Shape(GeometryKind),
    /// Concatenation of the children's geometries, in order.
    Composite(Vec<GeometryKey>),
}
