//! GPU geometry loading.
//!
//! [`GeometryLoader`] turns a [`GeometryPlan`] into uploaded buffers. Leaf
//! geometries are fetched (or generated) once per [`GeometryKind`];
//! composites are built once per [`GeometryKey`] by reading their children's
//! buffers back, concatenating them and uploading the result. Both go
//! through the same [`LoadCache`], so concurrent requests share one upload.

use std::rc::Rc;

use futures::FutureExt;
use futures::future::{LocalBoxFuture, try_join_all};
use web_sys::WebGl2RenderingContext as Gl;

use crate::assets::fetch_bytes;
use crate::errors::Result;
use crate::renderer::gl::{GpuGeometry, read_back_geometry, upload_geometry};
use crate::renderer::settings::AssetPaths;
use crate::resources::{GeometryCounts, GeometryData, GeometryKey, GeometryKind, GeometrySource, LoadCache, SharedLoad};
use crate::scene::{DrawableId, GeometryPlan};

/// Buffers for one planned drawable plus the element counts of every
/// drawable in its tree.
#[derive(Debug, Clone)]
pub struct Realized {
    pub geometry: Rc<GpuGeometry>,
    /// Children first, the planned drawable last.
    pub counts: Vec<(DrawableId, GeometryCounts)>,
}

pub struct GeometryLoader {
    gl: Gl,
    paths: Rc<AssetPaths>,
    cache: LoadCache<GeometryKey, Rc<GpuGeometry>>,
}

impl GeometryLoader {
    #[must_use]
    pub fn new(gl: Gl, paths: AssetPaths) -> Self {
        Self {
            gl,
            paths: Rc::new(paths),
            cache: LoadCache::new(),
        }
    }

    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Uploads (or reuses) everything `plan` needs.
    pub fn realize(self: &Rc<Self>, plan: GeometryPlan) -> LocalBoxFuture<'static, Result<Realized>> {
        let loader = Rc::clone(self);
        async move {
            match plan {
                GeometryPlan::Leaf { id, kind } => {
                    let geometry = loader.leaf(kind).await?;
                    Ok(Realized {
                        counts: vec![(id, geometry.counts)],
                        geometry,
                    })
                }
                GeometryPlan::Group { id, key, children } => {
                    let parts = try_join_all(children.into_iter().map(|child| loader.realize(child))).await?;

                    let mut counts = Vec::new();
                    let mut total = GeometryCounts::default();
                    for part in &parts {
                        total = total + part.geometry.counts;
                        counts.extend(part.counts.iter().copied());
                    }
                    counts.push((id, total));

                    let sources: Vec<Rc<GpuGeometry>> = parts.into_iter().map(|p| p.geometry).collect();
                    let gl = loader.gl.clone();
                    let geometry = loader
                        .cache
                        .get_or_load(key, move || async move { merge(&gl, &sources) })
                        .await?;
                    Ok(Realized { geometry, counts })
                }
            }
        }
        .boxed_local()
    }

    fn leaf(&self, kind: GeometryKind) -> SharedLoad<Rc<GpuGeometry>> {
        let gl = self.gl.clone();
        let paths = Rc::clone(&self.paths);
        self.cache.get_or_load(GeometryKey::Shape(kind), move || async move {
            let data = match kind.source(&paths)? {
                GeometrySource::Url(url) => {
                    let bytes = fetch_bytes(&url).await?;
                    GeometryData::parse(&bytes)?
                }
                GeometrySource::Inline(data) => data,
            };
            log::debug!("Uploading {kind:?}: {:?}", data.counts());
            upload_geometry(&gl, &data).map(Rc::new)
        })
    }
}

fn merge(gl: &Gl, sources: &[Rc<GpuGeometry>]) -> Result<Rc<GpuGeometry>> {
    let parts = sources
        .iter()
        .map(|g| read_back_geometry(gl, g))
        .collect::<Result<Vec<_>>>()?;
    let merged = GeometryData::concat(&parts)?;
    upload_geometry(gl, &merged).map(Rc::new)
}
