//! Geometry Tests
//!
//! Tests for:
//! - Packed binary decoding and its error cases
//! - Composite concatenation with index rebasing
//! - Generated grid / triangle data
//! - Geometry kinds, sources and cache keys

use folio::errors::FolioError;
use folio::renderer::AssetPaths;
use folio::resources::{
    FLOATS_PER_VERTEX, GeometryCounts, GeometryData, GeometryKey, GeometryKind, GeometrySource,
};

fn quad(z: f32) -> GeometryData {
    let mut vertices = Vec::new();
    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
        vertices.extend_from_slice(&[x, y, z, x, y, 0.0, 0.0, 1.0]);
    }
    GeometryData {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

fn encode(vertex_len: i32, vertices: &[f32], indices: &[u16]) -> Vec<u8> {
    let mut bytes = vertex_len.to_le_bytes().to_vec();
    for v in vertices {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    for i in indices {
        bytes.extend_from_slice(&i.to_le_bytes());
    }
    bytes
}

// ============================================================================
// Binary format
// ============================================================================

#[test]
fn parse_reads_header_vertices_and_indices() {
    let source = quad(0.5);
    let bytes = encode(
        (source.vertices.len() * 4) as i32,
        &source.vertices,
        &source.indices,
    );

    let parsed = GeometryData::parse(&bytes).unwrap();
    assert_eq!(parsed, source);
    assert_eq!(parsed.counts(), GeometryCounts { vertices: 4, indices: 6 });
}

#[test]
fn to_bytes_matches_hand_encoding() {
    let source = quad(0.0);
    let expected = encode(128, &source.vertices, &source.indices);
    assert_eq!(source.to_bytes(), expected);
}

#[test]
fn parse_accepts_geometry_without_indices() {
    let vertices = [0.0_f32; 16];
    let parsed = GeometryData::parse(&encode(64, &vertices, &[])).unwrap();
    assert_eq!(parsed.vertex_count(), 2);
    assert!(parsed.indices.is_empty());
    assert_eq!(parsed.counts().advance(), 2);
}

#[test]
fn parse_rejects_missing_header() {
    assert!(matches!(
        GeometryData::parse(&[1, 2]),
        Err(FolioError::GeometryDecode(_))
    ));
}

#[test]
fn parse_rejects_negative_length() {
    let bytes = encode(-4, &[], &[]);
    assert!(matches!(GeometryData::parse(&bytes), Err(FolioError::GeometryDecode(_))));
}

#[test]
fn parse_rejects_length_past_end() {
    let bytes = encode(64, &[1.0, 2.0], &[]);
    assert!(matches!(GeometryData::parse(&bytes), Err(FolioError::GeometryDecode(_))));
}

#[test]
fn parse_rejects_misaligned_data() {
    let mut bytes = encode(6, &[1.0, 2.0], &[]);
    assert!(GeometryData::parse(&bytes).is_err());

    bytes = encode(8, &[1.0, 2.0], &[]);
    bytes.push(0);
    assert!(GeometryData::parse(&bytes).is_err());
}

// ============================================================================
// Concatenation
// ============================================================================

#[test]
fn concat_rebases_indices_by_preceding_vertices() {
    let a = quad(0.0);
    let b = GeometryData::triangle();
    let c = quad(1.0);
    let merged = GeometryData::concat(&[a.clone(), b.clone(), c.clone()]).unwrap();

    assert_eq!(merged.vertex_count(), 4 + 3 + 4);
    assert_eq!(merged.indices.len(), 6 + 3 + 6);
    assert_eq!(&merged.indices[6..9], &[4, 5, 6]);
    assert_eq!(&merged.indices[9..], &[7, 8, 9, 7, 9, 10]);
}

#[test]
fn concat_splits_back_into_parts() {
    let parts = [quad(0.0), GeometryData::triangle(), quad(2.0)];
    let merged = GeometryData::concat(&parts).unwrap();

    let mut vertex_base = 0;
    let mut index_base = 0;
    for part in &parts {
        let n = part.indices.len();
        let restored: Vec<u16> = merged.indices[index_base..index_base + n]
            .iter()
            .map(|&i| i - vertex_base as u16)
            .collect();
        assert_eq!(restored, part.indices);

        let floats = part.vertices.len();
        let start = vertex_base * FLOATS_PER_VERTEX;
        assert_eq!(&merged.vertices[start..start + floats], part.vertices.as_slice());

        vertex_base += part.vertex_count();
        index_base += n;
    }
}

#[test]
fn concat_of_nothing_is_empty() {
    let merged = GeometryData::concat(&[]).unwrap();
    assert_eq!(merged, GeometryData::default());
}

#[test]
fn concat_reports_index_overflow() {
    let big = GeometryData {
        vertices: vec![0.0; 40_000 * FLOATS_PER_VERTEX],
        indices: vec![39_999],
    };
    let result = GeometryData::concat(&[big.clone(), big]);
    assert!(matches!(result, Err(FolioError::GeometryDecode(_))));
}

// ============================================================================
// Generated geometry
// ============================================================================

#[test]
fn grid_indices_are_identity_sequence() {
    let grid = GeometryData::grid(1.3, 1.5, 7.0).unwrap();

    assert!(!grid.vertices.is_empty());
    assert_eq!(grid.vertices.len() % FLOATS_PER_VERTEX, 0);
    assert_eq!(grid.indices.len(), grid.vertex_count());
    for (i, &index) in grid.indices.iter().enumerate() {
        assert_eq!(usize::from(index), i);
    }
}

#[test]
fn grid_lines_come_in_pairs_on_the_floor() {
    let grid = GeometryData::grid(1.3, 1.5, 7.0).unwrap();
    assert_eq!(grid.vertex_count() % 2, 0);
    for v in grid.vertices.chunks_exact(FLOATS_PER_VERTEX) {
        assert_eq!(v[1], 0.0);
        assert!(v[0].abs() <= 1.3 + 1e-5);
        assert!(v[2].abs() <= 1.5 + 1e-5);
    }
}

#[test]
fn grid_with_zero_step_is_empty() {
    let grid = GeometryData::grid(1.0, 1.0, 0.0).unwrap();
    assert!(grid.vertices.is_empty());
    assert!(grid.indices.is_empty());
}

#[test]
fn grid_beyond_u16_indices_is_rejected() {
    // Spacing 5e-5 over [-1, 1] gives ~160k vertices.
    let result = GeometryData::grid(1.0, 1.0, 20_000.0);
    assert!(matches!(result, Err(FolioError::GeometryDecode(_))));
    assert!(matches!(
        GeometryKind::grid(1.0, 1.0, 20_000.0).source(&AssetPaths::default()),
        Err(FolioError::GeometryDecode(_))
    ));
}

#[test]
fn grid_at_the_index_limit_keeps_identity_indices() {
    // x_max / y_max / step = 0.5, so 5 lines each way: 20 vertices.
    let grid = GeometryData::grid(1.0, 1.0, 2.0).unwrap();
    assert_eq!(grid.vertex_count(), 20);
    assert_eq!(grid.indices.last().copied(), Some(19));
}

#[test]
fn triangle_has_three_indexed_vertices() {
    let t = GeometryData::triangle();
    assert_eq!(t.counts(), GeometryCounts { vertices: 3, indices: 3 });
    assert_eq!(t.indices, vec![0, 1, 2]);
}

// ============================================================================
// Kinds & keys
// ============================================================================

#[test]
fn counts_advance_prefers_indices() {
    assert_eq!(GeometryCounts { vertices: 10, indices: 12 }.advance(), 12);
    assert_eq!(GeometryCounts { vertices: 10, indices: 0 }.advance(), 10);

    let sum = GeometryCounts { vertices: 1, indices: 2 } + GeometryCounts { vertices: 3, indices: 4 };
    assert_eq!(sum, GeometryCounts { vertices: 4, indices: 6 });
}

#[test]
fn model_kinds_resolve_to_asset_urls() {
    let paths = AssetPaths::default();
    assert_eq!(
        GeometryKind::Sphere.source(&paths).unwrap(),
        GeometrySource::Url(paths.sphere.clone())
    );
    // Background reuses the circle model.
    assert_eq!(
        GeometryKind::Background.source(&paths).unwrap(),
        GeometryKind::Circle.source(&paths).unwrap()
    );
    assert_ne!(GeometryKind::Background, GeometryKind::Circle);
}

#[test]
fn generated_kinds_are_inline() {
    let paths = AssetPaths::default();
    assert_eq!(
        GeometryKind::Triangle.source(&paths).unwrap(),
        GeometrySource::Inline(GeometryData::triangle())
    );
    assert_eq!(
        GeometryKind::grid(1.3, 1.5, 7.0).source(&paths).unwrap(),
        GeometrySource::Inline(GeometryData::grid(1.3, 1.5, 7.0).unwrap())
    );
}

#[test]
fn grid_kind_is_keyed_by_exact_parameters() {
    assert_eq!(GeometryKind::grid(1.3, 1.5, 7.0), GeometryKind::grid(1.3, 1.5, 7.0));
    assert_ne!(GeometryKind::grid(1.3, 1.5, 7.0), GeometryKind::grid(1.3, 1.5, 8.0));
}

#[test]
fn composite_keys_depend_on_child_order() {
    let a = GeometryKey::Composite(vec![
        GeometryKey::Shape(GeometryKind::Sphere),
        GeometryKey::Shape(GeometryKind::Circle),
    ]);
    let b = GeometryKey::Composite(vec![
        GeometryKey::Shape(GeometryKind::Circle),
        GeometryKey::Shape(GeometryKind::Sphere),
    ]);
    assert_ne!(a, b);
    assert_eq!(a.clone(), a);
}
