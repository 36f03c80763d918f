use std::f32::consts::TAU;
use std::fmt;

use blake3::Hasher;
use glam::{Vec2, Vec3};

/// Half extent of the square base of the pointer beam.
pub const BEAM_HALF_SIZE: f32 = 0.004;
/// Local Z coordinate of the beam tip. The beam points down -Z.
pub const BEAM_LENGTH: f32 = -1.0;
/// Perimeter segments used for handle disks.
pub const DEFAULT_DISK_SIDES: u32 = 30;

/// Hash of the flattened triangle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHash(pub [u8; 32]);

impl fmt::Display for MeshHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Interleaved vertex produced when flattening faces into triangles.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in mesh-local coordinates.
    pub position: [f32; 3],
    /// Normal looked up through the face's normal index.
    pub normal: [f32; 3],
    /// Texture coordinates; zero for faces without UVs.
    pub uv: [f32; 2],
}

/// A polygon referencing the mesh arrays.
///
/// The three index lists run in parallel: entry `i` of each list describes
/// corner `i` of the polygon. `uvs` may be empty for untextured faces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Face {
    /// Indices into [`MeshBuffers::positions`].
    pub vertices: Vec<u32>,
    /// Indices into [`MeshBuffers::uvs`].
    pub uvs: Vec<u32>,
    /// Indices into [`MeshBuffers::normals`].
    pub normals: Vec<u32>,
}

impl Face {
    fn new(vertices: Vec<u32>, uvs: Vec<u32>, normals: Vec<u32>) -> Self {
        Self {
            vertices,
            uvs,
            normals,
        }
    }
}

/// Separate position/normal/UV arrays plus indexed faces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshBuffers {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Normal pool referenced by faces.
    pub normals: Vec<Vec3>,
    /// Texture coordinate pool referenced by faces.
    pub uvs: Vec<Vec2>,
    /// Polygons, wound counter-clockwise when seen from their normal.
    pub faces: Vec<Face>,
}

impl MeshBuffers {
    /// Construct an empty mesh.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of triangles after fan triangulation of every face.
    pub fn triangle_count(&self) -> usize {
        self.faces
            .iter()
            .map(|face| face.vertices.len().saturating_sub(2))
            .sum()
    }

    /// Flatten every face into a triangle list.
    pub fn triangles(&self) -> Vec<MeshVertex> {
        let mut out = Vec::with_capacity(self.triangle_count() * 3);
        for face in &self.faces {
            let corners = face.vertices.len();
            for k in 1..corners.saturating_sub(1) {
                for corner in [0, k, k + 1] {
                    out.push(self.corner(face, corner));
                }
            }
        }
        out
    }

    /// Stable digest of the triangle list.
    pub fn hash(&self) -> MeshHash {
        let vertices = self.triangles();
        let mut hasher = Hasher::new();
        hasher.update(bytemuck::cast_slice(&vertices));
        MeshHash(*hasher.finalize().as_bytes())
    }

    fn corner(&self, face: &Face, corner: usize) -> MeshVertex {
        let lookup = |indices: &[u32]| indices.get(corner).map(|index| *index as usize);
        let position = lookup(&face.vertices)
            .and_then(|index| self.positions.get(index))
            .copied()
            .unwrap_or(Vec3::ZERO);
        let normal = lookup(&face.normals)
            .and_then(|index| self.normals.get(index))
            .copied()
            .unwrap_or(Vec3::ZERO);
        let uv = lookup(&face.uvs)
            .and_then(|index| self.uvs.get(index))
            .copied()
            .unwrap_or(Vec2::ZERO);
        MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }
}

/// Build a double-sided rectangle spanning `min` to `max`.
///
/// Texture origin is top-left, so `min` maps to UV (0, 1) and `max` to (1, 0).
/// The back face shares the vertices and uses the negated normal.
pub fn build_quad_mesh(min: Vec3, max: Vec3) -> MeshBuffers {
    let bottom_right = Vec3::new(max.x, min.y, min.z);
    let top_left = Vec3::new(min.x, max.y, max.z);
    let normal = (bottom_right - min).cross(max - min).normalize_or_zero();

    MeshBuffers {
        positions: vec![min, bottom_right, max, top_left],
        normals: vec![normal, -normal],
        uvs: vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ],
        faces: vec![
            Face::new(vec![0, 1, 2, 3], vec![0, 1, 2, 3], vec![0; 4]),
            Face::new(vec![0, 3, 2, 1], vec![0, 3, 2, 1], vec![1; 4]),
        ],
    }
}

/// Build the pyramid used as the laser pointer.
///
/// The base sits on local Z = 0 and the tip at [`BEAM_LENGTH`]; per-controller
/// beam transforms scale and orient it.
pub fn build_beam_mesh() -> MeshBuffers {
    let h = BEAM_HALF_SIZE;
    MeshBuffers {
        positions: vec![
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
            Vec3::new(0.0, 0.0, BEAM_LENGTH),
        ],
        normals: vec![
            Vec3::new(-1.0, -1.0, 0.0).normalize(),
            Vec3::new(1.0, -1.0, 0.0).normalize(),
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::new(-1.0, 1.0, 0.0).normalize(),
            Vec3::NEG_Z,
        ],
        uvs: Vec::new(),
        faces: [[1, 0, 4], [2, 1, 4], [3, 2, 4], [0, 3, 4]]
            .into_iter()
            .map(|tri| Face::new(tri.to_vec(), Vec::new(), tri.to_vec()))
            .collect(),
    }
}

/// Build a flat disk in the local XY plane, triangulated as a fan.
pub fn build_handle_disk(radius: f32, sides: u32) -> MeshBuffers {
    debug_assert!(sides >= 3, "a disk needs at least three sides");
    let sides = sides.max(3);
    let delta = TAU / sides as f32;

    let mut positions = Vec::with_capacity(sides as usize + 1);
    positions.push(Vec3::ZERO);
    for i in 0..sides {
        let angle = delta * i as f32;
        positions.push(Vec3::new(radius * angle.cos(), radius * angle.sin(), 0.0));
    }

    let mut faces: Vec<Face> = (1..sides)
        .map(|i| Face::new(vec![0, i, i + 1], Vec::new(), vec![0; 3]))
        .collect();
    faces.push(Face::new(vec![0, sides, 1], Vec::new(), vec![0; 3]));

    MeshBuffers {
        positions,
        normals: vec![Vec3::Z],
        uvs: Vec::new(),
        faces,
    }
}
