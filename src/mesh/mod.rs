//! Triangle meshes built on the CPU and uploaded once per scene change.
//!
//! `MeshBuilder` keeps a transform stack and a current material so the
//! geometry routines can be written as nested, locally-placed parts the
//! same way a scene graph would describe them.

pub mod bezier;
pub mod primitives;
pub mod road;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3};

use crate::texture::TextureSlot;

/// Vertex data for lit scene geometry (position, normal, UV + material)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    /// Specular colour in rgb, shininess exponent in w
    pub specular: [f32; 4],
    pub emission: [f32; 3],
    /// Layer in the scene texture array (0 = plain white)
    pub texture: u32,
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x3,
        4 => Float32x3,
        5 => Float32x4,
        6 => Float32x3,
        7 => Uint32,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Surface reflectance, the per-vertex equivalent of a fixed-function material
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub emission: [f32; 3],
    pub texture: TextureSlot,
}

impl Material {
    pub const fn new(
        ambient: [f32; 3],
        diffuse: [f32; 3],
        specular: [f32; 3],
        shininess: f32,
    ) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
            emission: [0.0; 3],
            texture: TextureSlot::White,
        }
    }

    /// Material whose ambient is `ambient_scale` of the diffuse colour
    pub fn tinted(color: [f32; 3], ambient_scale: f32, specular: f32, shininess: f32) -> Self {
        Self::new(
            color.map(|c| c * ambient_scale),
            color,
            [specular; 3],
            shininess,
        )
    }

    /// Team-colour paint: ambient is the colour, diffuse is `boost` brighter
    pub fn paint(color: [f32; 3], boost: f32, specular: f32, shininess: f32) -> Self {
        Self::new(color, color.map(|c| c * boost), [specular; 3], shininess)
    }

    pub fn with_texture(mut self, texture: TextureSlot) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_emission(mut self, emission: [f32; 3]) -> Self {
        self.emission = emission;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([0.2; 3], [0.8; 3], [0.0; 3], 0.0)
    }
}

/// Indexed triangle list
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, rebasing its indices past our vertices
    pub fn append(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds of all vertices, `None` when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Geometry emitted under a transform stack and a current material
pub struct MeshBuilder {
    mesh: Mesh,
    transform: Mat4,
    normal_matrix: Mat3,
    stack: Vec<Mat4>,
    material: Material,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            mesh: Mesh::new(),
            transform: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
            stack: Vec::new(),
            material: Material::default(),
        }
    }

    /// Save the current transform
    pub fn push(&mut self) {
        self.stack.push(self.transform);
    }

    /// Restore the last saved transform (no-op on an empty stack)
    pub fn pop(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.set_transform(t);
        }
    }

    /// Run `f` between a push and a pop
    pub fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        self.push();
        f(self);
        self.pop();
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        let linear = Mat3::from_mat4(transform);
        self.normal_matrix = if linear.determinant().abs() > 1e-12 {
            linear.inverse().transpose()
        } else {
            linear
        };
    }

    pub fn multiply(&mut self, m: Mat4) {
        self.set_transform(self.transform * m);
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(Mat4::from_translation(Vec3::new(x, y, z)));
    }

    pub fn rotate_x(&mut self, deg: f32) {
        self.multiply(Mat4::from_rotation_x(deg.to_radians()));
    }

    pub fn rotate_y(&mut self, deg: f32) {
        self.multiply(Mat4::from_rotation_y(deg.to_radians()));
    }

    pub fn rotate_z(&mut self, deg: f32) {
        self.multiply(Mat4::from_rotation_z(deg.to_radians()));
    }

    /// Rotate about X, then Y, then Z (each applied to the already-rotated frame)
    pub fn rotate_xyz(&mut self, [rx, ry, rz]: [f32; 3]) {
        self.rotate_x(rx);
        self.rotate_y(ry);
        self.rotate_z(rz);
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.multiply(Mat4::from_scale(Vec3::new(x, y, z)));
    }

    pub fn uniform_scale(&mut self, s: f32) {
        self.scale(s, s, s);
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Emit one vertex in local coordinates; returns its index
    pub fn vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let world = self.transform.transform_point3(position);
        let n = (self.normal_matrix * normal).normalize_or_zero();
        let m = &self.material;
        self.mesh.vertices.push(Vertex {
            position: world.to_array(),
            normal: n.to_array(),
            uv: uv.to_array(),
            ambient: m.ambient,
            diffuse: m.diffuse,
            specular: [m.specular[0], m.specular[1], m.specular[2], m.shininess],
            emission: m.emission,
            texture: m.texture.layer(),
        });
        (self.mesh.vertices.len() - 1) as u32
    }

    /// Emit a triangle by index, keeping counter-clockwise winding under
    /// mirroring transforms
    pub fn triangle(&mut self, a: u32, b: u32, c: u32) {
        if self.transform.determinant() < 0.0 {
            self.mesh.indices.extend_from_slice(&[a, c, b]);
        } else {
            self.mesh.indices.extend_from_slice(&[a, b, c]);
        }
    }

    /// Flat quad with one normal; corners in counter-clockwise order
    pub fn quad(&mut self, corners: [Vec3; 4], normal: Vec3, uvs: [Vec2; 4]) {
        let i: Vec<u32> = corners
            .iter()
            .zip(uvs.iter())
            .map(|(p, uv)| self.vertex(*p, normal, *uv))
            .collect();
        self.triangle(i[0], i[1], i[2]);
        self.triangle(i[0], i[2], i[3]);
    }

    /// Untextured flat quad
    pub fn flat_quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        self.quad(corners, normal, [Vec2::ZERO; 4]);
    }

    /// Triangle fan around `center`
    pub fn fan(&mut self, center: (Vec3, Vec3, Vec2), rim: &[(Vec3, Vec3, Vec2)]) {
        if rim.len() < 2 {
            return;
        }
        let c = self.vertex(center.0, center.1, center.2);
        let rim: Vec<u32> = rim
            .iter()
            .map(|(p, n, uv)| self.vertex(*p, *n, *uv))
            .collect();
        for pair in rim.windows(2) {
            self.triangle(c, pair[0], pair[1]);
        }
    }

    /// Quad strip from consecutive `(a, b)` vertex pairs, with smooth normals
    pub fn strip(&mut self, pairs: &[[(Vec3, Vec3, Vec2); 2]]) {
        if pairs.len() < 2 {
            return;
        }
        let idx: Vec<[u32; 2]> = pairs
            .iter()
            .map(|[a, b]| [self.vertex(a.0, a.1, a.2), self.vertex(b.0, b.1, b.2)])
            .collect();
        for w in idx.windows(2) {
            let [a0, b0] = w[0];
            let [a1, b1] = w[1];
            self.triangle(a0, b0, b1);
            self.triangle(a0, b1, a1);
        }
    }

    /// Current vertex count (useful to measure a part)
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertices.len()
    }

    pub fn finish(self) -> Mesh {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quad_emits_two_triangles() {
        let mut b = MeshBuilder::new();
        b.flat_quad(
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            Vec3::Z,
        );
        let mesh = b.finish();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_transform_stack_restores() {
        let mut b = MeshBuilder::new();
        b.push();
        b.translate(5.0, 0.0, 0.0);
        b.pop();
        let i = b.vertex(Vec3::ZERO, Vec3::Y, Vec2::ZERO);
        let mesh = b.finish();
        assert_eq!(mesh.vertices[i as usize].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normals_renormalized_under_scale() {
        let mut b = MeshBuilder::new();
        b.scale(0.2, 3.0, 1.0);
        b.vertex(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0).normalize(), Vec2::ZERO);
        let mesh = b.finish();
        let n = Vec3::from_array(mesh.vertices[0].normal);
        assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
        // Non-uniform scale bends the normal toward the squashed axis
        assert!(n.x > n.y);
    }

    #[test]
    fn test_mirroring_flips_winding() {
        let mut b = MeshBuilder::new();
        b.scale(-1.0, 1.0, 1.0);
        let a = b.vertex(Vec3::ZERO, Vec3::Z, Vec2::ZERO);
        let c = b.vertex(Vec3::X, Vec3::Z, Vec2::ZERO);
        let d = b.vertex(Vec3::Y, Vec3::Z, Vec2::ZERO);
        b.triangle(a, c, d);
        assert_eq!(b.finish().indices, vec![a, d, c]);
    }

    #[test]
    fn test_material_baked_into_vertex() {
        let mut b = MeshBuilder::new();
        b.set_material(
            Material::new([0.1; 3], [0.5; 3], [1.0; 3], 100.0)
                .with_texture(TextureSlot::Asphalt)
                .with_emission([0.8, 0.0, 0.0]),
        );
        b.vertex(Vec3::ZERO, Vec3::Y, Vec2::ZERO);
        let v = b.finish().vertices[0];
        assert_eq!(v.specular[3], 100.0);
        assert_eq!(v.emission, [0.8, 0.0, 0.0]);
        assert_eq!(v.texture, TextureSlot::Asphalt.layer());
    }

    #[test]
    fn test_bounds() {
        let mut b = MeshBuilder::new();
        let a = b.vertex(Vec3::ZERO, Vec3::Y, Vec2::ZERO);
        let c = b.vertex(Vec3::X, Vec3::Y, Vec2::ZERO);
        let d = b.vertex(Vec3::Z, Vec3::Y, Vec2::ZERO);
        b.triangle(a, c, d);
        let mesh = b.finish();

        assert_eq!(mesh.indices, vec![0, 1, 2]);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::ZERO);
        assert_eq!(hi, Vec3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut b = MeshBuilder::new();
        primitives::cube(&mut b, [0.0; 3], [0.5; 3], 0.0, [0.0; 2]);
        let first = b.finish();
        let mut b = MeshBuilder::new();
        primitives::cube(&mut b, [2.0, 0.0, 0.0], [0.5; 3], 0.0, [0.0; 2]);
        let second = b.finish();

        let mut mesh = first.clone();
        mesh.append(&second);
        assert_eq!(mesh.vertex_count(), 48);
        assert_eq!(mesh.triangle_count(), 24);
        assert_eq!(mesh.indices[..36], first.indices[..]);
        assert!(mesh.indices[36..].iter().all(|&i| (24..48).contains(&i)));
        assert_eq!(mesh.indices.iter().max(), Some(&47));
        let (lo, hi) = mesh.bounds().unwrap();
        assert_relative_eq!(lo.x, -0.5, epsilon = 1e-6);
        assert_relative_eq!(hi.x, 2.5, epsilon = 1e-6);
        assert_relative_eq!(hi.y, 0.5, epsilon = 1e-6);
    }
}
