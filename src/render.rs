//! Per-frame snapshot of a scene for a render backend.
//!
//! A [`Frame`] contains everything a backend uploads once per frame, already in
//! GPU layout: the camera uniform, the active point light and one
//! [`ObjectRaw`] per geometry node. Vertex generation, buffers and draw calls
//! stay on the backend's side.
//!
//! # Key types
//!
//! - [`CameraUniform`] holds the eye position and `projection * view`
//! - [`LightUniform`] holds position and color of the point light, padded to 16 bytes
//! - [`ObjectRaw`] holds world matrix, normal matrix, color and size of one object
//!

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    color::Color,
    data_structures::{node::NodeId, transform::TransformRaw},
    error::{Result, SceneError},
    scene::Scene,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    /// `projection * inverse(world)`. Fails if the world matrix is singular,
    /// e.g. for a camera scaled to zero.
    pub fn update_view_proj(
        &mut self,
        world_matrix: Matrix4<f32>,
        projection: Matrix4<f32>,
    ) -> Result<()> {
        let view = world_matrix.invert().ok_or_else(|| {
            SceneError::InvalidOperation(format!(
                "camera world matrix {:?} is not invertible",
                world_matrix
            ))
        })?;
        self.view_position = world_matrix.w.into();
        self.view_proj = (projection * view).into();
        Ok(())
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub color: [f32; 3],
    _padding2: u32,
}

impl LightUniform {
    pub fn new(position: [f32; 3], color: Color) -> Self {
        Self {
            position,
            _padding: 0,
            color,
            _padding2: 0,
        }
    }
}

/**
 * Per object data: the world transform in GPU layout plus the render
 * attributes of the geometry.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectRaw {
    pub transform: TransformRaw,
    pub color: [f32; 3],
    pub size: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub clear_color: Color,
    pub ambient_light: Color,
    pub camera: CameraUniform,
    pub light: Option<LightUniform>,
    pub objects: Vec<ObjectRaw>,
}

impl Frame {
    /// Camera, light and objects as byte slices ready for upload.
    pub fn camera_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.camera)
    }

    pub fn object_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.objects)
    }
}

impl Scene {
    /// Run [`Scene::update`] and collect the frame seen through `camera`.
    ///
    /// A parentless camera that is not part of the scene still gets its world
    /// matrix refreshed. A camera below the root is covered by the update.
    pub fn frame(&mut self, camera: NodeId) -> Result<Frame> {
        self.update()?;
        let camera_node = self.graph().node(camera)?;
        if camera_node.parent().is_none() {
            self.graph_mut().update_world_matrix(camera)?;
        }

        let camera_node = self.graph().node(camera)?;
        let projection = camera_node
            .camera_payload()
            .ok_or_else(|| {
                SceneError::InvalidOperation(format!(
                    "node {} '{}' is a {}, not a camera",
                    camera,
                    camera_node.name(),
                    camera_node.kind().label()
                ))
            })?
            .projection_matrix();
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(camera_node.world_matrix(), projection)?;

        let light = match self.render_list().point_lights.first() {
            Some(id) => {
                let node = self.graph().node(*id)?;
                let color = node.color().unwrap_or(crate::color::WHITE);
                Some(LightUniform::new(node.world_position().into(), color))
            }
            None => None,
        };

        let mut objects = Vec::with_capacity(self.render_list().geometry.len());
        for id in &self.render_list().geometry {
            let node = self.graph().node(*id)?;
            let Some(object) = node.object() else {
                continue;
            };
            objects.push(ObjectRaw {
                transform: TransformRaw::from_matrix(node.world_matrix(), node.world_rotation()),
                color: object.color,
                size: object.size().into(),
            });
        }

        Ok(Frame {
            clear_color: self.config().background_color,
            ambient_light: self.config().ambient_light,
            camera: camera_uniform,
            light,
            objects,
        })
    }
}
