//! Per-object instance data for the render host

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

use super::animator::AnimatedTransform;
use super::objects::ManagedObject;

/// Instance record for GPU upload (80 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    /// `ObjectKind` as u32
    pub kind: u32,
    /// 1 when the object should be drawn
    pub visible: u32,
    /// `ObjectId::instance_key`, lets the host map instances to textures
    pub object_id: u32,
    pub _pad: u32,
}

impl InstanceRaw {
    pub fn new(object: &ManagedObject, transform: &AnimatedTransform) -> Self {
        Self {
            model: model_matrix(transform).to_cols_array_2d(),
            kind: object.kind() as u32,
            visible: u32::from(object.is_renderable()),
            object_id: object.id.instance_key(),
            _pad: 0,
        }
    }
}

/// Scale, then rotate (XYZ Euler), then translate
pub fn model_matrix(transform: &AnimatedTransform) -> Mat4 {
    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        transform.rotation.x,
        transform.rotation.y,
        transform.rotation.z,
    );
    Mat4::from_scale_rotation_translation(Vec3::splat(transform.scale), rotation, transform.position)
}
