use glam::Vec3;

use crate::physics::PhysicsWorld;

use super::{MapObject, MapObjectKind};

/// Jump course: open floor, a raised ledge to run off, and a wall that needs
/// a double jump to clear.
pub struct JumpCourse {
    objects: Vec<MapObject>,
}

impl Default for JumpCourse {
    fn default() -> Self {
        Self::new()
    }
}

impl JumpCourse {
    pub const GROUND_Y: f32 = 0.0;
    const GROUND_SIZE: f32 = 50.0;

    pub const LEDGE_TOP: f32 = 2.0;
    pub const LEDGE_EDGE_Z: f32 = 4.0;

    pub const WALL_Z: f32 = 12.0;
    pub const WALL_TOP: f32 = 4.0;

    pub fn new() -> Self {
        let objects = vec![
            MapObject::ground(Vec3::new(0.0, Self::GROUND_Y, 0.0), Self::GROUND_SIZE),
            MapObject::static_box(
                Vec3::new(0.0, Self::LEDGE_TOP / 2.0, Self::LEDGE_EDGE_Z - 2.0),
                Vec3::new(3.0, Self::LEDGE_TOP / 2.0, 2.0),
            ),
            MapObject::static_box(
                Vec3::new(0.0, Self::WALL_TOP / 2.0, Self::WALL_Z + 1.0),
                Vec3::new(3.0, Self::WALL_TOP / 2.0, 1.0),
            ),
        ];

        Self { objects }
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    /// Where a player stands on top of the ledge, `height` being the capsule height.
    pub fn ledge_spawn(&self, height: f32) -> Vec3 {
        Vec3::new(0.0, Self::LEDGE_TOP + height / 2.0 + 0.05, Self::LEDGE_EDGE_Z - 3.0)
    }

    pub fn build(&self, physics: &mut PhysicsWorld) {
        for object in &self.objects {
            match object.kind {
                MapObjectKind::Ground => {
                    physics.add_ground(object.position.y, object.half_extents.x);
                }
                MapObjectKind::StaticBox => {
                    physics.add_static_box(object.position, object.half_extents);
                }
            }
        }
        log::debug!("Built jump course with {} objects", self.objects.len());
    }
}
