use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapObjectKind {
    Ground,
    StaticBox,
}

#[derive(Debug, Clone)]
pub struct MapObject {
    pub kind: MapObjectKind,
    pub position: Vec3,
    pub half_extents: Vec3,
}

impl MapObject {
    /// Ground slab whose top face sits at `position.y`.
    pub fn ground(position: Vec3, half_size: f32) -> Self {
        Self {
            kind: MapObjectKind::Ground,
            position,
            half_extents: Vec3::new(half_size, 0.1, half_size),
        }
    }

    pub fn static_box(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            kind: MapObjectKind::StaticBox,
            position,
            half_extents,
        }
    }

    pub fn top(&self) -> f32 {
        match self.kind {
            MapObjectKind::Ground => self.position.y,
            MapObjectKind::StaticBox => self.position.y + self.half_extents.y,
        }
    }
}
