use glam::Vec3;
use rapier3d::control::{EffectiveCharacterMovement, KinematicCharacterController};
use rapier3d::prelude::*;

pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    const DEFAULT_TIMESTEP: Real = 1.0 / 60.0;

    pub fn new() -> Self {
        Self::with_timestep(Self::DEFAULT_TIMESTEP)
    }

    pub fn with_timestep(dt: Real) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        integration_parameters.min_ccd_dt = dt / 100.0;

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vector::new(0.0, -9.81, 0.0),
        }
    }

    /// Advances the solver and refreshes the broad phase used by character queries.
    pub fn step(&mut self) {
        self.pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Kinematic capsule body for a player, `height` measured tip to tip.
    pub fn add_character(&mut self, position: Vec3, radius: Real, height: Real) -> RigidBodyHandle {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(Vector::new(position.x, position.y, position.z))
            .lock_rotations()
            .build();

        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::capsule_y(capsule_half_segment(radius, height), radius)
            .friction(0.0)
            .build();

        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        handle
    }

    pub fn add_static_box(&mut self, position: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(Vector::new(position.x, position.y, position.z))
            .build();
        self.colliders.insert(collider)
    }

    /// Flat slab whose top face sits at `y`.
    pub fn add_ground(&mut self, y: Real, half_size: Real) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_size, 0.1, half_size)
            .translation(Vector::new(0.0, y - 0.1, 0.0))
            .build();
        self.colliders.insert(collider)
    }

    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<Pose> {
        self.bodies.get(handle).map(|b| *b.position())
    }

    pub fn set_body_position(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            let current_rot = *body.rotation();
            let new_pose =
                Pose::from_parts(Vector::new(position.x, position.y, position.z), current_rot);
            body.set_position(new_pose, true);
        }
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|b| {
            let t = b.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    pub fn move_character(
        &self,
        controller: &KinematicCharacterController,
        handle: RigidBodyHandle,
        shape: &SharedShape,
        position: Pose,
        desired_translation: Vector,
    ) -> EffectiveCharacterMovement {
        let filter = QueryFilter::default().exclude_rigid_body(handle);
        let query_pipeline = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        );

        controller.move_shape(
            self.integration_parameters.dt,
            &query_pipeline,
            shape.as_ref(),
            &position,
            desired_translation,
            |_collision| {},
        )
    }

    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: Real,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<(Vec3, Real)> {
        let mut filter = QueryFilter::default();
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }
        let query = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        );
        let ray = Ray::new(
            Vector::new(origin.x, origin.y, origin.z),
            Vector::new(direction.x, direction.y, direction.z),
        );

        query.cast_ray(&ray, max_distance, true).map(|(_, toi)| {
            let hit_point = origin + direction * toi;
            (hit_point, toi)
        })
    }
}

pub(crate) fn capsule_half_segment(radius: Real, height: Real) -> Real {
    (height / 2.0 - radius).max(0.0)
}
