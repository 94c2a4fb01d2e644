use glam::{Mat4, Vec3};

/// Orthonormal camera frame used for ray generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

/// Camera for both back ends.
///
/// The view matrix is cached and rebuilt by every mutator. The projection
/// matrix is derived on read from the current field of view, viewport and
/// projection mode. Fields are public for scene setup; call
/// [`Camera::update`] after writing them directly.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye_position: Vec3,
    pub look_at: Vec3,
    pub up_vector: Vec3,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub view_port_width: f32,
    pub view_port_height: f32,
    pub aspect_ratio: f32,
    pub roll: f32,
    pub use_perspective: bool,
    view_matrix: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            eye_position: Vec3::new(0.0, 0.0, 5.0),
            look_at: Vec3::ZERO,
            up_vector: Vec3::Y,
            field_of_view: 90.0,
            near_plane: 0.1,
            far_plane: 100.0,
            view_port_width: 1.0,
            view_port_height: 1.0,
            aspect_ratio: 1.0,
            roll: 0.0,
            use_perspective: true,
            view_matrix: Mat4::IDENTITY,
        };
        camera.update();
        camera
    }
}

impl Camera {
    /// Create a camera at `eye` looking at `target` with the default lens.
    pub fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut camera = Self {
            eye_position: eye,
            look_at: target,
            up_vector: up,
            ..Self::default()
        };
        camera.update();
        camera
    }

    /// Rebuild the cached view matrix from eye, look-at and up.
    pub fn update(&mut self) {
        let basis = self.basis();
        self.view_matrix = Mat4::from_cols(
            basis.right.extend(0.0),
            basis.up.extend(0.0),
            (-basis.forward).extend(0.0),
            self.eye_position.extend(1.0),
        )
        .inverse();
    }

    /// World → camera space.
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Camera → clip space, recomputed on every call.
    pub fn projection_matrix(&self) -> Mat4 {
        if self.use_perspective {
            Mat4::perspective_rh_gl(
                self.field_of_view.to_radians(),
                self.view_port_width / self.view_port_height,
                self.near_plane,
                self.far_plane,
            )
        } else {
            Mat4::orthographic_rh_gl(-1.0, 1.0, -1.0, 1.0, self.near_plane, self.far_plane)
        }
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Right/up/forward frame derived from the current orientation.
    ///
    /// An up vector parallel to the look direction produces a degenerate
    /// (NaN) frame; this is reported but not corrected.
    pub fn basis(&self) -> CameraBasis {
        let forward = (self.look_at - self.eye_position).normalize();
        let cross = forward.cross(self.up_vector);
        if cross.length_squared() < 1e-12 {
            log::warn!(
                "camera up vector {:?} is parallel to look direction {:?}",
                self.up_vector,
                forward
            );
        }
        let right = cross.normalize();
        let up = right.cross(forward).normalize();
        CameraBasis { right, up, forward }
    }

    pub fn set_eye_position(&mut self, eye: Vec3) {
        self.eye_position = eye;
        self.update();
    }

    pub fn set_look_at(&mut self, look_at: Vec3) {
        self.look_at = look_at;
        self.update();
    }

    pub fn set_up_vector(&mut self, up: Vec3) {
        self.up_vector = up;
        self.update();
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect_ratio = aspect;
        self.update();
    }

    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.field_of_view = degrees;
        self.update();
    }

    pub fn set_near_plane(&mut self, near: f32) {
        self.near_plane = near;
        self.update();
    }

    pub fn set_far_plane(&mut self, far: f32) {
        self.far_plane = far;
        self.update();
    }

    pub fn set_view_port(&mut self, width: f32, height: f32) {
        self.view_port_width = width;
        self.view_port_height = height;
        self.update();
    }

    /// Switch between perspective and orthographic projection.
    pub fn set_projection(&mut self, perspective: bool) {
        self.use_perspective = perspective;
    }

    /// Translate eye and target together along the look direction.
    pub fn move_forward(&mut self, distance: f32) {
        let direction = (self.look_at - self.eye_position).normalize();
        self.eye_position += direction * distance;
        self.look_at += direction * distance;
        self.update();
    }

    pub fn move_backward(&mut self, distance: f32) {
        self.move_forward(-distance);
    }

    /// Pitch about the camera's right axis. Angle in degrees.
    pub fn look_up(&mut self, degrees: f32) {
        let look = self.look_at - self.eye_position;
        let right = look.cross(self.up_vector).normalize();
        let rotation = Mat4::from_axis_angle(right, degrees.to_radians());

        let look = rotation.transform_vector3(look);
        self.look_at = self.eye_position + look;
        self.up_vector = rotation.transform_vector3(self.up_vector);
        self.check_up_perpendicular(look);
        self.update();
    }

    pub fn look_down(&mut self, degrees: f32) {
        self.look_up(-degrees);
    }

    /// Yaw about the up vector. Angle in degrees.
    pub fn look_left(&mut self, degrees: f32) {
        let look = self.look_at - self.eye_position;
        let rotation = Mat4::from_axis_angle(self.up_vector.normalize(), degrees.to_radians());
        self.look_at = self.eye_position + rotation.transform_vector3(look);
        self.update();
    }

    pub fn look_right(&mut self, degrees: f32) {
        self.look_left(-degrees);
    }

    /// Rotate the up vector about the look direction. Angle in degrees.
    pub fn roll_camera(&mut self, degrees: f32) {
        let look = self.look_at - self.eye_position;
        let rotation = Mat4::from_axis_angle(look.normalize(), degrees.to_radians());
        self.up_vector = rotation.transform_vector3(self.up_vector);
        self.roll += degrees;
        self.check_up_perpendicular(look);
        self.update();
    }

    /// Widen or narrow the field of view; changes leaving [0, 180] are ignored.
    pub fn change_field_of_view(&mut self, delta: f32) {
        let fov = self.field_of_view + delta;
        if !(0.0..=180.0).contains(&fov) {
            return;
        }
        self.field_of_view = fov;
        self.update();
    }

    /// Return to a close-up view of the origin with a 45 degree lens.
    pub fn reset(&mut self) {
        *self = Self {
            eye_position: Vec3::new(0.0, 0.0, 1.0),
            field_of_view: 45.0,
            ..Self::default()
        };
        self.update();
    }

    fn check_up_perpendicular(&self, look: Vec3) {
        if self.up_vector.dot(look).abs() > 0.001 {
            log::warn!("camera up vector is not perpendicular to the look direction");
        }
    }
}
