use glam::{Mat4, Vec3, Vec4};
use lain_common::{Aabb, EntityId, EntityInfo};
use lain_ecs::{EntityRegistry, RenderComponent};

pub const GREY: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);
pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
pub const GREEN: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
pub const WIREFRAME: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

/// Axis lines float slightly above the grid to avoid z-fighting.
const AXIS_HEIGHT: f32 = 0.01;
const AXIS_LENGTH: f32 = 1000.0;

/// Camera matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub view: Mat4,
    pub projection: Mat4,
    /// Camera position in world space.
    pub camera_position: Vec3,
}

impl Default for RenderView {
    fn default() -> Self {
        let eye = Vec3::new(0.0, 10.0, 10.0);
        Self {
            view: Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
            projection: Mat4::perspective_rh_gl(45f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0),
            camera_position: eye,
        }
    }
}

/// One entity to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub id: EntityId,
    pub model_matrix: Mat4,
    pub render: RenderComponent,
}

/// Line segments sharing a colour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSet {
    pub colour: Vec4,
    pub lines: Vec<[Vec3; 2]>,
}

impl LineSet {
    pub fn new(colour: Vec4) -> Self {
        Self {
            colour,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, a: Vec3, b: Vec3) {
        self.lines.push([a, b]);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The twelve edges of a box.
    pub fn push_box(&mut self, aabb: &Aabb) {
        let c = aabb.corners();
        // Corner index bits are (x, y, z) with min = 0; edges join corners
        // that differ in exactly one bit.
        const EDGES: [(usize, usize); 12] = [
            (0, 4), (1, 5), (2, 6), (3, 7),
            (0, 2), (1, 3), (4, 6), (5, 7),
            (0, 1), (2, 3), (4, 5), (6, 7),
        ];
        for (a, b) in EDGES {
            self.push(c[a], c[b]);
        }
    }
}

/// Grid squares allowed on each side of the origin.
const MAX_GRID_SQUARES: i32 = 4096;

/// Editor ground grid on the y = 0 plane.
///
/// One line parallel to X and one parallel to Z at every multiple of
/// `square_size` within `[-2 * half_extent, 2 * half_extent]`, each line
/// spanning that same range.
pub fn grid_lines(square_size: f32, half_extent: f32) -> LineSet {
    let mut grid = LineSet::new(GREY);
    if !(square_size > 0.0 && half_extent > 0.0 && square_size.is_finite() && half_extent.is_finite()) {
        tracing::warn!(square_size, half_extent, "grid skipped: non-positive dimensions");
        return grid;
    }
    let squares = (2.0 * half_extent) / square_size;
    if squares > MAX_GRID_SQUARES as f32 {
        tracing::warn!(square_size, half_extent, "grid skipped: too many squares");
        return grid;
    }
    let squares = squares as i32;
    let span = half_extent * 2.0;
    for i in -squares..=squares {
        let offset = i as f32 * square_size;
        grid.push(Vec3::new(-span, 0.0, offset), Vec3::new(span, 0.0, offset));
        grid.push(Vec3::new(offset, 0.0, -span), Vec3::new(offset, 0.0, span));
    }
    grid
}

/// Red positive X axis and green positive Z axis.
pub fn world_axes() -> [LineSet; 2] {
    let origin = Vec3::new(0.0, AXIS_HEIGHT, 0.0);
    let mut x = LineSet::new(RED);
    x.push(origin, Vec3::new(AXIS_LENGTH, AXIS_HEIGHT, 0.0));
    let mut z = LineSet::new(GREEN);
    z.push(origin, Vec3::new(0.0, AXIS_HEIGHT, AXIS_LENGTH));
    [x, z]
}

/// Mode-specific UI content.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Free-fly navigation: only the camera readout.
    Move { camera_position: Vec3 },
    /// Editing: scene stats, the selected entity's panel and the last
    /// status message.
    Edit {
        entity_count: usize,
        selected: Option<EntityInfo>,
        status: Option<String>,
    },
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub view: RenderView,
    pub grid: LineSet,
    pub axes: [LineSet; 2],
    pub items: Vec<DrawItem>,
    /// Collision box outlines; empty unless debug drawing is on.
    pub wireframes: LineSet,
    pub overlay: Overlay,
}

impl Frame {
    /// Build the frame from read-only scene state.
    pub fn extract(
        registry: &EntityRegistry,
        view: RenderView,
        debug_draw: bool,
        overlay: Overlay,
        grid: LineSet,
    ) -> Self {
        let items = registry
            .draw_items()
            .map(|(id, model_matrix, render)| DrawItem {
                id,
                model_matrix,
                render: *render,
            })
            .collect();

        let mut wireframes = LineSet::new(WIREFRAME);
        if debug_draw {
            for aabb in registry.debug_shapes() {
                wireframes.push_box(aabb);
            }
        }

        Self {
            view,
            grid,
            axes: world_axes(),
            items,
            wireframes,
            overlay,
        }
    }
}
